// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Bort Model
//!
//! **The domain model for the Bort library scanning optimizer.**
//!
//! A set of scored books, a set of libraries that hold them and a horizon of
//! `D` days. Libraries sign up one after another on a single serial resource;
//! once signed up, a library scans a bounded number of its books per day. Every
//! book counts at most once.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `BookIndex` and `LibraryIndex`.
//! * **`model`**: The immutable `Model` (structure of arrays, holdings pre-sorted
//!   by score) and the `ModelBuilder` / `InstanceData` used to create it.
//! * **`solution`**: The `Solution` output: an ordered activation plan with the
//!   books claimed by each library.
//! * **`validation`**: Recomputes every invariant of a `Solution` from scratch.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Malformed input is rejected when the model is built, so the
//!     search engines never see negative days or dangling book ids.
//! 2.  **Read-Only Sharing**: A built `Model` is immutable and `Sync`; concurrent
//!     trials share it by reference.

pub mod index;
pub mod model;
pub mod solution;
pub mod validation;
