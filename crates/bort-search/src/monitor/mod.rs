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

//! # Search Monitors
//!
//! Pluggable observers and controllers shared by every portfolio member.
//! Monitors enforce budgets and stop signals without entangling them in the
//! engines' inner loops.
//!
//! ## Submodules
//!
//! - `search_monitor`: The `SearchMonitor<T>` trait, the `SearchCommand` enum
//!   and a `NoOperationMonitor`.
//! - `composite`: Aggregates multiple monitors into one.
//! - `interrupt`: Stops the search when a shared `AtomicBool` is raised.
//! - `solution`: Counts reported solutions and enforces a global solution limit.
//! - `time_limit`: Wall-clock budget with step-filtered clock reads.

pub mod composite;
pub mod interrupt;
pub mod search_monitor;
pub mod solution;
pub mod time_limit;
