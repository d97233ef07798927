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

//! # Bort Branch-and-Bound
//!
//! Exact search over library activation sequences.
//!
//! - `assignment`: optimal book assignment for a fixed sequence.
//! - `bound`: upper bounds on every extension of a sequence.
//! - `state`: search tree nodes.
//! - `bnb`: the depth first branch-and-bound solver.
//! - `incumbent`: local or shared best known solution.
//! - `monitor`: observers and limits for the tree search.
//! - `result`, `stats`: what a run reports.
//! - `portfolio`: the solver as a portfolio member.

pub mod assignment;
pub mod bnb;
pub mod bound;
pub mod incumbent;
pub mod monitor;
pub mod portfolio;
pub mod result;
pub mod state;
pub mod stats;
