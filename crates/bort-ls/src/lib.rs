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

//! # Bort Local Search
//!
//! Improves a valid solution by sampling moves on its activation order.
//!
//! ## Modules
//!
//! - `moves`: The move vocabulary (swap, relocate, drop, activate).
//! - `plan`: `WorkingPlan`, the mutable solution with suffix re-planning and
//!   copy-on-write candidates.
//! - `operator`: Move generation and the weighted random operator.
//! - `meta`: Acceptance policies (hill climbing, simulated annealing).
//! - `monitor`: Run observers and limits (time, move budget, stagnation).
//! - `engine`: The search loop.
//! - `portfolio`: One trial as a portfolio member.
//! - `result`, `stats`: Outcome and statistics of a run.

pub mod engine;
pub mod meta;
pub mod monitor;
pub mod moves;
pub mod operator;
pub mod plan;
pub mod portfolio;
pub mod result;
pub mod stats;
