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

//! # Bort Solver
//!
//! The public face of the optimizer.
//!
//! - `api`: `construct`, `improve`, `solve_exact`, `solve_exact_with` and
//!   `validate`.
//! - `config`: `ImproveConfig` and `ExactConfig` with their builders.
//! - `solver`: the parallel portfolio that runs local search trials and
//!   exact strategies side by side.
//!
//! The branch-and-bound engine sits behind the default `exact` feature.
//! Without it, `solve_exact_with` still accepts any strategy implementing
//! `bort_search::portfolio::PortofolioSolver`.

pub mod api;
pub mod config;
pub mod solver;
