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

//! Metaheuristic interface for local search control.
//!
//! The trait separates move generation and evaluation from the acceptance
//! policy. The engine hands over objective values only: the policy decides on
//! scores, never on the plans behind them.

use bort_core::num::SolverNumeric;
use bort_search::monitor::search_monitor::SearchCommand;

/// Governs acceptance and termination of the local search.
///
/// Objectives are maximized. `current` is the score of the plan a move
/// starts from, `best` the best score seen so far in this run.
pub trait Metaheuristic<T>: Send + Sync
where
    T: SolverNumeric,
{
    /// Returns the name of the metaheuristic.
    fn name(&self) -> &str;

    /// Called at the start of the search.
    fn on_start(&mut self, initial_objective: T);

    /// Determines if the search should proceed to the next iteration.
    fn search_command(&mut self, iteration: u64, best_objective: T) -> SearchCommand;

    /// Decides whether the candidate replaces the current plan.
    fn should_accept(&mut self, current: T, candidate: T, best: T) -> bool;

    /// Called when a move is accepted.
    fn on_accept(&mut self, new_current: T);

    /// Called when a move is rejected.
    fn on_reject(&mut self, rejected_candidate: T);

    /// Called when a new best score is reached.
    fn on_new_best(&mut self, new_best: T);
}

impl<T> std::fmt::Debug for dyn Metaheuristic<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn Metaheuristic<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic: {}", self.name())
    }
}
