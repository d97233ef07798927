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

//! Monitoring interface for local search runs.
//!
//! Hooks cover the lifecycle of a run: start and end, every iteration and the
//! three outcomes of an evaluated candidate (accepted, rejected, new best).
//! `search_command` lets a monitor stop the run; by default it continues.

use crate::{plan::WorkingPlan, stats::LocalSearchStatistics};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::monitor::search_monitor::SearchCommand;

/// A monitor for local search runs.
pub trait LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called at the start of the local search.
    fn on_start(&mut self, plan: &WorkingPlan<T>);

    /// Called at the end of the local search with the best solution.
    fn on_end(&mut self, best_solution: &Solution<T>, statistics: &LocalSearchStatistics);

    /// Called at the end of each iteration.
    fn on_iteration(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics);

    /// Called when the best solution improves.
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &LocalSearchStatistics);

    /// Called after a candidate was committed.
    fn on_solution_accepted(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics);

    /// Called after a candidate was discarded.
    fn on_solution_rejected(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics);

    /// Determines the command for the next step of the local search.
    fn search_command(&mut self, _statistics: &LocalSearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<T> std::fmt::Debug for dyn LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor: {}", self.name())
    }
}

/// A monitor that observes nothing and never stops the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOperationLocalSearchMonitor;

impl NoOperationLocalSearchMonitor {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> LocalSearchMonitor<T> for NoOperationLocalSearchMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "NoOperationLocalSearchMonitor"
    }

    fn on_start(&mut self, _plan: &WorkingPlan<T>) {}
    fn on_end(&mut self, _best_solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_iteration(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_accepted(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_rejected(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
}
