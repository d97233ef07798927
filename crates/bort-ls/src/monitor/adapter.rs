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

//! Runs a portfolio `SearchMonitor` inside a local search.
//!
//! The portfolio hands every member one `SearchMonitor` (interrupt flag,
//! global time limit). The adapter forwards iterations as steps and new bests
//! as found solutions, and turns the monitor's verdict into the local search's
//! own `search_command`.

use crate::{
    monitor::local_search_monitor::LocalSearchMonitor, plan::WorkingPlan,
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

pub struct SearchMonitorAdapter<'a, T>
where
    T: SolverNumeric,
{
    inner: &'a mut dyn SearchMonitor<T>,
}

impl<'a, T> SearchMonitorAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(inner: &'a mut dyn SearchMonitor<T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> std::fmt::Debug for SearchMonitorAdapter<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchMonitorAdapter")
            .field("inner", &self.inner.name())
            .finish()
    }
}

impl<'a, T> LocalSearchMonitor<T> for SearchMonitorAdapter<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SearchMonitorAdapter"
    }

    fn on_start(&mut self, _plan: &WorkingPlan<T>) {}
    fn on_end(&mut self, _best_solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}

    fn on_iteration(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {
        self.inner.on_step();
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, _statistics: &LocalSearchStatistics) {
        self.inner.on_solution_found(solution);
    }

    fn on_solution_accepted(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_rejected(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}

    fn search_command(&mut self, _statistics: &LocalSearchStatistics) -> SearchCommand {
        self.inner.search_command()
    }
}
