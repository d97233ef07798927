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

//! `tracing` output for local search runs.

use crate::{
    monitor::local_search_monitor::LocalSearchMonitor, plan::WorkingPlan,
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;

/// Emits a `debug` event for every new best and a summary when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMonitor {
    label: String,
}

impl LogMonitor {
    /// `label` identifies the run in the log lines, e.g. the trial index.
    #[inline]
    pub fn new<S>(label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
        }
    }
}

impl<T> LocalSearchMonitor<T> for LogMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, plan: &WorkingPlan<T>) {
        tracing::debug!(
            run = %self.label,
            objective = %plan.objective(),
            active = plan.len(),
            "local search started"
        );
    }

    fn on_end(&mut self, best_solution: &Solution<T>, statistics: &LocalSearchStatistics) {
        tracing::debug!(
            run = %self.label,
            best = %best_solution.objective_value(),
            iterations = statistics.iterations,
            accepted = statistics.accepted_solutions,
            improvements = statistics.improvements,
            elapsed = ?statistics.time_total,
            "local search finished"
        );
    }

    fn on_iteration(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &LocalSearchStatistics) {
        tracing::debug!(
            run = %self.label,
            objective = %solution.objective_value(),
            iteration = statistics.iterations,
            "new best"
        );
    }

    fn on_solution_accepted(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_rejected(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
}
