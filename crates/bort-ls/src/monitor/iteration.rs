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

//! Move budget.

use crate::{
    monitor::local_search_monitor::LocalSearchMonitor, plan::WorkingPlan,
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::monitor::search_monitor::SearchCommand;

/// Terminates once `iterations >= limit`. Every proposed move counts,
/// whether it turned out feasible or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IterationLimitMonitor {
    limit: u64,
}

impl IterationLimitMonitor {
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<T> LocalSearchMonitor<T> for IterationLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "IterationLimitMonitor"
    }

    fn on_start(&mut self, _plan: &WorkingPlan<T>) {}
    fn on_end(&mut self, _best_solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_iteration(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_accepted(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_rejected(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if statistics.iterations >= self.limit {
            return SearchCommand::Terminate("move budget exhausted".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = IterationLimitMonitor::new(3);
        let mut stats = LocalSearchStatistics {
            iterations: 2,
            ..Default::default()
        };
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );
        stats.on_iteration();
        assert!(matches!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Terminate(_)
        ));
    }
}
