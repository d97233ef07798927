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

//! Wall-clock limit for the tree search. The clock is read only when
//! `(nodes & clock_check_mask) == 0`.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchNode,
    stats::BnbSolverStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use bort_search::monitor::search_monitor::SearchCommand;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Instant,
    clock_check_mask: u64,
    steps: u64,
    expired: bool,
}

impl TimeLimitMonitor {
    /// Check every 1,024 nodes (2^10). Nodes are far more expensive than
    /// local search moves.
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x03FF;

    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            time_limit,
            start_time: Instant::now(),
            clock_check_mask,
            steps: 0,
            expired: false,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeLimitMonitor(time_limit: {:?}, clock_check_mask: {:#x})",
            self.time_limit, self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = Instant::now();
        self.steps = 0;
        self.expired = false;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(
        &mut self,
        _node: &SearchNode<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if !self.expired
            && (self.steps & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            self.expired = true;
        }
        if self.expired {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, _node: &SearchNode<T>, _statistics: &BnbSolverStatistics<T>) {
        self.steps = self.steps.wrapping_add(1);
    }

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_terminates_on_first_check() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        let stats = BnbSolverStatistics::<i64>::default();
        let node = SearchNode::root(1, 0);
        assert_eq!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn test_clock_read_only_on_mask_boundary() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0x3);
        let stats = BnbSolverStatistics::<i64>::default();
        let node = SearchNode::root(1, 0);
        TreeSearchMonitor::<i64>::on_step(&mut monitor, &node, &stats);
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        for _ in 0..3 {
            TreeSearchMonitor::<i64>::on_step(&mut monitor, &node, &stats);
        }
        assert!(matches!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_budget_continues() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        let stats = BnbSolverStatistics::<i64>::default();
        let node = SearchNode::root(1, 0);
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
    }
}
