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

//! Time-based termination for local search.
//!
//! `TimeLimitMonitor` stops a run after a wall-clock duration. The clock is
//! only read when `iterations & mask == 0`; the default mask `0x0FFF` reads it
//! once every 4096 iterations. The start time resets in `on_start`, so every
//! run is measured on its own.

use crate::{
    monitor::local_search_monitor::LocalSearchMonitor, plan::WorkingPlan,
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::monitor::search_monitor::SearchCommand;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
}

impl TimeLimitMonitor {
    /// Checks the clock every 4096 iterations.
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x0FFF;

    pub fn new(time_limit: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: Self::DEFAULT_STEP_CLOCK_CHECK_MASK,
        }
    }

    /// Lower mask values check more often.
    pub fn with_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> LocalSearchMonitor<T> for TimeLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_start(&mut self, _plan: &WorkingPlan<T>) {
        self.start_time = Instant::now();
    }

    fn on_end(&mut self, _best_solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_iteration(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_accepted(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}
    fn on_solution_rejected(&mut self, _plan: &WorkingPlan<T>, _statistics: &LocalSearchStatistics) {}

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if (statistics.iterations & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit exceeded".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_terminates_on_masked_iteration() {
        let mut monitor = TimeLimitMonitor::with_mask(Duration::ZERO, 0x3);
        let mut stats = LocalSearchStatistics::default();
        LocalSearchMonitor::<i64>::on_start(&mut monitor, &WorkingPlan::new());

        stats.iterations = 1;
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue,
            "clock must not be read off the mask"
        );
        stats.iterations = 4;
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Terminate("time limit exceeded".to_string())
        );
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        let stats = LocalSearchStatistics::default();
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );
        assert_eq!(monitor.time_limit(), Duration::from_secs(3600));
    }
}
