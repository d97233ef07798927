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

//! Periodic `tracing` progress lines for long tree searches.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchNode,
    stats::BnbSolverStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use std::time::{Duration, Instant};

/// Emits an `info` line at most every `log_interval`, checking the clock only
/// when `(nodes & clock_check_mask) == 0`.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: SolverNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    /// Relative distance between the best score and the root bound.
    fn gap_percent(&self, root_upper_bound: T) -> f64 {
        let best = self.best_objective.and_then(|b| b.to_f64()).unwrap_or(0.0);
        let bound = root_upper_bound.to_f64().unwrap_or(0.0);
        if bound <= 0.0 {
            return 0.0;
        }
        ((bound - best) / bound * 100.0).max(0.0)
    }

    fn log_line(&mut self, node: &SearchNode<T>, stats: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let best = match self.best_objective {
            Some(objective) => objective.to_string(),
            None => "-".to_string(),
        };
        tracing::info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = node.depth(),
            best = %best,
            node_bound = %node.bound(),
            root_bound = %stats.root_upper_bound,
            gap = %format!("{:.2}%", self.gap_percent(stats.root_upper_bound)),
            pruned = stats.prunings_bound,
            "branch-and-bound progress"
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 0x0FFF)
    }
}

impl<T> std::fmt::Display for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {:?}, clock_check_mask: {:#x})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, stats: &BnbSolverStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::info!(
            libraries = model.num_libraries(),
            viable = model.num_viable_libraries(),
            books = model.num_books(),
            root_bound = %stats.root_upper_bound,
            "branch-and-bound started"
        );
    }

    fn on_step(&mut self, node: &SearchNode<T>, stats: &BnbSolverStatistics<T>) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, stats);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, stats: &BnbSolverStatistics<T>) {
        self.best_objective = Some(solution.objective_value());
        tracing::debug!(
            objective = %solution.objective_value(),
            nodes = stats.nodes_explored,
            "new best solution"
        );
    }

    fn on_exit_search(&mut self, stats: &BnbSolverStatistics<T>) {
        tracing::info!(
            nodes = stats.nodes_explored,
            solutions = stats.solutions_found,
            gap = %format!("{:.2}%", self.gap_percent(stats.root_upper_bound)),
            elapsed = ?stats.time_total,
            "branch-and-bound finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        solution::Activation,
    };

    #[test]
    fn test_gap_follows_best_solution() {
        let mut monitor = LogMonitor::<i64>::default();
        let stats = BnbSolverStatistics {
            root_upper_bound: 200,
            ..Default::default()
        };
        assert_eq!(monitor.gap_percent(200), 100.0);

        let solution = Solution::new(
            150,
            vec![Activation::new(LibraryIndex::new(0), 0, vec![BookIndex::new(0)])],
        );
        monitor.on_solution_found(&solution, &stats);
        assert_eq!(monitor.gap_percent(200), 25.0);
        assert_eq!(monitor.gap_percent(0), 0.0);
    }
}
