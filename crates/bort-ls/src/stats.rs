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

//! Statistics reporting for local search runs.
//!
//! `LocalSearchStatistics` counts iterations, evaluated candidates, accepted
//! moves and new bests. Every counter saturates, so the hot loop never traps on
//! overflow. Monitors read the counters to make their stop decisions.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocalSearchStatistics {
    /// Number of iterations (move attempts) performed.
    pub iterations: u64,
    /// Number of candidates that were evaluated successfully.
    pub total_solutions: u64,
    /// Number of accepted candidates.
    pub accepted_solutions: u64,
    /// Number of times the best solution improved.
    pub improvements: u64,
    /// The iteration at which the best solution last improved.
    pub last_improvement_iteration: u64,
    /// Total time taken by the local search.
    pub time_total: Duration,
}

impl LocalSearchStatistics {
    /// Called at each iteration of the local search.
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    /// Called when a candidate has been evaluated.
    #[inline]
    pub fn on_found_solution(&mut self) {
        self.total_solutions = self.total_solutions.saturating_add(1);
    }

    /// Called when a candidate is accepted.
    #[inline]
    pub fn on_accepted_solution(&mut self) {
        self.accepted_solutions = self.accepted_solutions.saturating_add(1);
    }

    /// Called when the best solution improves.
    #[inline]
    pub fn on_new_best(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
        self.last_improvement_iteration = self.iterations;
    }

    /// Sets the total time taken by the local search.
    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn rejected_solutions(&self) -> u64 {
        self.total_solutions.saturating_sub(self.accepted_solutions)
    }

    /// Iterations since the best solution last improved.
    #[inline]
    pub fn iterations_since_improvement(&self) -> u64 {
        self.iterations.saturating_sub(self.last_improvement_iteration)
    }
}

impl std::fmt::Display for LocalSearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bort-LS Statistics:")?;
        writeln!(f, "   Iterations:          {}", self.iterations)?;
        writeln!(f, "   Total Solutions:     {}", self.total_solutions)?;
        writeln!(f, "   Accepted Solutions:  {}", self.accepted_solutions)?;
        writeln!(f, "   Rejected Solutions:  {}", self.rejected_solutions())?;
        writeln!(f, "   Improvements:        {}", self.improvements)?;
        writeln!(f, "   Total Time:          {:?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_rejections() {
        let mut stats = LocalSearchStatistics::default();
        for _ in 0..5 {
            stats.on_iteration();
            stats.on_found_solution();
        }
        stats.on_accepted_solution();
        stats.on_accepted_solution();
        assert_eq!(stats.iterations, 5);
        assert_eq!(stats.rejected_solutions(), 3);
    }

    #[test]
    fn test_iterations_since_improvement() {
        let mut stats = LocalSearchStatistics::default();
        stats.on_iteration();
        stats.on_iteration();
        stats.on_new_best();
        stats.on_iteration();
        assert_eq!(stats.improvements, 1);
        assert_eq!(stats.iterations_since_improvement(), 1);
    }

    #[test]
    fn test_saturating_counters() {
        let mut stats = LocalSearchStatistics {
            iterations: u64::MAX,
            ..Default::default()
        };
        stats.on_iteration();
        assert_eq!(stats.iterations, u64::MAX);
    }

    #[test]
    fn test_display_lists_counters() {
        let stats = LocalSearchStatistics::default();
        let text = format!("{}", stats);
        assert!(text.contains("Bort-LS Statistics:"));
        assert!(text.contains("Rejected Solutions:"));
    }
}
