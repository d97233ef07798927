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

use std::time::Duration;

/// What a portfolio run did, independent of the solution it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Solutions reported by all members together.
    pub solutions_found: u64,
    /// One thread per member.
    pub used_threads: usize,
    /// Members whose thread panicked.
    pub failed_members: usize,
    /// Name of the first member that proved optimality.
    pub proven_by: Option<String>,
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Portfolio Statistics:")?;
        writeln!(f, "  Solutions reported:   {}", self.solutions_found)?;
        writeln!(f, "  Members (threads):    {}", self.used_threads)?;
        writeln!(f, "  Failed members:       {}", self.failed_members)?;
        writeln!(
            f,
            "  Proven by:            {}",
            self.proven_by.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "  Wall time:            {:.3?}", self.solve_duration)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    statistics: SolverStatistics,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    /// Starts from a single member that reported nothing.
    #[inline]
    pub fn new() -> Self {
        Self {
            statistics: SolverStatistics {
                solutions_found: 0,
                used_threads: 1,
                failed_members: 0,
                proven_by: None,
                solve_duration: Duration::ZERO,
            },
        }
    }

    #[inline]
    pub fn solutions_found(mut self, solutions_found: u64) -> Self {
        self.statistics.solutions_found = solutions_found;
        self
    }

    /// # Panics
    ///
    /// Panics if `used_threads` is zero.
    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        assert!(
            used_threads > 0,
            "called `SolverStatisticsBuilder::used_threads` with zero threads"
        );
        self.statistics.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn failed_members(mut self, failed_members: usize) -> Self {
        self.statistics.failed_members = failed_members;
        self
    }

    #[inline]
    pub fn proven_by<S>(mut self, member: Option<S>) -> Self
    where
        S: Into<String>,
    {
        self.statistics.proven_by = member.map(Into::into);
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.statistics.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        debug_assert!(
            self.statistics.failed_members <= self.statistics.used_threads,
            "called `SolverStatisticsBuilder::build` with more failed members ({}) than threads ({})",
            self.statistics.failed_members,
            self.statistics.used_threads
        );
        self.statistics
    }
}
