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

//! Local search outcome and termination reporting.
//!
//! `LocalSearchEngineOutcome` bundles the best solution a run discovered with
//! its statistics and the reason the loop stopped: a local optimum (no move
//! left to propose), a metaheuristic decision or a monitor limit.

use crate::stats::LocalSearchStatistics;
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalSearchTerminationReason {
    /// The operator could not propose any further move.
    LocalOptimum,
    /// The metaheuristic decided to stop the search.
    Metaheuristic(String),
    /// A monitor stopped the search (time, move budget, stagnation, interrupt).
    Aborted(String),
}

impl std::fmt::Display for LocalSearchTerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalSearchTerminationReason::LocalOptimum => write!(f, "Local Optimum Reached"),
            LocalSearchTerminationReason::Metaheuristic(msg) => {
                write!(f, "Metaheuristic Termination: {}", msg)
            }
            LocalSearchTerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
        }
    }
}

/// Result of a local search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchEngineOutcome<T> {
    termination_reason: LocalSearchTerminationReason,
    solution: Solution<T>,
    statistics: LocalSearchStatistics,
}

impl<T> LocalSearchEngineOutcome<T> {
    #[inline]
    pub fn local_optimum(solution: Solution<T>, statistics: LocalSearchStatistics) -> Self {
        Self {
            termination_reason: LocalSearchTerminationReason::LocalOptimum,
            solution,
            statistics,
        }
    }

    #[inline]
    pub fn metaheuristic<R>(
        solution: Solution<T>,
        reason: R,
        statistics: LocalSearchStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            termination_reason: LocalSearchTerminationReason::Metaheuristic(reason.into()),
            solution,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(solution: Solution<T>, reason: R, statistics: LocalSearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            termination_reason: LocalSearchTerminationReason::Aborted(reason.into()),
            solution,
            statistics,
        }
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &LocalSearchTerminationReason {
        &self.termination_reason
    }

    /// Returns the best solution found.
    #[inline]
    pub fn solution(&self) -> &Solution<T> {
        &self.solution
    }

    /// Returns the run statistics.
    #[inline]
    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_solution(self) -> Solution<T> {
        self.solution
    }
}

impl<T> std::fmt::Display for LocalSearchEngineOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Termination: {}", self.termination_reason)?;
        writeln!(f, "Objective Value: {}", self.solution.objective_value())?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_reason() {
        let stats = LocalSearchStatistics::default();
        let a = LocalSearchEngineOutcome::local_optimum(Solution::<i64>::empty(), stats.clone());
        assert_eq!(a.termination_reason(), &LocalSearchTerminationReason::LocalOptimum);

        let b = LocalSearchEngineOutcome::aborted(Solution::<i64>::empty(), "time", stats.clone());
        assert_eq!(
            b.termination_reason(),
            &LocalSearchTerminationReason::Aborted("time".to_string())
        );

        let c = LocalSearchEngineOutcome::metaheuristic(Solution::<i64>::empty(), "cold", stats);
        assert_eq!(format!("{}", c.termination_reason()), "Metaheuristic Termination: cold");
    }

    #[test]
    fn test_display_reports_reason_and_objective() {
        let outcome = LocalSearchEngineOutcome::aborted(
            Solution::<i64>::empty(),
            "move budget exhausted",
            LocalSearchStatistics::default(),
        );
        let rendered = outcome.to_string();
        assert!(rendered.starts_with("Termination: Aborted"));
        assert!(rendered.contains("Objective Value: 0"));
        assert!(rendered.contains("Iterations:"));
    }
}
