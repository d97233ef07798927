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

use crate::stats::SolverStatistics;
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;

/// What a solver produced.
///
/// Every instance admits the empty solution, so there is no infeasible
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// We have found a solution and proven its optimality.
    Optimal(Solution<T>),
    /// We have found a feasible solution, but not proven its optimality.
    Feasible(Solution<T>),
    /// The solver terminated without reporting any solution.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: SolverNumeric,
{
    /// Returns the carried solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the carried solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective_value())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective_value())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a solution.
    OptimalityProven,
    /// The solver stopped early (time, interrupt, move budget, stagnation).
    /// The string names the limit that fired.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// The combined outcome of a portfolio run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T> {
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    /// The best proven upper bound on the optimal score, if any member
    /// reported one.
    pub upper_bound: Option<T>,
    pub statistics: SolverStatistics,
}

impl<T> SolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        upper_bound: Option<T>,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            upper_bound,
            statistics,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.result.solution().is_some()
    }

    /// Returns the relative gap between the bound and the best score in
    /// percent, or `None` if either is missing.
    pub fn gap_percent(&self) -> Option<f64> {
        let bound: i64 = self.upper_bound?.into();
        let best: i64 = self.result.solution()?.objective_value().into();
        if bound <= 0 {
            return Some(0.0);
        }
        Some(((bound - best).max(0) as f64) * 100.0 / bound as f64)
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Outcome:")?;
        writeln!(f, "  Result: {}", self.result)?;
        writeln!(f, "  Termination: {}", self.reason)?;
        match self.upper_bound {
            Some(bound) => writeln!(f, "  Upper Bound: {}", bound)?,
            None => writeln!(f, "  Upper Bound: none")?,
        }
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SolverStatisticsBuilder;

    #[test]
    fn test_result_solution_accessors() {
        let sol = Solution::new(5i64, Vec::new());
        let res = SolverResult::Feasible(sol.clone());
        assert_eq!(res.solution(), Some(&sol));
        assert_eq!(res.into_solution(), Some(sol));
        assert_eq!(SolverResult::<i64>::Unknown.solution(), None);
    }

    #[test]
    fn test_termination_reason_display() {
        assert_eq!(
            format!("{}", TerminationReason::OptimalityProven),
            "Optimality Proven"
        );
        assert_eq!(
            format!("{}", TerminationReason::Aborted("time limit reached".into())),
            "Aborted: time limit reached"
        );
    }

    #[test]
    fn test_gap_percent() {
        let stats = SolverStatisticsBuilder::new().build();
        let outcome = SolverOutcome::new(
            SolverResult::Feasible(Solution::new(75i64, Vec::new())),
            TerminationReason::Aborted("time limit reached".into()),
            Some(100),
            stats.clone(),
        );
        assert!(!outcome.is_optimal());
        assert!(outcome.has_solution());
        assert_eq!(outcome.gap_percent(), Some(25.0));

        let optimal = SolverOutcome::new(
            SolverResult::Optimal(Solution::new(0i64, Vec::new())),
            TerminationReason::OptimalityProven,
            Some(0),
            stats,
        );
        assert_eq!(optimal.gap_percent(), Some(0.0));
    }

    #[test]
    fn test_outcome_display_mentions_bound() {
        let outcome = SolverOutcome::new(
            SolverResult::Optimal(Solution::new(9i64, Vec::new())),
            TerminationReason::OptimalityProven,
            Some(9),
            SolverStatisticsBuilder::new().build(),
        );
        let rendered = format!("{}", outcome);
        assert!(rendered.contains("Optimal(objective=9)"), "{rendered}");
        assert!(rendered.contains("Upper Bound: 9"), "{rendered}");
    }
}
