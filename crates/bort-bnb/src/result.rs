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

use crate::stats::BnbSolverStatistics;
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::{
    portfolio::PortfolioSolverResult,
    result::{SolverResult, TerminationReason},
};

/// Result of the branch-and-bound solver after termination.
///
/// The warm start guarantees a solution, so the result is either `Optimal`
/// or `Feasible`. The upper bound equals the objective once optimality is
/// proven; after an abort it is the largest bound of the nodes still open.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    upper_bound: T,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn optimal(solution: Solution<T>, statistics: BnbSolverStatistics<T>) -> Self {
        let upper_bound = solution.objective_value();
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            upper_bound,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(
        solution: Solution<T>,
        reason: R,
        upper_bound: T,
        statistics: BnbSolverStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        debug_assert!(
            upper_bound >= solution.objective_value(),
            "called `BnbSolverOutcome::aborted` with upper bound {} below the objective {}",
            upper_bound,
            solution.objective_value()
        );
        Self {
            result: SolverResult::Feasible(solution),
            termination_reason: TerminationReason::Aborted(reason.into()),
            upper_bound,
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the proven upper bound on the optimal score.
    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.termination_reason, TerminationReason::OptimalityProven)
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
        &self.statistics
    }

    /// Returns the best solution found.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        self.result.solution()
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        self.result.into_solution()
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, reason: {}, upper_bound: {})",
            self.result, self.termination_reason, self.upper_bound
        )
    }
}

impl<T> From<BnbSolverOutcome<T>> for PortfolioSolverResult<T>
where
    T: SolverNumeric,
{
    fn from(val: BnbSolverOutcome<T>) -> Self {
        match (val.termination_reason, val.result) {
            (TerminationReason::OptimalityProven, SolverResult::Optimal(solution)) => {
                PortfolioSolverResult::optimal(solution)
            }
            (TerminationReason::OptimalityProven, _) => panic!(
                "called `BnbSolverOutcome::into()` with inconsistent state: termination reason is OptimalityProven but result is not Optimal"
            ),
            (TerminationReason::Aborted(reason), result) => {
                PortfolioSolverResult::aborted(result.into_solution(), reason)
                    .with_upper_bound(val.upper_bound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        solution::Activation,
    };

    type I = i64;

    fn solution(objective: I) -> Solution<I> {
        Solution::new(
            objective,
            vec![Activation::new(LibraryIndex::new(0), 0, vec![BookIndex::new(0)])],
        )
    }

    #[test]
    fn test_optimal_bound_is_objective() {
        let outcome = BnbSolverOutcome::optimal(solution(5), BnbSolverStatistics::default());
        assert!(outcome.is_optimal());
        assert_eq!(outcome.upper_bound(), 5);

        let portfolio: PortfolioSolverResult<I> = outcome.into();
        assert_eq!(portfolio.upper_bound(), Some(5));
        assert!(matches!(portfolio.result(), SolverResult::Optimal(_)));
    }

    #[test]
    fn test_aborted_keeps_solution_and_bound() {
        let outcome =
            BnbSolverOutcome::aborted(solution(5), "time limit", 8, BnbSolverStatistics::default());
        assert!(!outcome.is_optimal());

        let portfolio: PortfolioSolverResult<I> = outcome.into();
        assert!(matches!(portfolio.result(), SolverResult::Feasible(_)));
        assert_eq!(portfolio.upper_bound(), Some(8));
        match portfolio.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "time limit"),
            other => panic!("expected Aborted termination reason, got {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "termination reason is OptimalityProven but result is not Optimal")]
    fn test_inconsistent_state_panics() {
        let inconsistent = BnbSolverOutcome::<I> {
            result: SolverResult::Feasible(solution(1)),
            termination_reason: TerminationReason::OptimalityProven,
            upper_bound: 1,
            statistics: BnbSolverStatistics::default(),
        };
        let _portfolio: PortfolioSolverResult<I> = inconsistent.into();
    }
}
