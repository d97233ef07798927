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

//! # Portfolio Strategy Contract
//!
//! A `PortofolioSolver` is one member of a parallel portfolio: a local search
//! trial, a branch-and-bound search, or any other strategy. The orchestrator
//! hands every member the same read-only `Model`, the `SharedIncumbent`, a
//! monitor and the shared stop flag, and collects a
//! `PortfolioSolverResult` from each.

use crate::{
    incumbent::SharedIncumbent,
    monitor::search_monitor::SearchMonitor,
    result::{SolverResult, TerminationReason},
};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use std::sync::atomic::AtomicBool;

/// Everything a portfolio member gets to work with.
pub struct PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    pub model: &'a Model<T>,
    pub incumbent: &'a SharedIncumbent<T>,
    pub monitor: &'a mut dyn SearchMonitor<T>,
    pub stop: &'a AtomicBool,
}

impl<'a, T> PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new(
        model: &'a Model<T>,
        incumbent: &'a SharedIncumbent<T>,
        monitor: &'a mut dyn SearchMonitor<T>,
        stop: &'a AtomicBool,
    ) -> Self {
        Self {
            model,
            incumbent,
            monitor,
            stop,
        }
    }
}

impl<'a, T> std::fmt::Debug for PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("model", &self.model)
            .field("incumbent", &self.incumbent)
            .field("monitor", &self.monitor.name())
            .field("stop", &self.stop)
            .finish()
    }
}

impl<'a, T> std::fmt::Display for PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverContext(model: {}, monitor: {})",
            self.model,
            self.monitor.name(),
        )
    }
}

/// What a single portfolio member reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSolverResult<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    upper_bound: Option<T>,
}

impl<T> PortfolioSolverResult<T>
where
    T: SolverNumeric,
{
    /// A proven optimum. Its objective is also the upper bound.
    #[inline]
    pub fn optimal(solution: Solution<T>) -> Self {
        let upper_bound = Some(solution.objective_value());
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            upper_bound,
        }
    }

    /// A stopped run, with the best solution it found (if any).
    #[inline]
    pub fn aborted<R>(solution: Option<Solution<T>>, reason: R) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(sol) => SolverResult::Feasible(sol),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            upper_bound: None,
        }
    }

    /// Attaches a proven upper bound on the optimal score.
    #[inline]
    pub fn with_upper_bound(mut self, upper_bound: T) -> Self {
        self.upper_bound = Some(upper_bound);
        self
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn upper_bound(&self) -> Option<T> {
        self.upper_bound
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, Option<T>) {
        (self.result, self.termination_reason, self.upper_bound)
    }
}

impl<T> std::fmt::Display for PortfolioSolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverResult(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}

/// A pluggable search strategy that can run inside the portfolio.
///
/// Members are moved onto worker threads, hence the `Send` bound.
pub trait PortofolioSolver<T>: Send
where
    T: SolverNumeric,
{
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, T>) -> PortfolioSolverResult<T>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::search_monitor::NoOperationMonitor;
    use bort_model::model::ModelBuilder;

    struct EmptySolver;

    impl PortofolioSolver<i64> for EmptySolver {
        fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, i64>) -> PortfolioSolverResult<i64> {
            let empty = Solution::empty();
            context.incumbent.try_install(&empty);
            PortfolioSolverResult::aborted(Some(empty), "nothing to do")
                .with_upper_bound(context.model.max_attainable_score())
        }

        fn name(&self) -> &str {
            "EmptySolver"
        }
    }

    #[test]
    fn test_optimal_carries_its_own_bound() {
        let res = PortfolioSolverResult::optimal(Solution::new(12i64, Vec::new()));
        assert_eq!(res.upper_bound(), Some(12));
        assert_eq!(res.termination_reason(), &TerminationReason::OptimalityProven);
    }

    #[test]
    fn test_aborted_without_solution_is_unknown() {
        let res = PortfolioSolverResult::<i64>::aborted(None, "interrupted");
        assert_eq!(res.result(), &SolverResult::Unknown);
        assert_eq!(res.upper_bound(), None);
        let (_, reason, _) = res.into_parts();
        assert_eq!(reason, TerminationReason::Aborted("interrupted".into()));
    }

    #[test]
    fn test_solver_uses_context() {
        let model = ModelBuilder::<i64>::new(0, 0, 5).build().unwrap();
        let incumbent = SharedIncumbent::new();
        let mut monitor = NoOperationMonitor::new();
        let stop = AtomicBool::new(false);

        let mut solver = EmptySolver;
        let ctx = PortfolioSolverContext::new(&model, &incumbent, &mut monitor, &stop);
        let res = solver.invoke(ctx);

        assert_eq!(solver.name(), "EmptySolver");
        assert_eq!(res.upper_bound(), Some(0));
        assert_eq!(incumbent.best_objective(), 0);
    }
}
