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

//! # Portfolio-Orchestrated Solver
//!
//! Runs several `PortofolioSolver<T>` members in parallel over one read-only
//! `Model`, lets them compete through a `SharedIncumbent`, and enforces the
//! global limits (time, solution count, stop flag) through monitors.
//!
//! ## Highlights
//!
//! - Each member runs on its own thread inside `std::thread::scope`, with a
//!   `CompositeMonitor` of interrupt, solution-count and optional time-limit
//!   monitors.
//! - A member that proves optimality raises the shared stop flag, so the
//!   others wind down at their next step.
//! - The outcome carries the best solution (highest score, then fewest
//!   activations), the tightest reported upper bound and run statistics.
//! - A panicking member is logged and counted as a member without result.
//!
//! ## Usage
//!
//! ```rust
//! use bort_ls::portfolio::LocalSearchPortfolioSolver;
//! use bort_model::{
//!     index::{BookIndex, LibraryIndex},
//!     model::ModelBuilder,
//! };
//! use bort_solver::solver::SolverBuilder;
//!
//! let mut builder = ModelBuilder::<i64>::new(3, 2, 3);
//! builder.set_book_scores([3, 4, 2]);
//! builder
//!     .set_library_signup(LibraryIndex::new(0), 1)
//!     .set_library_throughput(LibraryIndex::new(0), 1)
//!     .add_library_books(LibraryIndex::new(0), [BookIndex::new(0), BookIndex::new(1)]);
//! builder
//!     .set_library_signup(LibraryIndex::new(1), 1)
//!     .set_library_throughput(LibraryIndex::new(1), 1)
//!     .add_library_books(LibraryIndex::new(1), [BookIndex::new(2)]);
//! let model = builder.build().unwrap();
//!
//! let mut solver = SolverBuilder::<i64>::new()
//!     .with_time_limit(std::time::Duration::from_secs(5))
//!     .add_solver(LocalSearchPortfolioSolver::new(0).with_move_budget(200))
//!     .add_solver(LocalSearchPortfolioSolver::new(1).with_move_budget(200))
//!     .build();
//!
//! let outcome = solver.solve(&model);
//! assert!(outcome.is_optimal());
//! assert_eq!(outcome.upper_bound, Some(9));
//! ```

use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use bort_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, solution::SolutionMonitor,
        time_limit::TimeLimitMonitor,
    },
    portfolio::{PortfolioSolverContext, PortfolioSolverResult, PortofolioSolver},
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use std::{
    cmp::Ordering as CmpOrdering,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

pub struct Solver<'a, T>
where
    T: SolverNumeric,
{
    portfolio_solver: Vec<Box<dyn PortofolioSolver<T> + 'a>>,
    incumbent: SharedIncumbent<T>,
    global_solution_count: AtomicU64,
    /// Raised when a member proves optimality.
    stop_signal: AtomicBool,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
}

impl<'a, T> std::fmt::Debug for Solver<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field(
                "portfolio_solver",
                &self
                    .portfolio_solver
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>(),
            )
            .field("solution_limit", &self.solution_limit)
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

impl<'a, T> Solver<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn add_solver<S>(&mut self, solver: S)
    where
        S: PortofolioSolver<T> + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
    }

    #[inline]
    pub fn add_solver_boxed(&mut self, solver: Box<dyn PortofolioSolver<T> + 'a>) {
        self.portfolio_solver.push(solver);
    }

    #[inline]
    pub fn num_solvers(&self) -> usize {
        self.portfolio_solver.len()
    }

    /// The incumbent of the most recent run.
    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent<T> {
        &self.incumbent
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Runs every member to completion and combines their results.
    ///
    /// # Panics
    ///
    /// Panics if no member has been added.
    pub fn solve(&mut self, model: &Model<T>) -> SolverOutcome<T> {
        self.solve_with_members(model).0
    }

    /// Like `solve`, but also hands back each member's own result, in the
    /// order the members were added.
    ///
    /// # Panics
    ///
    /// Panics if no member has been added.
    #[tracing::instrument(level = "debug", skip(self, model))]
    pub fn solve_with_members(
        &mut self,
        model: &Model<T>,
    ) -> (SolverOutcome<T>, Vec<PortfolioSolverResult<T>>) {
        assert!(
            !self.portfolio_solver.is_empty(),
            "called `Solver::solve` with no portfolio solvers added"
        );

        let start_time = Instant::now();
        self.incumbent = SharedIncumbent::new();
        self.stop_signal.store(false, Ordering::Relaxed);
        self.global_solution_count.store(0, Ordering::Relaxed);

        tracing::info!(
            members = self.portfolio_solver.len(),
            time_limit = ?self.time_limit,
            solution_limit = ?self.solution_limit,
            books = model.num_books(),
            libraries = model.num_libraries(),
            "portfolio solve started"
        );

        let (results, failed_members) = self.run_portfolio_parallel(model);
        let outcome = self.construct_outcome(start_time, &results, failed_members);

        tracing::info!(
            result = %outcome.result,
            reason = %outcome.reason,
            upper_bound = ?outcome.upper_bound,
            elapsed = ?outcome.statistics.solve_duration,
            "portfolio solve finished"
        );

        (outcome, results)
    }

    /// Returns the member results in insertion order and the number of
    /// members whose thread panicked.
    fn run_portfolio_parallel(
        &mut self,
        model: &Model<T>,
    ) -> (Vec<PortfolioSolverResult<T>>, usize) {
        let solution_limit = self.solution_limit;
        let time_limit = self.time_limit;
        let incumbent = &self.incumbent;
        let global_solution_count = &self.global_solution_count;
        let stop_signal = &self.stop_signal;

        let names: Vec<String> = self
            .portfolio_solver
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let mut results = Vec::with_capacity(self.portfolio_solver.len());
        let mut failed_members = 0;

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.portfolio_solver.len());

            for solver in &mut self.portfolio_solver {
                let handle = scope.spawn(move || {
                    let mut monitor = CompositeMonitor::<T>::with_capacity(3);
                    monitor.add_monitor(InterruptMonitor::with_reason(
                        stop_signal,
                        "optimality proven by another member",
                    ));
                    monitor
                        .add_monitor(SolutionMonitor::new(global_solution_count, solution_limit));
                    if let Some(limit) = time_limit {
                        monitor.add_monitor(TimeLimitMonitor::new(limit));
                    }

                    let ctx = PortfolioSolverContext::new(model, incumbent, &mut monitor, stop_signal);
                    let result = solver.invoke(ctx);

                    if matches!(result.result(), SolverResult::Optimal(_)) {
                        tracing::debug!(
                            solver = solver.name(),
                            "optimality proven, signaling stop to the other members"
                        );
                        stop_signal.store(true, Ordering::Relaxed);
                    }

                    result
                });
                handles.push(handle);
            }

            for (handle, name) in handles.into_iter().zip(&names) {
                match handle.join() {
                    Ok(result) => results.push(result),
                    Err(_) => {
                        tracing::error!(solver = %name, "portfolio solver thread panicked");
                        failed_members += 1;
                        results.push(PortfolioSolverResult::aborted(
                            None,
                            format!("portfolio solver '{}' panicked", name),
                        ));
                    }
                }
            }
        });

        (results, failed_members)
    }

    /// Highest score first, then fewer activations. Members are preferred over
    /// the incumbent snapshot, earlier members over later ones.
    fn find_best_solution(&self, results: &[PortfolioSolverResult<T>]) -> Option<Solution<T>> {
        let snapshot = self.incumbent.snapshot();
        results
            .iter()
            .filter_map(|r| r.result().solution())
            .chain(snapshot.as_ref())
            .min_by(|a, b| compare_solutions(a, b))
            .cloned()
    }

    fn build_statistics(
        &self,
        start_time: Instant,
        results: &[PortfolioSolverResult<T>],
        failed_members: usize,
    ) -> SolverStatistics {
        let proven_by = results
            .iter()
            .zip(&self.portfolio_solver)
            .find(|(r, _)| matches!(r.result(), SolverResult::Optimal(_)))
            .map(|(_, solver)| solver.name());

        SolverStatisticsBuilder::new()
            .solutions_found(self.global_solution_count.load(Ordering::Relaxed))
            .used_threads(results.len())
            .failed_members(failed_members)
            .proven_by(proven_by)
            .solve_duration(start_time.elapsed())
            .build()
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        results: &[PortfolioSolverResult<T>],
        failed_members: usize,
    ) -> SolverOutcome<T> {
        let stats = self.build_statistics(start_time, results, failed_members);
        let best_solution = self.find_best_solution(results);

        let optimality_proven = results
            .iter()
            .any(|r| matches!(r.result(), SolverResult::Optimal(_)));

        match best_solution {
            Some(solution) if optimality_proven => {
                let bound = solution.objective_value();
                SolverOutcome::new(
                    SolverResult::Optimal(solution),
                    TerminationReason::OptimalityProven,
                    Some(bound),
                    stats,
                )
            }
            Some(solution) => {
                let upper_bound = Self::tightest_upper_bound(results)
                    .map(|bound| bound.max(solution.objective_value()));
                SolverOutcome::new(
                    SolverResult::Feasible(solution),
                    TerminationReason::Aborted(self.determine_abort_reason(results)),
                    upper_bound,
                    stats,
                )
            }
            None => SolverOutcome::new(
                SolverResult::Unknown,
                TerminationReason::Aborted(self.determine_abort_reason(results)),
                Self::tightest_upper_bound(results),
                stats,
            ),
        }
    }

    #[inline]
    fn tightest_upper_bound(results: &[PortfolioSolverResult<T>]) -> Option<T> {
        results.iter().filter_map(|r| r.upper_bound()).min()
    }

    fn determine_abort_reason(&self, results: &[PortfolioSolverResult<T>]) -> String {
        if let Some(msg) = results.iter().find_map(|res| match res.termination_reason() {
            TerminationReason::Aborted(msg) => Some(msg.clone()),
            TerminationReason::OptimalityProven => None,
        }) {
            return msg;
        }

        if self.stop_signal.load(Ordering::Relaxed) {
            return "optimality proven by another member".to_string();
        }

        "search space exhausted without proof".to_string()
    }
}

/// Orders better solutions first: higher score, then fewer activations.
#[inline]
pub fn compare_solutions<T>(a: &Solution<T>, b: &Solution<T>) -> CmpOrdering
where
    T: SolverNumeric,
{
    b.objective_value()
        .cmp(&a.objective_value())
        .then_with(|| a.num_activations().cmp(&b.num_activations()))
}

pub struct SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    portfolio_solver: Vec<Box<dyn PortofolioSolver<T> + 'a>>,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
}

impl<'a, T> Default for SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            portfolio_solver: Vec::new(),
            solution_limit: None,
            time_limit: None,
        }
    }

    /// Stops every member once this many solutions have been reported in total.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        assert!(
            limit > 0,
            "called `SolverBuilder::with_solution_limit` with a zero limit"
        );
        self.solution_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn add_solver<S>(mut self, solver: S) -> Self
    where
        S: PortofolioSolver<T> + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
        self
    }

    #[inline]
    pub fn add_solver_boxed(mut self, solver: Box<dyn PortofolioSolver<T> + 'a>) -> Self {
        self.portfolio_solver.push(solver);
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a, T> {
        Solver {
            portfolio_solver: self.portfolio_solver,
            incumbent: SharedIncumbent::new(),
            global_solution_count: AtomicU64::new(0),
            stop_signal: AtomicBool::new(false),
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_ls::portfolio::LocalSearchPortfolioSolver;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        model::ModelBuilder,
        solution::Activation,
        validation::validate,
    };

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    /// Two libraries competing for the same expensive books. The optimum (19)
    /// stays below the distinct-book ceiling (28).
    fn contested_model() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(4, 2, 4);
        builder.set_book_scores([10, 9, 8, 1]);
        builder
            .set_library_signup(l(0), 2)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0), b(1), b(2)]);
        builder
            .set_library_signup(l(1), 2)
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(0), b(3)]);
        builder.build().unwrap()
    }

    /// Reports a fixed result without searching.
    struct FixedSolver {
        result: PortfolioSolverResult<i64>,
    }

    impl PortofolioSolver<i64> for FixedSolver {
        fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, i64>) -> PortfolioSolverResult<i64> {
            if let Some(solution) = self.result.result().solution() {
                context.monitor.on_solution_found(solution);
            }
            self.result.clone()
        }

        fn name(&self) -> &str {
            "FixedSolver"
        }
    }

    struct PanickingSolver;

    impl PortofolioSolver<i64> for PanickingSolver {
        fn invoke<'a>(&mut self, _context: PortfolioSolverContext<'a, i64>) -> PortfolioSolverResult<i64> {
            panic!("boom");
        }

        fn name(&self) -> &str {
            "PanickingSolver"
        }
    }

    fn one_library(objective: i64, books: Vec<BookIndex>) -> Solution<i64> {
        Solution::new(objective, vec![Activation::new(l(0), 0, books)])
    }

    #[test]
    #[should_panic(expected = "called `Solver::solve` with no portfolio solvers added")]
    fn test_empty_portfolio_panics() {
        let model = contested_model();
        let mut solver = SolverBuilder::<i64>::new().build();
        let _ = solver.solve(&model);
    }

    #[test]
    fn test_local_search_members_agree_on_best() {
        let model = contested_model();
        let mut solver = SolverBuilder::<i64>::new()
            .add_solver(LocalSearchPortfolioSolver::new(0).with_move_budget(300))
            .add_solver(LocalSearchPortfolioSolver::new(1).with_move_budget(300))
            .build();

        let (outcome, members) = solver.solve_with_members(&model);
        assert_eq!(members.len(), 2);
        assert_eq!(outcome.statistics.used_threads, 2);
        assert!(!outcome.is_optimal());
        assert_eq!(outcome.upper_bound, None);

        let best = outcome.result.solution().expect("expected a solution");
        assert_eq!(best.objective_value(), 19);
        assert!(validate(&model, best).is_ok());
        assert_eq!(solver.incumbent().best_objective(), 19);
        assert!(matches!(outcome.reason, TerminationReason::Aborted(_)));
    }

    #[test]
    fn test_bounds_combine_to_the_tightest() {
        let model = contested_model();
        let feasible = one_library(19, vec![b(0), b(1)]);
        let mut solver = SolverBuilder::<i64>::new()
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(Some(feasible.clone()), "time limit reached")
                    .with_upper_bound(25),
            })
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(None, "time limit reached")
                    .with_upper_bound(21),
            })
            .build();

        let outcome = solver.solve(&model);
        assert_eq!(outcome.result, SolverResult::Feasible(feasible));
        assert_eq!(outcome.upper_bound, Some(21));
        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("time limit reached".to_string())
        );
        assert_eq!(outcome.statistics.solutions_found, 1);
        let gap = outcome.gap_percent().expect("expected a gap");
        assert!((gap - 200.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_proof_from_any_member_makes_the_outcome_optimal() {
        let model = contested_model();
        let optimal = one_library(19, vec![b(0), b(1)]);
        let mut solver = SolverBuilder::<i64>::new()
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(None, "Interrupt signal received"),
            })
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::optimal(optimal.clone()),
            })
            .build();

        let outcome = solver.solve(&model);
        assert!(outcome.is_optimal());
        assert_eq!(outcome.reason, TerminationReason::OptimalityProven);
        assert_eq!(outcome.upper_bound, Some(19));
        assert_eq!(outcome.result.solution(), Some(&optimal));
        assert_eq!(outcome.statistics.proven_by.as_deref(), Some("FixedSolver"));
    }

    #[test]
    fn test_ties_prefer_fewer_activations() {
        let model = contested_model();
        let two = Solution::new(
            10,
            vec![
                Activation::new(l(0), 0, vec![b(2)]),
                Activation::new(l(1), 2, vec![b(3)]),
            ],
        );
        let one = one_library(10, vec![b(0)]);
        let mut solver = SolverBuilder::<i64>::new()
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(Some(two), "move budget exhausted"),
            })
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(Some(one.clone()), "move budget exhausted"),
            })
            .build();

        let outcome = solver.solve(&model);
        assert_eq!(outcome.result.solution(), Some(&one));
    }

    #[test]
    fn test_panicking_member_does_not_take_down_the_portfolio() {
        let model = contested_model();
        let feasible = one_library(19, vec![b(0), b(1)]);
        let mut solver = SolverBuilder::<i64>::new()
            .add_solver(PanickingSolver)
            .add_solver(FixedSolver {
                result: PortfolioSolverResult::aborted(Some(feasible.clone()), "local optimum reached"),
            })
            .build();

        let (outcome, members) = solver.solve_with_members(&model);
        assert_eq!(members[0].result(), &SolverResult::Unknown);
        assert_eq!(
            members[0].termination_reason(),
            &TerminationReason::Aborted("portfolio solver 'PanickingSolver' panicked".to_string())
        );
        assert_eq!(outcome.result, SolverResult::Feasible(feasible));
        assert_eq!(outcome.statistics.failed_members, 1);
        assert_eq!(outcome.statistics.proven_by, None);
    }

    #[test]
    #[should_panic(expected = "called `SolverBuilder::with_solution_limit` with a zero limit")]
    fn test_zero_solution_limit_panics() {
        let _ = SolverBuilder::<i64>::new().with_solution_limit(0);
    }
}
