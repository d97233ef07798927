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

//! One local search trial as a portfolio member.
//!
//! The trial starts from a given solution (or the greedy one), runs the engine
//! under the portfolio monitor plus its own move budget and stagnation limit,
//! and installs its best solution into the shared incumbent when it finishes.
//! Its two random streams (move sampling, annealing) are derived from a single
//! seed, so a trial is reproducible.

use crate::{
    engine::LocalSearchEngine,
    meta::{
        hill_climbing::HillClimbing,
        simulated_annealing::{AnnealingSchedule, SimulatedAnnealing},
    },
    monitor::{
        adapter::SearchMonitorAdapter, composite::CompositeLocalSearchMonitor,
        iteration::IterationLimitMonitor, log::LogMonitor, stagnation::StagnationMonitor,
    },
    operator::{MoveWeights, RandomMoveOperator},
    result::{LocalSearchEngineOutcome, LocalSearchTerminationReason},
    stats::LocalSearchStatistics,
};
use bort_construct::greedy::GreedyConstructor;
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use bort_search::{
    monitor::search_monitor::SearchMonitor,
    portfolio::{PortfolioSolverContext, PortfolioSolverResult, PortofolioSolver},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct LocalSearchPortfolioSolver<T>
where
    T: SolverNumeric,
{
    engine: LocalSearchEngine<T>,
    seed: u64,
    initial_solution: Option<Solution<T>>,
    move_weights: MoveWeights,
    annealing: AnnealingSchedule,
    max_worsening: Option<T>,
    move_budget: Option<u64>,
    stagnation_limit: Option<u64>,
    last_statistics: Option<LocalSearchStatistics>,
}

impl<T> LocalSearchPortfolioSolver<T>
where
    T: SolverNumeric,
{
    /// Creates a hill-climbing trial without move budget or stagnation limit.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self {
            engine: LocalSearchEngine::new(),
            seed,
            initial_solution: None,
            move_weights: MoveWeights::default(),
            annealing: AnnealingSchedule::hill_climbing(),
            max_worsening: None,
            move_budget: None,
            stagnation_limit: None,
            last_statistics: None,
        }
    }

    /// Starts from `solution` instead of the greedy construction. The
    /// solution must be valid for the model the trial runs on.
    #[inline]
    pub fn with_initial_solution(mut self, solution: Solution<T>) -> Self {
        self.initial_solution = Some(solution);
        self
    }

    #[inline]
    pub fn with_move_weights(mut self, move_weights: MoveWeights) -> Self {
        self.move_weights = move_weights;
        self
    }

    #[inline]
    pub fn with_annealing(mut self, annealing: AnnealingSchedule) -> Self {
        self.annealing = annealing;
        self
    }

    #[inline]
    pub fn with_max_worsening(mut self, max_worsening: T) -> Self {
        self.max_worsening = Some(max_worsening);
        self
    }

    #[inline]
    pub fn with_move_budget(mut self, move_budget: u64) -> Self {
        self.move_budget = Some(move_budget);
        self
    }

    #[inline]
    pub fn with_stagnation_limit(mut self, stagnation_limit: u64) -> Self {
        self.stagnation_limit = Some(stagnation_limit);
        self
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Statistics of the most recent invocation.
    #[inline]
    pub fn last_statistics(&self) -> Option<&LocalSearchStatistics> {
        self.last_statistics.as_ref()
    }

    fn run_trial(
        &mut self,
        model: &Model<T>,
        portfolio_monitor: &mut dyn SearchMonitor<T>,
        initial: &Solution<T>,
    ) -> LocalSearchEngineOutcome<T> {
        let mut monitor = CompositeLocalSearchMonitor::with_capacity(4);
        monitor.add_monitor(SearchMonitorAdapter::new(portfolio_monitor));
        monitor.add_monitor(LogMonitor::new(format!("seed {}", self.seed)));
        if let Some(budget) = self.move_budget {
            monitor.add_monitor(IterationLimitMonitor::new(budget));
        }
        if let Some(limit) = self.stagnation_limit {
            monitor.add_monitor(StagnationMonitor::new(limit));
        }

        let mut operator =
            RandomMoveOperator::new(self.move_weights, ChaCha8Rng::seed_from_u64(self.seed));

        if self.annealing.is_hill_climbing() {
            return self.engine.run(
                model,
                &mut operator,
                &mut HillClimbing::new(),
                &mut monitor,
                initial,
            );
        }

        let mut acceptance_rng = ChaCha8Rng::seed_from_u64(self.seed);
        acceptance_rng.set_stream(1);
        let mut annealing = SimulatedAnnealing::new(
            self.annealing.geometric_cooling(self.move_budget),
            acceptance_rng,
        );
        if let Some(max_worsening) = self.max_worsening {
            annealing = annealing.with_max_worsening(max_worsening);
        }
        self.engine
            .run(model, &mut operator, &mut annealing, &mut monitor, initial)
    }
}

impl<T> PortofolioSolver<T> for LocalSearchPortfolioSolver<T>
where
    T: SolverNumeric,
{
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, T>) -> PortfolioSolverResult<T> {
        let model = context.model;
        context.monitor.on_enter_search(model);

        let initial = match &self.initial_solution {
            Some(solution) => solution.clone(),
            None => GreedyConstructor::preallocated(model).construct(model),
        };

        let outcome = self.run_trial(model, &mut *context.monitor, &initial);

        context.incumbent.try_install(outcome.solution());
        context.monitor.on_exit_search();

        let reason = match outcome.termination_reason() {
            LocalSearchTerminationReason::LocalOptimum => "local optimum reached".to_string(),
            LocalSearchTerminationReason::Metaheuristic(msg)
            | LocalSearchTerminationReason::Aborted(msg) => msg.clone(),
        };
        let statistics = outcome.statistics().clone();
        let solution = outcome.into_solution();
        self.last_statistics = Some(statistics);

        // Reaching the distinct-book ceiling is a proof of optimality.
        if solution.objective_value() >= model.max_attainable_score() {
            return PortfolioSolverResult::optimal(solution);
        }
        PortfolioSolverResult::aborted(Some(solution), reason)
    }

    fn name(&self) -> &str {
        "LocalSearchPortfolioSolver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        model::ModelBuilder,
        validation::validate,
    };
    use bort_search::{
        incumbent::SharedIncumbent,
        monitor::{interrupt::InterruptMonitor, search_monitor::NoOperationMonitor},
        result::{SolverResult, TerminationReason},
    };
    use std::sync::atomic::AtomicBool;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    /// Two libraries competing for the same expensive books: only one can
    /// sign up early, so the optimum stays below the distinct-book ceiling.
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

    #[test]
    fn test_trial_reports_and_installs_best() {
        let model = contested_model();
        let incumbent = SharedIncumbent::new();
        let mut monitor = NoOperationMonitor::new();
        let stop = AtomicBool::new(false);

        let mut solver = LocalSearchPortfolioSolver::new(3).with_move_budget(300);
        let ctx = PortfolioSolverContext::new(&model, &incumbent, &mut monitor, &stop);
        let result = solver.invoke(ctx);

        let solution = match result.result() {
            SolverResult::Feasible(solution) => solution.clone(),
            other => panic!("expected Feasible, got {:?}", other),
        };
        assert_eq!(solution.objective_value(), 19);
        assert!(validate(&model, &solution).is_ok());
        assert_eq!(incumbent.best_objective(), 19);
        assert_eq!(
            result.termination_reason(),
            &TerminationReason::Aborted("move budget exhausted".to_string())
        );
        assert_eq!(solver.last_statistics().map(|s| s.iterations), Some(300));
    }

    #[test]
    fn test_reaching_the_ceiling_is_optimal() {
        let mut builder = ModelBuilder::<i64>::new(3, 2, 3);
        builder.set_book_scores([3, 4, 2]);
        builder
            .set_library_signup(l(0), 1)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0), b(1)]);
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(2)]);
        let model = builder.build().unwrap();

        let incumbent = SharedIncumbent::new();
        let mut monitor = NoOperationMonitor::new();
        let stop = AtomicBool::new(false);
        let mut solver = LocalSearchPortfolioSolver::new(0).with_move_budget(10);
        let result = solver.invoke(PortfolioSolverContext::new(&model, &incumbent, &mut monitor, &stop));
        assert_eq!(result.termination_reason(), &TerminationReason::OptimalityProven);
        assert_eq!(result.upper_bound(), Some(9));
    }

    #[test]
    fn test_raised_stop_flag_returns_start_solution() {
        let model = contested_model();
        let incumbent = SharedIncumbent::new();
        let stop = AtomicBool::new(true);
        let mut monitor = InterruptMonitor::new(&stop);

        let greedy = GreedyConstructor::new().construct(&model);
        let mut solver = LocalSearchPortfolioSolver::new(1)
            .with_initial_solution(greedy.clone())
            .with_annealing(AnnealingSchedule::new(10.0, 0.1));
        let result = solver.invoke(PortfolioSolverContext::new(&model, &incumbent, &mut monitor, &stop));

        assert_eq!(result.result().solution(), Some(&greedy));
        assert_eq!(solver.last_statistics().map(|s| s.iterations), Some(0));
    }
}
