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

//! Iterative local search driver.
//!
//! Each iteration asks the monitor and the metaheuristic whether to go on,
//! takes a move from the operator, evaluates it on the working plan and lets
//! the metaheuristic accept or reject it. The engine tracks the best solution
//! separately from the current plan, so a run never returns anything worse
//! than its input, however far annealing wanders.

use crate::{
    meta::metaheuristic::Metaheuristic,
    monitor::local_search_monitor::LocalSearchMonitor,
    operator::LocalSearchOperator,
    plan::WorkingPlan,
    result::{LocalSearchEngineOutcome, LocalSearchTerminationReason},
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use bort_search::monitor::search_monitor::SearchCommand;
use std::time::Instant;

/// Local search engine. Keeps its `WorkingPlan` buffers between runs.
#[derive(Debug, Clone)]
pub struct LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    plan: WorkingPlan<T>,
}

impl<T> Default for LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            plan: WorkingPlan::new(),
        }
    }

    /// Improves `initial_solution`, which must be valid for `model`.
    ///
    /// The outcome holds the best solution seen during the run. Its start
    /// days are packed and it never scores below `initial_solution`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    /// # use bort_model::solution::Solution;
    /// # use bort_ls::engine::LocalSearchEngine;
    /// # use bort_ls::meta::hill_climbing::HillClimbing;
    /// # use bort_ls::monitor::iteration::IterationLimitMonitor;
    /// # use bort_ls::operator::{MoveWeights, RandomMoveOperator};
    /// # use rand::SeedableRng;
    /// # use rand_chacha::ChaCha8Rng;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(3, 2, 3);
    /// builder.set_book_scores([3, 4, 2]);
    /// builder
    ///     .set_library_signup(LibraryIndex::new(0), 1)
    ///     .set_library_throughput(LibraryIndex::new(0), 1)
    ///     .add_library_books(LibraryIndex::new(0), [BookIndex::new(0), BookIndex::new(1)]);
    /// builder
    ///     .set_library_signup(LibraryIndex::new(1), 1)
    ///     .set_library_throughput(LibraryIndex::new(1), 1)
    ///     .add_library_book(LibraryIndex::new(1), BookIndex::new(2));
    /// let model = builder.build().unwrap();
    ///
    /// let mut operator = RandomMoveOperator::new(MoveWeights::default(), ChaCha8Rng::seed_from_u64(0));
    /// let outcome = LocalSearchEngine::new().run(
    ///     &model,
    ///     &mut operator,
    ///     &mut HillClimbing::new(),
    ///     &mut IterationLimitMonitor::new(500),
    ///     &Solution::empty(),
    /// );
    /// assert_eq!(outcome.solution().objective_value(), 9);
    /// ```
    pub fn run<O, M, SM>(
        &mut self,
        model: &Model<T>,
        operator: &mut O,
        metaheuristic: &mut M,
        monitor: &mut SM,
        initial_solution: &Solution<T>,
    ) -> LocalSearchEngineOutcome<T>
    where
        O: LocalSearchOperator<T>,
        M: Metaheuristic<T>,
        SM: LocalSearchMonitor<T>,
    {
        let start_time = Instant::now();
        let mut stats = LocalSearchStatistics::default();

        self.plan.initialize(model, initial_solution);

        let mut best_solution = initial_solution.clone();
        if self.plan.objective() > best_solution.objective_value() {
            best_solution = self.plan.to_solution();
        }
        let mut best_objective = best_solution.objective_value();

        monitor.on_start(&self.plan);
        metaheuristic.on_start(self.plan.objective());
        operator.prepare(model, &self.plan);

        let termination_reason = loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command(&stats) {
                break LocalSearchTerminationReason::Aborted(reason);
            }
            if let SearchCommand::Terminate(reason) =
                metaheuristic.search_command(stats.iterations, best_objective)
            {
                break LocalSearchTerminationReason::Metaheuristic(reason);
            }

            stats.on_iteration();

            let Some(mv) = operator.next_move(model, &self.plan) else {
                break LocalSearchTerminationReason::LocalOptimum;
            };

            let current_objective = self.plan.objective();
            let Some(candidate_objective) = self.plan.evaluate(model, &mv) else {
                monitor.on_iteration(&self.plan, &stats);
                continue;
            };

            stats.on_found_solution();

            let accept =
                metaheuristic.should_accept(current_objective, candidate_objective, best_objective);
            tracing::trace!(
                %mv,
                current = %current_objective,
                candidate = %candidate_objective,
                accept,
                "move evaluated"
            );

            if accept {
                self.plan.commit();
                stats.on_accepted_solution();
                metaheuristic.on_accept(candidate_objective);
                monitor.on_solution_accepted(&self.plan, &stats);

                if self.plan.objective() > best_objective {
                    best_solution = self.plan.to_solution();
                    best_objective = best_solution.objective_value();
                    stats.on_new_best();
                    metaheuristic.on_new_best(best_objective);
                    monitor.on_solution_found(&best_solution, &stats);
                }
            } else {
                self.plan.discard();
                metaheuristic.on_reject(candidate_objective);
                monitor.on_solution_rejected(&self.plan, &stats);
            }

            monitor.on_iteration(&self.plan, &stats);
        };

        stats.set_total_time(start_time.elapsed());
        monitor.on_end(&best_solution, &stats);

        match termination_reason {
            LocalSearchTerminationReason::LocalOptimum => {
                LocalSearchEngineOutcome::local_optimum(best_solution, stats)
            }
            LocalSearchTerminationReason::Metaheuristic(msg) => {
                LocalSearchEngineOutcome::metaheuristic(best_solution, msg, stats)
            }
            LocalSearchTerminationReason::Aborted(msg) => {
                LocalSearchEngineOutcome::aborted(best_solution, msg, stats)
            }
        }
    }
}
