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

//! Branch-and-bound over library activation sequences.
//!
//! A node commits a sequence `S` and a deferred set `Δ`. Its branching
//! library `l*` is the densest library that is neither committed nor
//! deferred and still has positive capacity at the node's clock. The two
//! children are "`l*` comes next" (`S + l*`, `Δ` cleared) and "`l*` does not
//! come next" (`Δ + l*`). Every sequence is reached exactly once, and since
//! a sequence is scored by its optimal book assignment, every node is a
//! complete solution.
//!
//! The open list is a stack, so the search is depth first and always tries
//! the activation child first. The greedy solution is the warm start and a
//! node is pruned as soon as its bound does not beat the best known score.
//! With a shared incumbent that score also includes the results of
//! concurrent trials.
//!
//! A run that empties the open list has proven optimality. A run stopped by
//! its monitor reports the largest bound still open as the proven bound.

use crate::{
    assignment::BookAssignment,
    bound::BoundEstimator,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    state::SearchNode,
    stats::BnbSolverStatistics,
};
use bort_construct::{density::rank_libraries, greedy::GreedyConstructor};
use bort_core::num::SolverNumeric;
use bort_model::{index::LibraryIndex, model::Model, solution::Solution};
use bort_search::{incumbent::SharedIncumbent, monitor::search_monitor::SearchCommand};
use fixedbitset::FixedBitSet;

/// Exact solver. Buffers survive between calls to `solve`.
#[derive(Debug, Clone)]
pub struct BnbSolver<T> {
    assignment: BookAssignment<T>,
    estimator: BoundEstimator,
    open: Vec<SearchNode<T>>,
    ranking: Vec<LibraryIndex>,
    no_exclusions: FixedBitSet,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            assignment: BookAssignment::new(),
            estimator: BoundEstimator::new(),
            open: Vec::new(),
            ranking: Vec::new(),
            no_exclusions: FixedBitSet::new(),
        }
    }

    /// Creates a solver with buffers sized for `model`.
    #[inline]
    pub fn preallocated(model: &Model<T>) -> Self {
        Self {
            assignment: BookAssignment::new(),
            estimator: BoundEstimator::preallocated(model.num_books(), model.num_libraries()),
            open: Vec::with_capacity(2 * model.num_libraries() + 1),
            ranking: Vec::with_capacity(model.num_libraries()),
            no_exclusions: FixedBitSet::with_capacity(model.num_libraries()),
        }
    }

    /// Solves `model` on its own.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    /// # use bort_bnb::bnb::BnbSolver;
    /// # use bort_bnb::monitor::no_op::NoOperationMonitor;
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
    /// let outcome = BnbSolver::new().solve(&model, &mut NoOperationMonitor::new());
    /// assert!(outcome.is_optimal());
    /// assert_eq!(outcome.upper_bound(), 9);
    /// ```
    #[tracing::instrument(level = "debug", skip(self, model, monitor))]
    pub fn solve<S>(&mut self, model: &Model<T>, monitor: &mut S) -> BnbSolverOutcome<T>
    where
        S: TreeSearchMonitor<T> + ?Sized,
    {
        self.solve_internal(model, monitor, NoSharedIncumbent::new())
    }

    /// Solves `model` while sharing the best known solution with concurrent
    /// solvers through `incumbent`.
    #[tracing::instrument(level = "debug", skip(self, model, monitor, incumbent))]
    pub fn solve_with_incumbent<S>(
        &mut self,
        model: &Model<T>,
        monitor: &mut S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        S: TreeSearchMonitor<T> + ?Sized,
    {
        self.solve_internal(model, monitor, SharedIncumbentAdapter::new(incumbent))
    }

    fn solve_internal<S, I>(
        &mut self,
        model: &Model<T>,
        monitor: &mut S,
        incumbent: I,
    ) -> BnbSolverOutcome<T>
    where
        S: TreeSearchMonitor<T> + ?Sized,
        I: IncumbentStore<T>,
    {
        self.reset();
        let outcome = BnbSolverSearchSession::new(self, model, monitor, incumbent).run();
        self.reset();
        outcome
    }

    fn reset(&mut self) {
        self.open.clear();
        self.ranking.clear();
    }
}

/// State of a single search run.
struct BnbSolverSearchSession<'a, T, S, I>
where
    T: SolverNumeric,
    S: TreeSearchMonitor<T> + ?Sized,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    model: &'a Model<T>,
    monitor: &'a mut S,
    incumbent: I,
    best_objective: T,
    best_solution: Solution<T>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, S, I> BnbSolverSearchSession<'a, T, S, I>
where
    T: SolverNumeric,
    S: TreeSearchMonitor<T> + ?Sized,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        model: &'a Model<T>,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        Self {
            solver,
            model,
            monitor,
            incumbent,
            best_objective: T::zero(),
            best_solution: Solution::empty(),
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.initialize();

        let termination = loop {
            let Some(node) = self.solver.open.pop() else {
                break None;
            };
            if let SearchCommand::Terminate(reason) = self.monitor.search_command(&node, &self.stats) {
                self.solver.open.push(node);
                break Some(reason);
            }
            self.stats.on_node_explored();
            self.monitor.on_step(&node, &self.stats);
            self.expand(node);
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination)
    }

    /// Ranks the libraries, bounds the root and installs the warm start.
    fn initialize(&mut self) {
        let model = self.model;
        self.solver.ranking.extend(rank_libraries(model));
        self.solver.no_exclusions.clear();
        self.solver.no_exclusions.grow(model.num_libraries());

        let root_bound = self.solver.estimator.estimate(
            model,
            &[],
            T::zero(),
            T::zero(),
            &self.solver.no_exclusions,
            &self.solver.no_exclusions,
        );
        self.stats.set_root_upper_bound(root_bound);
        self.monitor.on_enter_search(model, &self.stats);

        self.best_objective = self.incumbent.initial_lower_bound();
        let warm_start = GreedyConstructor::preallocated(model).construct(model);
        if warm_start.objective_value() >= self.best_objective {
            self.record_solution(warm_start);
        }

        self.solver
            .open
            .push(SearchNode::root(model.num_libraries(), root_bound));
    }

    fn expand(&mut self, node: SearchNode<T>) {
        let threshold = self.incumbent.tighten(self.best_objective);
        if node.bound() <= threshold {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&node, PruneReason::IncumbentImproved, &self.stats);
            return;
        }
        self.stats.on_depth_update(node.depth() as u64);

        let Some(library) = self.branching_library(&node) else {
            self.stats.on_leaf();
            self.monitor.on_leaf(&node, &self.stats);
            return;
        };
        self.monitor.on_branch(&node, library, &self.stats);

        let model = self.model;

        let mut deferred = node.defer(library);
        let bound = self.solver.estimator.estimate(
            model,
            deferred.sequence(),
            deferred.value(),
            deferred.clock(),
            &self.solver.no_exclusions,
            deferred.deferred(),
        );
        deferred.set_bound(bound.min(node.bound()));

        let mut activated = node.activate(library, model.signup_days(library));
        let value = self.solver.assignment.solve(model, activated.sequence());
        activated.set_value(value);
        if value > self.best_objective {
            let solution = self.solver.assignment.to_solution(model);
            self.record_solution(solution);
        }
        let bound = self.solver.estimator.estimate(
            model,
            activated.sequence(),
            value,
            activated.clock(),
            &self.solver.no_exclusions,
            activated.deferred(),
        );
        activated.set_bound(bound.min(node.bound()));

        // Pushed last so it is explored first.
        self.push_child(deferred);
        self.push_child(activated);
    }

    /// The densest library that can still be appended to `node`.
    #[inline]
    fn branching_library(&self, node: &SearchNode<T>) -> Option<LibraryIndex> {
        self.solver.ranking.iter().copied().find(|&library| {
            !node.is_deferred(library)
                && !node.is_committed(library)
                && self.model.capacity(library, node.clock()) > 0
        })
    }

    #[inline]
    fn push_child(&mut self, child: SearchNode<T>) {
        self.stats.on_branch_generated();
        let threshold = self.incumbent.tighten(self.best_objective);
        if child.bound() <= threshold {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&child, PruneReason::BoundDominated, &self.stats);
            return;
        }
        self.solver.open.push(child);
    }

    fn record_solution(&mut self, solution: Solution<T>) {
        self.best_objective = solution.objective_value();
        self.incumbent.on_solution_found(&solution);
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        tracing::trace!(
            objective = %solution.objective_value(),
            nodes = self.stats.nodes_explored,
            "branch-and-bound improved"
        );
        self.best_solution = solution;
    }

    /// Picks the best of the local and the shared solution and attaches the
    /// proven bound.
    fn finalize_result(self, termination: Option<String>) -> BnbSolverOutcome<T> {
        let mut solution = self.best_solution;
        if let Some(shared) = self.incumbent.best_solution()
            && shared.objective_value() > solution.objective_value()
        {
            solution = shared;
        }

        match termination {
            None => BnbSolverOutcome::optimal(solution, self.stats),
            Some(reason) => {
                let best = solution.objective_value();
                let open_bound = self.solver.open.iter().map(|node| node.bound()).max();
                let upper_bound = open_bound.map_or(best, |bound| bound.max(best));
                BnbSolverOutcome::aborted(solution, reason, upper_bound, self.stats)
            }
        }
    }
}
