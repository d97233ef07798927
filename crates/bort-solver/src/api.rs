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

//! The four entry points of the optimizer.
//!
//! - `construct`: one greedy pass, the fast baseline.
//! - `improve`: parallel local search trials starting from a given solution.
//! - `solve_exact`: branch-and-bound with local search helpers (feature
//!   `exact`), and `solve_exact_with` for any other strategy that reports a
//!   bound.
//! - `validate`: recomputes every constraint and the score from scratch.
//!
//! All of them take an already built `Model`. None of them does I/O.

use crate::{
    config::{ExactConfig, ImproveConfig},
    solver::{SolverBuilder, compare_solutions},
};
use bort_construct::greedy::GreedyConstructor;
use bort_core::num::SolverNumeric;
use bort_ls::portfolio::LocalSearchPortfolioSolver;
use bort_model::{
    model::Model,
    solution::Solution,
    validation::{self, InvalidSolutionError},
};
use bort_search::{
    portfolio::PortofolioSolver,
    result::{SolverOutcome, TerminationReason},
    stats::SolverStatistics,
};

/// What an exact run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactOutcome<T> {
    /// The best solution found. Always valid, possibly empty.
    pub solution: Solution<T>,
    /// `true` if `solution` is proven optimal.
    pub proven: bool,
    /// An upper bound on the optimal score. Equals the solution's score when
    /// `proven` is set.
    pub bound: T,
    /// Why the run ended.
    pub reason: TerminationReason,
    pub statistics: SolverStatistics,
}

impl<T> ExactOutcome<T>
where
    T: SolverNumeric,
{
    /// Relative distance between `bound` and the solution's score in percent.
    pub fn gap_percent(&self) -> f64 {
        let bound: i64 = self.bound.into();
        let best: i64 = self.solution.objective_value().into();
        if bound <= 0 {
            return 0.0;
        }
        ((bound - best).max(0) as f64) * 100.0 / bound as f64
    }
}

impl<T> std::fmt::Display for ExactOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExactOutcome(objective: {}, bound: {}, proven: {}, reason: {})",
            self.solution.objective_value(),
            self.bound,
            self.proven,
            self.reason
        )
    }
}

/// Builds a solution with a single greedy pass over the libraries in density
/// order.
///
/// # Examples
///
/// ```rust
/// use bort_model::{index::{BookIndex, LibraryIndex}, model::ModelBuilder};
/// use bort_solver::api::{construct, validate};
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
///     .add_library_books(LibraryIndex::new(1), [BookIndex::new(2)]);
/// let model = builder.build().unwrap();
///
/// let solution = construct(&model);
/// assert_eq!(solution.objective_value(), 9);
/// assert!(validate(&model, &solution).is_ok());
/// ```
#[tracing::instrument(level = "debug", skip(model))]
pub fn construct<T>(model: &Model<T>) -> Solution<T>
where
    T: SolverNumeric,
{
    let solution = GreedyConstructor::preallocated(model).construct(model);
    tracing::debug!(
        objective = %solution.objective_value(),
        activations = solution.num_activations(),
        "greedy construction finished"
    );
    solution
}

/// Runs `config.parallelism()` local search trials from `solution` and
/// returns the best result: highest score, then fewest activations, then
/// lowest trial index. The result never scores below `solution`.
///
/// # Errors
///
/// Returns the first violation if `solution` is not valid for `model`.
///
/// # Examples
///
/// ```rust
/// use bort_model::{index::{BookIndex, LibraryIndex}, model::ModelBuilder, solution::Solution};
/// use bort_solver::{api::improve, config::ImproveConfig};
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
///     .add_library_books(LibraryIndex::new(1), [BookIndex::new(2)]);
/// let model = builder.build().unwrap();
///
/// let config = ImproveConfig::builder().move_budget(500).parallelism(2).seed(7).build();
/// let improved = improve(&model, &Solution::empty(), &config).unwrap();
/// assert_eq!(improved.objective_value(), 9);
/// ```
#[tracing::instrument(level = "debug", skip(model, solution, config))]
pub fn improve<T>(
    model: &Model<T>,
    solution: &Solution<T>,
    config: &ImproveConfig<T>,
) -> Result<Solution<T>, InvalidSolutionError>
where
    T: SolverNumeric,
{
    validation::validate(model, solution)?;

    let mut builder = SolverBuilder::new();
    if let Some(budget) = config.time_budget() {
        builder = builder.with_time_limit(budget);
    }
    for trial in 0..config.parallelism() {
        builder = builder.add_solver(local_search_trial(
            config,
            config.seed().wrapping_add(trial as u64),
            solution,
        ));
    }

    let (outcome, members) = builder.build().solve_with_members(model);

    let mut best: Option<(usize, Solution<T>)> = None;
    for (trial, member) in members.into_iter().enumerate() {
        let (result, _, _) = member.into_parts();
        let Some(candidate) = result.into_solution() else {
            continue;
        };
        let better = match &best {
            Some((_, current)) => compare_solutions(&candidate, current).is_lt(),
            None => true,
        };
        if better {
            best = Some((trial, candidate));
        }
    }

    let improved = match best {
        Some((trial, candidate)) if candidate.objective_value() >= solution.objective_value() => {
            tracing::debug!(
                trial,
                from = %solution.objective_value(),
                to = %candidate.objective_value(),
                solutions_found = outcome.statistics.solutions_found,
                "improvement finished"
            );
            candidate
        }
        _ => solution.clone(),
    };
    Ok(improved)
}

fn local_search_trial<T>(
    config: &ImproveConfig<T>,
    seed: u64,
    initial: &Solution<T>,
) -> LocalSearchPortfolioSolver<T>
where
    T: SolverNumeric,
{
    let mut trial = LocalSearchPortfolioSolver::new(seed)
        .with_initial_solution(initial.clone())
        .with_move_weights(config.move_weights())
        .with_annealing(config.annealing());
    if let Some(budget) = config.move_budget() {
        trial = trial.with_move_budget(budget);
    }
    if let Some(limit) = config.stagnation_limit() {
        trial = trial.with_stagnation_limit(limit);
    }
    if let Some(max_worsening) = config.max_worsening() {
        trial = trial.with_max_worsening(max_worsening);
    }
    trial
}

/// Runs the branch-and-bound search next to `config.parallelism() - 1` local
/// search helpers.
///
/// Without a time budget the search runs to completion and the result is
/// proven optimal. With one, the best solution and the best proven bound at
/// expiry are returned.
///
/// # Examples
///
/// ```rust
/// use bort_model::{index::{BookIndex, LibraryIndex}, model::ModelBuilder};
/// use bort_solver::{api::solve_exact, config::ExactConfig};
///
/// let mut builder = ModelBuilder::<i64>::new(4, 2, 4);
/// builder.set_book_scores([10, 9, 8, 1]);
/// builder
///     .set_library_signup(LibraryIndex::new(0), 2)
///     .set_library_throughput(LibraryIndex::new(0), 1)
///     .add_library_books(LibraryIndex::new(0), [BookIndex::new(0), BookIndex::new(1), BookIndex::new(2)]);
/// builder
///     .set_library_signup(LibraryIndex::new(1), 2)
///     .set_library_throughput(LibraryIndex::new(1), 1)
///     .add_library_books(LibraryIndex::new(1), [BookIndex::new(0), BookIndex::new(3)]);
/// let model = builder.build().unwrap();
///
/// let outcome = solve_exact(&model, &ExactConfig::default());
/// assert!(outcome.proven);
/// assert_eq!(outcome.solution.objective_value(), 19);
/// assert_eq!(outcome.bound, 19);
/// ```
#[cfg(feature = "exact")]
pub fn solve_exact<T>(model: &Model<T>, config: &ExactConfig) -> ExactOutcome<T>
where
    T: SolverNumeric,
{
    let mut strategy = bort_bnb::portfolio::BnbPortfolioSolver::new();
    if config.log_progress() {
        strategy = strategy.with_progress_log(config.progress_interval());
    }
    solve_exact_with(model, config, strategy)
}

/// Runs `strategy` next to `config.parallelism() - 1` local search helpers
/// and reports the best solution with the tightest bound any member proved.
///
/// A strategy that reports no bound leaves the distinct-book ceiling as the
/// bound unless some member proves optimality.
#[tracing::instrument(level = "debug", skip(model, config, strategy))]
pub fn solve_exact_with<T, S>(model: &Model<T>, config: &ExactConfig, strategy: S) -> ExactOutcome<T>
where
    T: SolverNumeric,
    S: PortofolioSolver<T>,
{
    let mut builder = SolverBuilder::new().add_solver(strategy);
    if let Some(budget) = config.time_budget() {
        builder = builder.with_time_limit(budget);
    }
    for helper in 1..config.parallelism() {
        builder = builder.add_solver(
            LocalSearchPortfolioSolver::new(config.seed().wrapping_add((helper - 1) as u64))
                .with_stagnation_limit(config.helper_stagnation_limit()),
        );
    }

    let SolverOutcome {
        result,
        reason,
        upper_bound,
        statistics,
    } = builder.build().solve(model);

    let proven = matches!(reason, TerminationReason::OptimalityProven);
    let solution = match result.into_solution() {
        Some(solution) => solution,
        None => construct(model),
    };
    let bound = if proven {
        solution.objective_value()
    } else {
        upper_bound
            .unwrap_or_else(|| model.max_attainable_score())
            .max(solution.objective_value())
    };

    ExactOutcome {
        solution,
        proven,
        bound,
        reason,
        statistics,
    }
}

/// Checks every constraint of `solution` and its declared score.
///
/// # Errors
///
/// Returns the first violation found.
#[inline]
pub fn validate<T>(model: &Model<T>, solution: &Solution<T>) -> Result<(), InvalidSolutionError>
where
    T: SolverNumeric,
{
    validation::validate(model, solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        model::ModelBuilder,
        solution::Activation,
    };
    use bort_search::portfolio::{PortfolioSolverContext, PortfolioSolverResult};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    fn scenario_a(horizon: i64) -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(3, 2, horizon);
        builder.set_book_scores([3, 4, 2]);
        builder
            .set_library_signup(l(0), 1)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0), b(1)]);
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(2)]);
        builder.build().unwrap()
    }

    fn scenario_c() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 2);
        builder.set_book_scores([5, 1]);
        builder
            .set_library_signup(l(0), 0)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0)]);
        builder
            .set_library_signup(l(1), 0)
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(0), b(1)]);
        builder.build().unwrap()
    }

    /// L1 needs longer to sign up than the horizon allows.
    fn scenario_d() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 3);
        builder.set_book_scores([4, 6]);
        builder
            .set_library_signup(l(0), 1)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0)]);
        builder
            .set_library_signup(l(1), 4)
            .set_library_throughput(l(1), 5)
            .add_library_books(l(1), [b(1)]);
        builder.build().unwrap()
    }

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

    fn random_model(seed: u64) -> Model<i64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let num_books = rng.random_range(1..12);
        let num_libraries = rng.random_range(1..6);
        let mut builder = ModelBuilder::<i64>::new(num_books, num_libraries, rng.random_range(1..10));
        for book in 0..num_books {
            builder.set_book_score(b(book), rng.random_range(0..20));
        }
        for library in 0..num_libraries {
            builder
                .set_library_signup(l(library), rng.random_range(0..4))
                .set_library_throughput(l(library), rng.random_range(0..3));
            for book in 0..num_books {
                if rng.random_bool(0.4) {
                    builder.add_library_book(l(library), b(book));
                }
            }
        }
        builder.build().unwrap()
    }

    fn quick_improve(seed: u64, parallelism: usize) -> ImproveConfig<i64> {
        ImproveConfig::builder()
            .move_budget(400)
            .stagnation_limit(200)
            .parallelism(parallelism)
            .seed(seed)
            .build()
    }

    #[test]
    fn test_scenarios_construct() {
        let a = scenario_a(3);
        let solution = construct(&a);
        assert_eq!(solution.objective_value(), 9);
        assert_eq!(solution.activations()[0].library(), l(0));
        assert_eq!(solution.activations()[0].start_day(), 0);
        assert_eq!(solution.activations()[1].start_day(), 1);
        assert!(validate(&a, &solution).is_ok());

        let b_model = scenario_a(1);
        let solution = construct(&b_model);
        assert_eq!(solution.objective_value(), 0);
        assert!(solution.is_empty());

        let c = scenario_c();
        assert_eq!(construct(&c).objective_value(), 6);

        let d = scenario_d();
        let solution = construct(&d);
        assert_eq!(solution.objective_value(), 4);
        assert!(solution.libraries().all(|library| library != l(1)));
    }

    #[test]
    fn test_scenarios_improve_from_empty() {
        let cases = [(scenario_a(3), 9), (scenario_a(1), 0), (scenario_c(), 6), (scenario_d(), 4)];
        for (model, expected) in cases {
            let improved = improve(&model, &Solution::empty(), &quick_improve(1, 2)).unwrap();
            assert_eq!(improved.objective_value(), expected);
            assert!(validate(&model, &improved).is_ok());
            assert!(improved.libraries().all(|library| model.is_viable(library)));
        }
    }

    #[test]
    fn test_improve_rejects_invalid_input() {
        let model = scenario_a(3);
        let tampered = Solution::new(
            100,
            vec![Activation::new(l(0), 0, vec![b(0), b(1)])],
        );
        assert_eq!(
            improve(&model, &tampered, &quick_improve(0, 1)),
            Err(InvalidSolutionError::ObjectiveMismatch {
                declared: 100,
                actual: 7
            })
        );
    }

    #[test]
    fn test_improve_is_monotonic_on_random_instances() {
        for seed in 0..40 {
            let model = random_model(seed);
            let greedy = construct(&model);
            for start in [Solution::empty(), greedy.clone()] {
                let improved = improve(&model, &start, &quick_improve(seed, 2)).unwrap();
                assert!(
                    improved.objective_value() >= start.objective_value(),
                    "seed {}: improve went from {} down to {}",
                    seed,
                    start.objective_value(),
                    improved.objective_value()
                );
                assert!(validate(&model, &improved).is_ok(), "seed {}: invalid result", seed);
            }
        }
    }

    #[test]
    fn test_improve_is_deterministic() {
        for seed in 0..10 {
            let model = random_model(100 + seed);
            let config = quick_improve(seed, 3);
            let first = improve(&model, &Solution::empty(), &config).unwrap();
            let second = improve(&model, &Solution::empty(), &config).unwrap();
            // A trial hitting the distinct-book ceiling stops its siblings early.
            if first.objective_value() < model.max_attainable_score() {
                assert_eq!(first, second, "seed {}: runs diverged", seed);
            }
        }
    }

    #[test]
    fn test_improve_with_time_budget_only() {
        let model = contested_model();
        let config = ImproveConfig::builder()
            .time_budget(std::time::Duration::from_millis(150))
            .without_stagnation_limit()
            .parallelism(2)
            .seed(5)
            .build();
        assert!(config.move_budget().is_none() && config.stagnation_limit().is_none());

        // Greedy already sits at the optimum, below the ceiling, so only the clock ends the run.
        let start = construct(&model);
        let started = std::time::Instant::now();
        let improved = improve(&model, &start, &config).unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed < std::time::Duration::from_secs(5), "improve took {:?}", elapsed);
        assert!(improved.objective_value() >= start.objective_value());
        assert_eq!(improved.objective_value(), 19);
        assert!(validate(&model, &improved).is_ok());
    }

    #[test]
    fn test_improve_with_annealing_stays_valid() {
        let model = random_model(7);
        let config = ImproveConfig::builder()
            .move_budget(600)
            .annealing(bort_ls::meta::simulated_annealing::AnnealingSchedule::new(20.0, 0.5))
            .max_worsening(5)
            .parallelism(2)
            .seed(3)
            .build();
        let greedy = construct(&model);
        let improved = improve(&model, &greedy, &config).unwrap();
        assert!(improved.objective_value() >= greedy.objective_value());
        assert!(validate(&model, &improved).is_ok());
    }

    /// Reports the greedy solution with a fixed bound.
    struct BoundedGreedy {
        bound: i64,
    }

    impl PortofolioSolver<i64> for BoundedGreedy {
        fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, i64>) -> PortfolioSolverResult<i64> {
            let solution = construct(context.model);
            context.incumbent.try_install(&solution);
            PortfolioSolverResult::aborted(Some(solution), "gave up").with_upper_bound(self.bound)
        }

        fn name(&self) -> &str {
            "BoundedGreedy"
        }
    }

    #[test]
    fn test_solve_exact_with_custom_strategy() {
        let model = contested_model();
        let outcome = solve_exact_with(&model, &ExactConfig::default(), BoundedGreedy { bound: 23 });
        assert!(!outcome.proven);
        assert_eq!(outcome.solution.objective_value(), 19);
        assert_eq!(outcome.bound, 23);
        assert_eq!(outcome.reason, TerminationReason::Aborted("gave up".to_string()));
        assert!(outcome.gap_percent() > 17.0 && outcome.gap_percent() < 18.0);
    }

    #[test]
    fn test_solve_exact_with_unbounded_strategy_falls_back_to_ceiling() {
        let model = contested_model();
        let strategy = LocalSearchPortfolioSolver::new(0).with_move_budget(100);
        let outcome = solve_exact_with(&model, &ExactConfig::default(), strategy);
        assert!(!outcome.proven);
        assert_eq!(outcome.solution.objective_value(), 19);
        assert_eq!(outcome.bound, model.max_attainable_score());
    }

    #[cfg(feature = "exact")]
    #[test]
    fn test_scenarios_solve_exact() {
        let cases = [(scenario_a(3), 9), (scenario_a(1), 0), (scenario_c(), 6), (scenario_d(), 4)];
        for (model, expected) in cases {
            let outcome = solve_exact(&model, &ExactConfig::default());
            assert!(outcome.proven);
            assert_eq!(outcome.solution.objective_value(), expected);
            assert_eq!(outcome.bound, expected);
            assert!(validate(&model, &outcome.solution).is_ok());
        }
    }

    #[cfg(feature = "exact")]
    #[test]
    fn test_solve_exact_beats_greedy_and_improve() {
        let config = ExactConfig::builder()
            .parallelism(2)
            .helper_stagnation_limit(200)
            .build();
        for seed in 0..40 {
            let model = random_model(seed);
            let greedy = construct(&model);
            let improved = improve(&model, &greedy, &quick_improve(seed, 1)).unwrap();
            let outcome = solve_exact(&model, &config);

            assert!(outcome.proven, "seed {}: expected a proof without a time budget", seed);
            assert!(validate(&model, &outcome.solution).is_ok());
            assert!(outcome.solution.objective_value() >= greedy.objective_value());
            assert!(outcome.solution.objective_value() >= improved.objective_value());
            assert!(outcome.bound >= outcome.solution.objective_value());
        }
    }

    #[cfg(feature = "exact")]
    #[test]
    fn test_solve_exact_with_progress_log() {
        let model = contested_model();
        let config = ExactConfig::builder().log_progress(true).build();
        let outcome = solve_exact(&model, &config);
        assert!(outcome.proven);
        assert_eq!(outcome.solution.objective_value(), 19);
        assert_eq!(outcome.statistics.used_threads, 1);
    }
}
