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

//! Configuration for the `improve` and `solve_exact` entry points.
//!
//! Both configurations are immutable once built. Builders start from the
//! defaults below and validate their inputs eagerly.
//!
//! | Setting                   | `ImproveConfig` | `ExactConfig` |
//! |---------------------------|-----------------|---------------|
//! | time budget               | none            | none          |
//! | parallelism               | 1               | 1             |
//! | seed                      | 0               | 0             |
//! | stagnation limit          | 10 000          | 10 000        |
//! | move budget               | none            | n/a           |
//! | annealing                 | hill climbing   | n/a           |

use bort_core::num::SolverNumeric;
use bort_ls::{meta::simulated_annealing::AnnealingSchedule, operator::MoveWeights};
use std::time::Duration;

const DEFAULT_STAGNATION_LIMIT: u64 = 10_000;
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Settings for a parallel local search run.
///
/// Trial `i` of `parallelism` trials is seeded with `seed + i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImproveConfig<T> {
    time_budget: Option<Duration>,
    move_budget: Option<u64>,
    parallelism: usize,
    annealing: AnnealingSchedule,
    max_worsening: Option<T>,
    stagnation_limit: Option<u64>,
    move_weights: MoveWeights,
    seed: u64,
}

impl<T> Default for ImproveConfig<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        ImproveConfigBuilder::new().build()
    }
}

impl<T> ImproveConfig<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn builder() -> ImproveConfigBuilder<T> {
        ImproveConfigBuilder::new()
    }

    /// Wall-clock budget shared by all trials.
    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Maximum number of moves per trial.
    #[inline]
    pub fn move_budget(&self) -> Option<u64> {
        self.move_budget
    }

    #[inline]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    #[inline]
    pub fn annealing(&self) -> AnnealingSchedule {
        self.annealing
    }

    /// Largest score loss a single annealing move may accept.
    #[inline]
    pub fn max_worsening(&self) -> Option<T> {
        self.max_worsening
    }

    /// Consecutive attempts without improvement after which a trial stops.
    #[inline]
    pub fn stagnation_limit(&self) -> Option<u64> {
        self.stagnation_limit
    }

    #[inline]
    pub fn move_weights(&self) -> MoveWeights {
        self.move_weights
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImproveConfigBuilder<T> {
    config: ImproveConfig<T>,
}

impl<T> Default for ImproveConfigBuilder<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ImproveConfigBuilder<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            config: ImproveConfig {
                time_budget: None,
                move_budget: None,
                parallelism: 1,
                annealing: AnnealingSchedule::hill_climbing(),
                max_worsening: None,
                stagnation_limit: Some(DEFAULT_STAGNATION_LIMIT),
                move_weights: MoveWeights::default(),
                seed: 0,
            },
        }
    }

    #[inline]
    pub fn time_budget(mut self, time_budget: Duration) -> Self {
        self.config.time_budget = Some(time_budget);
        self
    }

    #[inline]
    pub fn move_budget(mut self, move_budget: u64) -> Self {
        self.config.move_budget = Some(move_budget);
        self
    }

    /// # Panics
    ///
    /// Panics if `parallelism` is zero.
    #[inline]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        assert!(
            parallelism > 0,
            "called `ImproveConfigBuilder::parallelism` with zero parallelism"
        );
        self.config.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn annealing(mut self, annealing: AnnealingSchedule) -> Self {
        self.config.annealing = annealing;
        self
    }

    /// # Panics
    ///
    /// Panics if `max_worsening` is negative.
    #[inline]
    pub fn max_worsening(mut self, max_worsening: T) -> Self {
        assert!(
            max_worsening >= T::zero(),
            "called `ImproveConfigBuilder::max_worsening` with negative value {}",
            max_worsening
        );
        self.config.max_worsening = Some(max_worsening);
        self
    }

    #[inline]
    pub fn stagnation_limit(mut self, stagnation_limit: u64) -> Self {
        self.config.stagnation_limit = Some(stagnation_limit);
        self
    }

    /// Removes the stagnation limit. A move or time budget must then be set.
    #[inline]
    pub fn without_stagnation_limit(mut self) -> Self {
        self.config.stagnation_limit = None;
        self
    }

    #[inline]
    pub fn move_weights(mut self, move_weights: MoveWeights) -> Self {
        self.config.move_weights = move_weights;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// # Panics
    ///
    /// Panics if no time budget, move budget or stagnation limit is set.
    #[inline]
    pub fn build(self) -> ImproveConfig<T> {
        let config = self.config;
        assert!(
            config.time_budget.is_some()
                || config.move_budget.is_some()
                || config.stagnation_limit.is_some(),
            "called `ImproveConfigBuilder::build` without any termination criterion"
        );
        config
    }
}

/// Settings for an exact search run.
///
/// `parallelism` counts the exact strategy itself: `parallelism - 1` local
/// search helpers (seeded `seed`, `seed + 1`, ...) run next to it and feed
/// the shared incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactConfig {
    time_budget: Option<Duration>,
    parallelism: usize,
    seed: u64,
    helper_stagnation_limit: u64,
    log_progress: bool,
}

impl Default for ExactConfig {
    fn default() -> Self {
        ExactConfigBuilder::new().build()
    }
}

impl ExactConfig {
    #[inline]
    pub fn builder() -> ExactConfigBuilder {
        ExactConfigBuilder::new()
    }

    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    #[inline]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn helper_stagnation_limit(&self) -> u64 {
        self.helper_stagnation_limit
    }

    #[inline]
    pub fn log_progress(&self) -> bool {
        self.log_progress
    }

    /// Interval between branch-and-bound progress lines when logging is on.
    #[inline]
    pub fn progress_interval(&self) -> Duration {
        DEFAULT_PROGRESS_INTERVAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactConfigBuilder {
    config: ExactConfig,
}

impl Default for ExactConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: ExactConfig {
                time_budget: None,
                parallelism: 1,
                seed: 0,
                helper_stagnation_limit: DEFAULT_STAGNATION_LIMIT,
                log_progress: false,
            },
        }
    }

    #[inline]
    pub fn time_budget(mut self, time_budget: Duration) -> Self {
        self.config.time_budget = Some(time_budget);
        self
    }

    /// # Panics
    ///
    /// Panics if `parallelism` is zero.
    #[inline]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        assert!(
            parallelism > 0,
            "called `ExactConfigBuilder::parallelism` with zero parallelism"
        );
        self.config.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[inline]
    pub fn helper_stagnation_limit(mut self, limit: u64) -> Self {
        assert!(
            limit > 0,
            "called `ExactConfigBuilder::helper_stagnation_limit` with a zero limit"
        );
        self.config.helper_stagnation_limit = limit;
        self
    }

    #[inline]
    pub fn log_progress(mut self, log_progress: bool) -> Self {
        self.config.log_progress = log_progress;
        self
    }

    #[inline]
    pub fn build(self) -> ExactConfig {
        self.config
    }
}
