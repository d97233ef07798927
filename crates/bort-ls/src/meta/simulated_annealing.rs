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

//! Simulated annealing.
//!
//! Improvements and ties are always accepted. A worsening move by `delta` is
//! accepted with the Metropolis probability `exp(-delta / T)` as long as the
//! temperature `T` is above the frozen threshold and `delta` does not exceed
//! the configured `max_worsening`. The temperature is owned by a pluggable
//! `CoolingSchedule` and updated after every decision, accepted or not.
//!
//! Scores are converted to `f64` only for the probability. A failed conversion
//! rejects the move.

use crate::meta::metaheuristic::Metaheuristic;
use bort_core::num::SolverNumeric;
use bort_search::monitor::search_monitor::SearchCommand;
use rand::Rng;

/// Defines the thermodynamics of the annealing process.
pub trait CoolingSchedule: Send + Sync + std::fmt::Debug {
    /// Resets the temperature to its initial state.
    fn on_start(&mut self);

    /// Updates the temperature. Called after every decision.
    fn update(&mut self);

    /// Returns the current temperature.
    fn current(&self) -> f64;

    /// Returns `true` once worsening moves are no longer considered.
    fn is_frozen(&self) -> bool;
}

/// Geometric cooling: `T_{k+1} = T_k * alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricCooling {
    initial: f64,
    current: f64,
    alpha: f64,
    min_temp: f64,
}

impl GeometricCooling {
    /// Creates a new geometric cooling schedule.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not strictly between `0.0` and `1.0`.
    #[inline]
    pub fn new(initial: f64, alpha: f64, min_temp: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "called `GeometricCooling::new()` with invalid alpha: {}. Must be in (0.0, 1.0)",
            alpha
        );
        Self {
            initial,
            current: initial,
            alpha,
            min_temp,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl CoolingSchedule for GeometricCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current *= self.alpha;
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Linear cooling: `T_{k+1} = max(0, T_k - decrement)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCooling {
    initial: f64,
    current: f64,
    decrement: f64,
    min_temp: f64,
}

impl LinearCooling {
    #[inline]
    pub fn new(initial: f64, decrement: f64, min_temp: f64) -> Self {
        Self {
            initial,
            current: initial,
            decrement,
            min_temp,
        }
    }
}

impl CoolingSchedule for LinearCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current = (self.current - self.decrement).max(0.0);
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Start and end temperature of an annealing run.
///
/// A schedule whose initial temperature is not positive, or whose final
/// temperature is not below the initial one, degenerates to hill climbing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    pub final_temperature: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self::hill_climbing()
    }
}

impl AnnealingSchedule {
    /// Cooling factor used when the number of moves is not known up front.
    pub const DEFAULT_ALPHA: f64 = 0.9995;

    #[inline]
    pub fn new(initial_temperature: f64, final_temperature: f64) -> Self {
        Self {
            initial_temperature,
            final_temperature,
        }
    }

    /// A schedule that never accepts a worsening move.
    #[inline]
    pub fn hill_climbing() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Returns `true` if this schedule reduces to hill climbing.
    #[inline]
    pub fn is_hill_climbing(&self) -> bool {
        !(self.initial_temperature > 0.0) || self.final_temperature >= self.initial_temperature
    }

    /// Builds a geometric schedule that reaches the final temperature after
    /// `move_budget` decisions, or cools by `DEFAULT_ALPHA` without a budget.
    pub fn geometric_cooling(&self, move_budget: Option<u64>) -> GeometricCooling {
        let initial = self.initial_temperature.max(f64::MIN_POSITIVE);
        let min_temp = self.final_temperature.max(0.0);

        let alpha = match move_budget {
            Some(moves) if moves > 0 => {
                let target = min_temp.max(initial * 1e-6).min(initial);
                (target / initial).powf(1.0 / moves as f64)
            }
            _ => Self::DEFAULT_ALPHA,
        };
        let alpha = if alpha.is_finite() {
            alpha.clamp(1e-6, 1.0 - 1e-12)
        } else {
            Self::DEFAULT_ALPHA
        };

        GeometricCooling::new(initial, alpha, min_temp)
    }
}

impl std::fmt::Display for AnnealingSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnnealingSchedule(initial: {}, final: {})",
            self.initial_temperature, self.final_temperature
        )
    }
}

/// Simulated annealing over a pluggable `CoolingSchedule`.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing<T, R, C> {
    cooling_schedule: C,
    rng: R,
    max_worsening: Option<T>,
}

impl<T, R, C> SimulatedAnnealing<T, R, C>
where
    T: SolverNumeric,
    R: Rng,
    C: CoolingSchedule,
{
    #[inline]
    pub fn new(cooling_schedule: C, rng: R) -> Self {
        Self {
            cooling_schedule,
            rng,
            max_worsening: None,
        }
    }

    /// Rejects every worsening larger than `max_worsening`, whatever the
    /// temperature.
    #[inline]
    pub fn with_max_worsening(mut self, max_worsening: T) -> Self {
        self.max_worsening = Some(max_worsening);
        self
    }

    #[inline]
    pub fn cooling_schedule(&self) -> &C {
        &self.cooling_schedule
    }
}

impl<T, R, C> Metaheuristic<T> for SimulatedAnnealing<T, R, C>
where
    T: SolverNumeric,
    R: Rng + Send + Sync,
    C: CoolingSchedule,
{
    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    fn on_start(&mut self, _initial_objective: T) {
        self.cooling_schedule.on_start();
    }

    fn search_command(&mut self, _iteration: u64, _best_objective: T) -> SearchCommand {
        SearchCommand::Continue
    }

    fn should_accept(&mut self, current: T, candidate: T, _best: T) -> bool {
        if candidate >= current {
            return true;
        }
        if self.cooling_schedule.is_frozen() {
            return false;
        }

        let worsening = current.saturating_sub(candidate);
        if let Some(limit) = self.max_worsening
            && worsening > limit
        {
            return false;
        }

        let Some(delta) = worsening.to_f64() else {
            return false;
        };
        let temperature = self.cooling_schedule.current();
        if temperature <= 1e-9 {
            return false;
        }

        let probability = (-delta / temperature).exp();
        if !probability.is_finite() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn on_accept(&mut self, _new_current: T) {
        self.cooling_schedule.update();
    }

    fn on_reject(&mut self, _rejected_candidate: T) {
        self.cooling_schedule.update();
    }

    fn on_new_best(&mut self, _new_best: T) {}
}
