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

//! Incumbent management for branch-and-bound
//!
//! `IncumbentStore<T>` reads and publishes the best known score during the
//! search. The score is the pruning threshold: a node survives only if its
//! bound beats it.
//!
//! Implementations
//! - `NoSharedIncumbent<T>`: local only. `initial_lower_bound` is zero (the
//!   empty solution), `tighten(x) = x` and publishing is a no-op.
//! - `SharedIncumbentAdapter<'a, T>`: wraps `bort_search::incumbent::SharedIncumbent<T>`.
//!   `tighten(x)` returns `max(shared, x)` so that scores found by concurrent
//!   local search trials prune this tree as well.

use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::incumbent::SharedIncumbent;
use std::marker::PhantomData;

/// Access to the best known solution of a branch-and-bound run.
pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns the best score known before the search starts.
    fn initial_lower_bound(&self) -> T;

    /// Combines the local best score with whatever is known elsewhere.
    fn tighten(&self, current_local_best: T) -> T;

    /// Publishes a new local best solution.
    fn on_solution_found(&self, solution: &Solution<T>);

    /// Returns the best solution known elsewhere, if any.
    fn best_solution(&self) -> Option<Solution<T>>;
}

/// An `IncumbentStore` that keeps everything local.
#[repr(transparent)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_lower_bound(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution<T>) {}

    #[inline(always)]
    fn best_solution(&self) -> Option<Solution<T>> {
        None
    }
}

/// An `IncumbentStore` backed by a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }

    #[inline(always)]
    fn shared_objective(&self) -> Option<T>
    where
        T: SolverNumeric,
    {
        match self.inner.best_objective() {
            i64::MIN => None,
            value => T::from_i64(value),
        }
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_lower_bound(&self) -> T {
        self.shared_objective().unwrap_or_else(T::zero).max(T::zero())
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        match self.shared_objective() {
            Some(shared) => shared.max(current_local_best),
            None => current_local_best,
        }
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution<T>) {
        self.inner.try_install(solution);
    }

    #[inline(always)]
    fn best_solution(&self) -> Option<Solution<T>> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{
        index::{BookIndex, LibraryIndex},
        solution::Activation,
    };

    fn solution(objective: i64) -> Solution<i64> {
        Solution::new(
            objective,
            vec![Activation::new(LibraryIndex::new(0), 0, vec![BookIndex::new(0)])],
        )
    }

    #[test]
    fn test_no_shared_incumbent_is_local() {
        let store = NoSharedIncumbent::<i64>::new();
        assert_eq!(store.initial_lower_bound(), 0);
        assert_eq!(store.tighten(7), 7);
        store.on_solution_found(&solution(9));
        assert_eq!(store.best_solution(), None);
    }

    #[test]
    fn test_shared_adapter_tightens_with_foreign_scores() {
        let shared = SharedIncumbent::<i64>::new();
        let store = SharedIncumbentAdapter::new(&shared);
        assert_eq!(store.initial_lower_bound(), 0);
        assert_eq!(store.tighten(3), 3);

        // Another trial publishes a better score.
        shared.try_install(&solution(10));
        assert_eq!(store.tighten(3), 10);
        assert_eq!(store.tighten(12), 12);
        assert_eq!(store.best_solution().map(|s| s.objective_value()), Some(10));
    }

    #[test]
    fn test_shared_adapter_publishes() {
        let shared = SharedIncumbent::<i64>::new();
        let store = SharedIncumbentAdapter::new(&shared);
        store.on_solution_found(&solution(4));
        assert_eq!(shared.best_objective(), 4);
        assert_eq!(store.initial_lower_bound(), 4);
    }
}
