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

//! # Shared Incumbent (Best Solution Holder)
//!
//! A concurrent container for the best solution reported so far by any
//! search trial. The best objective is mirrored into an `AtomicI64` for a
//! lock-free fast reject, while the `Solution<T>` itself sits behind a
//! `Mutex` as the source of truth.
//!
//! ## Keep-Max Policy
//!
//! Scores are maximized. A candidate is installed when
//! - its objective is strictly higher than the incumbent's, or
//! - its objective is equal and it uses fewer activations.
//!
//! Otherwise the earlier solution is kept. `best_objective` starts at
//! `i64::MIN`, meaning "no incumbent yet".
//!
//! ## Usage
//!
//! ```rust
//! use bort_search::incumbent::SharedIncumbent;
//! use bort_model::solution::Solution;
//!
//! let inc: SharedIncumbent<i64> = SharedIncumbent::new();
//! let candidate = Solution::new(100, Vec::new());
//!
//! assert!(inc.try_install(&candidate));
//! assert_eq!(inc.best_objective(), 100);
//! assert!(inc.snapshot().is_some());
//! ```

use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicI64, Ordering},
};

/// A concurrent holder for the best (incumbent) solution found during search.
///
/// The atomic is read and written with `Ordering::Relaxed`; it only serves to
/// skip the lock for candidates that are obviously worse. All decisions are
/// re-checked under the mutex.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    best_objective: AtomicI64,
    solution: Mutex<Option<Solution<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(best_objective: {})", self.best_objective())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a new shared incumbent with no solution installed.
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            best_objective: AtomicI64::new(i64::MIN),
            solution: Mutex::new(None),
        }
    }

    /// Returns the objective of the incumbent, or `i64::MIN` if there is none.
    #[inline]
    pub fn best_objective(&self) -> i64 {
        self.best_objective.load(Ordering::Relaxed)
    }

    /// Returns the incumbent objective converted to `T`, or `None` if no
    /// solution has been installed yet.
    #[inline]
    pub fn best_objective_as(&self) -> Option<T>
    where
        T: TryFrom<i64>,
    {
        match self.best_objective() {
            i64::MIN => None,
            value => T::try_from(value).ok(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Solution<T>>> {
        self.solution
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a snapshot of the current incumbent solution, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution<T>>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Attempts to install the candidate as the new incumbent.
    /// Returns `true` if the candidate was installed.
    pub fn try_install(&self, candidate: &Solution<T>) -> bool
    where
        T: SolverNumeric,
    {
        let candidate_objective: i64 = candidate.objective_value().into();
        if candidate_objective < self.best_objective() {
            return false;
        }

        let mut guard = self.lock();
        // The atomic may be stale; the stored solution decides.
        if let Some(current) = guard.as_ref() {
            let current_objective: i64 = current.objective_value().into();
            let better = candidate_objective > current_objective
                || (candidate_objective == current_objective
                    && candidate.num_activations() < current.num_activations());
            if !better {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.best_objective
            .store(candidate_objective, Ordering::Relaxed);

        true
    }
}
