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

//! # Greedy Construction
//!
//! Builds an initial solution in one linear pass:
//!
//! 1. Rank the viable libraries once by density.
//! 2. Walk the ranking with a running clock and a claimed-book set. Each
//!    library is tentatively started at the clock and planned against the
//!    books that are still free.
//! 3. A positive subscore commits the activation: the clock advances by the
//!    signup duration and the selected books are claimed. Anything else skips
//!    the library without touching the clock.
//!
//! The pass stops as soon as the clock reaches the horizon, since no later
//! library could scan anything. There is no backtracking.

use crate::{capacity::CapacityPlanner, claimed::ClaimedBooks, density::rank_libraries};
use fixedbitset::FixedBitSet;
use bort_core::num::SolverNumeric;
use bort_model::{
    index::{BookIndex, LibraryIndex},
    model::Model,
    solution::{Activation, Solution},
};

/// Reusable greedy constructor. Buffers survive between calls.
#[derive(Debug, Clone)]
pub struct GreedyConstructor<T> {
    claimed: ClaimedBooks,
    activated: FixedBitSet,
    scratch: Vec<BookIndex>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for GreedyConstructor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GreedyConstructor<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            claimed: ClaimedBooks::new(0),
            activated: FixedBitSet::new(),
            scratch: Vec::new(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Creates a constructor with buffers sized for `model`.
    #[inline]
    pub fn preallocated(model: &Model<T>) -> Self {
        Self {
            claimed: ClaimedBooks::new(model.num_books()),
            activated: FixedBitSet::with_capacity(model.num_libraries()),
            scratch: Vec::with_capacity(model.num_books()),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Builds a solution from the density ranking.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    /// # use bort_construct::greedy::GreedyConstructor;
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
    /// let solution = GreedyConstructor::new().construct(&model);
    /// assert_eq!(solution.objective_value(), 9);
    /// ```
    #[tracing::instrument(level = "debug", skip(self, model))]
    pub fn construct(&mut self, model: &Model<T>) -> Solution<T> {
        let order = rank_libraries(model);
        self.construct_with_order(model, &order)
    }

    /// Builds a solution by walking `order` instead of the density ranking.
    /// Non-viable or repeated libraries in `order` end up skipped.
    pub fn construct_with_order(&mut self, model: &Model<T>, order: &[LibraryIndex]) -> Solution<T> {
        self.claimed.reset(model.num_books());
        self.activated.clear();
        self.activated.grow(model.num_libraries());
        let planner = CapacityPlanner::new(model);
        let horizon = model.horizon();

        let mut clock = T::zero();
        let mut objective = T::zero();
        let mut activations: Vec<Activation<T>> = Vec::new();

        for &library in order {
            if clock >= horizon {
                break;
            }
            if !model.is_viable(library) || self.activated.contains(library.get()) {
                continue;
            }

            let claimed = &self.claimed;
            let subscore =
                planner.plan_into(library, clock, |b| !claimed.contains(b), &mut self.scratch);
            if subscore <= T::zero() {
                tracing::trace!(%library, %clock, "skipping library without positive subscore");
                continue;
            }

            self.claimed.claim_all(&self.scratch);
            self.activated.insert(library.get());
            activations.push(Activation::new(library, clock, self.scratch.clone()));
            objective = objective.saturating_add(subscore);
            clock = clock.saturating_add(model.signup_days(library));
        }

        tracing::debug!(
            objective = %objective,
            activations = activations.len(),
            "greedy construction finished"
        );

        Solution::new(objective, activations)
    }
}
