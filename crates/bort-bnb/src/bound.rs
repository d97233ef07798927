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

//! # Upper Bounds
//!
//! A node of the exact search commits a sequence of libraries whose optimal
//! score is known. Everything appended later starts no earlier than the end
//! of the committed signups, so each remaining library can contribute at
//! most the top `k` of its holdings, `k` being its capacity at that clock.
//! Summing these ignores both the serial signup conflict between the
//! remaining libraries and their competition for books, which makes the sum a
//! relaxation. The committed part is bounded by its own optimum because
//! adding libraries never lets the earlier ones scan more.
//!
//! Deferred libraries (branched "not next") may still appear, but only after
//! some other library, so their capacity is taken at the clock pushed by the
//! shortest remaining signup. If nothing else can be appended they are out.
//!
//! The estimate is capped by the total score of the distinct books held by
//! all libraries that still count, which catches heavy overlap.

use crate::assignment::BookAssignment;
use bort_core::num::SolverNumeric;
use bort_model::{index::LibraryIndex, model::Model};
use fixedbitset::FixedBitSet;

/// Reusable upper bound computation.
#[derive(Debug, Clone, Default)]
pub struct BoundEstimator {
    committed: FixedBitSet,
    books: FixedBitSet,
    counted: Vec<LibraryIndex>,
}

impl BoundEstimator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_books: usize, num_libraries: usize) -> Self {
        Self {
            committed: FixedBitSet::with_capacity(num_libraries),
            books: FixedBitSet::with_capacity(num_books),
            counted: Vec::with_capacity(num_libraries),
        }
    }

    /// Bounds every extension of `sequence`.
    ///
    /// `value` must be the optimal score of `sequence` and `clock` the end of
    /// its packed signups. Libraries in `excluded` contribute nothing,
    /// libraries in `deferred` are treated as described in the module docs.
    pub fn estimate<T>(
        &mut self,
        model: &Model<T>,
        sequence: &[LibraryIndex],
        value: T,
        clock: T,
        excluded: &FixedBitSet,
        deferred: &FixedBitSet,
    ) -> T
    where
        T: SolverNumeric,
    {
        self.committed.clear();
        self.committed.grow(model.num_libraries());
        for &library in sequence {
            self.committed.insert(library.get());
        }
        self.counted.clear();

        let mut relaxed = value;
        let mut shortest_signup: Option<T> = None;

        for library in model.viable_libraries() {
            let index = library.get();
            if self.committed.contains(index) || excluded.contains(index) || deferred.contains(index) {
                continue;
            }
            let capacity = model.capacity(library, clock);
            if capacity == 0 {
                continue;
            }
            relaxed = relaxed.saturating_add(model.library_top_score(library, capacity));
            let signup = model.signup_days(library);
            shortest_signup = Some(shortest_signup.map_or(signup, |s| s.min(signup)));
            self.counted.push(library);
        }

        if let Some(signup) = shortest_signup {
            let delayed = clock.saturating_add(signup);
            for index in deferred.ones() {
                let library = LibraryIndex::new(index);
                if self.committed.contains(index) || excluded.contains(index) || !model.is_viable(library) {
                    continue;
                }
                let capacity = model.capacity(library, delayed);
                if capacity == 0 {
                    continue;
                }
                relaxed = relaxed.saturating_add(model.library_top_score(library, capacity));
                self.counted.push(library);
            }
        }

        self.books.clear();
        self.books.grow(model.num_books());
        let mut distinct = T::zero();
        for &library in sequence.iter().chain(self.counted.iter()) {
            for &book in model.library_books(library) {
                if !self.books.put(book.get()) {
                    distinct = distinct.saturating_add(model.book_score(book));
                }
            }
        }

        relaxed.min(distinct)
    }
}

/// Upper bound on every solution that extends `committed` without using a
/// library in `excluded`.
///
/// # Examples
///
/// ```rust
/// # use bort_model::model::ModelBuilder;
/// # use bort_model::index::{BookIndex, LibraryIndex};
/// # use bort_bnb::bound::upper_bound;
/// # use fixedbitset::FixedBitSet;
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
/// assert_eq!(upper_bound(&model, &[], &FixedBitSet::new()), 9);
/// assert_eq!(upper_bound(&model, &[LibraryIndex::new(1)], &FixedBitSet::new()), 6);
/// ```
pub fn upper_bound<T>(model: &Model<T>, committed: &[LibraryIndex], excluded: &FixedBitSet) -> T
where
    T: SolverNumeric,
{
    let mut assignment = BookAssignment::new();
    let value = assignment.solve(model, committed);
    let clock = committed
        .iter()
        .fold(T::zero(), |clock, &l| clock.saturating_add(model.signup_days(l)));
    BoundEstimator::new().estimate(model, committed, value, clock, excluded, &FixedBitSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::optimal_assignment;
    use bort_model::{index::BookIndex, model::ModelBuilder};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    #[test]
    fn test_overlap_caps_the_relaxation() {
        // Both libraries hold the same single book.
        let mut builder = ModelBuilder::<i64>::new(1, 2, 5);
        builder.set_book_score(b(0), 8);
        for library in 0..2 {
            builder
                .set_library_signup(l(library), 1)
                .set_library_throughput(l(library), 1)
                .add_library_book(l(library), b(0));
        }
        let model = builder.build().unwrap();
        assert_eq!(upper_bound(&model, &[], &FixedBitSet::new()), 8);
    }

    #[test]
    fn test_excluded_library_contributes_nothing() {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 5);
        builder.set_book_scores([8, 3]);
        builder
            .set_library_signup(l(0), 1)
            .set_library_throughput(l(0), 1)
            .add_library_book(l(0), b(0));
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_book(l(1), b(1));
        let model = builder.build().unwrap();

        let mut excluded = FixedBitSet::with_capacity(2);
        excluded.insert(0);
        assert_eq!(upper_bound(&model, &[], &excluded), 3);
    }

    #[test]
    fn test_deferred_libraries_need_another_library_first() {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 3);
        builder.set_book_scores([8, 3]);
        builder
            .set_library_signup(l(0), 2)
            .set_library_throughput(l(0), 1)
            .add_library_book(l(0), b(0));
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_book(l(1), b(1));
        let model = builder.build().unwrap();

        let mut estimator = BoundEstimator::new();
        let none = FixedBitSet::with_capacity(2);
        let mut deferred = FixedBitSet::with_capacity(2);
        deferred.insert(0);
        // L0 can only start on day 1 behind L1, leaving it no scan day.
        assert_eq!(estimator.estimate(&model, &[], 0, 0, &none, &deferred), 3);

        deferred.insert(1);
        assert_eq!(estimator.estimate(&model, &[], 0, 0, &none, &deferred), 0);
    }

    /// Best score over every ordered subset of the libraries.
    fn best_extension(model: &Model<i64>, prefix: &mut Vec<LibraryIndex>, excluded: &FixedBitSet) -> i64 {
        let mut best = optimal_assignment(model, prefix).0;
        for library in model.viable_libraries() {
            if prefix.contains(&library) || excluded.contains(library.get()) {
                continue;
            }
            prefix.push(library);
            best = best.max(best_extension(model, prefix, excluded));
            prefix.pop();
        }
        best
    }

    #[test]
    fn test_bound_dominates_every_extension() {
        for seed in 0..60 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let num_books = rng.random_range(1..6);
            let num_libraries = rng.random_range(1..4);
            let mut builder = ModelBuilder::<i64>::new(num_books, num_libraries, rng.random_range(1..7));
            for book in 0..num_books {
                builder.set_book_score(b(book), rng.random_range(0..10));
            }
            for library in 0..num_libraries {
                builder
                    .set_library_signup(l(library), rng.random_range(0..3))
                    .set_library_throughput(l(library), rng.random_range(1..3));
                for book in 0..num_books {
                    if rng.random_bool(0.5) {
                        builder.add_library_book(l(library), b(book));
                    }
                }
            }
            let model = builder.build().unwrap();
            let excluded = FixedBitSet::with_capacity(num_libraries);

            let bound = upper_bound(&model, &[], &excluded);
            let best = best_extension(&model, &mut Vec::new(), &excluded);
            assert!(bound >= best, "seed {seed}: bound {bound} < best {best}");

            let first = vec![l(0)];
            let bound = upper_bound(&model, &first, &excluded);
            let best = best_extension(&model, &mut first.clone(), &excluded);
            assert!(bound >= best, "seed {seed}: committed bound {bound} < best {best}");
        }
    }
}
