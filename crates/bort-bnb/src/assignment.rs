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

//! # Exact Book Assignment
//!
//! For a fixed activation sequence the start days are packed back to back,
//! so every library's capacity is known. Choosing which library scans which
//! book is then a weighted transversal matroid: a set of books is feasible
//! iff it can be matched to the libraries without exceeding any capacity.
//!
//! The matroid greedy is optimal. Books are visited by descending score and a
//! book is kept iff a capacitated augmenting path exists for it: a breadth
//! first walk over the libraries holding it, moving already accepted books to
//! other holders until some library with a spare slot is reached. Accepted
//! books are never dropped again, only moved.
//!
//! Unlike the per-library greedy of the constructor, this re-optimizes the
//! books of the earlier libraries whenever a library is appended.

use bort_core::num::SolverNumeric;
use bort_model::{
    index::{BookIndex, LibraryIndex},
    model::Model,
    solution::{Activation, Solution},
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

const ROOT: usize = usize::MAX;

/// Reusable solver for the optimal assignment of a sequence.
#[derive(Debug, Clone)]
pub struct BookAssignment<T> {
    sequence: Vec<LibraryIndex>,
    position: FxHashMap<LibraryIndex, usize>,
    starts: Vec<T>,
    capacities: Vec<usize>,
    assigned: Vec<Vec<BookIndex>>,
    candidates: Vec<BookIndex>,
    seen: FxHashSet<BookIndex>,
    parent: Vec<(usize, BookIndex)>,
    visited: Vec<bool>,
    queue: VecDeque<usize>,
    objective: T,
}

impl<T> Default for BookAssignment<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BookAssignment<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            position: FxHashMap::default(),
            starts: Vec::new(),
            capacities: Vec::new(),
            assigned: Vec::new(),
            candidates: Vec::new(),
            seen: FxHashSet::default(),
            parent: Vec::new(),
            visited: Vec::new(),
            queue: VecDeque::new(),
            objective: T::zero(),
        }
    }

    /// Computes the optimal assignment for `sequence` and returns its score.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `sequence` contains a library twice.
    pub fn solve(&mut self, model: &Model<T>, sequence: &[LibraryIndex]) -> T {
        self.reset(model, sequence);

        let total_capacity: usize = self.capacities.iter().sum();
        let mut accepted = 0usize;
        for i in 0..self.candidates.len() {
            if accepted == total_capacity {
                break;
            }
            let book = self.candidates[i];
            if self.augment(model, book) {
                accepted += 1;
                self.objective = self.objective.saturating_add(model.book_score(book));
            }
        }

        for books in self.assigned.iter_mut() {
            books.sort_unstable_by(|a, b| {
                model.book_score(*b).cmp(&model.book_score(*a)).then(a.cmp(b))
            });
        }

        self.objective
    }

    fn reset(&mut self, model: &Model<T>, sequence: &[LibraryIndex]) {
        let len = sequence.len();
        self.sequence.clear();
        self.sequence.extend_from_slice(sequence);
        self.position.clear();
        self.starts.clear();
        self.capacities.clear();
        self.assigned.iter_mut().for_each(Vec::clear);
        self.assigned.resize_with(len, Vec::new);
        self.parent.clear();
        self.parent.resize(len, (ROOT, BookIndex::new(0)));
        self.visited.clear();
        self.visited.resize(len, false);
        self.candidates.clear();
        self.seen.clear();
        self.objective = T::zero();

        let mut clock = T::zero();
        for (pos, &library) in sequence.iter().enumerate() {
            let previous = self.position.insert(library, pos);
            debug_assert!(
                previous.is_none(),
                "called `BookAssignment::solve` with duplicate library in sequence: {}",
                library
            );

            let capacity = model.capacity(library, clock);
            self.starts.push(clock);
            self.capacities.push(capacity);
            clock = clock.saturating_add(model.signup_days(library));

            if capacity == 0 {
                continue;
            }
            for &book in model.library_books(library) {
                if model.book_score(book) > T::zero() && self.seen.insert(book) {
                    self.candidates.push(book);
                }
            }
        }

        self.candidates.sort_unstable_by(|a, b| {
            model.book_score(*b).cmp(&model.book_score(*a)).then(a.cmp(b))
        });
    }

    /// Breadth first search for a library with a spare slot, starting at the
    /// holders of `book`. Applies the path if one is found.
    fn augment(&mut self, model: &Model<T>, book: BookIndex) -> bool {
        self.queue.clear();
        self.visited.iter_mut().for_each(|v| *v = false);

        for &holder in model.book_holders(book) {
            if let Some(&pos) = self.position.get(&holder)
                && self.capacities[pos] > 0
                && !self.visited[pos]
            {
                self.visited[pos] = true;
                self.parent[pos] = (ROOT, book);
                self.queue.push_back(pos);
            }
        }

        while let Some(pos) = self.queue.pop_front() {
            if self.assigned[pos].len() < self.capacities[pos] {
                self.apply_path(pos);
                return true;
            }
            for i in 0..self.assigned[pos].len() {
                let moved = self.assigned[pos][i];
                for &holder in model.book_holders(moved) {
                    if let Some(&next) = self.position.get(&holder)
                        && self.capacities[next] > 0
                        && !self.visited[next]
                    {
                        self.visited[next] = true;
                        self.parent[next] = (pos, moved);
                        self.queue.push_back(next);
                    }
                }
            }
        }

        false
    }

    /// Walks the parent chain from the library with the free slot back to
    /// the root, shifting one book per edge.
    fn apply_path(&mut self, mut pos: usize) {
        loop {
            let (prev, book) = self.parent[pos];
            self.assigned[pos].push(book);
            if prev == ROOT {
                return;
            }
            if let Some(i) = self.assigned[prev].iter().position(|&b| b == book) {
                self.assigned[prev].swap_remove(i);
            }
            pos = prev;
        }
    }

    /// Score of the last solved sequence.
    #[inline]
    pub fn objective(&self) -> T {
        self.objective
    }

    /// The last solved sequence.
    #[inline]
    pub fn sequence(&self) -> &[LibraryIndex] {
        &self.sequence
    }

    /// Packed start day of the library at `position`.
    #[inline]
    pub fn start_day(&self, position: usize) -> T {
        assert!(
            position < self.starts.len(),
            "called `BookAssignment::start_day` with position out of bounds: the len is {} but the index is {}",
            self.starts.len(),
            position
        );
        self.starts[position]
    }

    /// Books assigned to the library at `position`, by descending score.
    #[inline]
    pub fn books(&self, position: usize) -> &[BookIndex] {
        assert!(
            position < self.assigned.len(),
            "called `BookAssignment::books` with position out of bounds: the len is {} but the index is {}",
            self.assigned.len(),
            position
        );
        &self.assigned[position]
    }

    /// Builds the solution of the last solved sequence. Libraries that ended
    /// up without books are dropped and the remaining starts re-packed.
    pub fn to_solution(&self, model: &Model<T>) -> Solution<T> {
        let activations = self
            .sequence
            .iter()
            .enumerate()
            .map(|(pos, &library)| {
                Activation::new(library, self.starts[pos], self.assigned[pos].clone())
            })
            .collect();
        Solution::new(self.objective, activations).compacted(model)
    }
}

/// Returns the optimal score of `sequence` and the books of each library,
/// in sequence order.
///
/// # Examples
///
/// ```rust
/// # use bort_model::model::ModelBuilder;
/// # use bort_model::index::{BookIndex, LibraryIndex};
/// # use bort_bnb::assignment::optimal_assignment;
///
/// // L0 holds {0, 1}, L1 holds {0}; both scan one book.
/// let mut builder = ModelBuilder::<i64>::new(2, 2, 1);
/// builder.set_book_scores([10, 9]);
/// builder
///     .set_library_throughput(LibraryIndex::new(0), 1)
///     .add_library_books(LibraryIndex::new(0), [BookIndex::new(0), BookIndex::new(1)]);
/// builder
///     .set_library_throughput(LibraryIndex::new(1), 1)
///     .add_library_book(LibraryIndex::new(1), BookIndex::new(0));
/// let model = builder.build().unwrap();
///
/// let (score, books) = optimal_assignment(&model, &[LibraryIndex::new(0), LibraryIndex::new(1)]);
/// assert_eq!(score, 19);
/// assert_eq!(books, vec![vec![BookIndex::new(1)], vec![BookIndex::new(0)]]);
/// ```
pub fn optimal_assignment<T>(
    model: &Model<T>,
    sequence: &[LibraryIndex],
) -> (T, Vec<Vec<BookIndex>>)
where
    T: SolverNumeric,
{
    let mut assignment = BookAssignment::new();
    let objective = assignment.solve(model, sequence);
    (objective, assignment.assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_model::{model::ModelBuilder, validation::validate};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    #[test]
    fn test_later_library_frees_contested_book() {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 1);
        builder.set_book_scores([10, 9]);
        builder
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0), b(1)]);
        builder
            .set_library_throughput(l(1), 1)
            .add_library_book(l(1), b(0));
        let model = builder.build().unwrap();

        let mut assignment = BookAssignment::new();
        assert_eq!(assignment.solve(&model, &[l(0)]), 10);
        assert_eq!(assignment.books(0), &[b(0)]);

        assert_eq!(assignment.solve(&model, &[l(0), l(1)]), 19);
        assert_eq!(assignment.books(0), &[b(1)]);
        assert_eq!(assignment.books(1), &[b(0)]);
        assert!(validate(&model, &assignment.to_solution(&model)).is_ok());
    }

    #[test]
    fn test_packed_starts_shrink_capacity() {
        let mut builder = ModelBuilder::<i64>::new(4, 2, 4);
        builder.set_book_scores([5, 4, 3, 2]);
        builder
            .set_library_signup(l(0), 2)
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0), b(1)]);
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(2), b(3)]);
        let model = builder.build().unwrap();

        let mut assignment = BookAssignment::new();
        // L0 scans days 2..4, L1 signs up on day 2 and scans day 3 only.
        assert_eq!(assignment.solve(&model, &[l(0), l(1)]), 12);
        assert_eq!(assignment.start_day(1), 2);
        assert_eq!(assignment.books(1), &[b(2)]);
    }

    #[test]
    fn test_empty_sequence_scores_zero() {
        let mut builder = ModelBuilder::<i64>::new(1, 1, 3);
        builder.set_book_score(b(0), 1);
        let model = builder.build().unwrap();
        let (score, books) = optimal_assignment(&model, &[]);
        assert_eq!(score, 0);
        assert!(books.is_empty());
    }

    #[test]
    fn test_unproductive_library_is_dropped_from_solution() {
        let mut builder = ModelBuilder::<i64>::new(1, 2, 3);
        builder.set_book_score(b(0), 7);
        builder
            .set_library_signup(l(0), 1)
            .set_library_throughput(l(0), 1)
            .add_library_book(l(0), b(0));
        builder
            .set_library_signup(l(1), 1)
            .set_library_throughput(l(1), 1)
            .add_library_book(l(1), b(0));
        let model = builder.build().unwrap();

        let mut assignment = BookAssignment::new();
        assert_eq!(assignment.solve(&model, &[l(0), l(1)]), 7);
        let solution = assignment.to_solution(&model);
        assert_eq!(solution.libraries().collect::<Vec<_>>(), vec![l(0)]);
        assert!(validate(&model, &solution).is_ok());
    }

    /// Tries every book-to-holder mapping of a sequence.
    fn brute_force(model: &Model<i64>, sequence: &[LibraryIndex]) -> i64 {
        let mut capacities = Vec::new();
        let mut clock = 0;
        for &library in sequence {
            capacities.push(model.capacity(library, clock));
            clock += model.signup_days(library);
        }

        fn go(
            model: &Model<i64>,
            sequence: &[LibraryIndex],
            book: usize,
            load: &mut [usize],
            capacities: &[usize],
        ) -> i64 {
            if book == model.num_books() {
                return 0;
            }
            let mut best = go(model, sequence, book + 1, load, capacities);
            for (pos, &library) in sequence.iter().enumerate() {
                if model.library_holds(library, BookIndex::new(book)) && load[pos] < capacities[pos] {
                    load[pos] += 1;
                    let value = model.book_score(BookIndex::new(book))
                        + go(model, sequence, book + 1, load, capacities);
                    load[pos] -= 1;
                    best = best.max(value);
                }
            }
            best
        }

        let mut load = vec![0; sequence.len()];
        go(model, sequence, 0, &mut load, &capacities)
    }

    #[test]
    fn test_matches_brute_force_on_random_sequences() {
        let mut assignment = BookAssignment::new();
        for seed in 0..150 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let num_books = rng.random_range(1..7);
            let num_libraries = rng.random_range(1..4);
            let mut builder = ModelBuilder::<i64>::new(num_books, num_libraries, rng.random_range(1..6));
            for book in 0..num_books {
                builder.set_book_score(b(book), rng.random_range(0..10));
            }
            for library in 0..num_libraries {
                builder
                    .set_library_signup(l(library), rng.random_range(0..3))
                    .set_library_throughput(l(library), rng.random_range(0..3));
                for book in 0..num_books {
                    if rng.random_bool(0.6) {
                        builder.add_library_book(l(library), b(book));
                    }
                }
            }
            let model = builder.build().unwrap();
            let sequence: Vec<LibraryIndex> = (0..num_libraries).map(l).collect();

            let score = assignment.solve(&model, &sequence);
            assert_eq!(score, brute_force(&model, &sequence), "seed {seed}");
            let solution = assignment.to_solution(&model);
            assert!(
                validate(&model, &solution).is_ok(),
                "seed {seed}: {:?}",
                validate(&model, &solution)
            );
        }
    }
}
