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

//! # Capacity Planning
//!
//! Given a library, the day its signup starts and the books that are already
//! taken, the planner computes how many books the library can still scan and
//! picks the best eligible ones.
//!
//! Holdings are pre-sorted by `(score desc, id asc)` in the model, so the
//! selection is a single forward scan that stops after `capacity` picks. For a
//! fixed eligible set and capacity this is optimal: exchanging a selected
//! book for a better unselected eligible one is never possible.

use crate::claimed::ClaimedBooks;
use bort_core::num::SolverNumeric;
use bort_model::{
    index::{BookIndex, LibraryIndex},
    model::Model,
};

/// The planner's verdict for one library at one start day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityPlan<T> {
    /// `max(0, D - start_day - signup)`.
    pub available_days: T,
    /// `available_days * daily_throughput`, as a book count.
    pub capacity: usize,
    /// The selected books, best first.
    pub books: Vec<BookIndex>,
    /// The summed score of `books`.
    pub subscore: T,
}

impl<T> CapacityPlan<T>
where
    T: SolverNumeric,
{
    /// Returns `true` if the plan would contribute a positive score.
    #[inline]
    pub fn is_productive(&self) -> bool {
        self.subscore > T::zero()
    }
}

/// Stateless book selection for a single library.
#[derive(Debug, Clone, Copy)]
pub struct CapacityPlanner<'a, T>
where
    T: SolverNumeric,
{
    model: &'a Model<T>,
}

impl<'a, T> CapacityPlanner<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(model: &'a Model<T>) -> Self {
        Self { model }
    }

    #[inline]
    pub fn model(&self) -> &'a Model<T> {
        self.model
    }

    /// Plans `library_index` starting on `start_day`, excluding the books in
    /// `claimed`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    /// # use bort_construct::{capacity::CapacityPlanner, claimed::ClaimedBooks};
    ///
    /// let mut builder = ModelBuilder::<i64>::new(3, 1, 3);
    /// builder.set_book_scores([3, 4, 2]);
    /// builder
    ///     .set_library_signup(LibraryIndex::new(0), 1)
    ///     .set_library_throughput(LibraryIndex::new(0), 1)
    ///     .add_library_books(LibraryIndex::new(0), [0, 1, 2].map(BookIndex::new));
    /// let model = builder.build().unwrap();
    ///
    /// let mut claimed = ClaimedBooks::new(3);
    /// claimed.claim(BookIndex::new(1));
    ///
    /// let plan = CapacityPlanner::new(&model).plan(LibraryIndex::new(0), 0, &claimed);
    /// assert_eq!(plan.capacity, 2);
    /// assert_eq!(plan.books, vec![BookIndex::new(0), BookIndex::new(2)]);
    /// assert_eq!(plan.subscore, 5);
    /// ```
    pub fn plan(
        &self,
        library_index: LibraryIndex,
        start_day: T,
        claimed: &ClaimedBooks,
    ) -> CapacityPlan<T> {
        let mut books = Vec::new();
        let subscore = self.plan_into(
            library_index,
            start_day,
            |book| !claimed.contains(book),
            &mut books,
        );

        CapacityPlan {
            available_days: self.model.available_days(library_index, start_day),
            capacity: self.model.capacity(library_index, start_day),
            books,
            subscore,
        }
    }

    /// Allocation-free variant of `plan`: clears `out`, fills it with the
    /// selected books and returns their summed score. `eligible` decides
    /// which books may still be taken.
    #[inline]
    pub fn plan_into<F>(
        &self,
        library_index: LibraryIndex,
        start_day: T,
        mut eligible: F,
        out: &mut Vec<BookIndex>,
    ) -> T
    where
        F: FnMut(BookIndex) -> bool,
    {
        out.clear();

        let capacity = self.model.capacity(library_index, start_day);
        if capacity == 0 {
            return T::zero();
        }

        let mut subscore = T::zero();
        for &book in self.model.library_books(library_index) {
            if eligible(book) {
                subscore = subscore.saturating_add(self.model.book_score(book));
                out.push(book);
                if out.len() == capacity {
                    break;
                }
            }
        }
        subscore
    }
}
