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

use crate::{
    index::{BookIndex, LibraryIndex},
    model::Model,
};
use bort_core::num::SolverNumeric;

/// One activated library: when its signup starts and which books it scans.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Activation<T> {
    library: LibraryIndex,
    start_day: T,
    books: Vec<BookIndex>,
}

impl<T> Activation<T>
where
    T: SolverNumeric,
{
    /// Creates a new activation.
    #[inline]
    pub fn new(library: LibraryIndex, start_day: T, books: Vec<BookIndex>) -> Self {
        Self {
            library,
            start_day,
            books,
        }
    }

    /// Returns the activated library.
    #[inline]
    pub fn library(&self) -> LibraryIndex {
        self.library
    }

    /// Returns the day on which the library's signup starts.
    #[inline]
    pub fn start_day(&self) -> T {
        self.start_day
    }

    /// Returns the books claimed by this library, in scanning order.
    #[inline]
    pub fn books(&self) -> &[BookIndex] {
        &self.books
    }

    /// Returns the number of claimed books.
    #[inline]
    pub fn num_books(&self) -> usize {
        self.books.len()
    }
}

/// A complete answer: the ordered activation plan with per-library claimed
/// books, and the declared objective value.
///
/// The empty solution (no activations, objective `0`) is valid for every
/// instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    objective_value: T,
    activations: Vec<Activation<T>>,
}

impl<T> Solution<T>
where
    T: SolverNumeric,
{
    /// Constructs a new `Solution`. The objective value is taken as given;
    /// use `validation::validate` to check it.
    #[inline]
    pub fn new(objective_value: T, activations: Vec<Activation<T>>) -> Self {
        Self {
            objective_value,
            activations,
        }
    }

    /// Returns the solution that activates nothing.
    #[inline]
    pub fn empty() -> Self {
        Self {
            objective_value: T::zero(),
            activations: Vec::new(),
        }
    }

    /// Returns the declared total score.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    /// Returns the activations in signup order.
    #[inline]
    pub fn activations(&self) -> &[Activation<T>] {
        &self.activations
    }

    /// Returns the number of activated libraries.
    #[inline]
    pub fn num_activations(&self) -> usize {
        self.activations.len()
    }

    /// Returns `true` if no library is activated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    /// Iterates over the activated libraries in signup order.
    #[inline]
    pub fn libraries(&self) -> impl Iterator<Item = LibraryIndex> + '_ {
        self.activations.iter().map(|a| a.library)
    }

    /// Returns the total number of claimed books.
    #[inline]
    pub fn num_claimed_books(&self) -> usize {
        self.activations.iter().map(|a| a.books.len()).sum()
    }

    /// Consumes the solution and returns its activations.
    #[inline]
    pub fn into_activations(self) -> Vec<Activation<T>> {
        self.activations
    }

    /// Returns a normalized copy: activations without books are removed and
    /// the remaining start days are packed back to back.
    ///
    /// Start days can only move earlier, so every capacity can only grow
    /// and a valid solution stays valid. The objective value is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::solution::{Activation, Solution};
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    ///
    /// let mut builder = ModelBuilder::<i64>::new(1, 2, 5);
    /// builder.set_book_score(BookIndex::new(0), 3);
    /// builder.set_library_signup(LibraryIndex::new(0), 1);
    /// builder.set_library_signup(LibraryIndex::new(1), 1);
    /// builder.set_library_throughput(LibraryIndex::new(1), 1);
    /// builder.add_library_book(LibraryIndex::new(1), BookIndex::new(0));
    /// let model = builder.build().unwrap();
    ///
    /// let solution = Solution::new(3, vec![
    ///     Activation::new(LibraryIndex::new(0), 0, vec![]),
    ///     Activation::new(LibraryIndex::new(1), 1, vec![BookIndex::new(0)]),
    /// ]);
    /// let compact = solution.compacted(&model);
    /// assert_eq!(compact.num_activations(), 1);
    /// assert_eq!(compact.activations()[0].start_day(), 0);
    /// ```
    pub fn compacted(&self, model: &Model<T>) -> Self {
        let mut clock = T::zero();
        let activations = self
            .activations
            .iter()
            .filter(|a| !a.books.is_empty())
            .map(|a| {
                let start_day = clock;
                clock = clock.saturating_add(model.signup_days(a.library));
                Activation::new(a.library, start_day, a.books.clone())
            })
            .collect();

        Self {
            objective_value: self.objective_value,
            activations,
        }
    }
}

impl<T> Default for Solution<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        writeln!(f)?;

        if self.activations.is_empty() {
            writeln!(f, "   (No libraries activated)")?;
            return Ok(());
        }

        writeln!(
            f,
            "   {:<10} | {:<10} | {:<10}",
            "Library", "Start Day", "Books"
        )?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<10}", "", "", "")?;
        for activation in &self.activations {
            writeln!(
                f,
                "   {:<10} | {:<10} | {:<10}",
                activation.library.get(),
                activation.start_day,
                activation.books.len()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    #[test]
    fn test_new_and_basic_accessors() {
        let sol = Solution::new(
            9i64,
            vec![
                Activation::new(l(0), 0, vec![b(1), b(0)]),
                Activation::new(l(1), 1, vec![b(2)]),
            ],
        );
        assert_eq!(sol.objective_value(), 9);
        assert_eq!(sol.num_activations(), 2);
        assert_eq!(sol.num_claimed_books(), 3);
        assert_eq!(sol.libraries().collect::<Vec<_>>(), vec![l(0), l(1)]);
        assert_eq!(sol.activations()[1].start_day(), 1);
        assert_eq!(sol.activations()[0].books(), &[b(1), b(0)]);
    }

    #[test]
    fn test_empty_solution() {
        let sol = Solution::<i32>::empty();
        assert!(sol.is_empty());
        assert_eq!(sol.objective_value(), 0);
        assert_eq!(sol, Solution::default());
    }

    #[test]
    fn test_compacted_drops_empty_and_repacks() {
        let mut builder = ModelBuilder::<i64>::new(2, 3, 10);
        builder.set_book_scores([4, 6]);
        for i in 0..3 {
            builder
                .set_library_signup(l(i), 2)
                .set_library_throughput(l(i), 1);
        }
        builder.add_library_book(l(0), b(0));
        builder.add_library_book(l(2), b(1));
        let model = builder.build().unwrap();

        let sol = Solution::new(
            10i64,
            vec![
                Activation::new(l(0), 0, vec![b(0)]),
                Activation::new(l(1), 3, vec![]),
                Activation::new(l(2), 6, vec![b(1)]),
            ],
        );
        let compact = sol.compacted(&model);
        assert_eq!(compact.objective_value(), 10);
        assert_eq!(compact.libraries().collect::<Vec<_>>(), vec![l(0), l(2)]);
        assert_eq!(compact.activations()[1].start_day(), 2);
        assert_eq!(compact.activations()[1].books(), &[b(1)]);
    }

    #[test]
    fn test_display_formatting_example() {
        let sol = Solution::new(7i64, vec![Activation::new(l(3), 0, vec![b(0), b(1)])]);

        let mut expected = String::new();
        expected.push_str("Solution Summary\n");
        expected.push_str("   Objective Value: 7\n");
        expected.push('\n');
        expected.push_str("   Library    | Start Day  | Books     \n");
        expected.push_str("   -----------+------------+-----------\n");
        expected.push_str("   3          | 0          | 2         \n");

        assert_eq!(format!("{}", sol), expected);
    }

    #[test]
    fn test_display_empty() {
        let displayed = format!("{}", Solution::<i64>::empty());
        assert!(displayed.contains("(No libraries activated)"));
    }
}
