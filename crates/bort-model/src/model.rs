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

use crate::index::{BookIndex, LibraryIndex};
use bort_core::num::{SolverNumeric, to_count};

/// Structural violations found while building a `Model`.
///
/// Values are reported widened to `i64` so that the error type does not
/// depend on the numeric type of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedInstanceError {
    /// The declared book count does not match the number of supplied scores.
    BookCountMismatch { declared: usize, actual: usize },
    /// The declared library count does not match the number of supplied libraries.
    LibraryCountMismatch { declared: usize, actual: usize },
    /// The horizon is negative.
    NegativeHorizon(i64),
    /// A book has a negative score.
    NegativeScore { book: BookIndex, score: i64 },
    /// A library has a negative signup duration.
    NegativeSignup { library: LibraryIndex, signup_days: i64 },
    /// A library has a negative daily throughput.
    NegativeThroughput {
        library: LibraryIndex,
        daily_throughput: i64,
    },
    /// A library references a book id outside `0..num_books`.
    BookOutOfRange {
        library: LibraryIndex,
        book: usize,
        num_books: usize,
    },
}

impl std::fmt::Display for MalformedInstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookCountMismatch { declared, actual } => write!(
                f,
                "declared {} books but {} scores were supplied",
                declared, actual
            ),
            Self::LibraryCountMismatch { declared, actual } => write!(
                f,
                "declared {} libraries but {} were supplied",
                declared, actual
            ),
            Self::NegativeHorizon(horizon) => write!(f, "negative horizon: {}", horizon),
            Self::NegativeScore { book, score } => {
                write!(f, "{} has negative score {}", book, score)
            }
            Self::NegativeSignup {
                library,
                signup_days,
            } => write!(f, "{} has negative signup duration {}", library, signup_days),
            Self::NegativeThroughput {
                library,
                daily_throughput,
            } => write!(
                f,
                "{} has negative daily throughput {}",
                library, daily_throughput
            ),
            Self::BookOutOfRange {
                library,
                book,
                num_books,
            } => write!(
                f,
                "{} references book {} but only {} books exist",
                library, book, num_books
            ),
        }
    }
}

impl std::error::Error for MalformedInstanceError {}

/// The immutable data model describing books, libraries and the horizon.
///
/// This struct holds all pre-validated, queryable data:
/// - `book_scores[book]`: the score of each book.
/// - `signup_days[library]` and `daily_throughputs[library]`.
/// - `holdings[library]`: the deduplicated books a library holds, sorted by
///   score descending and then by book index ascending. Taking any prefix of
///   this list yields the best books of that size.
/// - `prefix_scores[library][k]`: the summed score of the first `k` holdings.
/// - `holders[book]`: the libraries holding a book, ascending.
///
/// Construction goes through `ModelBuilder` (or `InstanceData`), which
/// validates the input and fails with `MalformedInstanceError`.
#[derive(Clone)]
pub struct Model<T>
where
    T: SolverNumeric,
{
    horizon: T,
    book_scores: Vec<T>,
    signup_days: Vec<T>,
    daily_throughputs: Vec<T>,
    holdings: Vec<Vec<BookIndex>>,
    prefix_scores: Vec<Vec<T>>,
    holders: Vec<Vec<LibraryIndex>>,
    viable: Vec<bool>,
    max_attainable_score: T,
}

impl<T> Model<T>
where
    T: SolverNumeric,
{
    /// Returns the number of books.
    #[inline]
    pub fn num_books(&self) -> usize {
        self.book_scores.len()
    }

    /// Returns the number of libraries.
    #[inline]
    pub fn num_libraries(&self) -> usize {
        self.signup_days.len()
    }

    /// Returns the number of days `D` available in total.
    #[inline]
    pub fn horizon(&self) -> T {
        self.horizon
    }

    /// Returns the scores of all books, indexed by `BookIndex`.
    #[inline]
    pub fn book_scores(&self) -> &[T] {
        &self.book_scores
    }

    /// Returns the score of the specified book.
    ///
    /// # Panics
    ///
    /// Panics if `book_index` is not in `0..num_books()`.
    #[inline]
    pub fn book_score(&self, book_index: BookIndex) -> T {
        let index = book_index.get();
        debug_assert!(
            index < self.num_books(),
            "called `Model::book_score` with book index out of bounds: the len is {} but the index is {}",
            self.num_books(),
            index
        );

        self.book_scores[index]
    }

    /// Returns the signup duration of the specified library.
    ///
    /// # Panics
    ///
    /// Panics if `library_index` is not in `0..num_libraries()`.
    #[inline]
    pub fn signup_days(&self, library_index: LibraryIndex) -> T {
        let index = library_index.get();
        debug_assert!(
            index < self.num_libraries(),
            "called `Model::signup_days` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.signup_days[index]
    }

    /// Returns the number of books the specified library scans per day.
    ///
    /// # Panics
    ///
    /// Panics if `library_index` is not in `0..num_libraries()`.
    #[inline]
    pub fn daily_throughput(&self, library_index: LibraryIndex) -> T {
        let index = library_index.get();
        debug_assert!(
            index < self.num_libraries(),
            "called `Model::daily_throughput` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.daily_throughputs[index]
    }

    /// Returns the books of the specified library, best first.
    ///
    /// The order is score descending, ties broken by the lower book index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::{BookIndex, LibraryIndex};
    ///
    /// let mut builder = ModelBuilder::<i64>::new(3, 1, 10);
    /// builder.set_book_scores([1, 7, 7]);
    /// builder.add_library_books(LibraryIndex::new(0), [BookIndex::new(0), BookIndex::new(2), BookIndex::new(1)]);
    /// let model = builder.build().unwrap();
    /// let books: Vec<usize> = model.library_books(LibraryIndex::new(0)).iter().map(|b| b.get()).collect();
    /// assert_eq!(books, vec![1, 2, 0]);
    /// ```
    #[inline]
    pub fn library_books(&self, library_index: LibraryIndex) -> &[BookIndex] {
        let index = library_index.get();
        debug_assert!(
            index < self.num_libraries(),
            "called `Model::library_books` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        &self.holdings[index]
    }

    /// Returns the summed score of the best `k` books of a library.
    ///
    /// `k` larger than the holdings is clamped.
    #[inline]
    pub fn library_top_score(&self, library_index: LibraryIndex, k: usize) -> T {
        let index = library_index.get();
        debug_assert!(
            index < self.num_libraries(),
            "called `Model::library_top_score` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        let prefix = &self.prefix_scores[index];
        prefix[k.min(prefix.len() - 1)]
    }

    /// Returns the libraries holding the specified book, ascending.
    #[inline]
    pub fn book_holders(&self, book_index: BookIndex) -> &[LibraryIndex] {
        let index = book_index.get();
        debug_assert!(
            index < self.num_books(),
            "called `Model::book_holders` with book index out of bounds: the len is {} but the index is {}",
            self.num_books(),
            index
        );

        &self.holders[index]
    }

    /// Returns whether the library holds the specified book.
    #[inline]
    pub fn library_holds(&self, library_index: LibraryIndex, book_index: BookIndex) -> bool {
        self.book_holders(book_index)
            .binary_search(&library_index)
            .is_ok()
    }

    /// Returns `max(0, D - start_day - signup)`, the number of days the
    /// library can scan when its signup starts on `start_day`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    /// # use bort_model::index::LibraryIndex;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(0, 1, 7);
    /// builder.set_library_signup(LibraryIndex::new(0), 2);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.available_days(LibraryIndex::new(0), 1), 4);
    /// assert_eq!(model.available_days(LibraryIndex::new(0), 6), 0);
    /// ```
    #[inline]
    pub fn available_days(&self, library_index: LibraryIndex, start_day: T) -> T {
        let days = self
            .horizon
            .saturating_sub(start_day)
            .saturating_sub(self.signup_days(library_index));
        days.max(T::zero())
    }

    /// Returns `available_days * daily_throughput` as a book count.
    #[inline]
    pub fn capacity(&self, library_index: LibraryIndex, start_day: T) -> usize {
        let days = self.available_days(library_index, start_day);
        to_count(days.saturating_mul(&self.daily_throughput(library_index)))
    }

    /// Returns the prefix of the sorted holdings the library could ever scan,
    /// i.e. when signing up on day 0.
    #[inline]
    pub fn reachable_books(&self, library_index: LibraryIndex) -> &[BookIndex] {
        let books = self.library_books(library_index);
        let reach = self.capacity(library_index, T::zero()).min(books.len());
        &books[..reach]
    }

    /// Returns whether the library can contribute at all: its signup ends
    /// before the horizon, it scans at least one book per day and it holds
    /// at least one book.
    #[inline]
    pub fn is_viable(&self, library_index: LibraryIndex) -> bool {
        let index = library_index.get();
        debug_assert!(
            index < self.num_libraries(),
            "called `Model::is_viable` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.viable[index]
    }

    /// Iterates over all viable libraries in index order.
    #[inline]
    pub fn viable_libraries(&self) -> impl Iterator<Item = LibraryIndex> + '_ {
        self.viable
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| LibraryIndex::new(i))
    }

    /// Returns the number of viable libraries.
    #[inline]
    pub fn num_viable_libraries(&self) -> usize {
        self.viable.iter().filter(|v| **v).count()
    }

    /// Returns the summed score of all distinct books that at least one
    /// viable library could reach. No solution can exceed this value.
    #[inline]
    pub fn max_attainable_score(&self) -> T {
        self.max_attainable_score
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("horizon", &self.horizon)
            .field("book_scores", &self.book_scores)
            .field("signup_days", &self.signup_days)
            .field("daily_throughputs", &self.daily_throughputs)
            .field("holdings", &self.holdings)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_books: {}, num_libraries: {}, horizon: {})",
            self.num_books(),
            self.num_libraries(),
            self.horizon
        )
    }
}

/// Mutable builder for `Model`.
///
/// Nothing is assumed until defined: books score `0`, libraries sign up in
/// `0` days, scan `0` books per day and hold no books. A freshly created
/// builder therefore describes an instance whose only solution is the empty
/// one.
#[derive(Clone, Debug)]
pub struct ModelBuilder<T>
where
    T: SolverNumeric,
{
    horizon: T,
    book_scores: Vec<T>,
    signup_days: Vec<T>,
    daily_throughputs: Vec<T>,
    holdings: Vec<Vec<usize>>,
}

impl<T> ModelBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates a builder for `num_books` books and `num_libraries`
    /// libraries over `horizon` days.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bort_model::model::ModelBuilder;
    ///
    /// let model = ModelBuilder::<i64>::new(4, 2, 10).build().unwrap();
    /// assert_eq!(model.num_books(), 4);
    /// assert_eq!(model.num_libraries(), 2);
    /// assert_eq!(model.horizon(), 10);
    /// ```
    pub fn new(num_books: usize, num_libraries: usize, horizon: T) -> Self {
        Self {
            horizon,
            book_scores: vec![T::zero(); num_books],
            signup_days: vec![T::zero(); num_libraries],
            daily_throughputs: vec![T::zero(); num_libraries],
            holdings: vec![Vec::new(); num_libraries],
        }
    }

    /// Returns the number of books.
    #[inline]
    pub fn num_books(&self) -> usize {
        self.book_scores.len()
    }

    /// Returns the number of libraries.
    #[inline]
    pub fn num_libraries(&self) -> usize {
        self.signup_days.len()
    }

    /// Sets the score of a book.
    ///
    /// # Panics
    ///
    /// Panics if `book_index` is not in `0..num_books()`.
    #[inline]
    pub fn set_book_score(&mut self, book_index: BookIndex, score: T) -> &mut Self {
        let index = book_index.get();
        assert!(
            index < self.num_books(),
            "called `ModelBuilder::set_book_score` with book index out of bounds: the len is {} but the index is {}",
            self.num_books(),
            index
        );

        self.book_scores[index] = score;
        self
    }

    /// Sets the scores of books `0, 1, ...` from an iterator. Extra values
    /// are ignored.
    pub fn set_book_scores<I>(&mut self, scores: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        for (slot, score) in self.book_scores.iter_mut().zip(scores) {
            *slot = score;
        }
        self
    }

    /// Sets the signup duration of a library.
    ///
    /// # Panics
    ///
    /// Panics if `library_index` is not in `0..num_libraries()`.
    #[inline]
    pub fn set_library_signup(&mut self, library_index: LibraryIndex, signup_days: T) -> &mut Self {
        let index = library_index.get();
        assert!(
            index < self.num_libraries(),
            "called `ModelBuilder::set_library_signup` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.signup_days[index] = signup_days;
        self
    }

    /// Sets the number of books a library scans per day.
    ///
    /// # Panics
    ///
    /// Panics if `library_index` is not in `0..num_libraries()`.
    #[inline]
    pub fn set_library_throughput(
        &mut self,
        library_index: LibraryIndex,
        daily_throughput: T,
    ) -> &mut Self {
        let index = library_index.get();
        assert!(
            index < self.num_libraries(),
            "called `ModelBuilder::set_library_throughput` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.daily_throughputs[index] = daily_throughput;
        self
    }

    /// Adds a book to a library's holdings.
    ///
    /// The book index is checked when the model is built, so out-of-range
    /// books surface as `MalformedInstanceError::BookOutOfRange`.
    ///
    /// # Panics
    ///
    /// Panics if `library_index` is not in `0..num_libraries()`.
    #[inline]
    pub fn add_library_book(&mut self, library_index: LibraryIndex, book_index: BookIndex) -> &mut Self {
        let index = library_index.get();
        assert!(
            index < self.num_libraries(),
            "called `ModelBuilder::add_library_book` with library index out of bounds: the len is {} but the index is {}",
            self.num_libraries(),
            index
        );

        self.holdings[index].push(book_index.get());
        self
    }

    /// Adds several books to a library's holdings.
    pub fn add_library_books<I>(&mut self, library_index: LibraryIndex, books: I) -> &mut Self
    where
        I: IntoIterator<Item = BookIndex>,
    {
        for book in books {
            self.add_library_book(library_index, book);
        }
        self
    }

    fn check(&self) -> Result<(), MalformedInstanceError> {
        let num_books = self.num_books();

        if self.horizon < T::zero() {
            return Err(MalformedInstanceError::NegativeHorizon(self.horizon.into()));
        }

        for (book, &score) in self.book_scores.iter().enumerate() {
            if score < T::zero() {
                return Err(MalformedInstanceError::NegativeScore {
                    book: BookIndex::new(book),
                    score: score.into(),
                });
            }
        }

        for library in 0..self.num_libraries() {
            let library_index = LibraryIndex::new(library);
            let signup_days = self.signup_days[library];
            if signup_days < T::zero() {
                return Err(MalformedInstanceError::NegativeSignup {
                    library: library_index,
                    signup_days: signup_days.into(),
                });
            }

            let daily_throughput = self.daily_throughputs[library];
            if daily_throughput < T::zero() {
                return Err(MalformedInstanceError::NegativeThroughput {
                    library: library_index,
                    daily_throughput: daily_throughput.into(),
                });
            }

            if let Some(&book) = self.holdings[library].iter().find(|&&b| b >= num_books) {
                return Err(MalformedInstanceError::BookOutOfRange {
                    library: library_index,
                    book,
                    num_books,
                });
            }
        }

        Ok(())
    }

    /// Validates the collected data and builds the immutable `Model`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstanceError` when the horizon, a score, a signup
    /// duration or a throughput is negative, or when a library references a
    /// book that does not exist.
    pub fn build(self) -> Result<Model<T>, MalformedInstanceError> {
        self.check()?;

        let num_books = self.num_books();
        let scores = &self.book_scores;

        let holdings: Vec<Vec<BookIndex>> = self
            .holdings
            .into_iter()
            .map(|mut books| {
                books.sort_unstable();
                books.dedup();
                books.sort_by(|&a, &b| scores[b].cmp(&scores[a]).then(a.cmp(&b)));
                books.into_iter().map(BookIndex::new).collect()
            })
            .collect();

        let prefix_scores: Vec<Vec<T>> = holdings
            .iter()
            .map(|books| {
                let mut prefix = Vec::with_capacity(books.len() + 1);
                let mut acc = T::zero();
                prefix.push(acc);
                for book in books {
                    acc = acc.saturating_add(scores[book.get()]);
                    prefix.push(acc);
                }
                prefix
            })
            .collect();

        let mut holders: Vec<Vec<LibraryIndex>> = vec![Vec::new(); num_books];
        for (library, books) in holdings.iter().enumerate() {
            for book in books {
                holders[book.get()].push(LibraryIndex::new(library));
            }
        }

        let viable: Vec<bool> = (0..holdings.len())
            .map(|l| {
                self.signup_days[l] < self.horizon
                    && self.daily_throughputs[l] > T::zero()
                    && !holdings[l].is_empty()
            })
            .collect();

        let mut model = Model {
            horizon: self.horizon,
            book_scores: self.book_scores,
            signup_days: self.signup_days,
            daily_throughputs: self.daily_throughputs,
            holdings,
            prefix_scores,
            holders,
            viable,
            max_attainable_score: T::zero(),
        };

        let mut reachable = vec![false; num_books];
        for library in model.viable_libraries() {
            for book in model.reachable_books(library) {
                reachable[book.get()] = true;
            }
        }
        model.max_attainable_score = reachable
            .iter()
            .enumerate()
            .filter(|(_, r)| **r)
            .fold(T::zero(), |acc, (b, _)| acc.saturating_add(model.book_scores[b]));

        tracing::debug!(
            num_books = model.num_books(),
            num_libraries = model.num_libraries(),
            viable_libraries = model.num_viable_libraries(),
            max_attainable_score = %model.max_attainable_score,
            "model built"
        );

        Ok(model)
    }
}

/// A single library as handed over by an instance reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryData<T> {
    pub books: Vec<usize>,
    pub signup_days: T,
    pub daily_throughput: T,
}

/// An already-parsed instance, including the declared counts from the
/// instance header. Converting it into a `Model` checks that the declared
/// counts match the supplied arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceData<T> {
    pub num_books: usize,
    pub num_libraries: usize,
    pub horizon: T,
    pub book_scores: Vec<T>,
    pub libraries: Vec<LibraryData<T>>,
}

impl<T> InstanceData<T>
where
    T: SolverNumeric,
{
    /// Validates the instance and builds a `Model` from it.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstanceError` when the declared counts do not match
    /// the supplied data, or for any error `ModelBuilder::build` reports.
    pub fn into_model(self) -> Result<Model<T>, MalformedInstanceError> {
        if self.book_scores.len() != self.num_books {
            return Err(MalformedInstanceError::BookCountMismatch {
                declared: self.num_books,
                actual: self.book_scores.len(),
            });
        }
        if self.libraries.len() != self.num_libraries {
            return Err(MalformedInstanceError::LibraryCountMismatch {
                declared: self.num_libraries,
                actual: self.libraries.len(),
            });
        }

        let mut builder = ModelBuilder::new(self.num_books, self.num_libraries, self.horizon);
        builder.set_book_scores(self.book_scores);
        for (l, library) in self.libraries.into_iter().enumerate() {
            let library_index = LibraryIndex::new(l);
            builder
                .set_library_signup(library_index, library.signup_days)
                .set_library_throughput(library_index, library.daily_throughput)
                .add_library_books(library_index, library.books.into_iter().map(BookIndex::new));
        }
        builder.build()
    }
}

impl<T> TryFrom<InstanceData<T>> for Model<T>
where
    T: SolverNumeric,
{
    type Error = MalformedInstanceError;

    fn try_from(data: InstanceData<T>) -> Result<Self, Self::Error> {
        data.into_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
        builder.build().expect("scenario A is well formed")
    }

    #[test]
    fn test_basic_accessors() {
        let model = scenario_a(3);
        assert_eq!(model.num_books(), 3);
        assert_eq!(model.num_libraries(), 2);
        assert_eq!(model.horizon(), 3);
        assert_eq!(model.book_score(b(1)), 4);
        assert_eq!(model.signup_days(l(0)), 1);
        assert_eq!(model.daily_throughput(l(1)), 1);
    }

    #[test]
    fn test_holdings_sorted_by_score_then_index() {
        let model = scenario_a(3);
        assert_eq!(model.library_books(l(0)), &[b(1), b(0)]);
        assert_eq!(model.library_top_score(l(0), 1), 4);
        assert_eq!(model.library_top_score(l(0), 2), 7);
        assert_eq!(model.library_top_score(l(0), 99), 7, "k is clamped");
        assert_eq!(model.library_top_score(l(0), 0), 0);
    }

    #[test]
    fn test_duplicate_holdings_are_deduplicated() {
        let mut builder = ModelBuilder::<i64>::new(2, 1, 5);
        builder.set_book_scores([1, 1]);
        builder.add_library_books(l(0), [b(1), b(0), b(1), b(0)]);
        let model = builder.build().unwrap();
        assert_eq!(model.library_books(l(0)), &[b(0), b(1)]);
        assert_eq!(model.book_holders(b(1)), &[l(0)]);
    }

    #[test]
    fn test_holders_inverse_index() {
        let mut builder = ModelBuilder::<i64>::new(2, 3, 5);
        builder.add_library_books(l(0), [b(0)]);
        builder.add_library_books(l(2), [b(0), b(1)]);
        let model = builder.build().unwrap();
        assert_eq!(model.book_holders(b(0)), &[l(0), l(2)]);
        assert_eq!(model.book_holders(b(1)), &[l(2)]);
        assert!(model.library_holds(l(2), b(1)));
        assert!(!model.library_holds(l(1), b(0)));
    }

    #[test]
    fn test_available_days_and_capacity() {
        let model = scenario_a(3);
        assert_eq!(model.available_days(l(0), 0), 2);
        assert_eq!(model.capacity(l(0), 0), 2);
        assert_eq!(model.available_days(l(1), 1), 1);
        assert_eq!(model.available_days(l(1), 2), 0);
        assert_eq!(model.available_days(l(1), 10), 0, "never negative");
        assert_eq!(model.capacity(l(1), 10), 0);
    }

    #[test]
    fn test_scenario_b_has_no_viable_library() {
        let model = scenario_a(1);
        assert!(!model.is_viable(l(0)));
        assert!(!model.is_viable(l(1)));
        assert_eq!(model.viable_libraries().count(), 0);
        assert_eq!(model.max_attainable_score(), 0);
    }

    #[test]
    fn test_reachable_books_truncate_to_day_zero_capacity() {
        let mut builder = ModelBuilder::<i64>::new(4, 1, 3);
        builder.set_book_scores([1, 2, 3, 4]);
        builder
            .set_library_signup(l(0), 2)
            .set_library_throughput(l(0), 2)
            .add_library_books(l(0), [b(0), b(1), b(2), b(3)]);
        let model = builder.build().unwrap();
        assert_eq!(model.reachable_books(l(0)), &[b(3), b(2)]);
        assert_eq!(model.max_attainable_score(), 7);
    }

    #[test]
    fn test_viability_rules() {
        let mut builder = ModelBuilder::<i64>::new(1, 4, 5);
        builder.set_book_score(b(0), 1);
        // signup too long
        builder
            .set_library_signup(l(0), 5)
            .set_library_throughput(l(0), 1)
            .add_library_book(l(0), b(0));
        // no throughput
        builder.add_library_book(l(1), b(0));
        // no books
        builder.set_library_throughput(l(2), 1);
        // fine
        builder
            .set_library_signup(l(3), 4)
            .set_library_throughput(l(3), 1)
            .add_library_book(l(3), b(0));
        let model = builder.build().unwrap();
        assert_eq!(model.viable_libraries().collect::<Vec<_>>(), vec![l(3)]);
    }

    #[test]
    fn test_build_rejects_negative_values() {
        let mut builder = ModelBuilder::<i64>::new(1, 1, -1);
        assert_eq!(
            builder.clone().build().unwrap_err(),
            MalformedInstanceError::NegativeHorizon(-1)
        );

        builder = ModelBuilder::<i64>::new(1, 1, 4);
        builder.set_book_score(b(0), -3);
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInstanceError::NegativeScore {
                book: b(0),
                score: -3
            }
        );

        let mut builder = ModelBuilder::<i64>::new(1, 1, 4);
        builder.set_library_signup(l(0), -2);
        assert!(matches!(
            builder.build(),
            Err(MalformedInstanceError::NegativeSignup { signup_days: -2, .. })
        ));

        let mut builder = ModelBuilder::<i64>::new(1, 1, 4);
        builder.set_library_throughput(l(0), -1);
        assert!(matches!(
            builder.build(),
            Err(MalformedInstanceError::NegativeThroughput {
                daily_throughput: -1,
                ..
            })
        ));
    }

    #[test]
    fn test_build_rejects_out_of_range_book() {
        let mut builder = ModelBuilder::<i64>::new(2, 1, 4);
        builder.add_library_book(l(0), b(2));
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInstanceError::BookOutOfRange {
                library: l(0),
                book: 2,
                num_books: 2
            }
        );
    }

    #[test]
    #[should_panic(expected = "called `ModelBuilder::set_library_signup` with library index out of bounds")]
    fn test_builder_panics_on_library_out_of_bounds() {
        let mut builder = ModelBuilder::<i64>::new(1, 1, 4);
        builder.set_library_signup(l(1), 1);
    }

    #[test]
    fn test_instance_data_checks_declared_counts() {
        let data = InstanceData::<i64> {
            num_books: 3,
            num_libraries: 1,
            horizon: 4,
            book_scores: vec![1, 2],
            libraries: vec![LibraryData {
                books: vec![0],
                signup_days: 1,
                daily_throughput: 1,
            }],
        };
        assert_eq!(
            data.into_model().unwrap_err(),
            MalformedInstanceError::BookCountMismatch {
                declared: 3,
                actual: 2
            }
        );

        let data = InstanceData::<i64> {
            num_books: 2,
            num_libraries: 2,
            horizon: 4,
            book_scores: vec![1, 2],
            libraries: vec![LibraryData {
                books: vec![0],
                signup_days: 1,
                daily_throughput: 1,
            }],
        };
        assert_eq!(
            Model::try_from(data).unwrap_err(),
            MalformedInstanceError::LibraryCountMismatch {
                declared: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_instance_data_builds_model() {
        let data = InstanceData::<i32> {
            num_books: 2,
            num_libraries: 1,
            horizon: 4,
            book_scores: vec![5, 6],
            libraries: vec![LibraryData {
                books: vec![0, 1],
                signup_days: 1,
                daily_throughput: 2,
            }],
        };
        let model = data.into_model().expect("instance is well formed");
        assert_eq!(model.library_books(l(0)), &[b(1), b(0)]);
        assert_eq!(model.capacity(l(0), 0), 6);
    }

    #[test]
    fn test_error_display_mentions_offender() {
        let err = MalformedInstanceError::BookOutOfRange {
            library: l(3),
            book: 9,
            num_books: 4,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("LibraryIndex(3)"), "unexpected message: {msg}");
        assert!(msg.contains('9'), "unexpected message: {msg}");
    }
}
