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

//! # Solution Validation
//!
//! Recomputes every invariant of a `Solution` from scratch against a `Model`:
//! serial signup ordering, per-library capacity, global book uniqueness and
//! the declared objective. The first violation is reported; nothing is
//! repaired.

use crate::{
    index::{BookIndex, LibraryIndex},
    model::Model,
    solution::Solution,
};
use bort_core::num::SolverNumeric;
use rustc_hash::{FxHashMap, FxHashSet};

/// The first invariant violation found in a solution.
///
/// Days and scores are widened to `i64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSolutionError {
    /// An activation references a library that does not exist.
    UnknownLibrary {
        library: LibraryIndex,
        num_libraries: usize,
    },
    /// A library is activated more than once.
    DuplicateActivation { library: LibraryIndex },
    /// The first activation does not start on day 0.
    FirstStartNotZero { library: LibraryIndex, start_day: i64 },
    /// A start day is negative.
    NegativeStartDay { library: LibraryIndex, start_day: i64 },
    /// A signup starts before the previous one has finished.
    SignupOverlap {
        previous: LibraryIndex,
        library: LibraryIndex,
        earliest_start: i64,
        start_day: i64,
    },
    /// A claimed book does not exist.
    UnknownBook {
        library: LibraryIndex,
        book: BookIndex,
        num_books: usize,
    },
    /// A library claims a book it does not hold.
    BookNotHeld {
        library: LibraryIndex,
        book: BookIndex,
    },
    /// A book is claimed twice.
    DuplicateBook {
        book: BookIndex,
        first: LibraryIndex,
        second: LibraryIndex,
    },
    /// A library claims more books than it can scan.
    CapacityExceeded {
        library: LibraryIndex,
        claimed: usize,
        capacity: usize,
    },
    /// The declared objective differs from the recomputed score.
    ObjectiveMismatch { declared: i64, actual: i64 },
}

impl std::fmt::Display for InvalidSolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLibrary {
                library,
                num_libraries,
            } => write!(
                f,
                "activation references {} but only {} libraries exist",
                library, num_libraries
            ),
            Self::DuplicateActivation { library } => {
                write!(f, "{} is activated more than once", library)
            }
            Self::FirstStartNotZero { library, start_day } => write!(
                f,
                "first activation {} starts on day {} instead of day 0",
                library, start_day
            ),
            Self::NegativeStartDay { library, start_day } => {
                write!(f, "{} starts on negative day {}", library, start_day)
            }
            Self::SignupOverlap {
                previous,
                library,
                earliest_start,
                start_day,
            } => write!(
                f,
                "{} starts on day {} but {} signs up until day {}",
                library, start_day, previous, earliest_start
            ),
            Self::UnknownBook {
                library,
                book,
                num_books,
            } => write!(
                f,
                "{} claims {} but only {} books exist",
                library, book, num_books
            ),
            Self::BookNotHeld { library, book } => {
                write!(f, "{} claims {} which it does not hold", library, book)
            }
            Self::DuplicateBook {
                book,
                first,
                second,
            } => write!(
                f,
                "{} is claimed by both {} and {}",
                book, first, second
            ),
            Self::CapacityExceeded {
                library,
                claimed,
                capacity,
            } => write!(
                f,
                "{} claims {} books but can scan only {}",
                library, claimed, capacity
            ),
            Self::ObjectiveMismatch { declared, actual } => write!(
                f,
                "declared objective {} differs from recomputed score {}",
                declared, actual
            ),
        }
    }
}

impl std::error::Error for InvalidSolutionError {}

/// Checks every structural invariant and returns the recomputed score. The
/// declared objective value is not compared.
///
/// # Errors
///
/// Returns the first `InvalidSolutionError` found, in activation order.
pub fn recompute_objective<T>(
    model: &Model<T>,
    solution: &Solution<T>,
) -> Result<T, InvalidSolutionError>
where
    T: SolverNumeric,
{
    let num_libraries = model.num_libraries();
    let num_books = model.num_books();

    let mut activated: FxHashSet<LibraryIndex> = FxHashSet::default();
    let mut claimed_by: FxHashMap<BookIndex, LibraryIndex> = FxHashMap::default();
    let mut score = T::zero();
    let mut earliest: Option<(LibraryIndex, T)> = None;

    for (position, activation) in solution.activations().iter().enumerate() {
        let library = activation.library();
        if library.get() >= num_libraries {
            return Err(InvalidSolutionError::UnknownLibrary {
                library,
                num_libraries,
            });
        }
        if !activated.insert(library) {
            return Err(InvalidSolutionError::DuplicateActivation { library });
        }

        let start_day = activation.start_day();
        if start_day < T::zero() {
            return Err(InvalidSolutionError::NegativeStartDay {
                library,
                start_day: start_day.into(),
            });
        }
        if position == 0 && start_day != T::zero() {
            return Err(InvalidSolutionError::FirstStartNotZero {
                library,
                start_day: start_day.into(),
            });
        }
        if let Some((previous, earliest_start)) = earliest
            && start_day < earliest_start
        {
            return Err(InvalidSolutionError::SignupOverlap {
                previous,
                library,
                earliest_start: earliest_start.into(),
                start_day: start_day.into(),
            });
        }
        earliest = Some((library, start_day.saturating_add(model.signup_days(library))));

        for &book in activation.books() {
            if book.get() >= num_books {
                return Err(InvalidSolutionError::UnknownBook {
                    library,
                    book,
                    num_books,
                });
            }
            if !model.library_holds(library, book) {
                return Err(InvalidSolutionError::BookNotHeld { library, book });
            }
            if let Some(&first) = claimed_by.get(&book) {
                return Err(InvalidSolutionError::DuplicateBook {
                    book,
                    first,
                    second: library,
                });
            }
            claimed_by.insert(book, library);
            score = score.saturating_add(model.book_score(book));
        }

        let capacity = model.capacity(library, start_day);
        if activation.num_books() > capacity {
            return Err(InvalidSolutionError::CapacityExceeded {
                library,
                claimed: activation.num_books(),
                capacity,
            });
        }
    }

    Ok(score)
}

/// Validates a solution against the model, including its declared objective.
///
/// Validation is pure and idempotent: it never modifies the solution.
///
/// # Errors
///
/// Returns the first `InvalidSolutionError` found.
///
/// # Examples
///
/// ```rust
/// # use bort_model::model::ModelBuilder;
/// # use bort_model::solution::{Activation, Solution};
/// # use bort_model::index::{BookIndex, LibraryIndex};
/// # use bort_model::validation::validate;
///
/// let mut builder = ModelBuilder::<i64>::new(1, 1, 3);
/// builder.set_book_score(BookIndex::new(0), 5);
/// builder.set_library_signup(LibraryIndex::new(0), 1);
/// builder.set_library_throughput(LibraryIndex::new(0), 1);
/// builder.add_library_book(LibraryIndex::new(0), BookIndex::new(0));
/// let model = builder.build().unwrap();
///
/// let good = Solution::new(5, vec![Activation::new(LibraryIndex::new(0), 0, vec![BookIndex::new(0)])]);
/// assert!(validate(&model, &good).is_ok());
///
/// let lying = Solution::new(6, good.activations().to_vec());
/// assert!(validate(&model, &lying).is_err());
/// ```
pub fn validate<T>(model: &Model<T>, solution: &Solution<T>) -> Result<(), InvalidSolutionError>
where
    T: SolverNumeric,
{
    let actual = recompute_objective(model, solution)?;
    if actual != solution.objective_value() {
        return Err(InvalidSolutionError::ObjectiveMismatch {
            declared: solution.objective_value().into(),
            actual: actual.into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ModelBuilder, solution::Activation};

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
        builder.build().unwrap()
    }

    fn scenario_c() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2, 2);
        builder.set_book_scores([5, 1]);
        builder
            .set_library_throughput(l(0), 1)
            .add_library_books(l(0), [b(0)]);
        builder
            .set_library_throughput(l(1), 1)
            .add_library_books(l(1), [b(0), b(1)]);
        builder.build().unwrap()
    }

    fn scenario_a_optimum() -> Solution<i64> {
        Solution::new(
            9,
            vec![
                Activation::new(l(0), 0, vec![b(1), b(0)]),
                Activation::new(l(1), 1, vec![b(2)]),
            ],
        )
    }

    #[test]
    fn test_scenario_a_optimum_is_valid() {
        let model = scenario_a(3);
        let sol = scenario_a_optimum();
        assert_eq!(validate(&model, &sol), Ok(()));
        assert_eq!(recompute_objective(&model, &sol), Ok(9));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let model = scenario_a(3);
        let sol = scenario_a_optimum();
        let copy = sol.clone();
        assert!(validate(&model, &sol).is_ok());
        assert!(validate(&model, &sol).is_ok());
        assert_eq!(sol, copy, "validation must not modify the solution");
    }

    #[test]
    fn test_scenario_b_rejects_any_activation() {
        let model = scenario_a(1);
        assert!(validate(&model, &Solution::empty()).is_ok());

        let sol = Solution::new(4, vec![Activation::new(l(0), 0, vec![b(1)])]);
        assert_eq!(
            validate(&model, &sol),
            Err(InvalidSolutionError::CapacityExceeded {
                library: l(0),
                claimed: 1,
                capacity: 0
            })
        );
    }

    #[test]
    fn test_scenario_c_rejects_double_counting() {
        let model = scenario_c();
        let good = Solution::new(
            6,
            vec![
                Activation::new(l(0), 0, vec![b(0)]),
                Activation::new(l(1), 0, vec![b(1)]),
            ],
        );
        assert!(validate(&model, &good).is_ok());

        let bad = Solution::new(
            11,
            vec![
                Activation::new(l(0), 0, vec![b(0)]),
                Activation::new(l(1), 0, vec![b(0), b(1)]),
            ],
        );
        assert_eq!(
            validate(&model, &bad),
            Err(InvalidSolutionError::DuplicateBook {
                book: b(0),
                first: l(0),
                second: l(1)
            })
        );
    }

    #[test]
    fn test_scenario_d_signup_beyond_horizon_has_no_capacity() {
        let mut builder = ModelBuilder::<i64>::new(1, 1, 3);
        builder.set_book_score(b(0), 100);
        builder
            .set_library_signup(l(0), 4)
            .set_library_throughput(l(0), 10)
            .add_library_book(l(0), b(0));
        let model = builder.build().unwrap();

        let sol = Solution::new(100, vec![Activation::new(l(0), 0, vec![b(0)])]);
        assert!(matches!(
            validate(&model, &sol),
            Err(InvalidSolutionError::CapacityExceeded { capacity: 0, .. })
        ));
    }

    #[test]
    fn test_signup_overlap_detected() {
        let model = scenario_a(3);
        let sol = Solution::new(
            9,
            vec![
                Activation::new(l(0), 0, vec![b(1), b(0)]),
                Activation::new(l(1), 0, vec![b(2)]),
            ],
        );
        assert_eq!(
            validate(&model, &sol),
            Err(InvalidSolutionError::SignupOverlap {
                previous: l(0),
                library: l(1),
                earliest_start: 1,
                start_day: 0
            })
        );
    }

    #[test]
    fn test_first_start_must_be_zero() {
        let model = scenario_a(5);
        let sol = Solution::new(2, vec![Activation::new(l(1), 1, vec![b(2)])]);
        assert_eq!(
            validate(&model, &sol),
            Err(InvalidSolutionError::FirstStartNotZero {
                library: l(1),
                start_day: 1
            })
        );
    }

    #[test]
    fn test_negative_start_day_detected() {
        let model = scenario_a(5);
        let sol = Solution::new(2, vec![Activation::new(l(1), -1, vec![b(2)])]);
        assert!(matches!(
            validate(&model, &sol),
            Err(InvalidSolutionError::NegativeStartDay { start_day: -1, .. })
        ));
    }

    #[test]
    fn test_gaps_between_signups_are_allowed() {
        let model = scenario_a(5);
        let sol = Solution::new(
            9,
            vec![
                Activation::new(l(0), 0, vec![b(1), b(0)]),
                Activation::new(l(1), 3, vec![b(2)]),
            ],
        );
        assert!(validate(&model, &sol).is_ok());
    }

    #[test]
    fn test_unknown_and_duplicate_libraries() {
        let model = scenario_a(3);
        let unknown = Solution::new(0, vec![Activation::new(l(5), 0, vec![])]);
        assert_eq!(
            validate(&model, &unknown),
            Err(InvalidSolutionError::UnknownLibrary {
                library: l(5),
                num_libraries: 2
            })
        );

        let twice = Solution::new(
            0,
            vec![
                Activation::new(l(0), 0, vec![]),
                Activation::new(l(0), 1, vec![]),
            ],
        );
        assert_eq!(
            validate(&model, &twice),
            Err(InvalidSolutionError::DuplicateActivation { library: l(0) })
        );
    }

    #[test]
    fn test_unknown_and_unheld_books() {
        let model = scenario_a(3);
        let unknown = Solution::new(0, vec![Activation::new(l(0), 0, vec![b(7)])]);
        assert!(matches!(
            validate(&model, &unknown),
            Err(InvalidSolutionError::UnknownBook { num_books: 3, .. })
        ));

        let unheld = Solution::new(2, vec![Activation::new(l(0), 0, vec![b(2)])]);
        assert_eq!(
            validate(&model, &unheld),
            Err(InvalidSolutionError::BookNotHeld {
                library: l(0),
                book: b(2)
            })
        );
    }

    #[test]
    fn test_objective_mismatch_reported() {
        let model = scenario_a(3);
        let sol = Solution::new(10, scenario_a_optimum().into_activations());
        assert_eq!(
            validate(&model, &sol),
            Err(InvalidSolutionError::ObjectiveMismatch {
                declared: 10,
                actual: 9
            })
        );
        assert_eq!(recompute_objective(&model, &sol), Ok(9));
    }

    #[test]
    fn test_compacted_solution_stays_valid() {
        let model = scenario_a(5);
        let sol = Solution::new(
            9,
            vec![
                Activation::new(l(0), 0, vec![b(1), b(0)]),
                Activation::new(l(1), 3, vec![b(2)]),
            ],
        );
        let compact = sol.compacted(&model);
        assert_eq!(compact.activations()[1].start_day(), 1);
        assert!(validate(&model, &compact).is_ok());
    }
}
