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

//! # Density Ranking
//!
//! Orders libraries by how much score they promise per day of signup.
//!
//! - The potential of a library is the sum of its best `D * throughput`
//!   book scores. The whole horizon stands in for the available days, so the
//!   estimate ignores the library's own signup.
//! - The density is `potential / signup`. Libraries without signup cost come
//!   first, ordered by raw potential.
//!
//! Densities are compared exactly by cross-multiplication in `i128`, so no
//! floating-point rounding can reorder libraries. Ties go to the lower library
//! index. Only viable libraries are ranked.

use bort_core::num::{SolverNumeric, to_count};
use bort_model::{index::LibraryIndex, model::Model};
use std::cmp::Ordering;

/// Returns the optimistic score of a library: its best books over the full
/// horizon, with every book still available.
#[inline]
pub fn library_potential<T>(model: &Model<T>, library_index: LibraryIndex) -> T
where
    T: SolverNumeric,
{
    let estimated_capacity =
        to_count(model.horizon().saturating_mul(&model.daily_throughput(library_index)));
    model.library_top_score(library_index, estimated_capacity)
}

/// Compares two libraries by density. `Ordering::Less` means `a` ranks
/// before `b`.
pub fn compare_density<T>(model: &Model<T>, a: LibraryIndex, b: LibraryIndex) -> Ordering
where
    T: SolverNumeric,
{
    let potential_a: i128 = i128::from(Into::<i64>::into(library_potential(model, a)));
    let potential_b: i128 = i128::from(Into::<i64>::into(library_potential(model, b)));
    let signup_a: i128 = i128::from(Into::<i64>::into(model.signup_days(a)));
    let signup_b: i128 = i128::from(Into::<i64>::into(model.signup_days(b)));

    let by_density = match (signup_a == 0, signup_b == 0) {
        (true, true) => potential_b.cmp(&potential_a),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // a/sa > b/sb  <=>  a*sb > b*sa
        (false, false) => (potential_b * signup_a).cmp(&(potential_a * signup_b)),
    };
    by_density.then(a.cmp(&b))
}

/// Returns all viable libraries, densest first.
///
/// # Examples
///
/// ```rust
/// # use bort_model::model::ModelBuilder;
/// # use bort_model::index::{BookIndex, LibraryIndex};
/// # use bort_construct::density::rank_libraries;
///
/// let mut builder = ModelBuilder::<i64>::new(2, 2, 10);
/// builder.set_book_scores([10, 30]);
/// builder
///     .set_library_signup(LibraryIndex::new(0), 1)
///     .set_library_throughput(LibraryIndex::new(0), 1)
///     .add_library_book(LibraryIndex::new(0), BookIndex::new(0));
/// builder
///     .set_library_signup(LibraryIndex::new(1), 2)
///     .set_library_throughput(LibraryIndex::new(1), 1)
///     .add_library_book(LibraryIndex::new(1), BookIndex::new(1));
/// let model = builder.build().unwrap();
///
/// assert_eq!(rank_libraries(&model), vec![LibraryIndex::new(1), LibraryIndex::new(0)]);
/// ```
pub fn rank_libraries<T>(model: &Model<T>) -> Vec<LibraryIndex>
where
    T: SolverNumeric,
{
    let mut order: Vec<LibraryIndex> = model.viable_libraries().collect();
    order.sort_by(|&a, &b| compare_density(model, a, b));
    order
}
