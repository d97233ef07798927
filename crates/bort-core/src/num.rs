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

//! # Solver Numeric Trait
//!
//! Unified integer bounds for the model and the search engines. Days,
//! throughputs and scores are all expressed in one signed integer type `T`.
//! Signedness lets the model reject negative input instead of silently
//! wrapping it, and the `Into<i64>` bound lets shared components (the atomic
//! incumbent, exact density comparisons) work in a single wide domain.
//!
//! Arithmetic on days and scores is saturating throughout: `saturating_add`
//! and `saturating_sub` come from `num_traits::Saturating` (part of
//! `PrimInt`), `saturating_mul` from `num_traits::SaturatingMul`.
//!
//! Note: `i128` is excluded by the `Into<i64>` bound.

use num_traits::{FromPrimitive, PrimInt, SaturatingMul, Signed, ToPrimitive};
use std::hash::Hash;

/// A trait alias for integer types usable as days, throughputs and scores.
/// In practice these are `i8`, `i16`, `i32` and `i64`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + ToPrimitive
    + SaturatingMul
    + Into<i64>
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + Hash
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + ToPrimitive
        + SaturatingMul
        + Into<i64>
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
        + Hash
{
}

/// Converts a nonnegative count to `usize`, clamping on overflow and mapping
/// negative values to zero.
#[inline]
pub fn to_count<T>(value: T) -> usize
where
    T: SolverNumeric,
{
    if value <= T::zero() {
        return 0;
    }
    value.to_usize().unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_solver_numeric<T: SolverNumeric>() {}

    #[test]
    fn test_signed_primitives_are_solver_numeric() {
        assert_solver_numeric::<i8>();
        assert_solver_numeric::<i16>();
        assert_solver_numeric::<i32>();
        assert_solver_numeric::<i64>();
    }

    #[test]
    fn test_to_count_clamps_negative_to_zero() {
        assert_eq!(to_count(-5i64), 0);
        assert_eq!(to_count(0i32), 0);
        assert_eq!(to_count(17i16), 17);
    }

    #[test]
    fn test_generic_saturating_arithmetic() {
        fn mul_add<T: SolverNumeric>(a: T, b: T, c: T) -> T {
            a.saturating_mul(&b).saturating_add(c)
        }
        assert_eq!(mul_add(3i64, 4, 5), 17);
        assert_eq!(mul_add(100i8, 100, 1), i8::MAX);
    }
}
