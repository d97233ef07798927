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

//! Search tree nodes.
//!
//! A node commits an ordered sequence of libraries and a set of libraries
//! deferred by earlier "not next" branches. Its sequence is a complete
//! solution on its own, scored by the optimal book assignment.

use bort_core::num::SolverNumeric;
use bort_model::index::LibraryIndex;
use fixedbitset::FixedBitSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode<T> {
    sequence: Vec<LibraryIndex>,
    deferred: FixedBitSet,
    value: T,
    clock: T,
    bound: T,
}

impl<T> SearchNode<T>
where
    T: SolverNumeric,
{
    /// The empty sequence with nothing deferred.
    #[inline]
    pub(crate) fn root(num_libraries: usize, bound: T) -> Self {
        Self {
            sequence: Vec::new(),
            deferred: FixedBitSet::with_capacity(num_libraries),
            value: T::zero(),
            clock: T::zero(),
            bound,
        }
    }

    /// The child that appends `library`. The deferred set is cleared since
    /// every deferred library may follow the new one. Value and bound are
    /// inherited until the caller re-scores the child.
    #[inline]
    pub(crate) fn activate(&self, library: LibraryIndex, signup_days: T) -> Self {
        let mut sequence = Vec::with_capacity(self.sequence.len() + 1);
        sequence.extend_from_slice(&self.sequence);
        sequence.push(library);
        Self {
            sequence,
            deferred: FixedBitSet::with_capacity(self.deferred.len()),
            value: self.value,
            clock: self.clock.saturating_add(signup_days),
            bound: self.bound,
        }
    }

    /// The child in which `library` may not come next.
    #[inline]
    pub(crate) fn defer(&self, library: LibraryIndex) -> Self {
        let mut child = self.clone();
        child.deferred.insert(library.get());
        child
    }

    #[inline]
    pub(crate) fn set_value(&mut self, value: T) {
        self.value = value;
    }

    #[inline]
    pub(crate) fn set_bound(&mut self, bound: T) {
        self.bound = bound;
    }

    /// The committed libraries in activation order.
    #[inline]
    pub fn sequence(&self) -> &[LibraryIndex] {
        &self.sequence
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn deferred(&self) -> &FixedBitSet {
        &self.deferred
    }

    #[inline]
    pub fn is_committed(&self, library: LibraryIndex) -> bool {
        self.sequence.contains(&library)
    }

    #[inline]
    pub fn is_deferred(&self, library: LibraryIndex) -> bool {
        self.deferred.contains(library.get())
    }

    /// Optimal score of the committed sequence.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// First day a library appended to this node could start its signup.
    #[inline]
    pub fn clock(&self) -> T {
        self.clock
    }

    /// Upper bound on every solution in this subtree.
    #[inline]
    pub fn bound(&self) -> T {
        self.bound
    }
}

impl<T> std::fmt::Display for SearchNode<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode(depth: {}, deferred: {}, value: {}, clock: {}, bound: {})",
            self.depth(),
            self.deferred.count_ones(..),
            self.value,
            self.clock,
            self.bound
        )
    }
}
