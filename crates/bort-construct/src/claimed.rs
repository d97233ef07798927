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

//! Claimed-book bookkeeping.
//!
//! `ClaimedBooks` records which books are already taken by some activation of
//! the solution under construction. It is owned by one solution or trial and
//! never shared between threads.

use bort_model::index::BookIndex;
use fixedbitset::FixedBitSet;

/// A bitset over all books of a model. A set bit means "already claimed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedBooks {
    claimed: FixedBitSet,
}

impl ClaimedBooks {
    /// Creates an empty set for `num_books` books.
    #[inline]
    pub fn new(num_books: usize) -> Self {
        Self {
            claimed: FixedBitSet::with_capacity(num_books),
        }
    }

    /// Returns the number of books this set can track.
    #[inline]
    pub fn num_books(&self) -> usize {
        self.claimed.len()
    }

    /// Returns the number of claimed books.
    #[inline]
    pub fn count(&self) -> usize {
        self.claimed.count_ones(..)
    }

    /// Returns `true` if the book is claimed.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `book_index` is out of bounds.
    #[inline]
    pub fn contains(&self, book_index: BookIndex) -> bool {
        let index = book_index.get();
        debug_assert!(
            index < self.claimed.len(),
            "called `ClaimedBooks::contains` with book index out of bounds: the len is {} but the index is {}",
            self.claimed.len(),
            index
        );

        self.claimed.contains(index)
    }

    /// Marks a book as claimed.
    #[inline]
    pub fn claim(&mut self, book_index: BookIndex) {
        let index = book_index.get();
        debug_assert!(
            index < self.claimed.len(),
            "called `ClaimedBooks::claim` with book index out of bounds: the len is {} but the index is {}",
            self.claimed.len(),
            index
        );

        self.claimed.insert(index);
    }

    /// Marks all given books as claimed.
    #[inline]
    pub fn claim_all<'b, I>(&mut self, books: I)
    where
        I: IntoIterator<Item = &'b BookIndex>,
    {
        for book in books {
            self.claim(*book);
        }
    }

    /// Releases a book.
    #[inline]
    pub fn release(&mut self, book_index: BookIndex) {
        self.claimed.set(book_index.get(), false);
    }

    /// Releases every book and resizes the set to `num_books`.
    #[inline]
    pub fn reset(&mut self, num_books: usize) {
        if self.claimed.len() == num_books {
            self.claimed.clear();
        } else {
            self.claimed = FixedBitSet::with_capacity(num_books);
        }
    }
}
