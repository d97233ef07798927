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

//! The move vocabulary of the local search.
//!
//! Moves are expressed against positions in the current activation order. A
//! move does not carry any book selections: the working plan re-plans the
//! affected suffix itself when the move is evaluated.

use bort_model::index::LibraryIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Exchange the libraries at `position` and `position + 1`.
    Swap { position: usize },
    /// Remove the library at `from` and reinsert it at `to`.
    Relocate { from: usize, to: usize },
    /// Deactivate the library at `position`.
    Drop { position: usize },
    /// Append a currently inactive library at the end of the order.
    Activate { library: LibraryIndex },
}

impl Move {
    /// Returns a short name for the move kind.
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Move::Swap { .. } => "swap",
            Move::Relocate { .. } => "relocate",
            Move::Drop { .. } => "drop",
            Move::Activate { .. } => "activate",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Swap { position } => write!(f, "Swap({}, {})", position, position + 1),
            Move::Relocate { from, to } => write!(f, "Relocate({} -> {})", from, to),
            Move::Drop { position } => write!(f, "Drop({})", position),
            Move::Activate { library } => write!(f, "Activate({})", library),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Move::Swap { position: 2 }), "Swap(2, 3)");
        assert_eq!(format!("{}", Move::Relocate { from: 4, to: 0 }), "Relocate(4 -> 0)");
        assert_eq!(format!("{}", Move::Drop { position: 1 }), "Drop(1)");
        assert_eq!(Move::Activate { library: LibraryIndex::new(3) }.kind(), "activate");
    }
}
