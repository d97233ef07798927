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

//! Move generation.
//!
//! A `LocalSearchOperator` proposes the next `Move` for the current plan. The
//! engine evaluates it, lets the metaheuristic decide and asks for the next
//! one. Returning `None` means the operator has nothing left to propose, which
//! the engine reports as a local optimum.
//!
//! `RandomMoveOperator` samples uniformly inside each move kind and picks the
//! kind itself by `MoveWeights`. Kinds that cannot apply to the current plan
//! (swaps on a single library, activations when every viable library is
//! already active) are excluded before sampling.

use crate::{moves::Move, plan::WorkingPlan};
use bort_core::num::SolverNumeric;
use bort_model::{index::LibraryIndex, model::Model};
use rand::Rng;

/// A stateful move generator for the local search.
pub trait LocalSearchOperator<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the operator.
    fn name(&self) -> &str;

    /// Called once before the search starts on `model`.
    fn prepare(&mut self, model: &Model<T>, plan: &WorkingPlan<T>);

    /// Proposes the next move, or `None` if no move applies to `plan`.
    fn next_move(&mut self, model: &Model<T>, plan: &WorkingPlan<T>) -> Option<Move>;
}

impl<T> std::fmt::Debug for dyn LocalSearchOperator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchOperator {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn LocalSearchOperator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchOperator: {}", self.name())
    }
}

/// Relative sampling weights of the four move kinds. A weight of zero
/// disables the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveWeights {
    pub swap: u32,
    pub relocate: u32,
    pub drop: u32,
    pub activate: u32,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            swap: 3,
            relocate: 3,
            drop: 1,
            activate: 2,
        }
    }
}

impl MoveWeights {
    #[inline]
    pub fn new(swap: u32, relocate: u32, drop: u32, activate: u32) -> Self {
        Self {
            swap,
            relocate,
            drop,
            activate,
        }
    }

    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> u64 {
        u64::from(self.swap) + u64::from(self.relocate) + u64::from(self.drop) + u64::from(self.activate)
    }
}

impl std::fmt::Display for MoveWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MoveWeights(swap: {}, relocate: {}, drop: {}, activate: {})",
            self.swap, self.relocate, self.drop, self.activate
        )
    }
}

/// Samples random moves according to `MoveWeights`.
#[derive(Debug, Clone)]
pub struct RandomMoveOperator<R> {
    weights: MoveWeights,
    rng: R,
    viable: Vec<LibraryIndex>,
}

impl<R> RandomMoveOperator<R>
where
    R: Rng,
{
    const ACTIVATION_ATTEMPTS: usize = 16;

    #[inline]
    pub fn new(weights: MoveWeights, rng: R) -> Self {
        Self {
            weights,
            rng,
            viable: Vec::new(),
        }
    }

    #[inline]
    pub fn weights(&self) -> &MoveWeights {
        &self.weights
    }

    /// Picks an inactive viable library. Rejection sampling first, then a
    /// scan from a random offset so sparse leftovers are still found.
    fn sample_inactive<T>(&mut self, plan: &WorkingPlan<T>) -> Option<LibraryIndex>
    where
        T: SolverNumeric,
    {
        if self.viable.is_empty() {
            return None;
        }
        for _ in 0..Self::ACTIVATION_ATTEMPTS {
            let library = self.viable[self.rng.random_range(0..self.viable.len())];
            if !plan.is_active(library) {
                return Some(library);
            }
        }
        let offset = self.rng.random_range(0..self.viable.len());
        (0..self.viable.len())
            .map(|i| self.viable[(offset + i) % self.viable.len()])
            .find(|&library| !plan.is_active(library))
    }
}

impl<T, R> LocalSearchOperator<T> for RandomMoveOperator<R>
where
    T: SolverNumeric,
    R: Rng,
{
    fn name(&self) -> &str {
        "RandomMoveOperator"
    }

    fn prepare(&mut self, model: &Model<T>, _plan: &WorkingPlan<T>) {
        self.viable.clear();
        self.viable.extend(model.viable_libraries());
    }

    fn next_move(&mut self, _model: &Model<T>, plan: &WorkingPlan<T>) -> Option<Move> {
        let len = plan.len();
        let can_activate = self.viable.len() > len;

        let weight = |w: u32, applicable: bool| if applicable { u64::from(w) } else { 0 };
        let swap = weight(self.weights.swap, len >= 2);
        let relocate = weight(self.weights.relocate, len >= 2);
        let drop = weight(self.weights.drop, len >= 1);
        let activate = weight(self.weights.activate, can_activate);

        let total = swap + relocate + drop + activate;
        if total == 0 {
            return None;
        }

        let mut pick = self.rng.random_range(0..total);
        if pick < swap {
            return Some(Move::Swap {
                position: self.rng.random_range(0..len - 1),
            });
        }
        pick -= swap;
        if pick < relocate {
            let from = self.rng.random_range(0..len);
            // Any target other than `from`.
            let mut to = self.rng.random_range(0..len - 1);
            if to >= from {
                to += 1;
            }
            return Some(Move::Relocate { from, to });
        }
        pick -= relocate;
        if pick < drop {
            return Some(Move::Drop {
                position: self.rng.random_range(0..len),
            });
        }
        self.sample_inactive(plan)
            .map(|library| Move::Activate { library })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_construct::greedy::GreedyConstructor;
    use bort_model::{
        index::BookIndex,
        model::ModelBuilder,
        solution::Solution,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn b(i: usize) -> BookIndex {
        BookIndex::new(i)
    }

    fn l(i: usize) -> LibraryIndex {
        LibraryIndex::new(i)
    }

    fn model() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(4, 4, 10);
        builder.set_book_scores([1, 2, 3, 4]);
        for library in 0..4 {
            builder
                .set_library_signup(l(library), 1)
                .set_library_throughput(l(library), 1)
                .add_library_book(l(library), b(library));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_empty_plan_only_activates() {
        let model = model();
        let plan = WorkingPlan::from_solution(&model, &Solution::empty());
        let mut op = RandomMoveOperator::new(MoveWeights::default(), ChaCha8Rng::seed_from_u64(1));
        LocalSearchOperator::<i64>::prepare(&mut op, &model, &plan);
        for _ in 0..50 {
            let mv = op.next_move(&model, &plan);
            assert!(matches!(mv, Some(Move::Activate { .. })), "got {:?}", mv);
        }
    }

    #[test]
    fn test_full_plan_never_activates() {
        let model = model();
        let greedy = GreedyConstructor::new().construct(&model);
        let plan = WorkingPlan::from_solution(&model, &greedy);
        assert_eq!(plan.len(), 4);

        let mut op = RandomMoveOperator::new(MoveWeights::default(), ChaCha8Rng::seed_from_u64(2));
        LocalSearchOperator::<i64>::prepare(&mut op, &model, &plan);
        for _ in 0..200 {
            match op.next_move(&model, &plan) {
                Some(Move::Swap { position }) => assert!(position + 1 < plan.len()),
                Some(Move::Relocate { from, to }) => {
                    assert_ne!(from, to);
                    assert!(from < plan.len() && to < plan.len());
                }
                Some(Move::Drop { position }) => assert!(position < plan.len()),
                other => panic!("unexpected move {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_weights_yield_no_moves() {
        let model = model();
        let plan = WorkingPlan::from_solution(&model, &Solution::empty());
        let mut op = RandomMoveOperator::new(MoveWeights::new(1, 1, 1, 0), ChaCha8Rng::seed_from_u64(3));
        LocalSearchOperator::<i64>::prepare(&mut op, &model, &plan);
        assert_eq!(op.next_move(&model, &plan), None);
    }

    #[test]
    fn test_activation_finds_last_inactive_library() {
        let model = model();
        let partial = GreedyConstructor::new().construct_with_order(&model, &[l(0), l(1), l(3)]);
        let plan = WorkingPlan::from_solution(&model, &partial);
        let mut op = RandomMoveOperator::new(MoveWeights::new(0, 0, 0, 1), ChaCha8Rng::seed_from_u64(4));
        LocalSearchOperator::<i64>::prepare(&mut op, &model, &plan);
        for _ in 0..20 {
            assert_eq!(
                op.next_move(&model, &plan),
                Some(Move::Activate { library: l(2) })
            );
        }
    }

    #[test]
    fn test_weights_display_and_total() {
        let weights = MoveWeights::new(1, 2, 3, 4);
        assert_eq!(weights.total(), 10);
        assert_eq!(
            format!("{}", weights),
            "MoveWeights(swap: 1, relocate: 2, drop: 3, activate: 4)"
        );
    }
}
