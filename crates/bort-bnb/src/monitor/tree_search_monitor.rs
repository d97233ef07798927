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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. Callbacks track the solver lifecycle, and a
//! monitor can stop the search via `SearchCommand` (default: Continue).
//!
//! Lifecycle
//! - enter → {command → step → prune | leaf | branch}* → solution → exit
//! - `BnbSolverStatistics` is provided to every callback.
//!
//! Methods take `&mut self`; a monitor belongs to a single search thread.

use crate::{state::SearchNode, stats::BnbSolverStatistics};
use bort_core::num::SolverNumeric;
use bort_model::{index::LibraryIndex, model::Model, solution::Solution};
use bort_search::monitor::search_monitor::SearchCommand;

/// Reasons for pruning a search node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// A freshly generated child whose bound does not beat the best score.
    BoundDominated,
    /// A queued node whose bound was beaten after it was generated.
    IncumbentImproved,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::IncumbentImproved => write!(f, "IncumbentImproved"),
        }
    }
}

/// Trait for monitoring and controlling the branch-and-bound search.
pub trait TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called when the search starts, after the root bound is known.
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics<T>);

    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>);

    /// Polled before every node.
    fn search_command(
        &mut self,
        _node: &SearchNode<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called for every node taken from the open list.
    fn on_step(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>);

    /// Called when a node or a child is cut off.
    fn on_prune(
        &mut self,
        _node: &SearchNode<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    /// Called when `node` is split on `library`.
    fn on_branch(
        &mut self,
        _node: &SearchNode<T>,
        _library: LibraryIndex,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    /// Called when no library can be appended to `node`.
    fn on_leaf(&mut self, _node: &SearchNode<T>, _statistics: &BnbSolverStatistics<T>) {}

    /// Called for every improving solution, the warm start included.
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics<T>);
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
