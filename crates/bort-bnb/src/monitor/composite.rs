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

//! Fans every hook out to a list of tree search monitors. The first monitor
//! asking to terminate wins.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchNode,
    stats::BnbSolverStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::{index::LibraryIndex, model::Model, solution::Solution};
use bort_search::monitor::search_monitor::SearchCommand;

pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_boxed_monitor(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> std::fmt::Debug for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTreeSearchMonitor")
            .field("monitors", &self.monitors.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_enter_search(model, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_exit_search(statistics);
        }
    }

    fn search_command(
        &mut self,
        node: &SearchNode<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        for m in &mut self.monitors {
            if let SearchCommand::Terminate(reason) = m.search_command(node, statistics) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_step(node, statistics);
        }
    }

    fn on_prune(&mut self, node: &SearchNode<T>, reason: PruneReason, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_prune(node, reason, statistics);
        }
    }

    fn on_branch(&mut self, node: &SearchNode<T>, library: LibraryIndex, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_branch(node, library, statistics);
        }
    }

    fn on_leaf(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_leaf(node, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics<T>) {
        for m in &mut self.monitors {
            m.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{no_op::NoOperationMonitor, time_limit::TimeLimitMonitor};
    use std::time::Duration;

    #[test]
    fn test_first_terminate_wins() {
        let mut composite = CompositeTreeSearchMonitor::<i64>::with_capacity(2);
        assert!(composite.is_empty());
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_boxed_monitor(Box::new(TimeLimitMonitor::new(Duration::ZERO)));
        assert_eq!(composite.len(), 2);

        let stats = BnbSolverStatistics::default();
        let node = SearchNode::root(1, 0);
        assert_eq!(
            composite.search_command(&node, &stats),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<i64>::new();
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&SearchNode::root(1, 0), &stats),
            SearchCommand::Continue
        );
        assert_eq!(
            format!("{:?}", composite),
            "CompositeTreeSearchMonitor { monitors: [] }"
        );
    }
}
