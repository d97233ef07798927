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

//! Adapter for portfolio search monitors
//!
//! `WrapperMonitor` bridges this crate's `TreeSearchMonitor` with a generic
//! `SearchMonitor` from `bort_search`. It forwards lifecycle events and the
//! stop command to the inner monitor and ignores tree-specific callbacks.
//! `name()` is `WrapperMonitor(inner.name())`.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchNode,
    stats::BnbSolverStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use bort_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

pub struct WrapperMonitor<'a, T> {
    inner: &'a mut dyn SearchMonitor<T>,
    name: String,
}

impl<'a, T> WrapperMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new(inner: &'a mut dyn SearchMonitor<T>) -> Self {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl<'a, T> std::fmt::Debug for WrapperMonitor<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperMonitor").field("name", &self.name).finish()
    }
}

impl<'a, T> TreeSearchMonitor<T> for WrapperMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_enter_search(model);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        _node: &SearchNode<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _node: &SearchNode<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_solution_found(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_search::monitor::interrupt::InterruptMonitor;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_forwards_interrupt() {
        let stop = AtomicBool::new(false);
        let mut interrupt = InterruptMonitor::<i64>::new(&stop);
        let mut wrapper = WrapperMonitor::new(&mut interrupt);
        assert_eq!(wrapper.name(), "WrapperMonitor(InterruptMonitor)");

        let stats = BnbSolverStatistics::default();
        let node = SearchNode::root(1, 0);
        assert_eq!(wrapper.search_command(&node, &stats), SearchCommand::Continue);
        stop.store(true, Ordering::Relaxed);
        assert!(matches!(
            wrapper.search_command(&node, &stats),
            SearchCommand::Terminate(_)
        ));
    }
}
