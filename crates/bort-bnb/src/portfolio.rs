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

use crate::{
    bnb::BnbSolver,
    monitor::{composite::CompositeTreeSearchMonitor, log::LogMonitor, wrapper::WrapperMonitor},
    stats::BnbSolverStatistics,
};
use bort_core::num::SolverNumeric;
use bort_search::portfolio::{PortfolioSolverContext, PortfolioSolverResult, PortofolioSolver};
use std::time::Duration;

/// Runs the branch-and-bound solver as a portfolio member. The portfolio
/// monitor (interrupt flag, time limit) is polled between nodes and the shared
/// incumbent tightens the pruning threshold.
#[derive(Debug, Clone)]
pub struct BnbPortfolioSolver<T>
where
    T: SolverNumeric,
{
    inner: BnbSolver<T>,
    progress_interval: Option<Duration>,
    last_statistics: Option<BnbSolverStatistics<T>>,
}

impl<T> Default for BnbPortfolioSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbPortfolioSolver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: BnbSolver::new(),
            progress_interval: None,
            last_statistics: None,
        }
    }

    /// Emits `info` progress lines at most every `interval`.
    #[inline]
    pub fn with_progress_log(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    #[inline]
    pub fn inner(&self) -> &BnbSolver<T> {
        &self.inner
    }

    /// Statistics of the most recent invocation.
    #[inline]
    pub fn last_statistics(&self) -> Option<&BnbSolverStatistics<T>> {
        self.last_statistics.as_ref()
    }
}

impl<T> PortofolioSolver<T> for BnbPortfolioSolver<T>
where
    T: SolverNumeric,
{
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, T>) -> PortfolioSolverResult<T> {
        let outcome = match self.progress_interval {
            Some(interval) => {
                let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
                monitor.add_monitor(WrapperMonitor::new(context.monitor));
                monitor.add_monitor(LogMonitor::new(interval, 0x0FFF));
                self.inner
                    .solve_with_incumbent(context.model, &mut monitor, context.incumbent)
            }
            None => {
                let mut monitor = WrapperMonitor::new(context.monitor);
                self.inner
                    .solve_with_incumbent(context.model, &mut monitor, context.incumbent)
            }
        };

        self.last_statistics = Some(outcome.statistics().clone());
        outcome.into()
    }

    fn name(&self) -> &str {
        "BnbPortfolioSolver"
    }
}
