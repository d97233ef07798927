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

//! Fans every hook out to a list of monitors. The first monitor asking to
//! terminate wins.

use crate::{
    monitor::local_search_monitor::LocalSearchMonitor, plan::WorkingPlan,
    stats::LocalSearchStatistics,
};
use bort_core::num::SolverNumeric;
use bort_model::solution::Solution;
use bort_search::monitor::search_monitor::SearchCommand;

#[derive(Default)]
pub struct CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn LocalSearchMonitor<T> + 'a>>,
}

impl<'a, T> CompositeLocalSearchMonitor<'a, T>
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
        M: LocalSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_boxed_monitor(&mut self, monitor: Box<dyn LocalSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn monitors(&self) -> &[Box<dyn LocalSearchMonitor<T> + 'a>] {
        &self.monitors
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

impl<'a, T> std::fmt::Debug for CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeLocalSearchMonitor")
            .field("monitors", &self.monitors.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> LocalSearchMonitor<T> for CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CompositeLocalSearchMonitor"
    }

    fn on_start(&mut self, plan: &WorkingPlan<T>) {
        for m in &mut self.monitors {
            m.on_start(plan);
        }
    }

    fn on_end(&mut self, best_solution: &Solution<T>, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_end(best_solution, statistics);
        }
    }

    fn on_iteration(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_iteration(plan, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_solution_found(solution, statistics);
        }
    }

    fn on_solution_accepted(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_solution_accepted(plan, statistics);
        }
    }

    fn on_solution_rejected(&mut self, plan: &WorkingPlan<T>, statistics: &LocalSearchStatistics) {
        for m in &mut self.monitors {
            m.on_solution_rejected(plan, statistics);
        }
    }

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        for m in &mut self.monitors {
            if let SearchCommand::Terminate(reason) = m.search_command(statistics) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}
