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

//! Hill climbing.
//!
//! Accepts a candidate whenever its score is at least the current score.
//! Ties are accepted, so the search walks across plateaus of equal score.

use crate::meta::metaheuristic::Metaheuristic;
use bort_core::num::SolverNumeric;
use bort_search::monitor::search_monitor::SearchCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HillClimbing;

impl HillClimbing {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> Metaheuristic<T> for HillClimbing
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "HillClimbing"
    }

    fn on_start(&mut self, _initial_objective: T) {}

    fn search_command(&mut self, _iteration: u64, _best_objective: T) -> SearchCommand {
        SearchCommand::Continue
    }

    #[inline]
    fn should_accept(&mut self, current: T, candidate: T, _best: T) -> bool {
        candidate >= current
    }

    fn on_accept(&mut self, _new_current: T) {}
    fn on_reject(&mut self, _rejected_candidate: T) {}
    fn on_new_best(&mut self, _new_best: T) {}
}
