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

//! Cooperative cancellation through a shared flag.
//!
//! The portfolio raises the flag when one member proves optimality. Callers
//! may raise it too, e.g. from a signal handler.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use bort_core::num::SolverNumeric;
use bort_model::{model::Model, solution::Solution};
use std::{
    borrow::Cow,
    sync::atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    stop_flag: &'a AtomicBool,
    reason: Cow<'static, str>,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    const DEFAULT_REASON: &'static str = "Interrupt signal received";

    /// Terminates the search once `stop_flag` is `true`.
    #[inline(always)]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self::with_reason(stop_flag, Self::DEFAULT_REASON)
    }

    /// Like `new`, reporting `reason` as the termination message.
    #[inline(always)]
    pub fn with_reason<R>(stop_flag: &'a AtomicBool, reason: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self {
            stop_flag,
            reason: reason.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline(always)]
    pub fn is_raised(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl<'a, T> SearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_solution_found(&mut self, _solution: &Solution<T>) {}
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        match self.is_raised() {
            true => SearchCommand::Terminate(self.reason.to_string()),
            false => SearchCommand::Continue,
        }
    }
}
