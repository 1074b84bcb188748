//! Report echo: every fresh report is sent `1 + ECHOES` times.
//!
//! Repeating the last report smooths single-cycle flicker on the host
//! side. The cost is that only one transport cycle in three carries a
//! fresh sample.

use super::InputReport;
use crate::config::ECHOES;

/// Last emitted report and how many more times it will be repeated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoBuffer {
    last: InputReport,
    remaining: u8,
}

impl Default for EchoBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoBuffer {
    pub const fn new() -> Self {
        Self {
            last: InputReport::neutral(),
            remaining: 0,
        }
    }

    /// Return the stored report while repeats remain, otherwise call
    /// `fresh`, store its result and re-arm the repeat counter.
    pub fn next_or_else<F>(&mut self, fresh: F) -> InputReport
    where
        F: FnOnce() -> InputReport,
    {
        if self.remaining > 0 {
            self.remaining -= 1;
            return self.last;
        }
        self.last = fresh();
        self.remaining = ECHOES;
        self.last
    }

    /// Repeats still owed for the stored report.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }
}
