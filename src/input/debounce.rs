//! Unanimity debounce with hysteresis.
//!
//! Each group keeps a 32-bit shift register holding its last four raw
//! bytes, newest in the low byte. For every line the four history bits are
//! tested together: all set drives the stable bit high, all clear drives it
//! low, and any disagreement leaves it where it was. A single noisy sample
//! therefore never changes the stable state, at the cost of up to four
//! ticks of latency on a genuine edge.

use super::{RawSample, StableState};
use crate::config::{DEBOUNCE_DEPTH, INPUT_GROUPS, LINES_PER_GROUP};

const _: () = assert!(DEBOUNCE_DEPTH * LINES_PER_GROUP <= u32::BITS as usize);

/// Bit 0 of every history byte: `0x0101_0101` for a depth of four.
const WINDOW_MASK: u32 = {
    let mut mask = 0u32;
    let mut slot = 0;
    while slot < DEBOUNCE_DEPTH {
        mask |= 1 << (slot * LINES_PER_GROUP);
        slot += 1;
    }
    mask
};

/// Only the bytes that belong to the window survive a shift.
const HISTORY_MASK: u32 = WINDOW_MASK * 0xFF;

/// Per-line sample history and the stable state derived from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceFilter {
    history: [u32; INPUT_GROUPS],
    stable: StableState,
}

impl DebounceFilter {
    /// All histories and stable bits start low.
    pub const fn new() -> Self {
        Self {
            history: [0; INPUT_GROUPS],
            stable: StableState::new(),
        }
    }

    /// Fold one raw sample into the history and return the updated
    /// stable state.
    pub fn update(&mut self, sample: RawSample) -> StableState {
        for (group, (history, raw)) in self
            .history
            .iter_mut()
            .zip(sample.groups.iter())
            .enumerate()
        {
            *history = ((*history << LINES_PER_GROUP) | u32::from(*raw)) & HISTORY_MASK;

            for bit in 0..LINES_PER_GROUP {
                let window = WINDOW_MASK << bit;
                let index = (group * LINES_PER_GROUP + bit) as u32;
                match *history & window {
                    w if w == window => self.stable.set_line(index, true),
                    0 => self.stable.set_line(index, false),
                    _ => {}
                }
            }
        }
        self.stable
    }

    /// Current stable state.
    pub fn stable(&self) -> StableState {
        self.stable
    }
}
