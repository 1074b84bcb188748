//! Report synthesis state machine.
//!
//! After power-up the pad plays a fixed pairing script: the console's
//! controller-registration screen expects L+R and then A at specific
//! report indices, regardless of what the player is holding. Once the
//! script has run, the pad stays in [`SynthPhase::Active`] and every
//! report mirrors the debounced buttons.

use super::{Buttons, Hat, InputReport};
use crate::config::{PAIRING_ACCEPT_COUNTS, PAIRING_LAST_COUNT, PAIRING_SHOULDER_COUNTS};
use crate::input::{LineMap, LogicalInput, StableState};

/// Current phase of report synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SynthPhase {
    /// Scripted pairing sequence; `sync_count` reports emitted so far.
    Pairing { sync_count: u16 },
    /// Reports follow the physical buttons.
    Active,
}

/// Maps stable input state to pad reports.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSynthesizer {
    phase: SynthPhase,
}

impl Default for ReportSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSynthesizer {
    pub const fn new() -> Self {
        Self {
            phase: SynthPhase::Pairing { sync_count: 0 },
        }
    }

    pub fn phase(&self) -> SynthPhase {
        self.phase
    }

    /// Pairing counter, 0 once the pad is active.
    pub fn sync_count(&self) -> u16 {
        match self.phase {
            SynthPhase::Pairing { sync_count } => sync_count,
            SynthPhase::Active => 0,
        }
    }

    /// Advance one step and produce the next report.
    pub fn step(&mut self, stable: &StableState, map: &LineMap) -> InputReport {
        match self.phase {
            SynthPhase::Pairing { sync_count } if sync_count > PAIRING_LAST_COUNT => {
                self.phase = SynthPhase::Active;
                #[cfg(feature = "defmt")]
                defmt::info!("Pairing script complete, following inputs");
                InputReport::neutral()
            }
            SynthPhase::Pairing { sync_count } => {
                self.phase = SynthPhase::Pairing {
                    sync_count: sync_count + 1,
                };
                InputReport::with_buttons(pairing_buttons(sync_count))
            }
            SynthPhase::Active => active_report(stable, map),
        }
    }
}

/// Buttons pulsed at a given pairing index.
fn pairing_buttons(sync_count: u16) -> Buttons {
    if PAIRING_SHOULDER_COUNTS.contains(&sync_count) {
        Buttons::L | Buttons::R
    } else if PAIRING_ACCEPT_COUNTS.contains(&sync_count) {
        Buttons::A
    } else {
        Buttons::empty()
    }
}

fn active_report(stable: &StableState, map: &LineMap) -> InputReport {
    let pressed = |input| map.is_pressed(stable, input);
    let mut report = InputReport::neutral();

    if pressed(LogicalInput::Plus) {
        report.buttons |= Buttons::PLUS;
    }
    if pressed(LogicalInput::Minus) {
        report.buttons |= Buttons::MINUS;
    }
    if pressed(LogicalInput::Left) {
        report.hat = Hat::Left;
    }
    if pressed(LogicalInput::L) {
        report.buttons |= Buttons::L;
    }
    if pressed(LogicalInput::Zr) {
        report.buttons |= Buttons::R;
    }
    if pressed(LogicalInput::A) {
        report.buttons |= Buttons::A;
    }
    report
}
