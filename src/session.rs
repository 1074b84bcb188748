//! The pad's whole mutable state, owned by the scheduler.
//!
//! One `Session` holds the debounce history, the stable state, the
//! synthesis phase and the echo buffer. The scheduler calls
//! [`Session::sample_tick`] every tick and [`Session::next_report`]
//! whenever the transport can take a report. Both run on the same task,
//! so a tick is always fully applied before the next report reads it.
//! If sampling ever moves to an interrupt, the stable state has to be
//! published through an atomic snapshot instead.

use crate::config::DEFAULT_LINE_MAP;
use crate::error::Error;
use crate::input::debounce::DebounceFilter;
use crate::input::{LineMap, PortSampler, RawSample, StableState};
use crate::report::echo::EchoBuffer;
use crate::report::synth::{ReportSynthesizer, SynthPhase};
use crate::report::InputReport;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    map: LineMap,
    debounce: DebounceFilter,
    synth: ReportSynthesizer,
    echo: EchoBuffer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session using [`DEFAULT_LINE_MAP`].
    pub const fn new() -> Self {
        Self {
            map: DEFAULT_LINE_MAP,
            debounce: DebounceFilter::new(),
            synth: ReportSynthesizer::new(),
            echo: EchoBuffer::new(),
        }
    }

    /// Fresh session with a custom line map.
    ///
    /// Rejects maps that bind two logical inputs to the same line.
    pub fn with_line_map(map: LineMap) -> Result<Self, Error> {
        if let Some((first, second)) = map.find_alias() {
            return Err(Error::AliasedLine { first, second });
        }
        Ok(Self {
            map,
            ..Self::new()
        })
    }

    /// Fold one raw sample into the debounced state.
    pub fn sample_tick(&mut self, sample: RawSample) -> StableState {
        self.debounce.update(sample)
    }

    /// Take one sample from `sampler` and fold it in.
    pub fn poll<P: PortSampler>(&mut self, sampler: &mut P) -> StableState {
        let sample = sampler.sample();
        self.sample_tick(sample)
    }

    /// Next report for the host: an echo of the previous one, or a fresh
    /// one built from the current stable state.
    pub fn next_report(&mut self) -> InputReport {
        let Self {
            map,
            debounce,
            synth,
            echo,
        } = self;
        echo.next_or_else(|| synth.step(&debounce.stable(), map))
    }

    pub fn stable(&self) -> StableState {
        self.debounce.stable()
    }

    pub fn phase(&self) -> SynthPhase {
        self.synth.phase()
    }

    pub fn line_map(&self) -> &LineMap {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{LogicalInput, PhysicalLine};
    use crate::report::Buttons;

    #[test]
    fn starts_pairing_with_idle_state() {
        let session = Session::new();
        assert_eq!(session.phase(), SynthPhase::Pairing { sync_count: 0 });
        assert!(!session.stable().any());
    }

    #[test]
    fn aliased_map_is_rejected() {
        let map = LineMap {
            minus: DEFAULT_LINE_MAP.plus,
            ..DEFAULT_LINE_MAP
        };
        assert_eq!(
            Session::with_line_map(map),
            Err(Error::AliasedLine {
                first: LogicalInput::Plus,
                second: LogicalInput::Minus,
            })
        );
    }

    #[test]
    fn custom_map_is_used() {
        let map = LineMap {
            a: PhysicalLine::new(0, 3),
            ..DEFAULT_LINE_MAP
        };
        let session = Session::with_line_map(map).unwrap();
        assert_eq!(session.line_map().a, PhysicalLine::new(0, 3));
    }

    #[test]
    fn echoes_hold_during_pairing() {
        let mut session = Session::new();
        // Each fresh report is followed by two echoes, so pairing index n
        // is emitted on calls 3n, 3n+1 and 3n+2.
        for call in 0..(3 * 25) {
            assert!(session.next_report().is_neutral(), "call {call}");
        }
        for _ in 0..3 {
            assert_eq!(session.next_report().buttons, Buttons::L | Buttons::R);
        }
        assert_eq!(session.phase(), SynthPhase::Pairing { sync_count: 26 });
    }
}
