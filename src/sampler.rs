//! GPIO port sampling and the activity line.
//!
//! Buttons are active-low with the internal pull-up enabled, so a pressed
//! button reads low and is reported as an active (1) line in the raw
//! sample. Lines without a pin wired always read inactive.

use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pull};
use fightstick::{PhysicalLine, PortSampler, RawSample};

/// Samples a fixed set of wired buttons into one [`RawSample`] per tick.
pub struct GpioSampler<const N: usize> {
    lines: [(PhysicalLine, Input<'static>); N],
}

impl<const N: usize> GpioSampler<N> {
    /// Configure every wired pin as a pulled-up input.
    pub fn new(wiring: [(PhysicalLine, AnyPin); N]) -> Self {
        let lines = wiring.map(|(line, pin)| (line, Input::new(pin, Pull::Up)));
        info!("GPIO sampler: {} lines wired", N);
        Self { lines }
    }
}

impl<const N: usize> PortSampler for GpioSampler<N> {
    fn sample(&mut self) -> RawSample {
        let mut sample = RawSample::idle();
        for (line, pin) in &self.lines {
            sample.set(*line, pin.is_low());
        }
        sample
    }
}

/// Status output that is lit while any debounced line is active.
///
/// The LED sinks current, so "lit" drives the pin low.
pub struct ActivityLine {
    pin: Output<'static>,
    lit: bool,
}

impl ActivityLine {
    pub fn new(pin: AnyPin) -> Self {
        Self {
            pin: Output::new(pin, Level::High, OutputDrive::Standard),
            lit: false,
        }
    }

    pub fn show(&mut self, active: bool) {
        if active == self.lit {
            return;
        }
        self.lit = active;
        self.pin.set_level(if active { Level::Low } else { Level::High });
    }
}
