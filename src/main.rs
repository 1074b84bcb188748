//! Fightstick firmware entry point (nRF52840).
//!
//! Tasks:
//! - `usb_device_task`: runs the USB device state machine
//! - `output_task`: drains host output reports
//! - `scheduler_task`: samples and debounces the buttons every tick and,
//!   once the bus is configured, keeps one report in flight to the host
//!
//! Sampling and report synthesis share one task so each tick's debounce
//! update is complete before the next report reads the stable state.
//! A new report is only built after the previous one resolved.

#![no_std]
#![no_main]

mod sampler;
mod usb;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::config::HfclkSource;
use embassy_nrf::gpio::Pin as _;
use embassy_time::{Duration, Ticker};
use fightstick::config::{self, DEFAULT_LINE_MAP};
use fightstick::{Scheduler, Session, TickSource};
use {defmt_rtt as _, panic_probe as _};

use crate::sampler::{ActivityLine, GpioSampler};
use crate::usb::hid_device::{self, UsbDriver, UsbReportSink, OUT_BUF_SIZE};

/// Number of buttons wired on the board.
const WIRED_LINES: usize = 6;

type BoardSampler = GpioSampler<WIRED_LINES>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // USB needs the external 32 MHz crystal.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    info!("fightstick starting");

    // Board wiring (nRF52840-DK):
    //   plus  -> P0.11   minus -> P0.12   left -> P0.24
    //   L     -> P0.25   ZR    -> P0.03   A    -> P0.04
    //   activity LED -> P0.13
    let sampler = BoardSampler::new([
        (DEFAULT_LINE_MAP.plus, p.P0_11.degrade()),
        (DEFAULT_LINE_MAP.minus, p.P0_12.degrade()),
        (DEFAULT_LINE_MAP.left, p.P0_24.degrade()),
        (DEFAULT_LINE_MAP.l, p.P0_25.degrade()),
        (DEFAULT_LINE_MAP.zr, p.P0_03.degrade()),
        (DEFAULT_LINE_MAP.a, p.P0_04.degrade()),
    ]);
    let activity = ActivityLine::new(p.P0_13.degrade());

    let usb = hid_device::init(p.USBD);

    unwrap!(spawner.spawn(usb_device_task(usb.device)));
    unwrap!(spawner.spawn(output_task(usb.reader)));
    unwrap!(spawner.spawn(scheduler_task(
        sampler,
        activity,
        UsbReportSink::new(usb.writer),
    )));
}

#[embassy_executor::task]
async fn usb_device_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn output_task(
    reader: embassy_usb::class::hid::HidReader<'static, UsbDriver, OUT_BUF_SIZE>,
) -> ! {
    hid_device::drain_output_reports(reader).await
}

/// Scheduler pacing from the RTC-driven ticker.
struct BoardTicks(Ticker);

impl TickSource for BoardTicks {
    async fn tick(&mut self) {
        self.0.next().await
    }
}

#[embassy_executor::task]
async fn scheduler_task(
    mut sampler: BoardSampler,
    mut activity: ActivityLine,
    mut sink: UsbReportSink,
) -> ! {
    let mut scheduler = Scheduler::new(Session::new());
    let mut configured = false;
    let mut ticks = BoardTicks(Ticker::every(Duration::from_millis(config::TICK_PERIOD_MS)));

    info!("Scheduler started, pairing script armed");

    loop {
        ticks.tick().await;

        let stable = scheduler.tick(&mut sampler);
        activity.show(stable.any());

        if let Some(state) = hid_device::configured_signal().try_take() {
            info!("USB configured: {}", state);
            configured = state;
        }
        if !configured {
            continue;
        }

        // Ticks keep sampling while the host holds the report.
        let delivery = scheduler.serve(&mut sampler, &mut sink, &mut ticks, |stable| {
            activity.show(stable.any())
        });
        if let Err(e) = delivery.await {
            warn!("Report not delivered, retrying next tick: {}", e);
        }
    }
}
