//! USB HID pad device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one HID interface with an IN endpoint for pad
//! reports and an OUT endpoint for the host's output reports.

use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReadError, State,
};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use fightstick::config;
use fightstick::report::{OutputReport, INPUT_REPORT_SIZE, REPORT_DESCRIPTOR};
use fightstick::transport::{ReportSink, TransferError};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

/// Concrete USB driver type for the nRF52840.
pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// OUT reads are sized to a full interrupt packet.
pub const OUT_BUF_SIZE: usize = config::USB_HID_EP_SIZE as usize;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();
static USB_CONFIGURED_SIGNAL: Signal<CriticalSectionRawMutex, bool> = Signal::new();

struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED_SIGNAL.signal(configured);
    }
}

/// USB configuration signal.
///
/// Emits `true` when the host selects our configuration and `false` when
/// it is dropped (reset, unplug, or deconfigure).
pub fn configured_signal() -> &'static Signal<CriticalSectionRawMutex, bool> {
    &USB_CONFIGURED_SIGNAL
}

/// Build result containing the USB device runner and the HID endpoints.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: HidReader<'static, UsbDriver, OUT_BUF_SIZE>,
    pub writer: HidWriter<'static, UsbDriver, INPUT_REPORT_SIZE>,
}

/// Initialise the USB stack and create the HID pad device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let handler = USB_STATE_HANDLER.init(UsbStateHandler);
    builder.handler(handler);

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: config::USB_HID_EP_SIZE,
    };
    let hid = HidReaderWriter::<_, OUT_BUF_SIZE, INPUT_REPORT_SIZE>::new(
        &mut builder,
        hid_state,
        hid_config,
    );
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID pad initialised ({=u16:04x}:{=u16:04x})", config::USB_VID, config::USB_PID);

    UsbHidDevice {
        device,
        reader,
        writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Read and discard every output report the host sends.
///
/// Nothing in the pad reacts to them, but an unread OUT endpoint NAKs
/// the host and can stall its report stream.
pub async fn drain_output_reports(mut reader: HidReader<'static, UsbDriver, OUT_BUF_SIZE>) -> ! {
    let mut buf = [0u8; OUT_BUF_SIZE];

    loop {
        reader.ready().await;
        match reader.read(&mut buf).await {
            Ok(n) => {
                let report = OutputReport::from_bytes(&buf[..n]);
                debug!("Output report ignored: {=[u8]:02x}", &report.bytes[..]);
            }
            Err(ReadError::Disabled) => {}
            Err(_) => warn!("USB output report read failed"),
        }
    }
}

/// IN endpoint writer with a per-attempt timeout.
pub struct UsbReportSink {
    writer: HidWriter<'static, UsbDriver, INPUT_REPORT_SIZE>,
}

impl UsbReportSink {
    pub fn new(writer: HidWriter<'static, UsbDriver, INPUT_REPORT_SIZE>) -> Self {
        Self { writer }
    }
}

impl ReportSink for UsbReportSink {
    async fn try_send(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        let timeout = Timer::after(Duration::from_millis(config::TRANSFER_TIMEOUT_MS));
        match select(self.writer.write(bytes), timeout).await {
            Either::First(Ok(())) => Ok(()),
            Either::First(Err(EndpointError::Disabled)) => Err(TransferError::Disabled),
            Either::First(Err(EndpointError::BufferOverflow)) => Err(TransferError::Overflow),
            Either::Second(()) => Err(TransferError::TimedOut),
        }
    }
}
