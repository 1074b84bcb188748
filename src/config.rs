//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, and protocol constants live
//! here so they can be tuned in one place.

use crate::input::{LineMap, PhysicalLine};

// USB

/// USB VID/PID of the HORI Pokken Tournament Pro Pad.
/// The console only accepts the pad under these IDs.
pub const USB_VID: u16 = 0x0F0D;
pub const USB_PID: u16 = 0x0092;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "HORI CO.,LTD.";
pub const USB_PRODUCT: &str = "POKKEN CONTROLLER";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus power draw advertised in the configuration descriptor (mA).
pub const USB_MAX_POWER_MA: u16 = 500;

/// Interrupt endpoint size (bytes).
pub const USB_HID_EP_SIZE: u16 = 64;

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 5;

// Transport

/// How long a single IN transfer may wait for the host before it counts
/// as a failed attempt (ms).
pub const TRANSFER_TIMEOUT_MS: u64 = 10;

/// Attempts per report before the transfer is reported as failed.
pub const TRANSFER_ATTEMPTS: u8 = 3;

// Scheduler

/// Period of one sampling tick (ms).
pub const TICK_PERIOD_MS: u64 = 1;

// Input lines

/// Number of input groups sampled each tick.
pub const INPUT_GROUPS: usize = 3;

/// Lines per input group.
pub const LINES_PER_GROUP: usize = 8;

/// Total number of physical input lines.
pub const PHYSICAL_LINES: usize = INPUT_GROUPS * LINES_PER_GROUP;

/// Consecutive agreeing samples required before a stable bit changes.
pub const DEBOUNCE_DEPTH: usize = 4;

/// Reference binding of logical inputs to physical lines.
///
/// ```text
///   plus   -> group 1, bit 1
///   minus  -> group 1, bit 0
///   left   -> group 1, bit 4
///   L      -> group 2, bit 6
///   ZR     -> group 1, bit 7
///   A      -> group 1, bit 6
/// ```
pub const DEFAULT_LINE_MAP: LineMap = LineMap {
    plus: PhysicalLine::new(1, 1),
    minus: PhysicalLine::new(1, 0),
    left: PhysicalLine::new(1, 4),
    l: PhysicalLine::new(2, 6),
    zr: PhysicalLine::new(1, 7),
    a: PhysicalLine::new(1, 6),
};

const _: () = assert!(
    DEFAULT_LINE_MAP.find_alias().is_none(),
    "DEFAULT_LINE_MAP binds two inputs to one line"
);

// Report synthesis

/// Number of times a freshly synthesized report is repeated verbatim.
pub const ECHOES: u8 = 2;

/// Neutral value for every stick axis byte.
pub const STICK_CENTER: u8 = 128;

/// Pairing-phase report indices that pulse the L+R shoulder pair.
pub const PAIRING_SHOULDER_COUNTS: [u16; 2] = [25, 50];

/// Pairing-phase report indices that pulse A.
pub const PAIRING_ACCEPT_COUNTS: [u16; 2] = [75, 100];

/// The pairing phase ends on the first call whose count exceeds this.
pub const PAIRING_LAST_COUNT: u16 = 100;
