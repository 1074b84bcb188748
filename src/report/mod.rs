//! Pad report types, wire layout, and report synthesis.
//!
//! Input report layout (8 bytes):
//! ```text
//! Byte 0-1: Button bitfield (little-endian u16)
//!           Bit 0 = Y,  Bit 1 = B,  Bit 2 = A,  Bit 3 = X,
//!           Bit 4 = L,  Bit 5 = R,  Bit 6 = ZL, Bit 7 = ZR,
//!           Bit 8 = -,  Bit 9 = +,  Bit 10 = LClick, Bit 11 = RClick,
//!           Bit 12 = Home, Bit 13 = Capture
//! Byte 2:   Hat switch (0 = up, clockwise to 7 = up-left, 8 = centered)
//! Byte 3-6: LX, LY, RX, RY (0..255, 128 = centered)
//! Byte 7:   Vendor specific (0x00)
//! ```

pub mod echo;
pub mod synth;

use bitflags::bitflags;

use crate::config::STICK_CENTER;

/// Input report size in bytes.
pub const INPUT_REPORT_SIZE: usize = 8;

/// Output report size in bytes.
pub const OUTPUT_REPORT_SIZE: usize = 8;

bitflags! {
    /// Pad button bitfield, as sent in bytes 0-1 of the input report.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const Y       = 0x0001;
        const B       = 0x0002;
        const A       = 0x0004;
        const X       = 0x0008;
        const L       = 0x0010;
        const R       = 0x0020;
        const ZL      = 0x0040;
        const ZR      = 0x0080;
        const MINUS   = 0x0100;
        const PLUS    = 0x0200;
        const LCLICK  = 0x0400;
        const RCLICK  = 0x0800;
        const HOME    = 0x1000;
        const CAPTURE = 0x2000;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Buttons {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Buttons({=u16:#06x})", self.bits())
    }
}

/// Hat switch position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Hat {
    Up = 0,
    UpRight = 1,
    Right = 2,
    DownRight = 3,
    Down = 4,
    DownLeft = 5,
    Left = 6,
    UpLeft = 7,
    #[default]
    Centered = 8,
}

/// One pad input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport {
    pub buttons: Buttons,
    pub hat: Hat,
    pub lx: u8,
    pub ly: u8,
    pub rx: u8,
    pub ry: u8,
    /// Vendor-specific trailing byte, always zero.
    pub vendor: u8,
}

impl Default for InputReport {
    fn default() -> Self {
        Self::neutral()
    }
}

impl InputReport {
    /// No buttons, hat centered, sticks centered.
    pub const fn neutral() -> Self {
        Self {
            buttons: Buttons::empty(),
            hat: Hat::Centered,
            lx: STICK_CENTER,
            ly: STICK_CENTER,
            rx: STICK_CENTER,
            ry: STICK_CENTER,
            vendor: 0,
        }
    }

    /// Neutral report with the given buttons held.
    pub const fn with_buttons(buttons: Buttons) -> Self {
        let mut report = Self::neutral();
        report.buttons = buttons;
        report
    }

    /// `true` when the report carries no input at all.
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Wire representation of the report.
    pub fn to_bytes(&self) -> [u8; INPUT_REPORT_SIZE] {
        let buttons = self.buttons.bits().to_le_bytes();
        [
            buttons[0],
            buttons[1],
            self.hat as u8,
            self.lx,
            self.ly,
            self.rx,
            self.ry,
            self.vendor,
        ]
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < INPUT_REPORT_SIZE {
            return 0;
        }
        buf[..INPUT_REPORT_SIZE].copy_from_slice(&self.to_bytes());
        INPUT_REPORT_SIZE
    }
}

/// Output report received from the host.
///
/// The host sends these, but nothing in the pad reacts to their content;
/// they are read off the endpoint only so it does not stall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputReport {
    pub bytes: [u8; OUTPUT_REPORT_SIZE],
}

impl OutputReport {
    /// Capture up to [`OUTPUT_REPORT_SIZE`] bytes; shorter payloads are
    /// zero-padded and longer ones truncated.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bytes = [0u8; OUTPUT_REPORT_SIZE];
        let n = data.len().min(OUTPUT_REPORT_SIZE);
        bytes[..n].copy_from_slice(&data[..n]);
        Self { bytes }
    }
}

// USB HID report descriptor (HORI Pokken Tournament Pro Pad layout)

/// HID Report Descriptor for the 8-byte pad report plus an 8-byte
/// vendor output report.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Buttons (16 bits) -
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x35, 0x00, //   Physical Minimum (0)
    0x45, 0x01, //   Physical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Hat switch (4 bits + 4 padding) -
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x25, 0x07, //   Logical Maximum (7)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x65, 0x14, //   Unit (Degrees)
    0x09, 0x39, //   Usage (Hat Switch)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - Sticks (4 x 8 bits) -
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x46, 0xFF, 0x00, //   Physical Maximum (255)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Vendor byte in, 8 vendor bytes out -
    0x06, 0x00, 0xFF, //   Usage Page (Vendor Defined 0xFF00)
    0x09, 0x20, //   Usage (0x20)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x0A, 0x21, 0x26, //   Usage (0x2621)
    0x95, 0x08, //   Report Count (8)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_report_bytes() {
        let report = InputReport::neutral();
        assert!(report.is_neutral());
        assert_eq!(report.to_bytes(), [0x00, 0x00, 0x08, 128, 128, 128, 128, 0x00]);
    }

    #[test]
    fn buttons_are_little_endian() {
        let report = InputReport::with_buttons(Buttons::PLUS | Buttons::A);
        let bytes = report.to_bytes();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(bytes[1], 0x02);
        assert!(!report.is_neutral());
    }

    #[test]
    fn hat_occupies_byte_two() {
        let mut report = InputReport::neutral();
        report.hat = Hat::Left;
        assert_eq!(report.to_bytes()[2], 6);
    }

    #[test]
    fn hat_wire_values() {
        assert_eq!(Hat::default(), Hat::Centered);
        assert_eq!(Hat::Up as u8, 0);
        assert_eq!(Hat::UpLeft as u8, 7);
        assert_eq!(Hat::Centered as u8, 8);
    }

    #[test]
    fn serialize_writes_eight_bytes() {
        let report = InputReport::with_buttons(Buttons::L | Buttons::R);
        let mut buf = [0xAAu8; 10];
        assert_eq!(report.serialize(&mut buf), INPUT_REPORT_SIZE);
        assert_eq!(&buf[..8], &[0x30, 0x00, 0x08, 128, 128, 128, 128, 0x00]);
        assert_eq!(&buf[8..], &[0xAA, 0xAA]);
    }

    #[test]
    fn serialize_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(InputReport::neutral().serialize(&mut buf), 0);
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn output_report_pads_and_truncates() {
        assert_eq!(OutputReport::from_bytes(&[1, 2]).bytes, [1, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            OutputReport::from_bytes(&[9; 12]).bytes,
            [9; OUTPUT_REPORT_SIZE]
        );
    }

    #[test]
    fn descriptor_is_one_collection() {
        assert_eq!(&REPORT_DESCRIPTOR[..6], &[0x05, 0x01, 0x09, 0x05, 0xA1, 0x01]);
        assert_eq!(REPORT_DESCRIPTOR.last(), Some(&0xC0));
    }
}
