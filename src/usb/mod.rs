//! USB Device subsystem - presents the HID pad to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The device exposes a single HID interface using the
//! HORI Pokken Tournament Pro Pad identity and report layout:
//!
//! - IN endpoint:  8-byte pad reports, taken from the scheduler loop
//! - OUT endpoint: host output reports, drained and ignored

pub mod hid_device;
