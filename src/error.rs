//! Unified error type for the fightstick firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! The report engine itself is total; errors only come from the edges
//! (line-map configuration and the USB transport).

use crate::input::LogicalInput;
use crate::transport::TransferError;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Configuration
    /// Two logical inputs are bound to the same physical line.
    AliasedLine {
        first: LogicalInput,
        second: LogicalInput,
    },

    // USB
    /// A report could not be delivered within the retry budget.
    Transfer(TransferError),
}

// Convenience conversions

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Error::Transfer(e)
    }
}
