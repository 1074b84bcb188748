//! Bounded report delivery.
//!
//! The host decides when it takes a report. Instead of spinning until it
//! does, each report gets a fixed number of timed attempts and the
//! scheduler is told when they run out, so sampling keeps going while
//! the bus is stalled.

use crate::error::Error;
use crate::report::{InputReport, INPUT_REPORT_SIZE};

/// Why a single transfer attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// The host did not take the report in time.
    TimedOut,
    /// The endpoint is disabled (bus reset or deconfigured).
    Disabled,
    /// The report does not fit the endpoint.
    Overflow,
}

impl TransferError {
    /// Whether another attempt can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransferError::TimedOut)
    }
}

/// Something that can push one serialized input report to the host.
#[allow(async_fn_in_trait)]
pub trait ReportSink {
    /// Make one bounded attempt to send `bytes`.
    async fn try_send(&mut self, bytes: &[u8]) -> Result<(), TransferError>;
}

/// Serialize `report` and deliver it in at most `attempts` tries.
///
/// Timeouts are retried; any other failure ends delivery immediately.
pub async fn deliver<S: ReportSink>(
    sink: &mut S,
    report: &InputReport,
    attempts: u8,
) -> Result<(), Error> {
    let mut buf = [0u8; INPUT_REPORT_SIZE];
    let n = report.serialize(&mut buf);
    if n == 0 {
        return Err(TransferError::Overflow.into());
    }

    let mut last = TransferError::TimedOut;
    for _ in 0..attempts {
        match sink.try_send(&buf[..n]).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() => last = e,
            Err(e) => return Err(e.into()),
        }
    }
    Err(last.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Buttons;
    use embassy_futures::block_on;

    /// Fails the first `failures` attempts with `error`, then accepts.
    struct FlakySink {
        failures: usize,
        error: TransferError,
        attempts: usize,
        sent: Option<[u8; INPUT_REPORT_SIZE]>,
    }

    impl FlakySink {
        fn new(failures: usize, error: TransferError) -> Self {
            Self {
                failures,
                error,
                attempts: 0,
                sent: None,
            }
        }
    }

    impl ReportSink for FlakySink {
        async fn try_send(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
            self.attempts += 1;
            if self.attempts <= self.failures {
                return Err(self.error);
            }
            let mut sent = [0u8; INPUT_REPORT_SIZE];
            sent.copy_from_slice(bytes);
            self.sent = Some(sent);
            Ok(())
        }
    }

    #[test]
    fn delivers_on_first_attempt() {
        let mut sink = FlakySink::new(0, TransferError::TimedOut);
        let report = InputReport::with_buttons(Buttons::PLUS);
        assert_eq!(block_on(deliver(&mut sink, &report, 3)), Ok(()));
        assert_eq!(sink.attempts, 1);
        assert_eq!(sink.sent, Some(report.to_bytes()));
    }

    #[test]
    fn retries_transient_timeouts() {
        let mut sink = FlakySink::new(2, TransferError::TimedOut);
        let report = InputReport::neutral();
        assert_eq!(block_on(deliver(&mut sink, &report, 3)), Ok(()));
        assert_eq!(sink.attempts, 3);
    }

    #[test]
    fn gives_up_after_budget() {
        let mut sink = FlakySink::new(usize::MAX, TransferError::TimedOut);
        let result = block_on(deliver(&mut sink, &InputReport::neutral(), 3));
        assert_eq!(result, Err(Error::Transfer(TransferError::TimedOut)));
        assert_eq!(sink.attempts, 3);
        assert_eq!(sink.sent, None);
    }

    #[test]
    fn disabled_endpoint_is_not_retried() {
        let mut sink = FlakySink::new(usize::MAX, TransferError::Disabled);
        let result = block_on(deliver(&mut sink, &InputReport::neutral(), 3));
        assert_eq!(result, Err(Error::Transfer(TransferError::Disabled)));
        assert_eq!(sink.attempts, 1);
    }

    #[test]
    fn zero_attempts_times_out() {
        let mut sink = FlakySink::new(0, TransferError::TimedOut);
        let result = block_on(deliver(&mut sink, &InputReport::neutral(), 0));
        assert_eq!(result, Err(Error::Transfer(TransferError::TimedOut)));
        assert_eq!(sink.attempts, 0);
    }
}
