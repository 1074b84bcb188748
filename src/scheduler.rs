//! Report scheduling around a slow host.
//!
//! A report handed to the transport sits in the endpoint until the host
//! polls for it, and a stalled host can hold it for the whole retry budget.
//! While that delivery is in flight the scheduler keeps folding in one
//! sample per tick, so the debounce window stays tied to the tick period.
//! A report whose delivery failed is kept and sent again before the
//! session is asked for another one, so no pairing pulse is skipped.

use core::pin::pin;

use embassy_futures::select::{select, Either};

use crate::config::TRANSFER_ATTEMPTS;
use crate::error::Error;
use crate::input::{PortSampler, StableState};
use crate::report::InputReport;
use crate::session::Session;
use crate::transport::{self, ReportSink};

/// Something that paces the scheduler.
#[allow(async_fn_in_trait)]
pub trait TickSource {
    /// Wait for the next tick.
    async fn tick(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheduler {
    session: Session,
    pending: Option<InputReport>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Session::new())
    }
}

impl Scheduler {
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            pending: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Report left over from a failed delivery, if any.
    pub fn pending(&self) -> Option<&InputReport> {
        self.pending.as_ref()
    }

    /// Sample once with no delivery in flight.
    pub fn tick<P: PortSampler>(&mut self, sampler: &mut P) -> StableState {
        self.session.poll(sampler)
    }

    /// Deliver one report, sampling on every tick until delivery resolves.
    ///
    /// Sends the report kept from a failed delivery if there is one,
    /// otherwise the session's next report. On failure the report is kept
    /// for the next call and the error is returned.
    pub async fn serve<P, S, T, F>(
        &mut self,
        sampler: &mut P,
        sink: &mut S,
        ticks: &mut T,
        mut on_tick: F,
    ) -> Result<(), Error>
    where
        P: PortSampler,
        S: ReportSink,
        T: TickSource,
        F: FnMut(StableState),
    {
        let report = match self.pending.take() {
            Some(report) => report,
            None => self.session.next_report(),
        };

        let result = {
            let mut delivery = pin!(transport::deliver(sink, &report, TRANSFER_ATTEMPTS));
            loop {
                match select(ticks.tick(), delivery.as_mut()).await {
                    Either::First(()) => on_tick(self.session.poll(sampler)),
                    Either::Second(result) => break result,
                }
            }
        };

        if result.is_err() {
            self.pending = Some(report);
        }
        result
    }
}
