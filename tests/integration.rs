//! Integration tests for the fightstick host-testable logic.

use embassy_futures::{block_on, yield_now};
use fightstick::config::{DEFAULT_LINE_MAP, ECHOES, TRANSFER_ATTEMPTS};
use fightstick::transport::{ReportSink, TransferError};
use fightstick::{Buttons, Hat, PortSampler, RawSample, Scheduler, Session, SynthPhase, TickSource};

fn run_pairing(session: &mut Session) -> Vec<[u8; 8]> {
    let mut sent = Vec::new();
    while session.phase() != SynthPhase::Active {
        sent.push(session.next_report().to_bytes());
    }
    for _ in 0..ECHOES {
        sent.push(session.next_report().to_bytes());
    }
    sent
}

#[test]
fn pairing_script_on_the_wire() {
    let mut session = Session::new();
    let sent = run_pairing(&mut session);

    let shoulder = [0x30, 0x00, 0x08, 128, 128, 128, 128, 0x00];
    let accept = [0x04, 0x00, 0x08, 128, 128, 128, 128, 0x00];
    let pulses: Vec<(usize, [u8; 8])> = sent
        .iter()
        .enumerate()
        .filter(|(_, bytes)| bytes[0] != 0 || bytes[1] != 0)
        .map(|(i, bytes)| (i, *bytes))
        .collect();

    // Pairing index n is on the wire at calls 3n..3n+3.
    let expected: Vec<(usize, [u8; 8])> = [(25, shoulder), (50, shoulder), (75, accept), (100, accept)]
        .iter()
        .flat_map(|&(n, bytes)| (3 * n..3 * n + 3).map(move |i| (i, bytes)))
        .collect();
    assert_eq!(pulses, expected);
}

#[test]
fn held_buttons_after_pairing() {
    let mut session = Session::new();
    run_pairing(&mut session);

    let held = RawSample::with_lines(&[DEFAULT_LINE_MAP.plus, DEFAULT_LINE_MAP.zr, DEFAULT_LINE_MAP.left]);
    for _ in 0..4 {
        session.sample_tick(held);
    }

    let report = session.next_report();
    assert_eq!(report.buttons, Buttons::PLUS | Buttons::R);
    assert_eq!(report.hat, Hat::Left);
    assert_eq!(report.to_bytes(), [0x20, 0x02, 0x06, 128, 128, 128, 128, 0x00]);

    // Release: four idle ticks clear the lines, then the echoes drain.
    for _ in 0..4 {
        session.sample_tick(RawSample::idle());
    }
    assert_eq!(session.next_report(), report);
    assert_eq!(session.next_report(), report);
    assert!(session.next_report().is_neutral());
}

struct Idle;

impl PortSampler for Idle {
    fn sample(&mut self) -> RawSample {
        RawSample::idle()
    }
}

struct YieldTicks;

impl TickSource for YieldTicks {
    async fn tick(&mut self) {
        yield_now().await;
    }
}

/// Host that stops polling for `stall` attempts once it has taken
/// `stall_after` reports.
struct StallingHost {
    stall_after: usize,
    stall: usize,
    sent: Vec<[u8; 8]>,
}

impl ReportSink for StallingHost {
    async fn try_send(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        if self.sent.len() == self.stall_after && self.stall > 0 {
            self.stall -= 1;
            return Err(TransferError::TimedOut);
        }
        let mut sent = [0u8; 8];
        sent.copy_from_slice(bytes);
        self.sent.push(sent);
        Ok(())
    }
}

#[test]
fn stalled_host_still_sees_every_pairing_pulse() {
    let expected = run_pairing(&mut Session::new());

    // Three whole deliveries fail just as the first L+R pulse is due.
    let mut host = StallingHost {
        stall_after: 75,
        stall: 3 * TRANSFER_ATTEMPTS as usize,
        sent: Vec::new(),
    };
    let mut scheduler = Scheduler::default();
    let mut failures = 0;
    while host.sent.len() < expected.len() {
        if block_on(scheduler.serve(&mut Idle, &mut host, &mut YieldTicks, |_| {})).is_err() {
            failures += 1;
        }
    }

    assert_eq!(failures, 3);
    assert_eq!(host.sent, expected);
    let shoulder_reports = host.sent.iter().filter(|bytes| bytes[0] == 0x30).count();
    assert_eq!(shoulder_reports, 2 * (ECHOES as usize + 1));
    assert_eq!(scheduler.session().phase(), SynthPhase::Active);
}
