//! Debounce and report-synthesis engine for the fightstick firmware.
//!
//! This crate holds the pure logic that turns sampled button lines into
//! pad input reports. Nothing here touches hardware, so it is tested on
//! the host.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and pulls in this library for everything except GPIO and USB.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod transport;

pub use error::Error;
pub use input::{LineMap, LogicalInput, PhysicalLine, PortSampler, RawSample, StableState};
pub use report::synth::SynthPhase;
pub use report::{Buttons, Hat, InputReport, OutputReport};
pub use scheduler::{Scheduler, TickSource};
pub use session::Session;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - full pipeline, sampler to report bytes
// ═══════════════════════════════════════════════════════════════════════════
