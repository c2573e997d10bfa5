//! PS/2 TrackPoint protocol core: frame decoding, parity, and command scripts.
//!
//! This crate is intentionally I/O-free. It provides pure functions and types
//! that can be tested without hardware or GPIO plumbing: the incremental
//! 11-bit frame decoder that reassembles 3-byte movement reports, the odd
//! parity and frame-shape helpers used by the transmit path, the declarative
//! command scripts the device understands, and parsers for its fixed-length
//! replies.
//!
//! The blocking line engine that clocks these bytes over the physical
//! clock/data pair lives in `trackpoint-driver`.

#![deny(static_mut_refs)]

pub mod commands;
pub mod config;
pub mod error;
pub mod frame;
pub mod report;

// Flat re-exports so callers can use `trackpoint_ps2_protocol::Foo`.
pub use commands::{
    ACK, ENABLE_REPORTING, MODE_SET_CARRIER, QuerySelector, RAM_WRITE, RAM_WRITE_SUB, RESET,
    SET_RESOLUTION, SET_SAMPLE_RATE, SET_SCALING_2_1, STATUS_REQUEST, ScriptReply, Step,
    enable_script, info_query_script, mode_set_script, parameter_nibbles, ram, ram_write_script,
    reset_script, status_request_script,
};
pub use config::{DeviceConfig, LineTiming, ResetTiming, StreamSettings};
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{MovementReport, ReportAssembler, frame_bits, odd_parity_bit};
pub use report::{
    DeviceCapabilities, DeviceIdentity, DeviceStatus, IDENTITY_SIGNATURE, ModeByte,
    ResetIdentification, SELF_TEST_PASSED,
};
