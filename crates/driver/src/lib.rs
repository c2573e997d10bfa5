//! Blocking bit-banged line engine and session for PS/2 TrackPoint modules.
//!
//! The pointing module speaks an open-collector two-wire protocol: the
//! device owns the clock, the host owns nothing it has not explicitly
//! claimed, and every byte in either direction is an 11-bit frame clocked by
//! the device. This crate drives that exchange through two seams the
//! platform provides: a [`LinePort`] for the physical lines and a
//! [`WaitStrategy`] for the busy-waits on line transitions.
//!
//! Everything here is single-threaded and blocking by design. Command
//! traffic ([`TrackPointSession::reset`] and friends) must never be
//! interleaved with passive polling ([`TrackPointSession::poll_line`]); both
//! sides flip the direction of the same two lines. With the default
//! [`Unbounded`] wait strategy a silent device blocks the caller forever;
//! that is the documented production behavior. Inject [`Bounded`] to surface
//! [`DriverError::LineTimeout`] instead.
//!
//! Frame decoding, command scripts, and reply parsing live in
//! `trackpoint-ps2-protocol`; this crate owns the electrical handshakes.

#![deny(static_mut_refs)]

pub mod engine;
pub mod error;
pub mod line;
pub mod script;
pub mod session;

// Flat re-exports so callers can use `trackpoint_driver::Foo`.
pub use engine::LineEngine;
pub use error::{DriverError, DriverResult};
pub use line::{
    Bounded, BusState, Direction, Level, Line, LinePort, Unbounded, WaitExpired, WaitStrategy,
};
pub use script::run_script;
pub use session::TrackPointSession;
