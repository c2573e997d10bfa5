//! Shared test utilities for OpenTrackPoint.
//!
//! [`ScriptedLinePort`] plays the role of the pointing device: tests enqueue
//! the clock and data waveforms a real module would produce, run the driver
//! against them, and inspect what the driver drove onto the lines.

pub mod must;
pub mod port;

pub use must::{must, must_some};
pub use port::ScriptedLinePort;
