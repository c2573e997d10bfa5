//! Command bytes and declarative command scripts.
//!
//! Every exchange with the device is a fixed script of byte writes and byte
//! reads with no branching on content. Scripts are represented as [`Step`]
//! lists so the driver can execute them mechanically and new commands are a
//! table entry, not a hand-coded sequence. Acknowledgment bytes are captured
//! raw in [`ScriptReply`] and never checked; that is the device's documented
//! fire-and-forget contract, not an oversight.

use crate::config::{ResetTiming, StreamSettings};
use crate::report::ModeByte;

/// Acknowledgment byte the device returns after most command bytes.
pub const ACK: u8 = 0xFA;

/// Software reset.
pub const RESET: u8 = 0xFF;
/// Enable movement reporting (stream mode).
pub const ENABLE_REPORTING: u8 = 0xF4;
/// Set resolution; also the carrier for 2-bit parameter nibble writes.
pub const SET_RESOLUTION: u8 = 0xE8;
/// Set sample rate; also the carrier for the mode-set sequence.
pub const SET_SAMPLE_RATE: u8 = 0xF3;
/// Set 2:1 scaling.
pub const SET_SCALING_2_1: u8 = 0xE7;
/// Status/information request; replies with three bytes.
pub const STATUS_REQUEST: u8 = 0xE9;
/// First byte of the controller RAM write escape.
pub const RAM_WRITE: u8 = 0xE2;
/// Second byte of the controller RAM write escape.
pub const RAM_WRITE_SUB: u8 = 0x81;
/// Sample-rate argument that completes a mode-set sequence.
pub const MODE_SET_CARRIER: u8 = 0x14;

/// Controller RAM locations addressable through the RAM write escape.
pub mod ram {
    /// Cursor sensitivity factor.
    pub const SENSITIVITY: u8 = 0x4A;
}

/// Which information query a nibble-encoded parameter selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySelector {
    Identity,
    Modes,
    Capabilities,
    ModelId,
}

impl QuerySelector {
    /// The parameter byte encoded into the four nibble writes.
    pub fn param(self) -> u8 {
        match self {
            Self::Identity => 0x00,
            Self::Modes => 0x01,
            Self::Capabilities => 0x02,
            Self::ModelId => 0x03,
        }
    }
}

/// One step of a command script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Transmit a command byte, then consume the acknowledgment byte that
    /// follows it.
    Command(u8),
    /// Read one reply byte from the device.
    Read,
    /// Pause for the given number of milliseconds.
    Pause(u32),
}

/// Raw bytes collected while running a script: one acknowledgment per
/// [`Step::Command`] and one reply byte per [`Step::Read`], in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReply {
    pub acks: Vec<u8>,
    pub data: Vec<u8>,
}

impl ScriptReply {
    /// Opt-in acknowledgment check: true when every captured ack was
    /// [`ACK`]. The driver itself never acts on this.
    pub fn all_acknowledged(&self) -> bool {
        self.acks.iter().all(|&ack| ack == ACK)
    }
}

/// Script run after the reset line has been pulsed.
///
/// The modern variant sends a software reset, waits out the device's
/// self-diagnostic, then reads the two identification bytes; the legacy
/// variant only reads the identification pair.
pub fn reset_script(reset: &ResetTiming) -> Vec<Step> {
    if reset.send_soft_reset {
        vec![
            Step::Command(RESET),
            Step::Pause(reset.self_test_ms),
            Step::Read,
            Step::Read,
        ]
    } else {
        vec![Step::Read, Step::Read]
    }
}

/// Script that negotiates stream settings (when configured) and enables
/// movement reporting.
pub fn enable_script(stream: Option<&StreamSettings>) -> Vec<Step> {
    let mut steps = Vec::new();
    if let Some(settings) = stream {
        steps.push(Step::Command(SET_RESOLUTION));
        steps.push(Step::Command(settings.resolution));
        steps.push(Step::Command(SET_SAMPLE_RATE));
        steps.push(Step::Command(settings.sample_rate));
        if settings.scaling_2_to_1 {
            steps.push(Step::Command(SET_SCALING_2_1));
        }
    }
    steps.push(Step::Command(ENABLE_REPORTING));
    steps
}

/// Four-step RAM write: escape, sub-command, location, value, each
/// acknowledged.
pub fn ram_write_script(location: u8, value: u8) -> [Step; 4] {
    [
        Step::Command(RAM_WRITE),
        Step::Command(RAM_WRITE_SUB),
        Step::Command(location),
        Step::Command(value),
    ]
}

/// Encode a parameter byte as four 2-bit nibble writes, most significant
/// pair first, each carried by [`SET_RESOLUTION`].
pub fn parameter_nibbles(param: u8) -> [Step; 8] {
    let mut steps = [Step::Command(SET_RESOLUTION); 8];
    for pair in 0..4u8 {
        let shift = 6 - 2 * pair;
        steps[usize::from(pair) * 2 + 1] = Step::Command((param >> shift) & 0x03);
    }
    steps
}

/// Nibble-encoded information query: parameter, then [`STATUS_REQUEST`],
/// then three reply bytes.
pub fn info_query_script(selector: QuerySelector) -> Vec<Step> {
    let mut steps = parameter_nibbles(selector.param()).to_vec();
    steps.push(Step::Command(STATUS_REQUEST));
    steps.extend([Step::Read; 3]);
    steps
}

/// Nibble-encoded mode set: the mode byte as parameter, then the
/// sample-rate carrier pair. Returns nothing.
pub fn mode_set_script(mode: ModeByte) -> Vec<Step> {
    let mut steps = parameter_nibbles(mode.0).to_vec();
    steps.push(Step::Command(SET_SAMPLE_RATE));
    steps.push(Step::Command(MODE_SET_CARRIER));
    steps
}

/// Plain status request: [`STATUS_REQUEST`] followed by the three status
/// bytes.
pub fn status_request_script() -> Vec<Step> {
    vec![Step::Command(STATUS_REQUEST), Step::Read, Step::Read, Step::Read]
}
