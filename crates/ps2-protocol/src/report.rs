//! Parsers for the device's fixed-length replies.
//!
//! The device answers a reset with a two-byte identification pair and the
//! nibble-encoded information queries with three-byte payloads. Layouts
//! follow the Synaptics PS/2 interfacing guide; field comments give the bit
//! positions actually consumed.

use crate::error::{ProtocolError, ProtocolResult};

/// Self-test result byte reported after a successful reset.
pub const SELF_TEST_PASSED: u8 = 0xAA;

/// Signature byte present in identity replies from compatible devices.
pub const IDENTITY_SIGNATURE: u8 = 0x47;

/// The two bytes the device emits once its power-on self-test finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetIdentification {
    pub self_test: u8,
    pub device_id: u8,
}

impl ResetIdentification {
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < 2 {
            return Err(ProtocolError::InvalidLength {
                expected: 2,
                actual: data.len(),
            });
        }
        Ok(Self {
            self_test: data[0],
            device_id: data[1],
        })
    }

    pub fn passed_self_test(&self) -> bool {
        self.self_test == SELF_TEST_PASSED
    }
}

/// Three-byte status reply.
///
/// Byte 0: bit 6 remote mode, bit 5 reporting enabled, bit 4 scaling 2:1,
/// bits 2/1/0 left/middle/right button. Byte 1: bits 1..0 resolution code.
/// Byte 2: sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    pub remote_mode: bool,
    pub reporting_enabled: bool,
    pub scaling_2_to_1: bool,
    pub left_pressed: bool,
    pub middle_pressed: bool,
    pub right_pressed: bool,
    pub resolution_code: u8,
    pub sample_rate: u8,
}

impl DeviceStatus {
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < 3 {
            return Err(ProtocolError::InvalidLength {
                expected: 3,
                actual: data.len(),
            });
        }
        Ok(Self {
            remote_mode: data[0] & 0x40 != 0,
            reporting_enabled: data[0] & 0x20 != 0,
            scaling_2_to_1: data[0] & 0x10 != 0,
            left_pressed: data[0] & 0x04 != 0,
            middle_pressed: data[0] & 0x02 != 0,
            right_pressed: data[0] & 0x01 != 0,
            resolution_code: data[1] & 0x03,
            sample_rate: data[2],
        })
    }

    /// Resolution codes 0..=3 select 1, 2, 4, or 8 counts per millimeter.
    pub fn counts_per_mm(&self) -> u8 {
        1 << self.resolution_code
    }
}

/// Three-byte capability reply.
///
/// Byte 0: bit 7 extended capabilities. Byte 2: bit 4 sleep, bit 3 four
/// buttons, bit 1 multi-finger, bit 0 palm detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub extended: bool,
    pub sleep: bool,
    pub four_buttons: bool,
    pub multi_finger: bool,
    pub palm_detect: bool,
}

impl DeviceCapabilities {
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < 3 {
            return Err(ProtocolError::InvalidLength {
                expected: 3,
                actual: data.len(),
            });
        }
        Ok(Self {
            extended: data[0] & 0x80 != 0,
            sleep: data[2] & 0x10 != 0,
            four_buttons: data[2] & 0x08 != 0,
            multi_finger: data[2] & 0x02 != 0,
            palm_detect: data[2] & 0x01 != 0,
        })
    }
}

/// Three-byte identity reply.
///
/// Byte 0: minor version. Byte 1: the 0x47 signature. Byte 2: model code in
/// the high nibble, major version in the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub info_minor: u8,
    pub signature: u8,
    pub model_code: u8,
    pub info_major: u8,
}

impl DeviceIdentity {
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < 3 {
            return Err(ProtocolError::InvalidLength {
                expected: 3,
                actual: data.len(),
            });
        }
        Ok(Self {
            info_minor: data[0],
            signature: data[1],
            model_code: (data[2] >> 4) & 0x0F,
            info_major: data[2] & 0x0F,
        })
    }

    pub fn signature_valid(&self) -> bool {
        self.signature == IDENTITY_SIGNATURE
    }
}

/// The device mode byte.
///
/// Bit 7 absolute mode, bit 6 high packet rate, bit 3 sleep, bit 2 gestures
/// disabled, bit 0 W-mode packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeByte(pub u8);

impl ModeByte {
    /// Relative mode, 40 packets per second.
    pub const RELATIVE: ModeByte = ModeByte(0x00);
    /// Relative mode with tap/drag gesture detection disabled.
    pub const RELATIVE_NO_GESTURES: ModeByte = ModeByte(0x04);
    /// Relative mode, 80 packets per second.
    pub const RELATIVE_HIGH_RATE: ModeByte = ModeByte(0x40);
    /// Absolute mode.
    pub const ABSOLUTE: ModeByte = ModeByte(0x80);
    /// Absolute mode with W packets.
    pub const ABSOLUTE_W: ModeByte = ModeByte(0x81);
    /// Absolute mode, 80 packets per second.
    pub const ABSOLUTE_HIGH_RATE: ModeByte = ModeByte(0xC0);
    /// Absolute mode with W packets, 80 packets per second.
    pub const ABSOLUTE_W_HIGH_RATE: ModeByte = ModeByte(0xC1);
    /// Low-power sleep mode.
    pub const SLEEP: ModeByte = ModeByte(0x0C);

    /// Extract the mode byte from a three-byte modes query reply (it rides
    /// in the third byte).
    pub fn from_info_reply(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < 3 {
            return Err(ProtocolError::InvalidLength {
                expected: 3,
                actual: data.len(),
            });
        }
        Ok(Self(data[2]))
    }

    pub fn absolute(self) -> bool {
        self.0 & 0x80 != 0
    }

    pub fn high_rate(self) -> bool {
        self.0 & 0x40 != 0
    }

    pub fn sleep(self) -> bool {
        self.0 & 0x08 != 0
    }

    pub fn gestures_disabled(self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn w_mode(self) -> bool {
        self.0 & 0x01 != 0
    }
}
