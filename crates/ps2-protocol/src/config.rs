//! Device configuration.
//!
//! Two hardware generations of the keyboard assembly speak this protocol
//! with different reset sequencing and command coverage. Instead of two
//! parallel drivers they are presets of one [`DeviceConfig`].

/// Microsecond-scale line timing. Part of the contract with the physical
/// device; the defaults are the values the hardware was tuned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTiming {
    /// Settle time between observing a clock edge and touching the data
    /// line, and between claiming the bus and driving the start bit.
    pub settle_us: u32,
    /// Hold time after inhibiting the bus before a host transmission starts.
    pub bus_claim_us: u32,
}

impl Default for LineTiming {
    fn default() -> Self {
        Self {
            settle_us: 15,
            bus_claim_us: 100,
        }
    }
}

/// Reset-line sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// Drive the reset line low for this long before the pulse, when set.
    pub pre_pulse_low_ms: Option<u32>,
    /// Width of the high reset pulse.
    pub pulse_ms: u32,
    /// Whether to follow the pulse with a software reset command.
    pub send_soft_reset: bool,
    /// How long the device runs its self-diagnostic after a software reset
    /// before the identification pair appears.
    pub self_test_ms: u32,
}

/// Stream-mode settings negotiated before reporting is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Resolution argument; 0x03 selects 8 counts per millimeter.
    pub resolution: u8,
    /// Samples per second; 100 is the practical stream-mode maximum.
    pub sample_rate: u8,
    /// Whether to select 2:1 scaling.
    pub scaling_2_to_1: bool,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            resolution: 0x03,
            sample_rate: 100,
            scaling_2_to_1: true,
        }
    }
}

/// Complete per-device configuration: line timing, reset sequencing, stream
/// negotiation, and whether the nibble-encoded extended command set is
/// available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub timing: LineTiming,
    pub reset: ResetTiming,
    pub stream: Option<StreamSettings>,
    pub extended_commands: bool,
}

impl DeviceConfig {
    /// The T420-generation keyboard assembly: symmetric 100 ms reset pulse,
    /// software reset with a one second self-diagnostic, full stream
    /// negotiation, extended command set.
    pub fn thinkpad_t420() -> Self {
        Self {
            timing: LineTiming::default(),
            reset: ResetTiming {
                pre_pulse_low_ms: Some(100),
                pulse_ms: 100,
                send_soft_reset: true,
                self_test_ms: 1000,
            },
            stream: Some(StreamSettings::default()),
            extended_commands: true,
        }
    }

    /// The legacy T61-generation module: one long 2.5 s reset pulse, no
    /// software reset, bare enable, no extended commands.
    pub fn legacy_t61() -> Self {
        Self {
            timing: LineTiming::default(),
            reset: ResetTiming {
                pre_pulse_low_ms: None,
                pulse_ms: 2500,
                send_soft_reset: false,
                self_test_ms: 0,
            },
            stream: None,
            extended_commands: false,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::thinkpad_t420()
    }
}
