//! The device session: reset sequencing, command operations, and passive
//! report reception, composed over one line engine.

use tracing::{debug, info};
use trackpoint_ps2_protocol::{
    DeviceCapabilities, DeviceConfig, DeviceIdentity, DeviceStatus, ModeByte, MovementReport,
    QuerySelector, ReportAssembler, ResetIdentification, ScriptReply, enable_script,
    info_query_script, mode_set_script, ram, ram_write_script, reset_script,
    status_request_script,
};

use crate::engine::LineEngine;
use crate::error::{DriverError, DriverResult};
use crate::line::{BusState, LinePort, Unbounded, WaitStrategy};
use crate::script::run_script;

/// One attached pointing device: owns the line engine, the report
/// assembler, and the device configuration for the driver's lifetime.
///
/// Command operations are blocking and non-reentrant, and must not be mixed
/// with [`poll_line`](Self::poll_line) — both paths reconfigure the same two
/// lines. Only one movement report exists at a time: a new report overwrites
/// an unconsumed one, with no queueing.
#[derive(Debug)]
pub struct TrackPointSession<P, W = Unbounded> {
    engine: LineEngine<P, W>,
    assembler: ReportAssembler,
    config: DeviceConfig,
    last_reply: ScriptReply,
}

impl<P: LinePort> TrackPointSession<P, Unbounded> {
    /// Session with the production wait behavior: waits on line transitions
    /// never give up.
    pub fn new(port: P, config: DeviceConfig) -> Self {
        Self::with_wait_strategy(port, Unbounded, config)
    }
}

impl<P: LinePort, W: WaitStrategy> TrackPointSession<P, W> {
    pub fn with_wait_strategy(port: P, wait: W, config: DeviceConfig) -> Self {
        let engine = LineEngine::new(port, wait, config.timing);
        Self {
            engine,
            assembler: ReportAssembler::new(),
            config,
            last_reply: ScriptReply::default(),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn bus_state(&self) -> BusState {
        self.engine.bus_state()
    }

    /// Raw acknowledgment and reply bytes collected by the most recent
    /// command operation. Acknowledgments are never checked by the driver;
    /// callers opt in here.
    pub fn last_reply(&self) -> &ScriptReply {
        &self.last_reply
    }

    /// Hardware-reset the device and read its identification pair.
    ///
    /// The identification bytes are returned raw; whether the self-test
    /// passed is the caller's question to ask.
    pub fn reset(&mut self) -> DriverResult<ResetIdentification> {
        info!("resetting pointing device");
        self.engine.pulse_reset(&self.config.reset);
        let reply = run_script(&mut self.engine, &reset_script(&self.config.reset))?;
        self.engine.inhibit();
        let ident = ResetIdentification::parse(&reply.data)?;
        self.last_reply = reply;
        debug!(
            "reset complete: self_test {:#04X}, device id {:#04X}",
            ident.self_test, ident.device_id
        );
        Ok(ident)
    }

    /// Negotiate stream settings (when configured) and enable movement
    /// reporting, then release both lines for passive reception.
    pub fn enable_streaming(&mut self) -> DriverResult<()> {
        let reply = run_script(
            &mut self.engine,
            &enable_script(self.config.stream.as_ref()),
        )?;
        self.last_reply = reply;
        self.engine.listen();
        info!("streaming enabled, lines released for passive reception");
        Ok(())
    }

    /// The passive receive tick: call frequently enough to observe every
    /// clock-low window. A missed window silently drops a bit; the decoder
    /// realigns within one 11-bit cycle at the cost of one corrupted
    /// report.
    pub fn poll_line(&mut self) {
        if let Some(level) = self.engine.sample_bit() {
            self.assembler.push_bit(level.is_high());
        }
    }

    /// Whether a complete, unconsumed movement report is pending.
    pub fn report_ready(&self) -> bool {
        self.assembler.available()
    }

    /// Consume the pending report and clear the ready flag. With nothing
    /// pending this returns the previous (stale) report; gate on
    /// [`report_ready`](Self::report_ready).
    pub fn take_report(&mut self) -> MovementReport {
        self.assembler.take_report()
    }

    /// Write one byte into controller RAM through the four-step escape.
    pub fn write_ram_location(&mut self, location: u8, value: u8) -> DriverResult<()> {
        let reply = run_script(&mut self.engine, &ram_write_script(location, value))?;
        self.last_reply = reply;
        Ok(())
    }

    /// Set the cursor sensitivity factor (RAM location 0x4A).
    pub fn set_sensitivity_factor(&mut self, factor: u8) -> DriverResult<()> {
        self.write_ram_location(ram::SENSITIVITY, factor)
    }

    /// Identity query: version numbers and the 0x47 signature.
    pub fn identify(&mut self) -> DriverResult<DeviceIdentity> {
        let reply = self.info_query(QuerySelector::Identity)?;
        let ident = DeviceIdentity::parse(&reply.data)?;
        self.last_reply = reply;
        Ok(ident)
    }

    /// Capability query: extended capability bits.
    pub fn read_capabilities(&mut self) -> DriverResult<DeviceCapabilities> {
        let reply = self.info_query(QuerySelector::Capabilities)?;
        let caps = DeviceCapabilities::parse(&reply.data)?;
        self.last_reply = reply;
        Ok(caps)
    }

    /// Model-id query, returned as the raw three reply bytes.
    pub fn read_model_id(&mut self) -> DriverResult<[u8; 3]> {
        let reply = self.info_query(QuerySelector::ModelId)?;
        let id = match reply.data.as_slice() {
            [a, b, c, ..] => [*a, *b, *c],
            short => {
                return Err(trackpoint_ps2_protocol::ProtocolError::InvalidLength {
                    expected: 3,
                    actual: short.len(),
                }
                .into());
            }
        };
        self.last_reply = reply;
        Ok(id)
    }

    /// Modes query: the current mode byte.
    pub fn read_modes(&mut self) -> DriverResult<ModeByte> {
        let reply = self.info_query(QuerySelector::Modes)?;
        let mode = ModeByte::from_info_reply(&reply.data)?;
        self.last_reply = reply;
        Ok(mode)
    }

    /// Set the device mode byte via the nibble-encoded sequence.
    pub fn set_mode(&mut self, mode: ModeByte) -> DriverResult<()> {
        self.require_extended()?;
        let reply = run_script(&mut self.engine, &mode_set_script(mode))?;
        self.last_reply = reply;
        Ok(())
    }

    /// Plain status request: mode, button, and rate state.
    pub fn status_request(&mut self) -> DriverResult<DeviceStatus> {
        self.require_extended()?;
        let reply = run_script(&mut self.engine, &status_request_script())?;
        let status = DeviceStatus::parse(&reply.data)?;
        self.last_reply = reply;
        Ok(status)
    }

    fn info_query(&mut self, selector: QuerySelector) -> DriverResult<ScriptReply> {
        self.require_extended()?;
        run_script(&mut self.engine, &info_query_script(selector))
    }

    fn require_extended(&self) -> DriverResult<()> {
        if self.config.extended_commands {
            Ok(())
        } else {
            Err(DriverError::ExtendedCommandsDisabled)
        }
    }
}
