//! The byte transceiver: electrical handshakes for one byte in either
//! direction.
//!
//! The device owns the clock in both directions. To transmit, the host
//! inhibits the bus (clock held low), drives the start bit, hands the clock
//! back, and then services the device's clock: every bit follows the same
//! wait-low, settle, drive, wait-high handshake, because the device samples
//! the data line while it holds the clock low. To receive, the host releases
//! both lines and samples the data line on each clock-low window. Neither
//! path validates parity or stop bits, and neither has a malformed-frame
//! signal — a frame either completes or the engine blocks on a transition
//! that never comes.

use tracing::trace;
use trackpoint_ps2_protocol::{LineTiming, ResetTiming, odd_parity_bit};

use crate::error::{DriverError, DriverResult};
use crate::line::{BusState, Direction, Level, Line, LinePort, WaitStrategy};

/// Bit-level engine over a [`LinePort`], tracking which side owns the bus.
#[derive(Debug)]
pub struct LineEngine<P, W> {
    port: P,
    wait: W,
    timing: LineTiming,
    state: BusState,
}

impl<P: LinePort, W: WaitStrategy> LineEngine<P, W> {
    /// The engine starts logically idle; no line is touched until the first
    /// operation.
    pub fn new(port: P, wait: W, timing: LineTiming) -> Self {
        Self {
            port,
            wait,
            timing,
            state: BusState::Idle,
        }
    }

    /// Current bus ownership phase.
    pub fn bus_state(&self) -> BusState {
        self.state
    }

    /// Claim the bus: clock driven low stalls the device from transmitting.
    pub fn inhibit(&mut self) {
        self.port.set_direction(Line::Clock, Direction::Output);
        self.port.write(Line::Clock, Level::Low);
        self.state = BusState::Idle;
    }

    /// Release both lines for passive reception.
    pub fn listen(&mut self) {
        self.port.set_direction(Line::Clock, Direction::Input);
        self.port.set_direction(Line::Data, Direction::Input);
        self.state = BusState::Listening;
    }

    /// One passive tick: while the device holds the clock low, sample the
    /// data line. Returns `None` outside a clock-low window.
    pub fn sample_bit(&mut self) -> Option<Level> {
        if self.port.read(Line::Clock) == Level::High {
            return None;
        }
        Some(self.port.read(Line::Data))
    }

    /// Pulse the reset line per the configured sequencing.
    pub fn pulse_reset(&mut self, reset: &ResetTiming) {
        self.port.set_direction(Line::Reset, Direction::Output);
        if let Some(low_ms) = reset.pre_pulse_low_ms {
            self.port.write(Line::Reset, Level::Low);
            self.port.delay_ms(low_ms);
        }
        self.port.write(Line::Reset, Level::High);
        self.port.delay_ms(reset.pulse_ms);
        self.port.write(Line::Reset, Level::Low);
    }

    /// Host-to-device transmission of one byte.
    ///
    /// Completion means the device executed its line-control acknowledgment
    /// (data low, clock low, clock high, data high, in that order); whether
    /// the device also answers with an acknowledgment *byte* is a protocol
    /// question the caller settles with [`receive_byte`](Self::receive_byte).
    pub fn send_byte(&mut self, byte: u8) -> DriverResult<()> {
        trace!("send_byte {byte:#04X}");
        self.inhibit();
        self.port.delay_us(self.timing.bus_claim_us);

        // Start bit, driven before the clock is handed back to the device.
        self.port.set_direction(Line::Data, Direction::Output);
        self.port.write(Line::Data, Level::Low);
        self.port.delay_us(self.timing.settle_us);
        self.port.set_direction(Line::Clock, Direction::Input);
        self.state = BusState::HostTransmit;

        for i in 0..8 {
            self.clock_out_bit(Level::from_bit(byte & (1 << i) != 0))?;
        }
        self.clock_out_bit(Level::from_bit(odd_parity_bit(byte)))?;
        self.clock_out_bit(Level::High)?;

        // Line-control acknowledgment.
        self.port.set_direction(Line::Data, Direction::Input);
        self.wait_for(Line::Data, Level::Low)?;
        self.wait_for(Line::Clock, Level::Low)?;
        self.wait_for(Line::Clock, Level::High)?;
        self.wait_for(Line::Data, Level::High)?;

        self.inhibit();
        Ok(())
    }

    /// Device-to-host reception of one byte, device-clocked.
    ///
    /// The start bit's value is ignored, parity and stop are consumed
    /// without validation; there is no malformed-frame signal.
    pub fn receive_byte(&mut self) -> DriverResult<u8> {
        self.port.set_direction(Line::Data, Direction::Input);
        self.port.set_direction(Line::Clock, Direction::Input);
        self.state = BusState::DeviceReply;

        // Start bit.
        self.wait_for(Line::Clock, Level::Low)?;
        self.wait_for(Line::Clock, Level::High)?;

        let mut byte = 0u8;
        for i in 0..8 {
            self.wait_for(Line::Clock, Level::Low)?;
            self.port.delay_us(self.timing.settle_us);
            if self.port.read(Line::Data).is_high() {
                byte |= 1 << i;
            }
            self.wait_for(Line::Clock, Level::High)?;
        }

        // Parity, then stop.
        self.wait_for(Line::Clock, Level::Low)?;
        self.wait_for(Line::Clock, Level::High)?;
        self.wait_for(Line::Clock, Level::Low)?;
        self.wait_for(Line::Clock, Level::High)?;

        self.inhibit();
        trace!("receive_byte {byte:#04X}");
        Ok(byte)
    }

    /// Pause between script steps.
    pub fn delay_ms(&mut self, millis: u32) {
        self.port.delay_ms(millis);
    }

    fn clock_out_bit(&mut self, level: Level) -> DriverResult<()> {
        self.wait_for(Line::Clock, Level::Low)?;
        self.port.delay_us(self.timing.settle_us);
        self.port.write(Line::Data, level);
        self.wait_for(Line::Clock, Level::High)
    }

    fn wait_for(&mut self, line: Line, level: Level) -> DriverResult<()> {
        let port = &mut self.port;
        self.wait
            .wait_until(&mut || port.read(line) == level)
            .map_err(|_| DriverError::LineTimeout { line, level })
    }
}


// Tests for the engine live in `tests/engine_tests.rs`: they drive it through
// `trackpoint-test-helpers`, which depends on this crate, so they run as an
// integration test (linking the library build) rather than in-crate unit
// tests (a distinct `cfg(test)` build that cannot unify the helper's
// `LinePort` impl).
