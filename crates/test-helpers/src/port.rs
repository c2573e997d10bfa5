//! A scripted, inspectable [`LinePort`] that stands in for the device.
//!
//! Sense results are queues: every `read` of a line pops the next scheduled
//! level, falling back to the idle level (high, open-collector released)
//! once a queue drains. The driver's wait loops consume exactly one entry
//! per poll, so a handshake is scripted as the alternating levels the wait
//! loops expect to observe. Writes, direction changes, and delays are
//! logged for inspection. Handles are cheap clones sharing one inner state,
//! so a test keeps a handle while the driver owns the port.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use trackpoint_driver::{Direction, Level, Line, LinePort};
use trackpoint_ps2_protocol::frame_bits;

#[derive(Debug, Default)]
struct Inner {
    clock_senses: VecDeque<Level>,
    data_senses: VecDeque<Level>,
    writes: Vec<(Line, Level)>,
    directions: Vec<(Line, Direction)>,
    micros_delayed: u64,
    millis_delayed: u64,
}

/// Scripted line port; see the module docs for the queue discipline.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLinePort {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedLinePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule sense results for the clock line.
    pub fn enqueue_clock(&self, levels: impl IntoIterator<Item = Level>) {
        self.inner.lock().clock_senses.extend(levels);
    }

    /// Schedule sense results for the data line.
    pub fn enqueue_data(&self, levels: impl IntoIterator<Item = Level>) {
        self.inner.lock().data_senses.extend(levels);
    }

    /// Schedule the device's side of one host-to-device byte: ten clock
    /// handshakes (eight data bits, parity, stop) followed by the
    /// line-control acknowledgment on both lines.
    pub fn enqueue_send_clocking(&self) {
        let mut inner = self.inner.lock();
        for _ in 0..10 {
            inner.clock_senses.push_back(Level::Low);
            inner.clock_senses.push_back(Level::High);
        }
        // Line-control acknowledgment: data low, clock low, clock high,
        // data high, observed in that order by the driver.
        inner.data_senses.push_back(Level::Low);
        inner.clock_senses.push_back(Level::Low);
        inner.clock_senses.push_back(Level::High);
        inner.data_senses.push_back(Level::High);
    }

    /// Schedule one complete device-to-host frame carrying `byte`: eleven
    /// clock cycles, with the data line presenting the eight data bits
    /// LSB-first during their clock-low windows.
    pub fn enqueue_device_byte(&self, byte: u8) {
        let mut inner = self.inner.lock();
        for _ in 0..11 {
            inner.clock_senses.push_back(Level::Low);
            inner.clock_senses.push_back(Level::High);
        }
        for bit in frame_bits(byte).iter().skip(1).take(8) {
            inner.data_senses.push_back(Level::from_bit(*bit));
        }
    }

    /// Schedule one full command exchange: the clocking for the host's
    /// transmitted byte, then a device reply frame carrying `ack`.
    pub fn enqueue_command_exchange(&self, ack: u8) {
        self.enqueue_send_clocking();
        self.enqueue_device_byte(ack);
    }

    /// Schedule one passively-streamed frame: each of the eleven bits is
    /// observable by exactly one poll (clock low, data at the bit value).
    pub fn enqueue_listen_frame(&self, byte: u8) {
        let mut inner = self.inner.lock();
        for bit in frame_bits(byte) {
            inner.clock_senses.push_back(Level::Low);
            inner.data_senses.push_back(Level::from_bit(bit));
        }
    }

    /// Every write driven onto any line, in order.
    pub fn writes(&self) -> Vec<(Line, Level)> {
        self.inner.lock().writes.clone()
    }

    /// Writes driven onto the data line, in order. During a host
    /// transmission this is exactly the 11-bit frame: start, data bits,
    /// parity, stop.
    pub fn data_writes(&self) -> Vec<Level> {
        self.inner
            .lock()
            .writes
            .iter()
            .filter(|(line, _)| *line == Line::Data)
            .map(|(_, level)| *level)
            .collect()
    }

    /// Reassemble the bytes the driver transmitted from the data-line write
    /// log, one byte per 11-bit frame.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.data_writes()
            .chunks(11)
            .filter(|frame| frame.len() == 11)
            .map(|frame| {
                frame
                    .iter()
                    .skip(1)
                    .take(8)
                    .enumerate()
                    .fold(0u8, |acc, (i, level)| {
                        acc | (u8::from(level.is_high()) << i)
                    })
            })
            .collect()
    }

    /// Every direction change, in order.
    pub fn directions(&self) -> Vec<(Line, Direction)> {
        self.inner.lock().directions.clone()
    }

    /// Total microseconds of `delay_us` observed.
    pub fn micros_delayed(&self) -> u64 {
        self.inner.lock().micros_delayed
    }

    /// Total milliseconds of `delay_ms` observed.
    pub fn millis_delayed(&self) -> u64 {
        self.inner.lock().millis_delayed
    }

    /// Drop the write, direction, and delay logs (queues are untouched).
    pub fn clear_logs(&self) {
        let mut inner = self.inner.lock();
        inner.writes.clear();
        inner.directions.clear();
        inner.micros_delayed = 0;
        inner.millis_delayed = 0;
    }
}

impl LinePort for ScriptedLinePort {
    fn set_direction(&mut self, line: Line, direction: Direction) {
        self.inner.lock().directions.push((line, direction));
    }

    fn write(&mut self, line: Line, level: Level) {
        self.inner.lock().writes.push((line, level));
    }

    fn read(&mut self, line: Line) -> Level {
        let mut inner = self.inner.lock();
        let queue = match line {
            Line::Clock => &mut inner.clock_senses,
            Line::Data => &mut inner.data_senses,
            // The reset line is push-pull output only; reading it senses
            // the released (high) level.
            Line::Reset => return Level::High,
        };
        queue.pop_front().unwrap_or(Level::High)
    }

    fn delay_us(&mut self, micros: u32) {
        self.inner.lock().micros_delayed += u64::from(micros);
    }

    fn delay_ms(&mut self, millis: u32) {
        self.inner.lock().millis_delayed += u64::from(millis);
    }
}
