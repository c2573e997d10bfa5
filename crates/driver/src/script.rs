//! Mechanical execution of declarative command scripts.
//!
//! Every command exchange is fire-and-forget: acknowledgment bytes are
//! captured raw and reported back, never acted on. A warning is logged when
//! one is not the expected 0xFA so an operator can see a misbehaving device,
//! but the script always runs to completion — matching the device's
//! documented contract.

use tracing::{debug, warn};
use trackpoint_ps2_protocol::{ACK, ScriptReply, Step};

use crate::engine::LineEngine;
use crate::error::DriverResult;
use crate::line::{LinePort, WaitStrategy};

/// Run a script to completion, collecting every acknowledgment and reply
/// byte in order.
pub fn run_script<P: LinePort, W: WaitStrategy>(
    engine: &mut LineEngine<P, W>,
    steps: &[Step],
) -> DriverResult<ScriptReply> {
    let mut reply = ScriptReply::default();
    for step in steps {
        match *step {
            Step::Command(byte) => {
                engine.send_byte(byte)?;
                let ack = engine.receive_byte()?;
                debug!("command {byte:#04X} acknowledged with {ack:#04X}");
                if ack != ACK {
                    warn!("command {byte:#04X}: unexpected acknowledgment {ack:#04X}");
                }
                reply.acks.push(ack);
            }
            Step::Read => {
                let byte = engine.receive_byte()?;
                debug!("read reply byte {byte:#04X}");
                reply.data.push(byte);
            }
            Step::Pause(millis) => engine.delay_ms(millis),
        }
    }
    Ok(reply)
}


// Tests for `run_script` live in `tests/script_tests.rs`: they drive the
// engine through `trackpoint-test-helpers`, which depends on this crate, so
// they run as an integration test (linking the library build) rather than an
// in-crate unit test (a distinct `cfg(test)` build that cannot unify the
// helper's `LinePort` impl).
