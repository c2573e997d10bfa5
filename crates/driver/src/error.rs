//! Driver error types.

use thiserror::Error;
use trackpoint_ps2_protocol::ProtocolError;

use crate::line::{Level, Line};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// A line never reached the expected level within the wait budget.
    ///
    /// Only reachable with a bounded wait strategy; the production default
    /// blocks instead.
    #[error("line {line:?} never reached {level:?} within the wait budget")]
    LineTimeout { line: Line, level: Level },

    /// An extended (nibble-encoded) command was invoked on a device
    /// configuration that does not support the extended set.
    #[error("extended command set is disabled for this device configuration")]
    ExtendedCommandsDisabled,

    /// A device reply was too short to parse.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_timeout_display() {
        let err = DriverError::LineTimeout {
            line: Line::Clock,
            level: Level::Low,
        };
        assert_eq!(
            err.to_string(),
            "line Clock never reached Low within the wait budget"
        );
    }

    #[test]
    fn test_protocol_error_converts() {
        let err: DriverError = ProtocolError::InvalidLength {
            expected: 3,
            actual: 0,
        }
        .into();
        assert!(matches!(err, DriverError::Protocol(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = DriverError::ExtendedCommandsDisabled;
        let _: &dyn std::error::Error = &err;
    }
}
