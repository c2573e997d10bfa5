//! Protocol error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid reply length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
