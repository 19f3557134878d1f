use library::errors::MathError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CallError>;

/// Failure taxonomy for remote reads and derived-stream evaluation.
///
/// Absence of a value is not represented here: the executor reports it as
/// `Ok(None)` and the stream layer suppresses the emission. Everything below
/// terminates the affected stream with the cause attached; nothing in this
/// layer retries.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    /// The callable could not be resolved against the connected context.
    #[error("contract not configured: {0}")]
    UnknownContract(String),

    /// An address literal could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The remote call itself failed (network error or revert).
    #[error("transport failure calling {method}: {reason}")]
    Transport {
        method: &'static str,
        reason: String,
    },

    /// Post-processing could not interpret the raw payload.
    #[error("malformed result from {method}: {reason}")]
    Malformed {
        method: &'static str,
        reason: String,
    },

    /// A derived-metric computation failed.
    #[error("vault math failed: {0}")]
    Math(#[from] MathError),
}
