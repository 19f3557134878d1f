use async_trait::async_trait;
use primitive_types::U256;
use thiserror::Error;

use crate::context::Address;

/// A decoded wire-level value returned by a read-only contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallValue {
    Uint(U256),
    Address(Address),
    Bool(bool),
    Bytes32([u8; 32]),
    Tuple(Vec<CallValue>),
}

/// A wire-level argument to a read-only contract call. Typed domain
/// arguments are encoded into this form by a descriptor's argument
/// preparation, never earlier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallArg {
    Uint(U256),
    Address(Address),
    Bytes32([u8; 32]),
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("rpc failure: {0}")]
    Rpc(String),

    #[error("call reverted: {0}")]
    Reverted(String),
}

/// Read-only chain access, supplied by the embedding application.
///
/// Returning `Ok(None)` means the call succeeded but carried no value;
/// that is a normal outcome, not an error. Retry, backoff and caching
/// policy all live behind this trait — the core performs exactly one
/// round trip per executed call and never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        target: Address,
        method: &'static str,
        args: &[CallArg],
    ) -> std::result::Result<Option<CallValue>, TransportError>;
}
