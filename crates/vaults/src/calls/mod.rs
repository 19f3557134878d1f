//! Declarative read-call descriptors and their executor.
//!
//! A [`CallDef`] is configuration data, not executable code coupled to one
//! network: where to find the callable, how to encode typed arguments, how
//! to decode the raw result. One module per contract holds its descriptors
//! and the dependency-stream constructors built on them.

pub mod cat;
pub mod cdp_manager;
pub mod jug;
pub mod price;
pub mod spot;
pub mod vat;

use primitive_types::U256;
use tracing::debug;

use crate::context::{Address, ContextConnected};
use crate::errors::{CallError, Result};
use crate::transport::{CallArg, CallValue};

/// A resolved target: one method on one deployed contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Callable {
    pub address: Address,
    pub method: &'static str,
}

/// Declarative description of one read-only contract query.
///
/// Descriptors are stateless and reusable across arguments and contexts;
/// all three fields are pure functions.
pub struct CallDef<A, R> {
    /// Locate the callable for these arguments against a connected context.
    pub call: fn(&A, &ContextConnected) -> Result<Callable>,
    /// Encode typed domain arguments into the wire-level argument list.
    pub prepare_args: fn(&A) -> Vec<CallArg>,
    /// Decode the raw result into a typed value; `None` means "absent",
    /// which is distinct from both zero and failure.
    pub postprocess: fn(CallValue) -> Result<Option<R>>,
}

/// Execute one descriptor against a connected context.
///
/// Exactly one transport round trip; no caching, no retry. A transport
/// result with no value surfaces as `Ok(None)`, never as an error.
pub async fn call<A, R>(
    context: &ContextConnected,
    def: &CallDef<A, R>,
    args: &A,
) -> Result<Option<R>> {
    let callable = (def.call)(args, context)?;
    let wire_args = (def.prepare_args)(args);
    debug!(
        contract = %callable.address,
        method = callable.method,
        block = context.block_number,
        "executing read call"
    );
    let raw = context
        .transport
        .call(callable.address, callable.method, &wire_args)
        .await
        .map_err(|err| CallError::Transport {
            method: callable.method,
            reason: err.to_string(),
        })?;
    match raw {
        None => Ok(None),
        Some(value) => (def.postprocess)(value),
    }
}

pub(crate) fn malformed(method: &'static str, reason: impl Into<String>) -> CallError {
    CallError::Malformed {
        method,
        reason: reason.into(),
    }
}

pub(crate) fn decode_uint(value: CallValue, method: &'static str) -> Result<U256> {
    match value {
        CallValue::Uint(v) => Ok(v),
        other => Err(malformed(method, format!("expected uint, got {other:?}"))),
    }
}

pub(crate) fn decode_address(value: CallValue, method: &'static str) -> Result<Address> {
    match value {
        CallValue::Address(v) => Ok(v),
        other => Err(malformed(method, format!("expected address, got {other:?}"))),
    }
}

pub(crate) fn decode_bool(value: CallValue, method: &'static str) -> Result<bool> {
    match value {
        CallValue::Bool(v) => Ok(v),
        other => Err(malformed(method, format!("expected bool, got {other:?}"))),
    }
}

pub(crate) fn decode_bytes32(value: CallValue, method: &'static str) -> Result<[u8; 32]> {
    match value {
        CallValue::Bytes32(v) => Ok(v),
        other => Err(malformed(method, format!("expected bytes32, got {other:?}"))),
    }
}

pub(crate) fn decode_tuple<const N: usize>(
    value: CallValue,
    method: &'static str,
) -> Result<[CallValue; N]> {
    match value {
        CallValue::Tuple(items) => {
            let len = items.len();
            items
                .try_into()
                .map_err(|_| malformed(method, format!("expected {N}-tuple, got {len} items")))
        }
        other => Err(malformed(method, format!("expected tuple, got {other:?}"))),
    }
}

/// Encode a collateral-type identifier into its canonical 32-byte form:
/// UTF-8 bytes, zero right-padded. This happens inside argument
/// preparation and nowhere else; identifiers stay opaque strings at every
/// other boundary.
pub fn encode_ilk(ilk: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = ilk.as_bytes();
    let len = bytes.len().min(32);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Decode a canonical 32-byte identifier back into its string form.
pub fn decode_ilk(raw: [u8; 32], method: &'static str) -> Result<String> {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(32);
    std::str::from_utf8(&raw[..end])
        .map(str::to_owned)
        .map_err(|_| malformed(method, "identifier is not valid utf-8"))
}
