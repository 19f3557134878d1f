//! Live derived state for collateralized-debt positions.
//!
//! This crate is the computation layer between a chain transport and a
//! presentation layer: it turns independently-arriving on-chain readings
//! (locked collateral, normalized debt, risk parameters, price) into a
//! continuously-updating [`vault::Vault`] snapshot stream per position.
//!
//! Reads are described by declarative [`calls::CallDef`] descriptors and
//! composed with the `observable` combinators; the connected context is an
//! explicit argument everywhere, and every derived value is a pure function
//! of its inputs' latest values.

pub mod calls;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod transport;
pub mod vault;

use observable::SharedObservable;

use crate::errors::CallError;

/// A live input to the aggregation graph: re-emits whenever its own
/// upstream context changes, stays silent while its value is absent, and
/// terminates on failure.
pub type DependencyStream<T> = SharedObservable<T, CallError>;

pub use crate::calls::cdp_manager::VaultId;
pub use crate::config::AddressBook;
pub use crate::context::{Address, ContextConnected, ContractRegistry};
pub use crate::vault::{compute_vault, create_vault, Vault, VaultParts};
