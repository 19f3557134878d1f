//! Shared numeric foundation for the vault-watcher workspace.
//!
//! Every on-chain quantity is a `U256` at one of the wad/ray/rad fixed-point
//! scales; this crate provides the checked arithmetic, casting, and scale
//! conversions the domain crates build on. Nothing here touches the network
//! or the stream layer.

pub mod errors;
pub mod math;
