//! Position-registry reads: the per-id lookups that seed every other
//! dependency stream for a vault.

use primitive_types::U256;

use observable::{defer, filter_absent, switch_map};

use crate::calls::{call, decode_address, decode_bytes32, decode_ilk, CallDef};
use crate::context::{Address, ContextConnected, CoreContract};
use crate::transport::CallArg;
use crate::DependencyStream;

/// Numeric position identifier assigned by the manager when the position
/// was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VaultId(pub u64);

impl std::fmt::Display for VaultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw urn address for a position. The manager returns the zero address
/// for ids it has never issued; that is "absent", not a value.
pub const CDP_MANAGER_URNS: CallDef<VaultId, Address> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::CdpManager, "urns")),
    prepare_args: |id| vec![CallArg::Uint(U256::from(id.0))],
    postprocess: |raw| {
        let address = decode_address(raw, "urns")?;
        Ok((!address.is_zero()).then_some(address))
    },
};

/// Collateral-type identifier for a position.
pub const CDP_MANAGER_ILKS: CallDef<VaultId, String> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::CdpManager, "ilks")),
    prepare_args: |id| vec![CallArg::Uint(U256::from(id.0))],
    postprocess: |raw| {
        let raw = decode_bytes32(raw, "ilks")?;
        if raw == [0u8; 32] {
            return Ok(None);
        }
        decode_ilk(raw, "ilks").map(Some)
    },
};

/// Owner of a position.
pub const CDP_MANAGER_OWNS: CallDef<VaultId, Address> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::CdpManager, "owns")),
    prepare_args: |id| vec![CallArg::Uint(U256::from(id.0))],
    postprocess: |raw| {
        let address = decode_address(raw, "owns")?;
        Ok((!address.is_zero()).then_some(address))
    },
};

/// Urn address for a position, re-resolved on every context change.
pub fn create_cdp_manager_urns(
    context: DependencyStream<ContextConnected>,
    id: VaultId,
) -> DependencyStream<Address> {
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        defer(move || {
            let ctx = ctx.clone();
            async move { call(&ctx, &CDP_MANAGER_URNS, &id).await }
        })
    }))
}

/// Collateral-type identifier for a position, re-resolved on every context
/// change.
pub fn create_cdp_manager_ilks(
    context: DependencyStream<ContextConnected>,
    id: VaultId,
) -> DependencyStream<String> {
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        defer(move || {
            let ctx = ctx.clone();
            async move { call(&ctx, &CDP_MANAGER_ILKS, &id).await }
        })
    }))
}

/// Owner of a position, re-resolved on every context change.
pub fn create_cdp_manager_owner(
    context: DependencyStream<ContextConnected>,
    id: VaultId,
) -> DependencyStream<Address> {
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        defer(move || {
            let ctx = ctx.clone();
            async move { call(&ctx, &CDP_MANAGER_OWNS, &id).await }
        })
    }))
}
