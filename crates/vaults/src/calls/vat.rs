//! Core-ledger (vat) reads: per-position urns, per-ilk risk parameters,
//! unencumbered balances and the global debt ceiling.

use primitive_types::U256;

use observable::{combine_latest3, defer, filter_absent, switch_map};

use crate::calls::{call, decode_tuple, decode_uint, encode_ilk, CallDef};
use crate::context::{Address, ContextConnected, CoreContract};
use crate::transport::CallArg;
use crate::DependencyStream;

/// Per-position ledger entry. Either fully populated or absent; a partial
/// urn never exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Urn {
    /// ink [wad]
    pub collateral: U256,
    /// art [wad]
    pub normalized_debt: U256,
}

/// Per-ilk risk parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ilk {
    /// Art [wad] — total normalized debt issued against this ilk.
    pub global_debt: U256,
    /// rate [ray]
    pub debt_scaling_factor: U256,
    /// spot [ray]
    pub max_debt_per_unit_collateral: U256,
    /// line [rad]
    pub debt_ceiling: U256,
    /// dust [rad]
    pub debt_floor: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VatUrnsArgs {
    pub ilk: String,
    pub urn_address: Address,
}

pub const VAT_URNS: CallDef<VatUrnsArgs, Urn> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Vat, "urns")),
    prepare_args: |args| {
        vec![
            CallArg::Bytes32(encode_ilk(&args.ilk)),
            CallArg::Address(args.urn_address),
        ]
    },
    postprocess: |raw| {
        let [ink, art] = decode_tuple::<2>(raw, "urns")?;
        Ok(Some(Urn {
            collateral: decode_uint(ink, "urns")?,
            normalized_debt: decode_uint(art, "urns")?,
        }))
    },
};

/// An ilk whose rate was never initialised does not exist yet; its record
/// reads as all zeros and is reported absent rather than as a zero Ilk.
pub const VAT_ILKS: CallDef<String, Ilk> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Vat, "ilks")),
    prepare_args: |ilk| vec![CallArg::Bytes32(encode_ilk(ilk))],
    postprocess: |raw| {
        let [art, rate, spot, line, dust] = decode_tuple::<5>(raw, "ilks")?;
        let ilk = Ilk {
            global_debt: decode_uint(art, "ilks")?,
            debt_scaling_factor: decode_uint(rate, "ilks")?,
            max_debt_per_unit_collateral: decode_uint(spot, "ilks")?,
            debt_ceiling: decode_uint(line, "ilks")?,
            debt_floor: decode_uint(dust, "ilks")?,
        };
        Ok((!ilk.debt_scaling_factor.is_zero()).then_some(ilk))
    },
};

/// Unencumbered collateral balance for an urn [wad]. Zero is a value here,
/// not absence.
pub const VAT_GEM: CallDef<VatUrnsArgs, U256> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Vat, "gem")),
    prepare_args: |args| {
        vec![
            CallArg::Bytes32(encode_ilk(&args.ilk)),
            CallArg::Address(args.urn_address),
        ]
    },
    postprocess: |raw| decode_uint(raw, "gem").map(Some),
};

/// Global debt ceiling [rad].
pub const VAT_LINE: CallDef<(), U256> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Vat, "Line")),
    prepare_args: |_| vec![],
    postprocess: |raw| decode_uint(raw, "Line").map(Some),
};

/// Urn contents keyed by the resolved `(ilk, urn address)` pair; restarts
/// whenever the context or either resolution changes.
pub fn create_vat_urns(
    context: DependencyStream<ContextConnected>,
    cdp_manager_ilks: DependencyStream<String>,
    cdp_manager_urns: DependencyStream<Address>,
) -> DependencyStream<Urn> {
    filter_absent(switch_map(
        combine_latest3(context, cdp_manager_ilks, cdp_manager_urns),
        |(ctx, ilk, urn_address): (ContextConnected, String, Address)| {
            defer(move || {
                let ctx = ctx.clone();
                let args = VatUrnsArgs {
                    ilk: ilk.clone(),
                    urn_address,
                };
                async move { call(&ctx, &VAT_URNS, &args).await }
            })
        },
    ))
}

/// Risk parameters for one ilk; refreshed on context change only.
pub fn create_vat_ilks(
    context: DependencyStream<ContextConnected>,
    ilk: &str,
) -> DependencyStream<Ilk> {
    let ilk = ilk.to_owned();
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        let ilk = ilk.clone();
        defer(move || {
            let ctx = ctx.clone();
            let ilk = ilk.clone();
            async move { call(&ctx, &VAT_ILKS, &ilk).await }
        })
    }))
}

/// Unencumbered collateral for the resolved urn.
pub fn create_vat_gem(
    context: DependencyStream<ContextConnected>,
    cdp_manager_ilks: DependencyStream<String>,
    cdp_manager_urns: DependencyStream<Address>,
) -> DependencyStream<U256> {
    filter_absent(switch_map(
        combine_latest3(context, cdp_manager_ilks, cdp_manager_urns),
        |(ctx, ilk, urn_address): (ContextConnected, String, Address)| {
            defer(move || {
                let ctx = ctx.clone();
                let args = VatUrnsArgs {
                    ilk: ilk.clone(),
                    urn_address,
                };
                async move { call(&ctx, &VAT_GEM, &args).await }
            })
        },
    ))
}

/// Global debt ceiling, refreshed on context change.
pub fn create_vat_line(context: DependencyStream<ContextConnected>) -> DependencyStream<U256> {
    filter_absent(switch_map(context, |ctx: ContextConnected| {
        defer(move || {
            let ctx = ctx.clone();
            async move { call(&ctx, &VAT_LINE, &()).await }
        })
    }))
}
