//! Stability-fee (jug) reads.

use primitive_types::U256;

use library::math::casting::Cast;
use observable::{defer, filter_absent, switch_map};

use crate::calls::{call, decode_tuple, decode_uint, encode_ilk, CallDef};
use crate::context::{ContextConnected, CoreContract};
use crate::transport::CallArg;
use crate::DependencyStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JugIlk {
    /// duty [ray] — per-second stability fee rate.
    pub raw_stability_fee: U256,
    /// rho — unix timestamp of the last fee accrual.
    pub fee_last_levied: u64,
}

/// A zero `duty` means fees were never configured for the ilk: absent.
pub const JUG_ILKS: CallDef<String, JugIlk> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Jug, "ilks")),
    prepare_args: |ilk| vec![CallArg::Bytes32(encode_ilk(ilk))],
    postprocess: |raw| {
        let [duty, rho] = decode_tuple::<2>(raw, "ilks")?;
        let duty = decode_uint(duty, "ilks")?;
        if duty.is_zero() {
            return Ok(None);
        }
        Ok(Some(JugIlk {
            raw_stability_fee: duty,
            fee_last_levied: decode_uint(rho, "ilks")?.cast()?,
        }))
    },
};

pub fn create_jug_ilks(
    context: DependencyStream<ContextConnected>,
    ilk: &str,
) -> DependencyStream<JugIlk> {
    let ilk = ilk.to_owned();
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        let ilk = ilk.clone();
        defer(move || {
            let ctx = ctx.clone();
            let ilk = ilk.clone();
            async move { call(&ctx, &JUG_ILKS, &ilk).await }
        })
    }))
}
