//! Liquidation-module (cat) reads.

use primitive_types::U256;

use observable::{defer, filter_absent, switch_map};

use crate::calls::{call, decode_tuple, decode_uint, encode_ilk, CallDef};
use crate::context::{ContextConnected, CoreContract};
use crate::transport::CallArg;
use crate::DependencyStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatIlk {
    /// chop [ray] — liquidation penalty multiplier (1.13 ray = 13%).
    pub liquidation_penalty: U256,
}

/// A zero `chop` means liquidations were never configured: absent.
pub const CAT_ILKS: CallDef<String, CatIlk> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Cat, "ilks")),
    prepare_args: |ilk| vec![CallArg::Bytes32(encode_ilk(ilk))],
    postprocess: |raw| {
        let [_flip, chop, _lump] = decode_tuple::<3>(raw, "ilks")?;
        let chop = decode_uint(chop, "ilks")?;
        Ok((!chop.is_zero()).then_some(CatIlk {
            liquidation_penalty: chop,
        }))
    },
};

pub fn create_cat_ilks(
    context: DependencyStream<ContextConnected>,
    ilk: &str,
) -> DependencyStream<CatIlk> {
    let ilk = ilk.to_owned();
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        let ilk = ilk.clone();
        defer(move || {
            let ctx = ctx.clone();
            let ilk = ilk.clone();
            async move { call(&ctx, &CAT_ILKS, &ilk).await }
        })
    }))
}
