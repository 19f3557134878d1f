//! Price-oracle registry (spot) reads: where each ilk's feed lives and the
//! minimum collateralization it is held to.

use primitive_types::U256;

use observable::{defer, filter_absent, switch_map};

use crate::calls::{call, decode_address, decode_tuple, decode_uint, encode_ilk, CallDef};
use crate::context::{Address, ContextConnected, CoreContract};
use crate::transport::CallArg;
use crate::DependencyStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpotIlk {
    /// pip — address of the collateral price feed.
    pub price_feed_address: Address,
    /// mat [ray] — minimum collateralization ratio.
    pub liquidation_ratio: U256,
}

/// A zero `mat` means the ilk was never configured in the spotter: absent.
pub const SPOT_ILKS: CallDef<String, SpotIlk> = CallDef {
    call: |_, context| Ok(context.callable(CoreContract::Spot, "ilks")),
    prepare_args: |ilk| vec![CallArg::Bytes32(encode_ilk(ilk))],
    postprocess: |raw| {
        let [pip, mat] = decode_tuple::<2>(raw, "ilks")?;
        let spot = SpotIlk {
            price_feed_address: decode_address(pip, "ilks")?,
            liquidation_ratio: decode_uint(mat, "ilks")?,
        };
        Ok((!spot.liquidation_ratio.is_zero()).then_some(spot))
    },
};

pub fn create_spot_ilks(
    context: DependencyStream<ContextConnected>,
    ilk: &str,
) -> DependencyStream<SpotIlk> {
    let ilk = ilk.to_owned();
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        let ilk = ilk.clone();
        defer(move || {
            let ctx = ctx.clone();
            let ilk = ilk.clone();
            async move { call(&ctx, &SPOT_ILKS, &ilk).await }
        })
    }))
}
