//! Collateral price feed reads.
//!
//! `peek` is the one read whose absence is signalled in-band: the feed
//! returns `(value, has)` and `has = false` means no trusted price yet —
//! not zero, not an error.

use primitive_types::U256;

use observable::{defer, filter_absent, switch_map};

use crate::calls::{call, decode_bool, decode_bytes32, decode_tuple, CallDef};
use crate::context::ContextConnected;
use crate::DependencyStream;

/// Current collateral price [wad, USD per unit].
pub const PIP_PEEK: CallDef<String, U256> = CallDef {
    call: |ilk, context| context.price_feed_callable(ilk, "peek"),
    prepare_args: |_| vec![],
    postprocess: |raw| {
        let [value, has] = decode_tuple::<2>(raw, "peek")?;
        if !decode_bool(has, "peek")? {
            return Ok(None);
        }
        let raw_value = decode_bytes32(value, "peek")?;
        Ok(Some(U256::from_big_endian(&raw_value)))
    },
};

pub fn create_token_price(
    context: DependencyStream<ContextConnected>,
    ilk: &str,
) -> DependencyStream<U256> {
    let ilk = ilk.to_owned();
    filter_absent(switch_map(context, move |ctx: ContextConnected| {
        let ilk = ilk.clone();
        defer(move || {
            let ctx = ctx.clone();
            let ilk = ilk.clone();
            async move { call(&ctx, &PIP_PEEK, &ilk).await }
        })
    }))
}
