//! The vault aggregator: composes every dependency stream for one position
//! into a continuously-updating, presentation-ready snapshot.

use primitive_types::U256;

use library::errors::MathResult;
use library::math::units::{rad_to_wad, ray, rdiv, rdiv_up, rmul, rpow, wdiv, wmul};
use observable::{combine_latest2, combine_latest4, switch_map, try_map};

use crate::calls::cat::{create_cat_ilks, CatIlk};
use crate::calls::cdp_manager::{
    create_cdp_manager_ilks, create_cdp_manager_owner, create_cdp_manager_urns, VaultId,
};
use crate::calls::jug::{create_jug_ilks, JugIlk};
use crate::calls::price::create_token_price;
use crate::calls::spot::{create_spot_ilks, SpotIlk};
use crate::calls::vat::{create_vat_gem, create_vat_ilks, create_vat_urns, Ilk, Urn};
use crate::constants::SECONDS_PER_YEAR;
use crate::context::{Address, ContextConnected};
use crate::errors::CallError;
use crate::DependencyStream;

/// Immutable snapshot of one position's derived state. Recomputation never
/// mutates a snapshot; each upstream change produces a fresh value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vault {
    pub id: VaultId,
    pub ilk: String,
    /// Collateral symbol: the ilk prefix ("ETH-A" → "ETH").
    pub token: String,
    /// Resolved urn address backing the position.
    pub address: Address,
    pub owner: Address,
    /// Whether the connected account owns the position.
    pub controller: bool,
    /// ink [wad]
    pub collateral: U256,
    /// gem [wad] — collateral held in the ledger but not locked.
    pub unlocked_collateral: U256,
    /// art [wad]
    pub normalized_debt: U256,
    /// [wad] — art scaled by the ilk rate.
    pub debt: U256,
    /// [wad] — additional debt the position could draw, clipped at zero.
    pub available_debt: U256,
    /// [wad] — headroom left under the ilk debt ceiling, clipped at zero.
    pub available_ilk_debt: U256,
    /// [wad] — USD per unit of collateral.
    pub price: U256,
    /// [wad] — collateral × price.
    pub collateral_value: U256,
    /// [wad] — collateral not required to back current debt, clipped at zero.
    pub free_collateral: U256,
    /// [wad] — free collateral × price.
    pub free_collateral_value: U256,
    /// [ray]; `None` is the defined "no debt" (infinite) sentinel.
    pub collateralization_ratio: Option<U256>,
    /// [wad]; `None` when the position holds no collateral.
    pub liquidation_price: Option<U256>,
    /// mat [ray]
    pub liquidation_ratio: U256,
    /// [ray] — penalty fraction (chop − 1), clipped at zero.
    pub liquidation_penalty: U256,
    /// [ray] — annualized stability fee fraction.
    pub stability_fee: U256,
}

/// The latest value of every input the snapshot derives from.
#[derive(Clone, Debug)]
pub struct VaultParts {
    pub id: VaultId,
    pub ilk: String,
    pub urn_address: Address,
    pub owner: Address,
    pub account: Address,
    pub urn: Urn,
    pub vat_ilk: Ilk,
    pub spot_ilk: SpotIlk,
    pub jug_ilk: JugIlk,
    pub cat_ilk: CatIlk,
    /// gem [wad]
    pub unlocked_collateral: U256,
    /// [wad]
    pub price: U256,
}

/// Pure derivation of a snapshot from its parts. Same parts in, bit-identical
/// snapshot out.
///
/// Scale discipline: amounts are wad, rates and ratios are ray, ledger debt
/// totals are rad. Every conversion between the families is one of the
/// explicit unit helpers; the comments mark the scale of each intermediate.
pub fn compute_vault(parts: &VaultParts) -> MathResult<Vault> {
    let Urn {
        collateral,
        normalized_debt,
    } = parts.urn;
    let rate = parts.vat_ilk.debt_scaling_factor;
    let spot = parts.vat_ilk.max_debt_per_unit_collateral;
    let mat = parts.spot_ilk.liquidation_ratio;

    // art [wad] · rate [ray] → debt [wad]
    let debt = rmul(normalized_debt, rate)?;

    // ink [wad] · price [wad] → value [wad]
    let collateral_value = wmul(collateral, parts.price)?;

    // value [wad] / debt [wad] → ratio [ray]; no debt means no ratio.
    let collateralization_ratio = if debt.is_zero() {
        None
    } else {
        Some(rdiv(collateral_value, debt)?)
    };

    // debt [wad] · mat [ray] → backed debt [wad], / ink [wad] → price [wad]
    let liquidation_price = if collateral.is_zero() {
        None
    } else {
        Some(wdiv(rmul(debt, mat)?, collateral)?)
    };

    // Collateral that must stay locked to back the current debt at the
    // ledger's spot, rounded up so free collateral is never overstated.
    let required_collateral = if debt.is_zero() {
        U256::zero()
    } else if spot.is_zero() {
        // Spot never poked: nothing is withdrawable while debt exists.
        collateral
    } else {
        rdiv_up(debt, spot)?
    };
    let free_collateral = collateral.saturating_sub(required_collateral);
    let free_collateral_value = wmul(free_collateral, parts.price)?;

    // ink [wad] · spot [ray] → max debt [wad], minus current debt, clip 0.
    let available_debt = rmul(collateral, spot)?.saturating_sub(debt);

    // line [rad] → [wad], minus issued debt (Art [wad] · rate [ray]), clip 0.
    let issued_debt = rmul(parts.vat_ilk.global_debt, rate)?;
    let available_ilk_debt = rad_to_wad(parts.vat_ilk.debt_ceiling).saturating_sub(issued_debt);

    let liquidation_penalty = parts.cat_ilk.liquidation_penalty.saturating_sub(ray());

    // duty [ray, per second] compounded over a year, minus one.
    let stability_fee =
        rpow(parts.jug_ilk.raw_stability_fee, SECONDS_PER_YEAR)?.saturating_sub(ray());

    let token = parts.ilk.split('-').next().unwrap_or("").to_owned();

    Ok(Vault {
        id: parts.id,
        ilk: parts.ilk.clone(),
        token,
        address: parts.urn_address,
        owner: parts.owner,
        controller: parts.owner == parts.account,
        collateral,
        unlocked_collateral: parts.unlocked_collateral,
        normalized_debt,
        debt,
        available_debt,
        available_ilk_debt,
        price: parts.price,
        collateral_value,
        free_collateral,
        free_collateral_value,
        collateralization_ratio,
        liquidation_price,
        liquidation_ratio: mat,
        liquidation_penalty,
        stability_fee,
    })
}

/// Continuously-updating snapshot stream for one position.
///
/// Every stage filters absence, so the stream emits only once all required
/// inputs have resolved; a position that never resolves simply never emits.
/// Any input failure terminates the stream with that failure — a partial or
/// zeroed vault is never produced.
pub fn create_vault(
    context: DependencyStream<ContextConnected>,
    id: VaultId,
) -> DependencyStream<Vault> {
    let ilk = create_cdp_manager_ilks(context.clone(), id);
    let urn_address = create_cdp_manager_urns(context.clone(), id);
    let owner = create_cdp_manager_owner(context.clone(), id);
    let urn = create_vat_urns(context.clone(), ilk.clone(), urn_address.clone());
    let unlocked_collateral = create_vat_gem(context.clone(), ilk.clone(), urn_address.clone());

    // Per-ilk parameter streams re-key whenever the resolved ilk changes.
    let ilk_parameters = switch_map(ilk.clone(), {
        let context = context.clone();
        move |ilk: String| {
            combine_latest4(
                create_vat_ilks(context.clone(), &ilk),
                create_spot_ilks(context.clone(), &ilk),
                create_jug_ilks(context.clone(), &ilk),
                create_cat_ilks(context.clone(), &ilk),
            )
        }
    });
    let price = switch_map(ilk.clone(), {
        let context = context.clone();
        move |ilk: String| create_token_price(context.clone(), &ilk)
    });

    let position = combine_latest4(ilk, urn_address, owner, urn);
    let balances = combine_latest2(unlocked_collateral, price);

    try_map(
        combine_latest4(context, position, ilk_parameters, balances),
        move |(ctx, position, ilk_parameters, balances)| {
            let (ilk, urn_address, owner, urn) = position;
            let (vat_ilk, spot_ilk, jug_ilk, cat_ilk) = ilk_parameters;
            let (unlocked_collateral, price) = balances;
            let parts = VaultParts {
                id,
                ilk,
                urn_address,
                owner,
                account: ctx.account,
                urn,
                vat_ilk,
                spot_ilk,
                jug_ilk,
                cat_ilk,
                unlocked_collateral,
                price,
            };
            compute_vault(&parts).map_err(CallError::from)
        },
    )
}
