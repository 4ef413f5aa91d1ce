//! Account Aggregator (spec.md §4.4): walks every active reserve for a
//! user, values collateral (weighted by liquidation threshold) and debt
//! in USD, and derives the health factor.
//!
//! Grounded on `lending_pool/src/math.rs::compute_health_factor` (the
//! `debt == 0 => +infinity` shortcut, `collateral * BP / debt` otherwise)
//! and the traversal pattern in `lending_pool/src/position.rs`. Unlike
//! the source, `user_account_data`'s reported `ltv_bps`/
//! `liquidation_threshold_bps` are the account's actual weighted values
//! rather than the hard-coded `7_500`/`8_000` constants the source
//! returns (spec.md §9 Open Question 3 — decided in DESIGN.md).

use std::collections::HashMap;

use lending_common::{bps, checked_add, mul_div, saturating_max, wad, AccountId, AssetId, LendingResult};
use lending_oracle::PriceOracle;
use lending_reserve::Reserve;
use primitive_types::U256;

/// One user's aggregated position across every reserve they touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountData {
    /// Threshold-weighted collateral value in USD (WAD), i.e. the
    /// numerator spec.md §4.4 calls `collateralUSD`.
    pub collateral_usd: U256,
    /// Total debt value in USD (WAD).
    pub debt_usd: U256,
    /// Raw (unweighted) collateral value in USD (WAD); reporting-only.
    pub raw_collateral_usd: U256,
    /// Collateral-value-weighted average LTV across the account's
    /// reserves, in bps; reporting-only (spec.md §9 Open Question 3).
    pub ltv_bps: u32,
    /// Collateral-value-weighted average liquidation threshold, in bps;
    /// reporting-only.
    pub liquidation_threshold_bps: u32,
}

impl AccountData {
    pub fn health_factor(&self) -> U256 {
        if self.debt_usd.is_zero() {
            return saturating_max();
        }
        // unwrap: WAD*collateral_usd cannot overflow U256 for any
        // economically meaningful collateral value, and debt_usd is
        // non-zero here; any genuine overflow is still surfaced by
        // propagating through `try_health_factor` at call sites that need it.
        mul_div(self.collateral_usd, wad(), self.debt_usd).unwrap_or_else(|_| saturating_max())
    }
}

/// Traverses `reserve_list` (insertion order; spec.md §3 caps it at
/// [`lending_common::MAX_RESERVES`]) and values `user`'s position in
/// every reserve they hold a non-zero balance in.
///
/// Oracle faults are strict (spec.md §7): a missing price for any asset
/// the account actually holds a balance in aborts the whole computation.
/// Reserves where the user holds zero supply-claim *and* zero
/// debt-claim balance are skipped without consulting the oracle — the
/// extension spec.md §7 explicitly allows.
pub fn user_account_data(
    reserves: &HashMap<AssetId, Reserve>,
    reserve_list: &[AssetId],
    oracle: &dyn PriceOracle,
    user: &AccountId,
) -> LendingResult<AccountData> {
    let mut collateral_usd = U256::zero();
    let mut raw_collateral_usd = U256::zero();
    let mut debt_usd = U256::zero();
    let mut ltv_weighted_sum = U256::zero();
    let mut threshold_weighted_sum = U256::zero();

    for asset in reserve_list {
        let reserve = match reserves.get(asset) {
            Some(r) => r,
            None => continue,
        };

        let supply_scaled = reserve.supply_claim.balance_of(user);
        let debt_scaled = reserve.debt_claim.balance_of(user);
        if supply_scaled.is_zero() && debt_scaled.is_zero() {
            continue;
        }

        let price = oracle.get_asset_price(asset)?;

        if !supply_scaled.is_zero() {
            let supply_underlying = reserve.scaled_to_underlying(supply_scaled, reserve.liquidity_index)?;
            let supply_value_usd = mul_div(supply_underlying, price, wad())?;
            raw_collateral_usd = checked_add(raw_collateral_usd, supply_value_usd)?;

            let threshold = U256::from(reserve.risk_params.liquidation_threshold_bps);
            let weighted_value = mul_div(supply_value_usd, threshold, bps())?;
            collateral_usd = checked_add(collateral_usd, weighted_value)?;
            threshold_weighted_sum = checked_add(threshold_weighted_sum, weighted_value)?;

            let ltv = U256::from(reserve.risk_params.ltv_bps);
            let ltv_value = mul_div(supply_value_usd, ltv, bps())?;
            ltv_weighted_sum = checked_add(ltv_weighted_sum, ltv_value)?;
        }

        if !debt_scaled.is_zero() {
            let debt_underlying = reserve.scaled_to_underlying(debt_scaled, reserve.variable_borrow_index)?;
            let debt_value_usd = mul_div(debt_underlying, price, wad())?;
            debt_usd = checked_add(debt_usd, debt_value_usd)?;
        }
    }

    let ltv_bps = weighted_bps(ltv_weighted_sum, raw_collateral_usd);
    let liquidation_threshold_bps = weighted_bps(threshold_weighted_sum, raw_collateral_usd);

    Ok(AccountData {
        collateral_usd,
        debt_usd,
        raw_collateral_usd,
        ltv_bps,
        liquidation_threshold_bps,
    })
}

fn weighted_bps(weighted_value_usd: U256, raw_collateral_usd: U256) -> u32 {
    if raw_collateral_usd.is_zero() {
        return 0;
    }
    let ratio = weighted_value_usd.saturating_mul(bps()) / raw_collateral_usd;
    if ratio > U256::from(u32::MAX) {
        u32::MAX
    } else {
        ratio.as_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lending_common::AccountId;
    use lending_oracle::FixedPriceOracle;
    use lending_reserve::RiskParams;
    use lending_rates::InterestRateModel;
    use lending_common::ray;

    fn model() -> InterestRateModel {
        InterestRateModel::new(
            U256::from(2u64) * ray() / U256::from(100u64),
            U256::from(4u64) * ray() / U256::from(100u64),
            U256::from(75u64) * ray() / U256::from(100u64),
            U256::from(80u64) * ray() / U256::from(100u64),
        )
        .unwrap()
    }

    fn risk() -> RiskParams {
        RiskParams {
            ltv_bps: 7_500,
            liquidation_threshold_bps: 8_000,
            liquidation_bonus_bps: 500,
        }
    }

    #[test]
    fn no_debt_yields_infinite_health_factor() {
        let asset = AssetId::new("D");
        let user = AccountId::new("user1");
        let mut reserve = Reserve::new(asset.clone(), risk(), model(), 0).unwrap();
        reserve
            .supply_claim
            .mint(&asset, &user, U256::from(1_000u64) * lending_common::ray())
            .unwrap();
        let mut reserves = HashMap::new();
        reserves.insert(asset.clone(), reserve);
        let list = vec![asset];
        let oracle = FixedPriceOracle::one_dollar();

        let data = user_account_data(&reserves, &list, &oracle, &user).unwrap();
        assert_eq!(data.debt_usd, U256::zero());
        assert_eq!(data.health_factor(), saturating_max());
    }

    #[test]
    fn scenario_2_from_spec_matches_expected_health_factor() {
        // User1 deposits 1000 D, borrows 700 D; price $1. Expect HF ~= 1.142 WAD.
        let asset = AssetId::new("D");
        let user = AccountId::new("user1");
        let mut reserve = Reserve::new(asset.clone(), risk(), model(), 0).unwrap();
        reserve.supply_claim.mint(&asset, &user, U256::from(1_000u64) * ray()).unwrap();
        reserve.debt_claim.mint(&asset, &user, U256::from(700u64) * ray()).unwrap();
        let mut reserves = HashMap::new();
        reserves.insert(asset.clone(), reserve);
        let list = vec![asset];
        let oracle = FixedPriceOracle::one_dollar();

        let data = user_account_data(&reserves, &list, &oracle, &user).unwrap();
        // collateral_usd = 1000 * 0.8 = 800 WAD ; debt_usd = 700 WAD
        let expected = mul_div(U256::from(800u64) * wad(), wad(), U256::from(700u64) * wad()).unwrap();
        assert_eq!(data.health_factor(), expected);
    }
}
