//! The per-asset reserve record and its index-accrual transition
//! (spec.md §3, §4.3).
//!
//! Grounded on `liquidity_pool/src/liq_storage.rs` for the field set
//! (indices, rates, timestamp, pool balances) and on
//! `liquidity_pool/src/liquidity.rs`'s `add_collateral`/`borrow`/
//! `remove_collateral`/`repay` for the "accrue, then mutate" sequencing,
//! corrected per spec.md §9 Open Question 1 and DESIGN.md's decision:
//! indices are compounded over elapsed time *before* the rate for the
//! next interval is computed, using a linear approximation
//! (`index *= RAY + rate * elapsed`) rather than the source's Taylor
//! expansion (`common/rates/src/rates.rs::calculate_compounded_interest`)
//! — simpler to audit and explicitly permitted by spec.md §4.3.

use lending_common::{bps, checked_add, mul_div, ray, AssetId, LendingError, LendingResult};
use lending_rates::InterestRateModel;
use primitive_types::U256;

use crate::claim_ledger::{DebtClaimLedger, SupplyClaimLedger};

/// Risk parameters for one reserve, all in basis points.
/// Invariant: `ltv <= liquidation_threshold <= 10_000` and `liquidation_bonus < 10_000`
/// (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RiskParams {
    pub ltv_bps: u32,
    pub liquidation_threshold_bps: u32,
    pub liquidation_bonus_bps: u32,
}

impl RiskParams {
    pub fn validate(&self, asset: &AssetId) -> LendingResult<()> {
        if self.ltv_bps > self.liquidation_threshold_bps
            || self.liquidation_threshold_bps > 10_000
            || self.liquidation_bonus_bps >= 10_000
        {
            return Err(LendingError::InvalidRiskParameters(asset.clone()));
        }
        Ok(())
    }
}

/// One asset's reserve state: indices, rates, risk parameters, claim
/// ledgers, and the pool's own custody balance of the underlying
/// (`cash`). Real ERC20-style token transfer is an external collaborator
/// out of this core's scope (spec.md §1); `cash` is this core's
/// bookkeeping of what it has received and not yet paid back out.
pub struct Reserve {
    pub asset: AssetId,
    pub liquidity_index: U256,
    pub variable_borrow_index: U256,
    pub current_liquidity_rate: U256,
    pub current_variable_borrow_rate: U256,
    pub last_update_timestamp: u64,
    pub risk_params: RiskParams,
    pub rate_model: InterestRateModel,
    pub is_active: bool,
    pub is_frozen: bool,
    pub cash: U256,
    pub supply_claim: SupplyClaimLedger,
    pub debt_claim: DebtClaimLedger,
}

impl Reserve {
    pub fn new(asset: AssetId, risk_params: RiskParams, rate_model: InterestRateModel, now: u64) -> LendingResult<Self> {
        risk_params.validate(&asset)?;
        Ok(Self {
            asset,
            liquidity_index: ray(),
            variable_borrow_index: ray(),
            current_liquidity_rate: U256::zero(),
            current_variable_borrow_rate: U256::zero(),
            last_update_timestamp: now,
            risk_params,
            rate_model,
            is_active: true,
            is_frozen: false,
            cash: U256::zero(),
            supply_claim: SupplyClaimLedger::new(),
            debt_claim: DebtClaimLedger::new(),
        })
    }

    pub fn total_debt(&self) -> LendingResult<U256> {
        mul_div(self.debt_claim.total_supply(), self.variable_borrow_index, ray())
    }

    pub fn total_liquidity(&self) -> LendingResult<U256> {
        checked_add(self.cash, self.total_debt()?)
    }

    /// `_updateState` (spec.md §4.3): compound indices over elapsed time
    /// using the rate that was valid for that interval, then refresh the
    /// current rates for the next interval. Idempotent within the same
    /// timestamp.
    pub fn update_state(&mut self, now: u64) -> LendingResult<()> {
        if now < self.last_update_timestamp {
            // clock went backwards relative to the ledger; never observed
            // in a correctly operated host, treated as a no-op rather than
            // an underflow panic.
            return Ok(());
        }
        let elapsed = now - self.last_update_timestamp;
        if elapsed == 0 {
            return Ok(());
        }

        self.liquidity_index = self.compound_index(self.liquidity_index, self.current_liquidity_rate, elapsed)?;
        self.variable_borrow_index =
            self.compound_index(self.variable_borrow_index, self.current_variable_borrow_rate, elapsed)?;

        let total_debt = self.total_debt()?;
        let total_liquidity = checked_add(self.cash, total_debt)?;
        let rates = self.rate_model.calculate_interest_rates(total_liquidity, total_debt)?;

        self.current_liquidity_rate = rates.liquidity_rate;
        self.current_variable_borrow_rate = rates.borrow_rate;
        self.last_update_timestamp = now;

        tracing::debug!(
            asset = %self.asset,
            elapsed,
            liquidity_index = %self.liquidity_index,
            borrow_index = %self.variable_borrow_index,
            liquidity_rate = %self.current_liquidity_rate,
            borrow_rate = %self.current_variable_borrow_rate,
            "reserve state updated"
        );
        Ok(())
    }

    /// Linear compounding: `index * (RAY + rate * elapsed) / RAY`. `rate`
    /// is ray-valued and expressed per second (spec.md §4.3).
    fn compound_index(&self, index: U256, rate_per_second: U256, elapsed_seconds: u64) -> LendingResult<U256> {
        let growth = rate_per_second
            .checked_mul(U256::from(elapsed_seconds))
            .ok_or(LendingError::ArithmeticOverflow)?;
        let factor = checked_add(ray(), growth)?;
        mul_div(index, factor, ray())
    }

    pub fn scaled_to_underlying(&self, scaled: U256, index: U256) -> LendingResult<U256> {
        mul_div(scaled, index, ray())
    }

    pub fn underlying_to_scaled(&self, amount: U256, index: U256) -> LendingResult<U256> {
        mul_div(amount, ray(), index)
    }

    pub fn require_active(&self) -> LendingResult<()> {
        if !self.is_active {
            return Err(LendingError::AssetNotActive(self.asset.clone()));
        }
        Ok(())
    }

    pub fn require_not_frozen(&self) -> LendingResult<()> {
        self.require_active()?;
        if self.is_frozen {
            return Err(LendingError::ReserveFrozen(self.asset.clone()));
        }
        Ok(())
    }

    pub fn ltv_ray(&self) -> U256 {
        U256::from(self.risk_params.ltv_bps) * ray() / bps()
    }

    pub fn liquidation_threshold_ray(&self) -> U256 {
        U256::from(self.risk_params.liquidation_threshold_bps) * ray() / bps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lending_rates::InterestRateModel;

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
    fn invalid_risk_params_rejected() {
        let bad = RiskParams {
            ltv_bps: 9_000,
            liquidation_threshold_bps: 8_000,
            liquidation_bonus_bps: 500,
        };
        assert!(Reserve::new(AssetId::new("D"), bad, model(), 0).is_err());
    }

    #[test]
    fn indices_start_at_one_ray() {
        let reserve = Reserve::new(AssetId::new("D"), risk(), model(), 0).unwrap();
        assert_eq!(reserve.liquidity_index, ray());
        assert_eq!(reserve.variable_borrow_index, ray());
    }

    #[test]
    fn update_state_is_idempotent_within_same_timestamp() {
        let mut reserve = Reserve::new(AssetId::new("D"), risk(), model(), 100).unwrap();
        reserve.cash = U256::from(1_000u64);
        reserve.update_state(200).unwrap();
        let after_first = (reserve.liquidity_index, reserve.variable_borrow_index, reserve.last_update_timestamp);
        reserve.update_state(200).unwrap();
        let after_second = (reserve.liquidity_index, reserve.variable_borrow_index, reserve.last_update_timestamp);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn indices_are_monotonic_non_decreasing() {
        let mut reserve = Reserve::new(AssetId::new("D"), risk(), model(), 0).unwrap();
        reserve.cash = U256::from(1_000u64);
        reserve.debt_claim.mint(&reserve.asset.clone(), &"borrower".into(), U256::from(700) * ray()).unwrap();
        let before = (reserve.liquidity_index, reserve.variable_borrow_index);
        reserve.update_state(1_000).unwrap();
        assert!(reserve.liquidity_index >= before.0);
        assert!(reserve.variable_borrow_index >= before.1);
        reserve.update_state(2_000).unwrap();
        assert!(reserve.liquidity_index >= before.0);
        assert!(reserve.variable_borrow_index >= before.1);
    }

    #[test]
    fn last_update_timestamp_is_monotonic() {
        let mut reserve = Reserve::new(AssetId::new("D"), risk(), model(), 50).unwrap();
        reserve.update_state(100).unwrap();
        assert_eq!(reserve.last_update_timestamp, 100);
        reserve.update_state(100).unwrap();
        assert_eq!(reserve.last_update_timestamp, 100);
    }
}
