//! Pure interest-rate model: `(totalLiquidity, totalDebt) -> (liquidityRate, borrowRate)`.
//!
//! Grounded on `liquidity_pool/src/liq_math.rs::compute_borrow_rate` /
//! `compute_deposit_rate` — the source's simpler two-slope kinked model,
//! preferred over `common/rates/src/rates.rs::calculate_borrow_rate`'s
//! three-region form since spec.md §4.1 only specifies two slopes either
//! side of one optimal-utilization kink.

use lending_common::{mul_div, ray, LendingError, LendingResult};
use primitive_types::U256;

/// Configuration for one reserve's interest-rate curve. All fields are
/// ray-valued (27-decimal fixed point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterestRateModel {
    pub base_rate: U256,
    pub slope1: U256,
    pub slope2: U256,
    pub optimal_utilization: U256,
}

/// The two rates produced by the model for a given liquidity/debt snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestRates {
    pub liquidity_rate: U256,
    pub borrow_rate: U256,
}

impl InterestRateModel {
    /// `optimal_utilization` must lie strictly between 0 and `RAY` (spec.md §4.1).
    pub fn new(base_rate: U256, slope1: U256, slope2: U256, optimal_utilization: U256) -> LendingResult<Self> {
        if optimal_utilization.is_zero() || optimal_utilization >= ray() {
            return Err(LendingError::InvalidRiskParameters("<rate-model>".into()));
        }
        Ok(Self {
            base_rate,
            slope1,
            slope2,
            optimal_utilization,
        })
    }

    /// `baseRate + slope1 + slope2`, the rate charged at 100% utilization.
    pub fn max_borrow_rate(&self) -> LendingResult<U256> {
        let sum = self
            .base_rate
            .checked_add(self.slope1)
            .ok_or(LendingError::ArithmeticOverflow)?;
        sum.checked_add(self.slope2).ok_or(LendingError::ArithmeticOverflow)
    }

    /// Implements spec.md §4.1 exactly: zero-liquidity shortcut, the
    /// piecewise-linear borrow curve either side of `optimal_utilization`,
    /// a hard cap at `max_borrow_rate`, and `liquidityRate = borrowRate *
    /// utilization / RAY`.
    pub fn calculate_interest_rates(&self, total_liquidity: U256, total_debt: U256) -> LendingResult<InterestRates> {
        if total_liquidity.is_zero() {
            return Ok(InterestRates {
                liquidity_rate: U256::zero(),
                borrow_rate: self.base_rate,
            });
        }

        let utilization = if total_debt.is_zero() {
            U256::zero()
        } else {
            mul_div(total_debt, ray(), total_liquidity)?
        };

        let max_borrow_rate = self.max_borrow_rate()?;

        let borrow_rate = if utilization <= self.optimal_utilization {
            let slope_contribution = mul_div(utilization, self.slope1, self.optimal_utilization)?;
            self.base_rate
                .checked_add(slope_contribution)
                .ok_or(LendingError::ArithmeticOverflow)?
        } else {
            let excess = utilization - self.optimal_utilization;
            let denom = ray() - self.optimal_utilization;
            let slope_contribution = mul_div(excess, self.slope2, denom)?;
            let base_plus_slope1 = self
                .base_rate
                .checked_add(self.slope1)
                .ok_or(LendingError::ArithmeticOverflow)?;
            base_plus_slope1
                .checked_add(slope_contribution)
                .ok_or(LendingError::ArithmeticOverflow)?
        };

        let borrow_rate = borrow_rate.min(max_borrow_rate);
        let liquidity_rate = mul_div(borrow_rate, utilization, ray())?;

        Ok(InterestRates {
            liquidity_rate,
            borrow_rate,
        })
    }
}
