//! Property test for the index-monotonicity invariant (spec.md §8):
//! `liquidityIndex` and `variableBorrowIndex` never decrease across any
//! sequence of `update_state` calls, whatever the elapsed time and reserve
//! cash/debt snapshot between calls. Grounded on `proptest`'s use across
//! the retrieval pack for exactly this kind of randomized-sequence check.

use lending_common::{ray, AssetId};
use lending_rates::InterestRateModel;
use lending_reserve::{Reserve, RiskParams};
use primitive_types::U256;
use proptest::prelude::*;

fn rate_model() -> InterestRateModel {
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

proptest! {
    #[test]
    fn indices_never_decrease_across_random_elapsed_steps(
        cash in 0u64..1_000_000,
        debt_scaled in 0u64..1_000_000,
        steps in proptest::collection::vec(1u64..10_000, 1..30),
    ) {
        let mut reserve = Reserve::new(AssetId::new("D"), risk(), rate_model(), 0).unwrap();
        reserve.cash = U256::from(cash);
        if debt_scaled > 0 {
            reserve
                .debt_claim
                .mint(&reserve.asset.clone(), &"seed-borrower".into(), U256::from(debt_scaled) * ray())
                .unwrap();
        }

        let mut now = 0u64;
        let mut prev_liquidity_index = reserve.liquidity_index;
        let mut prev_borrow_index = reserve.variable_borrow_index;

        for step in steps {
            now += step;
            reserve.update_state(now).unwrap();
            prop_assert!(reserve.liquidity_index >= prev_liquidity_index);
            prop_assert!(reserve.variable_borrow_index >= prev_borrow_index);
            prev_liquidity_index = reserve.liquidity_index;
            prev_borrow_index = reserve.variable_borrow_index;
        }
    }
}
