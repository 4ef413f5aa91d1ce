//! Pool Controller (spec.md §4.5): the state machine exposing deposit,
//! withdraw, borrow, repay, liquidate and the administrative
//! transitions, orchestrating reserve accrual, aggregator-backed
//! solvency checks, and claim-ledger mutation.
//!
//! Grounded on `lending_pool/src/positions/{deposit,withdraw,borrow,
//! repay,liquidation}.rs`'s orchestration order — accrue, then validate,
//! then mutate, then emit — and `lending_pool/src/validation.rs`'s guard
//! functions, collapsed per spec.md REDESIGN FLAGS into plain methods on
//! one struct instead of the source's trait-module composition over
//! contract storage.
//!
//! **Concurrency** (spec.md §5): every public operation locks a single
//! `parking_lot::Mutex<PoolState>` for its entire duration and releases
//! it only once all effects (including the emitted event) are produced —
//! the "single global mutex around the controller" option spec.md §5
//! offers as an alternative to per-reserve lock ordering. Nothing this
//! crate calls (the oracle trait, the claim ledgers) can call back into
//! `LendingPool`'s public API, so there is no reentrancy surface to
//! guard against beyond what the mutex already serializes.

use std::collections::HashMap;
use std::sync::Arc;

use lending_common::{checked_add, checked_sub, mul_div, wad, AccountId, AssetId, LendingError, LendingResult, MAX_RESERVES};
use lending_oracle::PriceOracle;
use lending_reserve::{Reserve, RiskParams};
use lending_rates::InterestRateModel;
use parking_lot::Mutex;
use primitive_types::U256;

use crate::access::AccessControl;
use crate::aggregator::{self, AccountData};
use crate::events::PoolEvent;

/// Either a caller-specified amount, or the sentinel meaning "my full
/// balance" (spec.md §4.5.2, §4.5.4: `amount = MAX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountOrMax {
    Exact(U256),
    Max,
}

/// A read-only snapshot of one reserve's pool-custody cash and aggregate
/// supply/debt, all converted to underlying units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub cash: U256,
    pub total_supply_underlying: U256,
    pub total_debt_underlying: U256,
}

struct PoolState {
    reserves: HashMap<AssetId, Reserve>,
    reserve_list: Vec<AssetId>,
    oracle: Arc<dyn PriceOracle>,
    access: AccessControl,
    paused: bool,
}

impl PoolState {
    fn reserve(&self, asset: &AssetId) -> LendingResult<&Reserve> {
        self.reserves.get(asset).ok_or_else(|| LendingError::ReserveNotInitialized(asset.clone()))
    }

    fn reserve_mut(&mut self, asset: &AssetId) -> LendingResult<&mut Reserve> {
        self.reserves.get_mut(asset).ok_or_else(|| LendingError::ReserveNotInitialized(asset.clone()))
    }

    fn account_data(&self, user: &AccountId) -> LendingResult<AccountData> {
        aggregator::user_account_data(&self.reserves, &self.reserve_list, self.oracle.as_ref(), user)
    }
}

/// The lending pool: owns every reserve, the oracle handle, access
/// control and the global pause flag.
pub struct LendingPool {
    state: Mutex<PoolState>,
}

impl LendingPool {
    pub fn new(default_admin: AccountId, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            state: Mutex::new(PoolState {
                reserves: HashMap::new(),
                reserve_list: Vec::new(),
                oracle,
                access: AccessControl::new(default_admin),
                paused: false,
            }),
        }
    }

    // ---- administrative transitions (spec.md §4.5.6) ----

    /// One-shot per asset; requires the `ADMIN` role (spec.md §3 "A
    /// reserve cannot be initialized twice", §4.5.6).
    pub fn initialize_reserve(
        &self,
        caller: &AccountId,
        asset: AssetId,
        risk_params: RiskParams,
        rate_model: InterestRateModel,
        now: u64,
    ) -> LendingResult<PoolEvent> {
        let mut state = self.state.lock();
        state.access.require_admin(caller)?;
        if state.reserves.contains_key(&asset) {
            return Err(LendingError::ReserveAlreadyInitialized(asset));
        }
        if state.reserve_list.len() >= MAX_RESERVES {
            return Err(LendingError::MaxReservesReached(MAX_RESERVES));
        }
        let reserve = Reserve::new(asset.clone(), risk_params, rate_model, now)?;
        state.reserve_list.push(asset.clone());
        state.reserves.insert(asset.clone(), reserve);
        tracing::info!(asset = %asset, "reserve initialized");
        Ok(PoolEvent::ReserveInitialized { asset })
    }

    pub fn freeze_reserve(&self, caller: &AccountId, asset: &AssetId) -> LendingResult<()> {
        let mut state = self.state.lock();
        state.access.require_admin(caller)?;
        state.reserve_mut(asset)?.is_frozen = true;
        tracing::info!(asset = %asset, "reserve frozen");
        Ok(())
    }

    pub fn unfreeze_reserve(&self, caller: &AccountId, asset: &AssetId) -> LendingResult<()> {
        let mut state = self.state.lock();
        state.access.require_admin(caller)?;
        state.reserve_mut(asset)?.is_frozen = false;
        tracing::info!(asset = %asset, "reserve unfrozen");
        Ok(())
    }

    pub fn pause(&self, caller: &AccountId) -> LendingResult<()> {
        let mut state = self.state.lock();
        state.access.require_admin(caller)?;
        state.paused = true;
        tracing::warn!("pool paused");
        Ok(())
    }

    pub fn unpause(&self, caller: &AccountId) -> LendingResult<()> {
        let mut state = self.state.lock();
        state.access.require_admin(caller)?;
        state.paused = false;
        tracing::info!("pool unpaused");
        Ok(())
    }

    pub fn grant_admin(&self, caller: &AccountId, new_admin: AccountId) -> LendingResult<()> {
        self.state.lock().access.grant_admin(caller, new_admin)
    }

    pub fn approve_borrow_delegation(&self, on_behalf_of: AccountId, delegate: AccountId) {
        self.state.lock().access.approve_borrow_delegation(on_behalf_of, delegate);
    }

    // ---- read-only views ----

    pub fn user_account_data(&self, user: &AccountId) -> LendingResult<AccountData> {
        self.state.lock().account_data(user)
    }

    pub fn health_factor(&self, user: &AccountId) -> LendingResult<U256> {
        Ok(self.user_account_data(user)?.health_factor())
    }

    /// Pool-custody cash, and total supply/debt converted to underlying
    /// units, for one reserve. Used to check the conservation invariant
    /// spec.md §8 states (`cash + totalDebt >= totalSupply`) without
    /// exposing the reserve's internal fields.
    pub fn reserve_snapshot(&self, asset: &AssetId) -> LendingResult<ReserveSnapshot> {
        let state = self.state.lock();
        let reserve = state.reserve(asset)?;
        Ok(ReserveSnapshot {
            cash: reserve.cash,
            total_supply_underlying: reserve
                .scaled_to_underlying(reserve.supply_claim.total_supply(), reserve.liquidity_index)?,
            total_debt_underlying: reserve.total_debt()?,
        })
    }

    // ---- core operations (spec.md §4.5.1 - §4.5.5) ----

    /// `deposit(asset, amount, onBehalfOf)` — spec.md §4.5.1. `caller` pulls
    /// `amount` of the underlying from their own custody; the minted claim
    /// is credited to `on_behalf_of`, which may differ from `caller` (e.g.
    /// depositing on behalf of a vault or a different account), mirroring
    /// the explicit `caller: AccountId` parameter spec.md REDESIGN FLAGS
    /// requires in place of `msg.sender` on every controller operation.
    pub fn deposit(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: U256,
        on_behalf_of: &AccountId,
        now: u64,
    ) -> LendingResult<PoolEvent> {
        if amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }
        let mut state = self.state.lock();
        if state.paused {
            return Err(LendingError::Paused);
        }
        let reserve = state.reserve_mut(asset)?;
        reserve.require_not_frozen()?;
        reserve.update_state(now)?;

        let scaled_amount = reserve.underlying_to_scaled(amount, reserve.liquidity_index)?;
        reserve.cash = checked_add(reserve.cash, amount)?;
        reserve.supply_claim.mint(asset, on_behalf_of, scaled_amount)?;

        tracing::info!(asset = %asset, caller = %caller, on_behalf_of = %on_behalf_of, %amount, %scaled_amount, "deposit");
        Ok(PoolEvent::Deposit {
            user: on_behalf_of.clone(),
            asset: asset.clone(),
            amount,
            claim_minted: scaled_amount,
        })
    }

    /// `withdraw(asset, amount, to) -> actualAmount` — spec.md §4.5.2.
    pub fn withdraw(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: AmountOrMax,
        to: &AccountId,
        now: u64,
    ) -> LendingResult<(U256, PoolEvent)> {
        let mut state = self.state.lock();
        // Frozen reserves still service withdraw (spec.md §4.5.6); only
        // an uninitialized/never-active reserve is rejected.
        state.reserve_mut(asset)?.require_active()?;
        state.reserve_mut(asset)?.update_state(now)?;

        let (user_underlying, liquidity_index, threshold_bps) = {
            let reserve = state.reserve(asset)?;
            let user_scaled = reserve.supply_claim.balance_of(caller);
            let user_underlying = reserve.scaled_to_underlying(user_scaled, reserve.liquidity_index)?;
            (user_underlying, reserve.liquidity_index, reserve.risk_params.liquidation_threshold_bps)
        };

        let actual_amount = match amount {
            AmountOrMax::Max => user_underlying,
            AmountOrMax::Exact(a) => a.min(user_underlying),
        };
        if actual_amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }

        let account_data = state.account_data(caller)?;
        if !account_data.debt_usd.is_zero() {
            let price = state.oracle.get_asset_price(asset)?;
            let removed_value_usd = mul_div(mul_div(actual_amount, price, wad())?, U256::from(threshold_bps), lending_common::bps())?;
            let hypothetical_collateral = checked_sub(account_data.collateral_usd, removed_value_usd)?;
            let hypothetical_hf = mul_div(hypothetical_collateral, wad(), account_data.debt_usd)?;
            if hypothetical_hf < wad() {
                return Err(LendingError::HealthFactorTooLow(caller.clone()));
            }
        }

        let reserve = state.reserve_mut(asset)?;
        let scaled_to_burn = reserve.underlying_to_scaled(actual_amount, liquidity_index)?;
        reserve.supply_claim.burn(asset, caller, scaled_to_burn)?;
        reserve.cash = checked_sub(reserve.cash, actual_amount).map_err(|_| LendingError::InsufficientBalance(caller.clone(), asset.clone()))?;

        tracing::info!(asset = %asset, user = %caller, to = %to, amount = %actual_amount, "withdraw");
        Ok((
            actual_amount,
            PoolEvent::Withdraw {
                user: caller.clone(),
                asset: asset.clone(),
                amount: actual_amount,
            },
        ))
    }

    /// `borrow(asset, amount, onBehalfOf)` — spec.md §4.5.3.
    pub fn borrow(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: U256,
        on_behalf_of: &AccountId,
        now: u64,
    ) -> LendingResult<PoolEvent> {
        if amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }
        let mut state = self.state.lock();
        if state.paused {
            return Err(LendingError::Paused);
        }
        state.access.require_borrow_authorized(caller, on_behalf_of)?;

        {
            let reserve = state.reserve_mut(asset)?;
            reserve.require_not_frozen()?;
            reserve.update_state(now)?;
        }

        let account_data = state.account_data(on_behalf_of)?;
        let price = state.oracle.get_asset_price(asset)?;
        let added_debt_usd = mul_div(amount, price, wad())?;
        let new_debt_usd = checked_add(account_data.debt_usd, added_debt_usd)?;
        let hf_after = mul_div(account_data.collateral_usd, wad(), new_debt_usd)?;
        if hf_after < wad() {
            return Err(LendingError::HealthFactorTooLow(on_behalf_of.clone()));
        }

        let reserve = state.reserve_mut(asset)?;
        if reserve.cash < amount {
            return Err(LendingError::InsufficientBalance(caller.clone(), asset.clone()));
        }
        let scaled_amount = reserve.underlying_to_scaled(amount, reserve.variable_borrow_index)?;
        reserve.debt_claim.mint(asset, on_behalf_of, scaled_amount)?;
        reserve.cash = checked_sub(reserve.cash, amount)?;

        tracing::info!(asset = %asset, caller = %caller, on_behalf_of = %on_behalf_of, %amount, "borrow");
        Ok(PoolEvent::Borrow {
            user: on_behalf_of.clone(),
            asset: asset.clone(),
            amount,
        })
    }

    /// `repay(asset, amount, onBehalfOf) -> actualAmount` — spec.md §4.5.4.
    /// `caller` pulls `actual_amount` of the underlying from their own
    /// custody; the debt burned is `on_behalf_of`'s, which may differ from
    /// `caller` (anyone may repay down another account's debt), mirroring
    /// the explicit `caller: AccountId` parameter spec.md REDESIGN FLAGS
    /// requires in place of `msg.sender` on every controller operation.
    pub fn repay(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: AmountOrMax,
        on_behalf_of: &AccountId,
        now: u64,
    ) -> LendingResult<(U256, PoolEvent)> {
        let mut state = self.state.lock();
        let reserve = state.reserve_mut(asset)?;
        reserve.update_state(now)?;

        let user_debt_scaled = reserve.debt_claim.balance_of(on_behalf_of);
        let user_debt = reserve.scaled_to_underlying(user_debt_scaled, reserve.variable_borrow_index)?;

        let actual_amount = match amount {
            AmountOrMax::Max => user_debt,
            AmountOrMax::Exact(a) => a.min(user_debt),
        };
        if actual_amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }

        let scaled_to_burn = reserve.underlying_to_scaled(actual_amount, reserve.variable_borrow_index)?;
        reserve.debt_claim.burn(asset, on_behalf_of, scaled_to_burn)?;
        reserve.cash = checked_add(reserve.cash, actual_amount)?;

        tracing::info!(asset = %asset, caller = %caller, on_behalf_of = %on_behalf_of, amount = %actual_amount, "repay");
        Ok((
            actual_amount,
            PoolEvent::Repay {
                user: on_behalf_of.clone(),
                asset: asset.clone(),
                amount: actual_amount,
            },
        ))
    }

    /// `liquidate(collateralAsset, debtAsset, borrower, debtToCover)` —
    /// spec.md §4.5.5. Clamps `collateralToSeize` to the borrower's
    /// actual supply-claim balance and reduces `actualCover`
    /// proportionally when the naive seize amount would exceed it
    /// (spec.md §9 Open Question 4, decided in DESIGN.md).
    pub fn liquidate(
        &self,
        liquidator: &AccountId,
        collateral_asset: &AssetId,
        debt_asset: &AssetId,
        borrower: &AccountId,
        debt_to_cover: U256,
        now: u64,
    ) -> LendingResult<PoolEvent> {
        if collateral_asset == debt_asset {
            return Err(LendingError::SameAsset);
        }
        let mut state = self.state.lock();
        if state.paused {
            return Err(LendingError::Paused);
        }

        let health_factor_before = state.account_data(borrower)?.health_factor();
        if health_factor_before >= wad() {
            return Err(LendingError::PositionHealthy(borrower.clone()));
        }

        state.reserve_mut(debt_asset)?.update_state(now)?;
        state.reserve_mut(collateral_asset)?.update_state(now)?;

        let (user_debt, borrow_index) = {
            let reserve = state.reserve(debt_asset)?;
            let scaled_debt = reserve.debt_claim.balance_of(borrower);
            (reserve.scaled_to_underlying(scaled_debt, reserve.variable_borrow_index)?, reserve.variable_borrow_index)
        };

        let max_cover = mul_div(user_debt, U256::from(5_000u32), lending_common::bps())?;
        let mut actual_cover = debt_to_cover.min(max_cover);

        let debt_price = state.oracle.get_asset_price(debt_asset)?;
        let collateral_price = state.oracle.get_asset_price(collateral_asset)?;
        let bonus_bps = state.reserve(collateral_asset)?.risk_params.liquidation_bonus_bps;
        let (liquidity_index, borrower_collateral_underlying) = {
            let reserve = state.reserve(collateral_asset)?;
            let scaled = reserve.supply_claim.balance_of(borrower);
            (reserve.liquidity_index, reserve.scaled_to_underlying(scaled, reserve.liquidity_index)?)
        };

        let debt_value_usd = mul_div(actual_cover, debt_price, wad())?;
        let collateral_units = mul_div(debt_value_usd, wad(), collateral_price)?;
        let mut collateral_to_seize = mul_div(collateral_units, U256::from(10_000u32 + bonus_bps), lending_common::bps())?;

        if collateral_to_seize > borrower_collateral_underlying {
            // Proactively clamp: seize everything the borrower has, and
            // reduce the debt actually covered by the same proportion so
            // the two stay consistent (no over-seizing, no phantom debt
            // relief beyond what was actually collateralized).
            if !collateral_to_seize.is_zero() {
                actual_cover = mul_div(actual_cover, borrower_collateral_underlying, collateral_to_seize)?;
            }
            collateral_to_seize = borrower_collateral_underlying;
        }

        if actual_cover.is_zero() {
            return Err(LendingError::ZeroAmount);
        }

        {
            let debt_reserve = state.reserve_mut(debt_asset)?;
            let scaled_to_burn = debt_reserve.underlying_to_scaled(actual_cover, borrow_index)?;
            debt_reserve.debt_claim.burn(debt_asset, borrower, scaled_to_burn)?;
            debt_reserve.cash = checked_add(debt_reserve.cash, actual_cover)?;
        }
        {
            let collateral_reserve = state.reserve_mut(collateral_asset)?;
            let scaled_to_seize = collateral_reserve.underlying_to_scaled(collateral_to_seize, liquidity_index)?;
            collateral_reserve
                .supply_claim
                .transfer_on_liquidation(collateral_asset, borrower, liquidator, scaled_to_seize)?;
        }

        let health_factor_after = state.account_data(borrower)?.health_factor();
        if health_factor_after < health_factor_before {
            // Should be unreachable given the accounting above; surfaced
            // defensively since spec.md §8 requires this never to regress.
            return Err(LendingError::HealthFactorTooLow(borrower.clone()));
        }

        tracing::info!(
            liquidator = %liquidator, borrower = %borrower, collateral_asset = %collateral_asset,
            debt_asset = %debt_asset, debt_covered = %actual_cover, collateral_seized = %collateral_to_seize,
            "liquidation"
        );
        Ok(PoolEvent::Liquidation {
            liquidator: liquidator.clone(),
            borrower: borrower.clone(),
            collateral_asset: collateral_asset.clone(),
            debt_asset: debt_asset.clone(),
            debt_covered: actual_cover,
            collateral_seized: collateral_to_seize,
        })
    }
}
