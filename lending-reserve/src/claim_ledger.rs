//! Supply-claim and debt-claim ledgers (spec.md §3).
//!
//! The source tracks only pool-wide `supplied_amount`/`borrowed_amount`
//! totals in `liquidity_pool/src/liq_storage.rs` — per-user balances live
//! in the larger `lending_pool` crate's position NFTs
//! (`common/tokens/src/tokens.rs::AccountTokenModule`). spec.md §3 folds
//! both into one per-reserve, per-account ledger (no NFT indirection, see
//! DESIGN.md's "Simplifications" section), so this generalizes the
//! teacher's scalar totals into a `HashMap`-backed balance map that also
//! tracks its own running total supply.
//!
//! All balances are **scaled**: the underlying-asset amount an account
//! can redeem is `scaled_balance * index / RAY` (spec.md §4.3).

use std::collections::HashMap;

use lending_common::{checked_add, checked_sub, AccountId, AssetId, LendingError, LendingResult};
use primitive_types::U256;

use crate::events::{BurnEvent, MintEvent, TransferOnLiquidationEvent};

/// Supply-side claim ledger: mint on deposit, burn on withdraw, transfer
/// only as part of liquidation (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct SupplyClaimLedger {
    balances: HashMap<AccountId, U256>,
    total_supply: U256,
}

impl SupplyClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn mint(&mut self, asset: &AssetId, account: &AccountId, scaled_amount: U256) -> LendingResult<MintEvent> {
        let current = self.balance_of(account);
        let updated = checked_add(current, scaled_amount)?;
        self.total_supply = checked_add(self.total_supply, scaled_amount)?;
        self.balances.insert(account.clone(), updated);
        Ok(MintEvent {
            account: account.clone(),
            asset: asset.clone(),
            scaled_amount,
        })
    }

    pub fn burn(&mut self, asset: &AssetId, account: &AccountId, scaled_amount: U256) -> LendingResult<BurnEvent> {
        let current = self.balance_of(account);
        if current < scaled_amount {
            return Err(LendingError::InsufficientSupplyClaim(account.clone(), asset.clone()));
        }
        let updated = checked_sub(current, scaled_amount)?;
        self.total_supply = checked_sub(self.total_supply, scaled_amount)?;
        self.balances.insert(account.clone(), updated);
        Ok(BurnEvent {
            account: account.clone(),
            asset: asset.clone(),
            scaled_amount,
        })
    }

    /// The only transfer primitive the supply ledger allows: moving a
    /// seized amount from a liquidated borrower to the liquidator.
    pub fn transfer_on_liquidation(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        scaled_amount: U256,
    ) -> LendingResult<TransferOnLiquidationEvent> {
        let from_balance = self.balance_of(from);
        if from_balance < scaled_amount {
            return Err(LendingError::InsufficientSupplyClaim(from.clone(), asset.clone()));
        }
        let from_updated = checked_sub(from_balance, scaled_amount)?;
        let to_updated = checked_add(self.balance_of(to), scaled_amount)?;
        self.balances.insert(from.clone(), from_updated);
        self.balances.insert(to.clone(), to_updated);
        Ok(TransferOnLiquidationEvent {
            from: from.clone(),
            to: to.clone(),
            asset: asset.clone(),
            scaled_amount,
        })
    }
}

/// Debt-side claim ledger: mint on borrow, burn on repay or liquidation.
/// Transfers and approvals are forbidden (spec.md §3) — there is
/// deliberately no `transfer` method here at all.
#[derive(Debug, Clone, Default)]
pub struct DebtClaimLedger {
    balances: HashMap<AccountId, U256>,
    total_supply: U256,
}

impl DebtClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn mint(&mut self, asset: &AssetId, account: &AccountId, scaled_amount: U256) -> LendingResult<MintEvent> {
        let current = self.balance_of(account);
        let updated = checked_add(current, scaled_amount)?;
        self.total_supply = checked_add(self.total_supply, scaled_amount)?;
        self.balances.insert(account.clone(), updated);
        Ok(MintEvent {
            account: account.clone(),
            asset: asset.clone(),
            scaled_amount,
        })
    }

    pub fn burn(&mut self, asset: &AssetId, account: &AccountId, scaled_amount: U256) -> LendingResult<BurnEvent> {
        let current = self.balance_of(account);
        if current < scaled_amount {
            return Err(LendingError::InsufficientDebtClaim(account.clone(), asset.clone()));
        }
        let updated = checked_sub(current, scaled_amount)?;
        self.total_supply = checked_sub(self.total_supply, scaled_amount)?;
        self.balances.insert(account.clone(), updated);
        Ok(BurnEvent {
            account: account.clone(),
            asset: asset.clone(),
            scaled_amount,
        })
    }
}
