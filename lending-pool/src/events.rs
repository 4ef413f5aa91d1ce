//! Pool-level event records (spec.md §6), emitted exactly once per
//! successful operation. Grounded on `lending_pool/src/events.rs`'s
//! plain event-struct style.

use lending_common::{AccountId, AssetId};
use primitive_types::U256;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PoolEvent {
    Deposit {
        user: AccountId,
        asset: AssetId,
        amount: U256,
        claim_minted: U256,
    },
    Withdraw {
        user: AccountId,
        asset: AssetId,
        amount: U256,
    },
    Borrow {
        user: AccountId,
        asset: AssetId,
        amount: U256,
    },
    Repay {
        user: AccountId,
        asset: AssetId,
        amount: U256,
    },
    Liquidation {
        liquidator: AccountId,
        borrower: AccountId,
        collateral_asset: AssetId,
        debt_asset: AssetId,
        debt_covered: U256,
        collateral_seized: U256,
    },
    ReserveInitialized {
        asset: AssetId,
    },
}
