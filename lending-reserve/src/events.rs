//! Claim-ledger event records (spec.md §6: "Claim ledgers additionally
//! emit `Mint`, `Burn`, and (supply ledger only) `TransferOnLiquidation`").
//!
//! Grounded on `liquidity_pool/src/events.rs`'s `update_market_state_event`
//! style of plain append-only event structs, restated without the
//! settlement runtime's log-topic encoding.

use lending_common::{AccountId, AssetId};
use primitive_types::U256;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MintEvent {
    pub account: AccountId,
    pub asset: AssetId,
    pub scaled_amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BurnEvent {
    pub account: AccountId,
    pub asset: AssetId,
    pub scaled_amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferOnLiquidationEvent {
    pub from: AccountId,
    pub to: AccountId,
    pub asset: AssetId,
    pub scaled_amount: U256,
}
