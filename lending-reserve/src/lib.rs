//! Reserve ledger: per-asset interest indices, risk parameters and the
//! paired supply/debt claim ledgers (spec.md §3, §4.3).

pub mod claim_ledger;
pub mod events;
pub mod reserve;

pub use claim_ledger::{DebtClaimLedger, SupplyClaimLedger};
pub use events::{BurnEvent, MintEvent, TransferOnLiquidationEvent};
pub use reserve::{Reserve, RiskParams};
