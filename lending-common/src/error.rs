//! Error taxonomy for the lending engine.
//!
//! The source (`common/errors/src/errors.rs`) is a flat list of `&[u8]`
//! message constants with no structure a caller could match on. This
//! restructures the same set of failure modes into a `thiserror` enum,
//! grouped per spec.md §7's six categories, in the style of
//! `rust-blockchain`'s `BlockchainError`.

use thiserror::Error;

use crate::ids::{AccountId, AssetId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    // --- configuration faults ---
    #[error("asset {0} is not active")]
    AssetNotActive(AssetId),
    #[error("reserve for asset {0} is already initialized")]
    ReserveAlreadyInitialized(AssetId),
    #[error("reserve for asset {0} is not initialized")]
    ReserveNotInitialized(AssetId),
    #[error("invalid risk parameters for asset {0}: ltv, liquidation threshold and bps bounds must satisfy ltv <= threshold <= 10000 and bonus < 10000")]
    InvalidRiskParameters(AssetId),
    #[error("maximum number of reserves ({0}) reached")]
    MaxReservesReached(usize),

    // --- policy violations ---
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("reserve for asset {0} is frozen")]
    ReserveFrozen(AssetId),
    #[error("pool is paused")]
    Paused,
    #[error("collateral asset and debt asset must differ for liquidation")]
    SameAsset,
    #[error("debt claims are non-transferable")]
    NonTransferableDebt,
    #[error("caller {caller} lacks required role {role}")]
    Unauthorized { caller: AccountId, role: &'static str },
    #[error("caller {caller} is not authorized to borrow on behalf of {on_behalf_of}")]
    BorrowNotDelegated { caller: AccountId, on_behalf_of: AccountId },
    #[error("reentrant call into the pool controller")]
    Reentrancy,

    // --- solvency violations ---
    #[error("operation would leave account {0} with a health factor below 1.0")]
    HealthFactorTooLow(AccountId),
    #[error("account {0} is not eligible for liquidation (health factor >= 1.0)")]
    PositionHealthy(AccountId),

    // --- asset-transfer faults ---
    #[error("insufficient underlying balance for account {0} on asset {1}")]
    InsufficientBalance(AccountId, AssetId),
    #[error("insufficient supply-claim balance for account {0} on asset {1}")]
    InsufficientSupplyClaim(AccountId, AssetId),
    #[error("insufficient debt-claim balance for account {0} on asset {1}")]
    InsufficientDebtClaim(AccountId, AssetId),

    // --- oracle faults ---
    #[error("no price available for asset {0}")]
    PriceUnavailable(AssetId),

    // --- arithmetic faults ---
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("arithmetic underflow")]
    ArithmeticUnderflow,
    #[error("division by zero")]
    DivisionByZero,
}

pub type LendingResult<T> = Result<T, LendingError>;
