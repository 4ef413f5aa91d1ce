//! Account Aggregator and Pool Controller: the lending engine's state
//! machine (spec.md §4.4, §4.5).

pub mod access;
pub mod aggregator;
pub mod controller;
pub mod events;

pub use access::AccessControl;
pub use aggregator::{user_account_data, AccountData};
pub use controller::{AmountOrMax, LendingPool, ReserveSnapshot};
pub use events::PoolEvent;
