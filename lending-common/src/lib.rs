//! Shared ids, fixed-point arithmetic and error types for the lending engine.
//!
//! Grounded on the source's `common/constants`, `common/errors`,
//! `common/structs` and `common/math` crates, restated for a conventional
//! host instead of the settlement runtime (see DESIGN.md).

pub mod error;
pub mod fixed_point;
pub mod ids;

pub use error::{LendingError, LendingResult};
pub use fixed_point::{bps, checked_add, checked_sub, mul_div, ray, saturating_max, to_ray_fraction, wad, BPS};
pub use ids::{AccountId, AssetId, MAX_RESERVES};
