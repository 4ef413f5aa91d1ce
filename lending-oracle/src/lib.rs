//! Price oracle interface consumed by the lending pool (spec.md §4.2).
//!
//! Grounded on `controller/src/oracle/mod.rs`'s multi-source adapter and
//! `price_aggregator/src/views.rs::latest_price_feed` (fail when no round
//! exists for the pair). The settlement-specific machinery — TWAP
//! cross-validation, LP-token pricing, tolerance bands — is out of scope
//! per spec.md §1 ("the price-oracle feed's interface only is specified");
//! this crate keeps only the narrow read contract plus a single documented
//! fallback hop, preserved from the teacher's "mixed validation" idea in
//! its simplest form.

use std::collections::HashMap;
use std::sync::Arc;

use lending_common::{wad, AssetId, LendingError, LendingResult};
use parking_lot::RwLock;
use primitive_types::U256;

/// Read-only interface the pool controller consults for USD prices.
///
/// Implementations MUST return a strictly positive WAD price or fail;
/// they MUST NOT treat a missing price as zero (spec.md §7, oracle faults).
/// A fallback chain, if any, must resolve in at most one hop — an
/// implementation's `get_asset_price` must not itself depend on another
/// oracle that can recurse further (spec.md §4.2).
pub trait PriceOracle: Send + Sync {
    fn get_asset_price(&self, asset: &AssetId) -> LendingResult<U256>;
}

/// Simple in-memory oracle adapter: an admin-maintained price map with
/// one optional fallback oracle consulted when the primary has nothing.
/// Suitable as the reference implementation and for tests; a production
/// deployment would point this at a real off-chain feed.
pub struct StaticPriceOracle {
    prices: RwLock<HashMap<AssetId, U256>>,
    fallback: Option<Arc<dyn PriceOracle>>,
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            fallback: None,
        }
    }

    pub fn with_fallback(fallback: Arc<dyn PriceOracle>) -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            fallback: Some(fallback),
        }
    }

    /// Admin action: sets or updates the WAD price for `asset`. Rejects
    /// non-positive prices outright since spec.md §4.2 requires the
    /// contract to hold for every stored price, not just at read time.
    pub fn set_price(&self, asset: AssetId, price_wad: U256) -> LendingResult<()> {
        if price_wad.is_zero() {
            return Err(LendingError::PriceUnavailable(asset));
        }
        self.prices.write().insert(asset, price_wad);
        Ok(())
    }

    pub fn remove_price(&self, asset: &AssetId) {
        self.prices.write().remove(asset);
    }
}

impl Default for StaticPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceOracle for StaticPriceOracle {
    fn get_asset_price(&self, asset: &AssetId) -> LendingResult<U256> {
        if let Some(price) = self.prices.read().get(asset).copied() {
            tracing::trace!(asset = %asset, price = %price, "oracle price hit");
            return Ok(price);
        }
        if let Some(fallback) = &self.fallback {
            tracing::debug!(asset = %asset, "primary oracle miss, consulting fallback");
            return fallback.get_asset_price(asset);
        }
        Err(LendingError::PriceUnavailable(asset.clone()))
    }
}

/// Oracle that returns a fixed price for every asset; used in unit tests
/// that don't care about per-asset pricing (e.g. single-asset scenarios).
pub struct FixedPriceOracle(pub U256);

impl FixedPriceOracle {
    pub fn one_dollar() -> Self {
        Self(wad())
    }
}

impl PriceOracle for FixedPriceOracle {
    fn get_asset_price(&self, _asset: &AssetId) -> LendingResult<U256> {
        Ok(self.0)
    }
}
