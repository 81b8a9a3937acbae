//! Cached-view invalidation
//!
//! The page/data cache itself lives outside this service (frontend query
//! cache, edge cache). This module publishes which view scopes a mutation
//! dirtied; subscribers re-fetch or drop the affected views.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Cached view scopes known to the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    Checkout,
    Inventory,
    Dashboard,
    Properties,
    Bookings,
    Guests,
}

impl CacheScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheScope::Checkout => "checkout",
            CacheScope::Inventory => "inventory",
            CacheScope::Dashboard => "dashboard",
            CacheScope::Properties => "properties",
            CacheScope::Bookings => "bookings",
            CacheScope::Guests => "guests",
        }
    }
}

/// Scopes dirtied by a successful checkout
pub const CHECKOUT_SCOPES: &[CacheScope] = &[
    CacheScope::Checkout,
    CacheScope::Inventory,
    CacheScope::Dashboard,
    CacheScope::Properties,
    CacheScope::Bookings,
    CacheScope::Guests,
];

/// Broadcast-based invalidation publisher held in `AppState`
#[derive(Clone)]
pub struct CacheInvalidator {
    tx: broadcast::Sender<CacheScope>,
}

impl CacheInvalidator {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish invalidations. Lagging or absent subscribers are fine; the
    /// cache is advisory and re-fetches on demand.
    pub fn invalidate(&self, scopes: &[CacheScope]) {
        for scope in scopes {
            let _ = self.tx.send(*scope);
        }
    }

    /// Subscribe to invalidation events (used by push channels to the
    /// front-end)
    pub fn subscribe(&self) -> broadcast::Receiver<CacheScope> {
        self.tx.subscribe()
    }
}

impl Default for CacheInvalidator {
    fn default() -> Self {
        Self::new()
    }
}
