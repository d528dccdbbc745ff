//! Offline request cache.
//!
//! This module keeps the wallet usable without connectivity. Two named
//! regions hold responses on disk: a static region filled once at install
//! with the application shell, and a data region that captures API
//! responses whenever the network delivers them.
//!
//! Strategies:
//! - API URLs: network first, cached copy on failure
//! - everything else: cached copy first, network passthrough on a miss
//!
//! The only eviction is `activate`, which deletes whole regions whose
//! names are no longer recognized after a version bump.

pub mod fetch;
pub mod region;
pub mod worker;

pub use fetch::{FetchError, FetchedResponse, Fetcher, HttpFetcher};
pub use region::{CacheRegion, CachedResponse, DATA_REGION, STATIC_REGION};
pub use worker::{OfflineCache, ServedFrom, ServedResponse, API_MARKER, APP_SHELL};
