//! In-memory caching using moka
//!
//! Holds the hotel catalog snapshot used for pricing and the grouped trip
//! options. Both change rarely and are read on every quote edit, so they are
//! cached and invalidated on write.
//!
//! Each entry carries a generation counter. Invalidation bumps it, and a
//! snapshot loaded before the bump is never left in the cache.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::db::queries;
use crate::models::TripOptions;
use crate::pricing::models::HotelRateSheet;

const CATALOG_KEY: &str = "catalog";
const TRIP_OPTIONS_KEY: &str = "trip_options";

/// Application cache holding the catalog snapshot and trip options
#[derive(Clone)]
pub struct AppCache {
    /// Hotel catalog snapshot (singleton)
    pub catalog: Cache<String, Arc<Vec<HotelRateSheet>>>,
    /// Trip options grouped by category (singleton)
    pub trip_options: Cache<String, Arc<TripOptions>>,
    catalog_generation: Arc<AtomicU64>,
    trip_options_generation: Arc<AtomicU64>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Catalog: 1 entry, 30 min TTL, invalidated on hotel writes
            catalog: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Trip options: 1 entry, 30 min TTL
            trip_options: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            catalog_generation: Arc::new(AtomicU64::new(0)),
            trip_options_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generation to capture before loading the catalog from the database
    pub fn catalog_generation(&self) -> u64 {
        self.catalog_generation.load(Ordering::SeqCst)
    }

    pub fn trip_options_generation(&self) -> u64 {
        self.trip_options_generation.load(Ordering::SeqCst)
    }

    pub async fn get_catalog(&self) -> Option<Arc<Vec<HotelRateSheet>>> {
        self.catalog.get(CATALOG_KEY).await
    }

    /// Cache a catalog loaded at `generation`.
    ///
    /// The snapshot is returned either way, but it only stays cached if no
    /// hotel write invalidated the catalog since `generation` was read.
    pub async fn set_catalog(
        &self,
        catalog: Vec<HotelRateSheet>,
        generation: u64,
    ) -> Arc<Vec<HotelRateSheet>> {
        let snapshot = Arc::new(catalog);
        self.catalog
            .insert(CATALOG_KEY.to_string(), snapshot.clone())
            .await;

        // Checked after the insert: a concurrent invalidation either sees
        // our entry and removes it, or has already bumped the counter.
        if self.catalog_generation() != generation {
            self.catalog.invalidate(CATALOG_KEY).await;
            debug!("Dropped catalog snapshot from generation {}", generation);
        }
        snapshot
    }

    pub async fn get_trip_options(&self) -> Option<Arc<TripOptions>> {
        self.trip_options.get(TRIP_OPTIONS_KEY).await
    }

    /// Cache trip options loaded at `generation`, same rules as the catalog
    pub async fn set_trip_options(&self, options: TripOptions, generation: u64) -> Arc<TripOptions> {
        let grouped = Arc::new(options);
        self.trip_options
            .insert(TRIP_OPTIONS_KEY.to_string(), grouped.clone())
            .await;

        if self.trip_options_generation() != generation {
            self.trip_options.invalidate(TRIP_OPTIONS_KEY).await;
            debug!("Dropped trip options from generation {}", generation);
        }
        grouped
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            catalog_cached: self.catalog.contains_key(CATALOG_KEY),
            trip_options_cached: self.trip_options.contains_key(TRIP_OPTIONS_KEY),
        }
    }

    /// Drop the catalog snapshot after a hotel write
    pub async fn invalidate_catalog(&self) {
        self.catalog_generation.fetch_add(1, Ordering::SeqCst);
        self.catalog.invalidate(CATALOG_KEY).await;
        info!("Catalog cache invalidated");
    }

    pub async fn invalidate_trip_options(&self) {
        self.trip_options_generation.fetch_add(1, Ordering::SeqCst);
        self.trip_options.invalidate(TRIP_OPTIONS_KEY).await;
        info!("Trip options cache invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub catalog_cached: bool,
    pub trip_options_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes it every `refresh` period.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, refresh: Duration) {
    let mut interval = interval(refresh);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Reload the catalog and trip options from the database
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let generation = cache.catalog_generation();
    match queries::list_hotels(db, None).await {
        Ok(hotels) => {
            let snapshot = hotels.iter().map(|h| h.rate_sheet()).collect();
            cache.set_catalog(snapshot, generation).await;
        }
        Err(e) => warn!("Failed to warm catalog cache: {}", e),
    }

    let generation = cache.trip_options_generation();
    match queries::list_trip_options(db).await {
        Ok(rows) => {
            cache.set_trip_options(TripOptions::group(&rows), generation).await;
        }
        Err(e) => warn!("Failed to warm trip options cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::RoomTable;

    fn sheet(name: &str) -> HotelRateSheet {
        HotelRateSheet {
            name: name.to_string(),
            city: "Makkah".to_string(),
            rates: RoomTable::default(),
        }
    }

    #[tokio::test]
    async fn test_catalog_set_get_invalidate() {
        let cache = AppCache::new();
        assert!(cache.get_catalog().await.is_none());

        cache
            .set_catalog(vec![sheet("Hilton Makkah")], cache.catalog_generation())
            .await;
        let snapshot = cache.get_catalog().await.unwrap();
        assert_eq!(snapshot[0].name, "Hilton Makkah");

        cache.invalidate_catalog().await;
        assert!(cache.get_catalog().await.is_none());
    }

    #[tokio::test]
    async fn test_trip_options_set_get_invalidate() {
        let cache = AppCache::new();
        cache
            .set_trip_options(TripOptions::default(), cache.trip_options_generation())
            .await;
        assert!(cache.get_trip_options().await.is_some());

        cache.invalidate_trip_options().await;
        assert!(cache.get_trip_options().await.is_none());
    }

    #[tokio::test]
    async fn test_stats_track_cached_entries() {
        let cache = AppCache::new();
        assert!(!cache.stats().catalog_cached);

        cache
            .set_catalog(vec![sheet("Pullman Zamzam")], cache.catalog_generation())
            .await;
        let stats = cache.stats();
        assert!(stats.catalog_cached);
        assert!(!stats.trip_options_cached);
    }

    #[tokio::test]
    async fn test_catalog_loaded_before_hotel_write_is_not_cached() {
        let cache = AppCache::new();
        let mut before = sheet("Hilton Makkah");
        before.rates.single = 100;

        // Reader captures the generation and loads the old rates
        let generation = cache.catalog_generation();
        // Hotel edited to 120 and the catalog invalidated meanwhile
        cache.invalidate_catalog().await;

        let served = cache.set_catalog(vec![before], generation).await;
        assert_eq!(served[0].rates.single, 100);
        assert!(cache.get_catalog().await.is_none());

        // The next reader starts after the write and may cache
        let mut after = sheet("Hilton Makkah");
        after.rates.single = 120;
        cache
            .set_catalog(vec![after], cache.catalog_generation())
            .await;
        assert_eq!(cache.get_catalog().await.unwrap()[0].rates.single, 120);
    }

    #[tokio::test]
    async fn test_trip_options_loaded_before_write_are_not_cached() {
        let cache = AppCache::new();
        let generation = cache.trip_options_generation();
        cache.invalidate_trip_options().await;

        cache.set_trip_options(TripOptions::default(), generation).await;
        assert!(cache.get_trip_options().await.is_none());
    }

    #[tokio::test]
    async fn test_generation_is_shared_between_clones() {
        let cache = AppCache::new();
        let handle = cache.clone();
        let generation = cache.catalog_generation();

        handle.invalidate_catalog().await;
        assert_ne!(cache.catalog_generation(), generation);
    }
}
