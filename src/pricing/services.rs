//! Pricing service functions with database access.
//!
//! These fetch the hotel catalog snapshot (cache first, then database) and
//! hand it to the pure calculators.

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::db::queries;
use crate::error::Result;
use crate::models::HotelRow;

use super::calculators::{price_quote, reprice};
use super::models::{HotelRateSheet, QuoteDraft, QuotePricing};

/// Current hotel catalog, as an immutable snapshot.
///
/// Served from the cache when present; otherwise loaded from the database
/// and cached until the next hotel write.
pub async fn catalog_snapshot(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<HotelRateSheet>>> {
    if let Some(cached) = cache.get_catalog().await {
        tracing::debug!("Cache HIT for hotel catalog ({} hotels)", cached.len());
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for hotel catalog");
    let generation = cache.catalog_generation();
    let hotels = queries::list_hotels(pool, None).await?;
    let snapshot = hotels.iter().map(HotelRow::rate_sheet).collect();

    Ok(cache.set_catalog(snapshot, generation).await)
}

/// Price a draft against the current catalog without modifying it
pub async fn price_draft(pool: &PgPool, cache: &AppCache, draft: &QuoteDraft) -> Result<QuotePricing> {
    let catalog = catalog_snapshot(pool, cache).await?;
    Ok(price_quote(draft, &catalog))
}

/// Reprice a draft in place against the current catalog.
///
/// Returns whether the derived fields changed.
pub async fn reprice_draft(pool: &PgPool, cache: &AppCache, draft: &mut QuoteDraft) -> Result<bool> {
    let catalog = catalog_snapshot(pool, cache).await?;
    let changed = reprice(draft, &catalog);

    tracing::debug!(
        "Repriced quote for {:?}: hotel_total={} total_amount={} changed={}",
        draft.client_name,
        draft.hotel_total,
        draft.total_amount,
        changed
    );

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::RoomTable;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        // Never connects: every test below is served from the cache
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }

    async fn seeded_cache() -> AppCache {
        let cache = AppCache::new();
        let catalog = vec![HotelRateSheet {
            name: "Hilton Makkah".to_string(),
            city: "Makkah".to_string(),
            rates: RoomTable {
                single: 100,
                double: 150,
                triple: 0,
                quad: 0,
            },
        }];
        cache.set_catalog(catalog, cache.catalog_generation()).await;
        cache
    }

    fn draft() -> QuoteDraft {
        let mut draft = QuoteDraft::default();
        draft.makkah.hotel = "Hilton Makkah".to_string();
        draft.makkah.nights = 3;
        draft.quantities.single = 2;
        draft.flight_price = 50;
        draft.number_of_people = 2;
        draft
    }

    #[tokio::test]
    async fn test_catalog_snapshot_from_cache() {
        let cache = seeded_cache().await;
        let snapshot = catalog_snapshot(&lazy_pool(), &cache).await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_price_draft_leaves_draft_alone() {
        let cache = seeded_cache().await;
        let draft = draft();

        let pricing = price_draft(&lazy_pool(), &cache, &draft).await.unwrap();
        assert_eq!(pricing.total_amount, 700);
        assert_eq!(draft.total_amount, 0);
    }

    #[tokio::test]
    async fn test_reprice_draft_in_place() {
        let cache = seeded_cache().await;
        let pool = lazy_pool();
        let mut draft = draft();

        assert!(reprice_draft(&pool, &cache, &mut draft).await.unwrap());
        assert_eq!(draft.hotel_total, 600);
        assert_eq!(draft.total_amount, 700);
        assert!(!reprice_draft(&pool, &cache, &mut draft).await.unwrap());
    }
}
