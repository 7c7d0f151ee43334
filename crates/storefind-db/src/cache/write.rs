//! Write operations for the `store_locations_cache` table.

use sqlx::PgPool;

use super::types::NewCachedLocation;

/// Insert a cache entry, or replace the existing `(canonical_name,
/// postal_code)` entry and refresh its `created_at` so the TTL window
/// restarts.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_cached_location(
    pool: &PgPool,
    entry: &NewCachedLocation,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO store_locations_cache \
             (canonical_name, postal_code, latitude, longitude, \
              formatted_address, matched_name) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (canonical_name, postal_code) DO UPDATE SET \
             latitude          = EXCLUDED.latitude, \
             longitude         = EXCLUDED.longitude, \
             formatted_address = EXCLUDED.formatted_address, \
             matched_name      = EXCLUDED.matched_name, \
             created_at        = NOW()",
    )
    .bind(&entry.canonical_name)
    .bind(&entry.postal_code)
    .bind(entry.latitude)
    .bind(entry.longitude)
    .bind(&entry.formatted_address)
    .bind(&entry.matched_name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete cache entries older than the TTL window. Returns the number of
/// rows removed.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn purge_expired_locations(pool: &PgPool, ttl_days: i64) -> Result<u64, sqlx::Error> {
    let rows_affected = sqlx::query(
        "DELETE FROM store_locations_cache \
         WHERE created_at <= NOW() - ($1 * INTERVAL '1 day')",
    )
    .bind(ttl_days)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
