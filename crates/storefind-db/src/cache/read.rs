//! Read operations for the `store_locations_cache` table.

use sqlx::PgPool;

use super::types::CachedLocationRow;

/// Look up a cache entry by canonical name and postal code, honouring the
/// TTL window: rows older than `ttl_days` are treated as absent.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_cached_location(
    pool: &PgPool,
    canonical_name: &str,
    postal_code: &str,
    ttl_days: i64,
) -> Result<Option<CachedLocationRow>, sqlx::Error> {
    sqlx::query_as::<_, CachedLocationRow>(
        "SELECT id, public_id, canonical_name, postal_code, \
                latitude::float8 AS latitude, longitude::float8 AS longitude, \
                formatted_address, matched_name, created_at \
         FROM store_locations_cache \
         WHERE canonical_name = $1 \
           AND postal_code = $2 \
           AND created_at > NOW() - ($3 * INTERVAL '1 day')",
    )
    .bind(canonical_name)
    .bind(postal_code)
    .bind(ttl_days)
    .fetch_optional(pool)
    .await
}

/// Count all cache entries, including expired ones (CLI stats).
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_cached_locations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM store_locations_cache")
        .fetch_one(pool)
        .await
}
