//! Live integration tests for storefind-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/storefind-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use storefind_db::{
    count_cached_locations, get_cached_location, get_store, list_stores_by_brand,
    purge_expired_locations, upsert_cached_location, NewCachedLocation,
};

fn entry(canonical_name: &str, postal_code: &str, lat: f64, lng: f64) -> NewCachedLocation {
    NewCachedLocation {
        canonical_name: canonical_name.to_string(),
        postal_code: postal_code.to_string(),
        latitude: lat,
        longitude: lng,
        formatted_address: "100 E Court St, Cincinnati, OH 45202".to_string(),
        matched_name: "Kroger".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn cache_roundtrip_returns_written_coordinates(pool: sqlx::PgPool) {
    let written = entry("kroger", "45202", 39.104300, -84.509800);
    upsert_cached_location(&pool, &written).await.unwrap();

    let row = get_cached_location(&pool, "kroger", "45202", 365)
        .await
        .unwrap()
        .expect("fresh entry must be a cache hit");

    // NUMERIC(9,6) storage must hand back exactly what was written.
    assert!((row.latitude - written.latitude).abs() < 1e-6);
    assert!((row.longitude - written.longitude).abs() < 1e-6);
    assert_eq!(row.formatted_address, written.formatted_address);
    assert_eq!(row.matched_name, written.matched_name);
}

#[sqlx::test(migrations = "../../migrations")]
async fn cache_miss_for_other_postal_code(pool: sqlx::PgPool) {
    upsert_cached_location(&pool, &entry("kroger", "45202", 39.1, -84.5))
        .await
        .unwrap();

    let miss = get_cached_location(&pool, "kroger", "90210", 365)
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_replaces_existing_entry(pool: sqlx::PgPool) {
    upsert_cached_location(&pool, &entry("kroger", "45202", 39.1, -84.5))
        .await
        .unwrap();
    upsert_cached_location(&pool, &entry("kroger", "45202", 39.2283, -84.5936))
        .await
        .unwrap();

    assert_eq!(count_cached_locations(&pool).await.unwrap(), 1);

    let row = get_cached_location(&pool, "kroger", "45202", 365)
        .await
        .unwrap()
        .expect("entry must still exist after replace");
    assert!((row.latitude - 39.2283).abs() < 1e-6);
    assert!((row.longitude - (-84.5936)).abs() < 1e-6);
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_entries_are_not_returned(pool: sqlx::PgPool) {
    upsert_cached_location(&pool, &entry("kroger", "45202", 39.1, -84.5))
        .await
        .unwrap();

    // Backdate past the TTL window.
    sqlx::query(
        "UPDATE store_locations_cache SET created_at = NOW() - INTERVAL '400 days' \
         WHERE canonical_name = $1",
    )
    .bind("kroger")
    .execute(&pool)
    .await
    .unwrap();

    let miss = get_cached_location(&pool, "kroger", "45202", 365)
        .await
        .unwrap();
    assert!(miss.is_none(), "row older than the TTL must be a miss");
}

#[sqlx::test(migrations = "../../migrations")]
async fn purge_removes_only_expired_entries(pool: sqlx::PgPool) {
    upsert_cached_location(&pool, &entry("kroger", "45202", 39.1, -84.5))
        .await
        .unwrap();
    upsert_cached_location(&pool, &entry("safeway", "94110", 37.7, -122.4))
        .await
        .unwrap();

    sqlx::query(
        "UPDATE store_locations_cache SET created_at = NOW() - INTERVAL '400 days' \
         WHERE canonical_name = $1",
    )
    .bind("safeway")
    .execute(&pool)
    .await
    .unwrap();

    let removed = purge_expired_locations(&pool, 365).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(count_cached_locations(&pool).await.unwrap(), 1);

    let survivor = get_cached_location(&pool, "kroger", "45202", 365)
        .await
        .unwrap();
    assert!(survivor.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn stores_list_and_get_roundtrip(pool: sqlx::PgPool) {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO grocery_stores (brand, display_name, address, postal_code, metadata) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind("kroger")
    .bind("Kroger Downtown")
    .bind("100 E Court St")
    .bind("45202")
    .bind(serde_json::json!({"hint": "100 E Court St, Cincinnati OH", "aliases": ["Store #014"]}))
    .fetch_one(&pool)
    .await
    .unwrap();

    let listed = list_stores_by_brand(&pool, "kroger").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].display_name, "Kroger Downtown");

    let fetched = get_store(&pool, id).await.unwrap().expect("store exists");
    let meta = fetched.geocode_metadata();
    assert_eq!(meta.hint.as_deref(), Some("100 E Court St, Cincinnati OH"));
    assert_eq!(meta.aliases, vec!["Store #014"]);

    assert!(list_stores_by_brand(&pool, "albertsons")
        .await
        .unwrap()
        .is_empty());
    assert!(get_store(&pool, id + 999).await.unwrap().is_none());
}
