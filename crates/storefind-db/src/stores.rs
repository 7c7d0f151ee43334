//! Read operations for the `grocery_stores` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use storefind_core::StoreGeocodeMetadata;

/// A row from the `grocery_stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroceryStoreRow {
    pub id: i64,
    pub public_id: Uuid,
    /// Canonical chain slug, e.g. `"kroger"`.
    pub brand: String,
    pub display_name: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// Chain-specific scraper data: address hint, provider store IDs, extra
    /// display names.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroceryStoreRow {
    /// Extract the resolver-facing hints from the `metadata` JSON blob.
    ///
    /// The blob is scraper-shaped and lenient: `hint` falls back to the
    /// `address` key some scrapers use, and `aliases` tolerates non-string
    /// array elements by skipping them.
    #[must_use]
    pub fn geocode_metadata(&self) -> StoreGeocodeMetadata {
        let hint = self
            .metadata
            .get("hint")
            .or_else(|| self.metadata.get("address"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let aliases = self
            .metadata
            .get("aliases")
            .and_then(serde_json::Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        StoreGeocodeMetadata { hint, aliases }
    }
}

/// List all stores for a canonical brand slug, ordered by `display_name`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores_by_brand(
    pool: &PgPool,
    brand: &str,
) -> Result<Vec<GroceryStoreRow>, sqlx::Error> {
    sqlx::query_as::<_, GroceryStoreRow>(
        "SELECT id, public_id, brand, display_name, address, postal_code, \
                latitude, longitude, metadata, created_at, updated_at \
         FROM grocery_stores \
         WHERE brand = $1 \
         ORDER BY display_name ASC",
    )
    .bind(brand)
    .fetch_all(pool)
    .await
}

/// Fetch a single store by primary key.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_store(pool: &PgPool, id: i64) -> Result<Option<GroceryStoreRow>, sqlx::Error> {
    sqlx::query_as::<_, GroceryStoreRow>(
        "SELECT id, public_id, brand, display_name, address, postal_code, \
                latitude, longitude, metadata, created_at, updated_at \
         FROM grocery_stores \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with_metadata(metadata: serde_json::Value) -> GroceryStoreRow {
        GroceryStoreRow {
            id: 1,
            public_id: Uuid::nil(),
            brand: "kroger".to_string(),
            display_name: "Kroger".to_string(),
            address: None,
            postal_code: Some("45202".to_string()),
            latitude: None,
            longitude: None,
            metadata,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn geocode_metadata_reads_hint_and_aliases() {
        let row = row_with_metadata(serde_json::json!({
            "hint": "100 E Court St, Cincinnati OH",
            "aliases": ["Kroger Downtown", "Store #014"],
            "kroger_store_id": "014"
        }));
        let meta = row.geocode_metadata();
        assert_eq!(meta.hint.as_deref(), Some("100 E Court St, Cincinnati OH"));
        assert_eq!(meta.aliases, vec!["Kroger Downtown", "Store #014"]);
    }

    #[test]
    fn geocode_metadata_falls_back_to_address_key() {
        let row = row_with_metadata(serde_json::json!({
            "address": "9001 Colerain Ave"
        }));
        let meta = row.geocode_metadata();
        assert_eq!(meta.hint.as_deref(), Some("9001 Colerain Ave"));
        assert!(meta.aliases.is_empty());
    }

    #[test]
    fn geocode_metadata_skips_non_string_aliases() {
        let row = row_with_metadata(serde_json::json!({
            "aliases": ["QFC", 42, null, "Quality Food Centers"]
        }));
        let meta = row.geocode_metadata();
        assert_eq!(meta.aliases, vec!["QFC", "Quality Food Centers"]);
    }

    #[test]
    fn geocode_metadata_empty_blob_is_default() {
        let row = row_with_metadata(serde_json::json!({}));
        let meta = row.geocode_metadata();
        assert!(meta.hint.is_none());
        assert!(meta.aliases.is_empty());
    }
}
