//! Row types for the `store_locations_cache` table.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use storefind_core::GeocodeResult;

/// Input record for inserting/refreshing a cache entry.
#[derive(Debug, Clone)]
pub struct NewCachedLocation {
    pub canonical_name: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub matched_name: String,
}

impl NewCachedLocation {
    #[must_use]
    pub fn from_result(
        canonical_name: &str,
        postal_code: &str,
        result: &GeocodeResult,
    ) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            postal_code: postal_code.to_string(),
            latitude: result.lat,
            longitude: result.lng,
            formatted_address: result.formatted_address.clone(),
            matched_name: result.matched_name.clone(),
        }
    }
}

/// A row from the `store_locations_cache` table.
///
/// Coordinates are stored as `NUMERIC(9,6)` and read back through a
/// `::float8` cast, so they arrive here as `f64`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CachedLocationRow {
    pub id: i64,
    pub public_id: Uuid,
    pub canonical_name: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub matched_name: String,
    pub created_at: DateTime<Utc>,
}

impl CachedLocationRow {
    /// Convert back into the resolver's result shape.
    #[must_use]
    pub fn into_geocode_result(self) -> GeocodeResult {
        GeocodeResult {
            lat: self.latitude,
            lng: self.longitude,
            formatted_address: self.formatted_address,
            matched_name: self.matched_name,
        }
    }
}
