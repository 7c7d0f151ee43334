//! Session-lifetime memory tier of the resolver cache.
//!
//! A bounded, thread-safe map from `canonical_name:postal_code` to the
//! resolved location. Unlike the persistent tier there is no TTL here — the
//! cache lives only as long as the resolver instance.

use moka::sync::Cache;

use storefind_core::GeocodeResult;

pub(crate) struct MemoryCache {
    entries: Cache<String, GeocodeResult>,
}

impl MemoryCache {
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::new(capacity),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<GeocodeResult> {
        self.entries.get(key)
    }

    pub(crate) fn insert(&self, key: String, result: GeocodeResult) {
        self.entries.insert(key, result);
    }
}

/// Cache key shared by the memory and persistent tiers.
pub(crate) fn cache_key(canonical_name: &str, postal_code: &str) -> String {
    format!("{canonical_name}:{postal_code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(lat: f64) -> GeocodeResult {
        GeocodeResult {
            lat,
            lng: -84.5,
            formatted_address: "addr".to_string(),
            matched_name: "Kroger".to_string(),
        }
    }

    #[test]
    fn roundtrip_returns_inserted_value() {
        let cache = MemoryCache::new(16);
        cache.insert(cache_key("kroger", "45202"), result(39.1));
        let hit = cache.get("kroger:45202").expect("hit");
        assert!((hit.lat - 39.1).abs() < f64::EPSILON);
    }

    #[test]
    fn distinct_postal_codes_do_not_collide() {
        let cache = MemoryCache::new(16);
        cache.insert(cache_key("kroger", "45202"), result(39.1));
        assert!(cache.get("kroger:90210").is_none());
    }
}
