//! The persistent tier of the resolver cache: the `store_locations_cache`
//! table, keyed by `(canonical_name, postal_code)` with an age-based TTL.

mod read;
mod types;
mod write;

pub use read::{count_cached_locations, get_cached_location};
pub use types::{CachedLocationRow, NewCachedLocation};
pub use write::{purge_expired_locations, upsert_cached_location};
