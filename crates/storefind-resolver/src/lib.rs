//! Store resolution orchestrator.
//!
//! Resolves a grocery store chain name plus a user origin (coordinates or
//! postal code) to a concrete nearby store location, reading through a
//! three-tier cache: process memory → `store_locations_cache` → maps API.
//! Candidate places are validated against the brand-family signature matcher
//! and a driving-distance travel budget before acceptance.

mod batch;
mod distance;
mod hint;
mod memory;
mod resolve;

pub use distance::haversine_meters;
pub use hint::looks_like_street_address;
pub use resolve::{ResolveRequest, ResolverConfig, StoreResolver};

use thiserror::Error;

/// Errors that abort resolution outright.
///
/// Everything else (a failed search pass, an unreachable cache) is non-fatal:
/// it is logged and the resolver falls through to the next strategy, per the
/// layered-fallback design.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The maps provider refused further requests; stop the whole run.
    #[error("maps client error: {0}")]
    Maps(#[from] storefind_maps::MapsError),
}
