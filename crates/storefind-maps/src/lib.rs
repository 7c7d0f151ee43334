//! HTTP client for the maps proxy.
//!
//! The proxy fronts the upstream mapping provider (geocoding, place text and
//! nearby search, route distances) behind a single base URL and API key. All
//! endpoints share a JSON envelope with a `status` field; API-level failures
//! surface as [`MapsError::ApiError`] or [`MapsError::QuotaExceeded`].

mod client;
mod error;
mod retry;
mod types;

pub use client::MapsClient;
pub use error::MapsError;
pub use types::{GeocodedAddress, PlaceCandidate};
