//! Wire types for the maps proxy endpoints and the public result shapes.

use serde::Deserialize;

/// A forward-geocoded street address or postal code.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

/// A place returned by text or nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

// ---------------------------------------------------------------------------
// Response envelopes (proxy JSON shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeEntry {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesResponse {
    #[serde(default)]
    pub results: Vec<PlaceEntry>,
}

/// One place result. Text Search carries `formatted_address`; Nearby Search
/// carries `vicinity` instead.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaceEntry {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
}

impl PlaceEntry {
    pub(crate) fn into_candidate(self) -> PlaceCandidate {
        let formatted_address = self
            .formatted_address
            .or(self.vicinity)
            .unwrap_or_default();
        PlaceCandidate {
            name: self.name,
            lat: self.geometry.location.lat,
            lng: self.geometry.location.lng,
            formatted_address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoutesResponse {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteEntry {
    #[serde(rename = "distanceMeters")]
    pub distance_meters: f64,
}
