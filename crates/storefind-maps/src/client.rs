//! HTTP client for the maps proxy endpoints.
//!
//! Wraps `reqwest` with proxy-specific error handling, API key management,
//! and typed response deserialization. All endpoints check the `"status"`
//! field in the JSON envelope; transient failures are retried with
//! exponential back-off before surfacing.

use std::time::Duration;

use reqwest::{Client, Url};

use storefind_core::LatLng;

use crate::error::MapsError;
use crate::retry::retry_with_backoff;
use crate::types::{
    GeocodeResponse, GeocodedAddress, PlaceCandidate, PlacesResponse, RoutesResponse,
};

/// Client for the maps proxy.
///
/// Manages the HTTP client, API key, base URL, and retry policy. Point
/// `base_url` at a mock server in tests.
pub struct MapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl MapsClient {
    /// Creates a new client for the proxy at `base_url`.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for transient errors; `backoff_base_ms` is the base delay for
    /// exponential back-off.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`MapsError::ApiError`] if `base_url` is not a
    /// valid URL.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("storefind/0.1 (store-resolution)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends endpoint paths instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| MapsError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Forward-geocode a street address or postal code.
    ///
    /// Returns `Ok(None)` when the provider has no result for the address
    /// (`ZERO_RESULTS` or an empty result list).
    ///
    /// # Errors
    ///
    /// - [`MapsError::QuotaExceeded`] if the provider reports `OVER_QUERY_LIMIT`.
    /// - [`MapsError::ApiError`] on any other non-OK status.
    /// - [`MapsError::Http`] on network failure after all retries.
    /// - [`MapsError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode_address(
        &self,
        address: &str,
    ) -> Result<Option<GeocodedAddress>, MapsError> {
        let url = self.build_url("geocode/json", &[("address", address)])?;
        let body = self.request_with_retry(&url).await?;
        Self::check_status(&body)?;

        let response: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        Ok(response.results.into_iter().next().map(|entry| {
            GeocodedAddress {
                lat: entry.geometry.location.lat,
                lng: entry.geometry.location.lng,
                formatted_address: entry.formatted_address,
            }
        }))
    }

    /// Places Text Search biased to a location and radius.
    ///
    /// Returns an empty list on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// Same error surface as [`MapsClient::geocode_address`].
    pub async fn text_search(
        &self,
        query: &str,
        origin: LatLng,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>, MapsError> {
        let url = self.build_url(
            "place/textsearch/json",
            &[
                ("query", query),
                ("location", &format_lat_lng(origin)),
                ("radius", &format_radius(radius_meters)),
            ],
        )?;
        self.fetch_places(&url, "textsearch", query).await
    }

    /// Places Nearby Search by keyword around a location.
    ///
    /// Returns an empty list on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// Same error surface as [`MapsClient::geocode_address`].
    pub async fn nearby_search(
        &self,
        keyword: &str,
        origin: LatLng,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>, MapsError> {
        let url = self.build_url(
            "place/nearbysearch/json",
            &[
                ("keyword", keyword),
                ("location", &format_lat_lng(origin)),
                ("radius", &format_radius(radius_meters)),
            ],
        )?;
        self.fetch_places(&url, "nearbysearch", keyword).await
    }

    /// Driving distance in meters for one origin/destination pair via the
    /// Routes endpoint.
    ///
    /// Returns `Ok(None)` when no route exists between the points.
    ///
    /// # Errors
    ///
    /// Same error surface as [`MapsClient::geocode_address`].
    pub async fn driving_distance_meters(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<Option<f64>, MapsError> {
        let url = self.build_url(
            "routes/distance/json",
            &[
                ("origin", &format_lat_lng(origin)),
                ("destination", &format_lat_lng(destination)),
            ],
        )?;
        let body = self.request_with_retry(&url).await?;
        Self::check_status(&body)?;

        let response: RoutesResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: "routes/distance".to_string(),
                source: e,
            })?;

        Ok(response.routes.first().map(|r| r.distance_meters))
    }

    async fn fetch_places(
        &self,
        url: &Url,
        endpoint: &str,
        query: &str,
    ) -> Result<Vec<PlaceCandidate>, MapsError> {
        let body = self.request_with_retry(url).await?;
        Self::check_status(&body)?;

        let response: PlacesResponse =
            serde_json::from_value(body).map_err(|e| MapsError::Deserialize {
                context: format!("{endpoint}(query={query})"),
                source: e,
            })?;

        Ok(response
            .results
            .into_iter()
            .map(crate::types::PlaceEntry::into_candidate)
            .collect())
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending the API key.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, MapsError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| MapsError::ApiError(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with transient-error retry, asserts a 2xx HTTP
    /// status, and parses the response body as JSON.
    async fn request_with_retry(&self, url: &Url) -> Result<serde_json::Value, MapsError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(url)
        })
        .await
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, MapsError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Checks the top-level `"status"` field.
    ///
    /// `OK` and `ZERO_RESULTS` pass; `OVER_QUERY_LIMIT` becomes
    /// [`MapsError::QuotaExceeded`]; anything else becomes
    /// [`MapsError::ApiError`] carrying the provider's `error_message` when
    /// present.
    fn check_status(body: &serde_json::Value) -> Result<(), MapsError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MISSING_STATUS");

        if status == "OK" || status == "ZERO_RESULTS" {
            return Ok(());
        }

        let message = body
            .get("error_message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(status)
            .to_string();

        if status == "OVER_QUERY_LIMIT" {
            return Err(MapsError::QuotaExceeded(message));
        }
        Err(MapsError::ApiError(message))
    }
}

fn format_lat_lng(point: LatLng) -> String {
    format!("{},{}", point.lat, point.lng)
}

fn format_radius(radius_meters: f64) -> String {
    format!("{}", radius_meters.round())
}
