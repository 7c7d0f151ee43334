//! Tiered resolution: memory cache → persistent cache → maps API, with the
//! API path running a strategy ladder (address hint, alias text search with
//! radius expansion, nearby-search fallback) and validating every candidate
//! against the signature matcher and the travel budget.

use std::cmp::Ordering;

use sqlx::PgPool;

use storefind_core::{
    canonicalize, AppConfig, FamilyIndex, GeocodeResult, LatLng, StoreGeocodeMetadata,
    StoreMatcher,
};
use storefind_db::{
    get_cached_location, upsert_cached_location, GroceryStoreRow, NewCachedLocation,
};
use storefind_maps::{MapsClient, MapsError, PlaceCandidate};

use crate::distance::haversine_meters;
use crate::hint::looks_like_street_address;
use crate::memory::{cache_key, MemoryCache};
use crate::ResolverError;

/// One store to resolve: a name, a user origin, and optional scraper hints.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Free-text store or chain name, e.g. `"Kroger"` or `"Fred Meyer #61"`.
    pub name: String,
    /// User postal code. Required for the persistent cache tier; also used
    /// as the search origin when no coordinates are given.
    pub postal_code: Option<String>,
    /// User coordinates. Preferred over the postal code as search origin.
    pub coordinates: Option<LatLng>,
    /// Scraper-supplied hints biasing the match.
    pub metadata: StoreGeocodeMetadata,
}

impl ResolveRequest {
    /// Build a request for a known store row, resolving near `postal_code`.
    #[must_use]
    pub fn from_store(store: &GroceryStoreRow, postal_code: &str) -> Self {
        Self {
            name: store.display_name.clone(),
            postal_code: Some(postal_code.to_string()),
            coordinates: None,
            metadata: store.geocode_metadata(),
        }
    }
}

/// Resolver tuning knobs. Defaults match the env-var defaults in
/// `storefind-core`.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub search_radius_meters: f64,
    /// One radius expansion is attempted at `radius × factor`; this product
    /// is also the hard cap on an accepted result's straight-line distance
    /// from the origin.
    pub radius_expansion_factor: f64,
    pub travel_budget_meters: f64,
    pub strict_travel_multiplier: f64,
    pub relaxed_travel_multiplier: f64,
    pub cache_ttl_days: i64,
    pub memory_cache_capacity: u64,
    pub batch_inter_request_delay_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 8_000.0,
            radius_expansion_factor: 2.5,
            travel_budget_meters: 16_000.0,
            strict_travel_multiplier: 1.0,
            relaxed_travel_multiplier: 1.6,
            cache_ttl_days: 365,
            memory_cache_capacity: 4_096,
            batch_inter_request_delay_ms: 250,
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_radius_meters: config.search_radius_meters,
            radius_expansion_factor: config.radius_expansion_factor,
            travel_budget_meters: config.travel_budget_meters,
            strict_travel_multiplier: config.strict_travel_multiplier,
            relaxed_travel_multiplier: config.relaxed_travel_multiplier,
            cache_ttl_days: config.cache_ttl_days,
            memory_cache_capacity: config.memory_cache_capacity,
            batch_inter_request_delay_ms: config.batch_inter_request_delay_ms,
        }
    }
}

/// Resolves store names to locations through the three-tier cache.
pub struct StoreResolver {
    maps: MapsClient,
    pool: PgPool,
    families: FamilyIndex,
    memory: MemoryCache,
    pub(crate) config: ResolverConfig,
}

impl StoreResolver {
    #[must_use]
    pub fn new(
        maps: MapsClient,
        pool: PgPool,
        families: FamilyIndex,
        config: ResolverConfig,
    ) -> Self {
        let memory = MemoryCache::new(config.memory_cache_capacity);
        Self {
            maps,
            pool,
            families,
            memory,
            config,
        }
    }

    /// Resolve one store to a location near the request's origin.
    ///
    /// Read path: memory tier → persistent tier (TTL-windowed) → maps API.
    /// A successful API resolution is written through to both cache tiers.
    /// Requests without a postal code skip both caches, since entries are
    /// keyed by `(canonical_name, postal_code)`.
    ///
    /// Exhausting every strategy returns `Ok(None)`; the caller decides
    /// whether that is an error. Database failures on the cache path are
    /// logged and treated as misses.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Maps`] only when the provider reports an
    /// exceeded quota — continuing would burn the remaining budget.
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<GeocodeResult>, ResolverError> {
        let canonical = canonicalize(&request.name);
        if canonical.is_empty() {
            tracing::warn!(name = %request.name, "store name has empty signature — skipping");
            return Ok(None);
        }

        let key = request
            .postal_code
            .as_deref()
            .map(|zip| cache_key(&canonical, zip));

        if let Some(key) = &key {
            if let Some(hit) = self.memory.get(key) {
                tracing::debug!(%key, "memory cache hit");
                return Ok(Some(hit));
            }
            if let Some(hit) = self.read_persistent_tier(&canonical, request).await {
                self.memory.insert(key.clone(), hit.clone());
                return Ok(Some(hit));
            }
        }

        let resolved = self.resolve_via_api(request).await?;

        if let (Some(result), Some(zip)) = (&resolved, request.postal_code.as_deref()) {
            if let Some(key) = key {
                self.memory.insert(key, result.clone());
            }
            let entry = NewCachedLocation::from_result(&canonical, zip, result);
            if let Err(error) = upsert_cached_location(&self.pool, &entry).await {
                tracing::warn!(%canonical, zip, %error, "persistent cache write failed");
            }
        }

        Ok(resolved)
    }

    async fn read_persistent_tier(
        &self,
        canonical: &str,
        request: &ResolveRequest,
    ) -> Option<GeocodeResult> {
        let zip = request.postal_code.as_deref()?;
        match get_cached_location(&self.pool, canonical, zip, self.config.cache_ttl_days).await {
            Ok(Some(row)) => {
                tracing::debug!(%canonical, zip, "persistent cache hit");
                Some(row.into_geocode_result())
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%canonical, zip, %error, "cache read failed — treating as miss");
                None
            }
        }
    }

    /// The API tier: strategy ladder in priority order, each falling through
    /// to the next on failure.
    async fn resolve_via_api(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<GeocodeResult>, ResolverError> {
        let matcher = StoreMatcher::new(&request.name, &request.metadata.aliases, &self.families);
        if matcher.signature_count() == 0 {
            return Ok(None);
        }

        let origin = self.search_origin(request).await?;

        // Strategy 1: geocode a scraper-supplied street address directly.
        if let Some(result) = self.try_address_hint(request, origin).await? {
            return Ok(Some(result));
        }

        let Some(origin) = origin else {
            tracing::warn!(name = %request.name, "no usable search origin — giving up");
            return Ok(None);
        };

        // Strategy 2: alias text search, expanding the radius once when a
        // full pass produces nothing acceptable.
        let base_radius = self.config.search_radius_meters;
        let expanded_radius = base_radius * self.config.radius_expansion_factor;
        let search_names = self.search_names(request);

        for radius in [base_radius, expanded_radius] {
            for name in &search_names {
                let candidates = match self.maps.text_search(name, origin, radius).await {
                    Ok(candidates) => candidates,
                    Err(error) => {
                        fail_soft(error, "textsearch")?;
                        continue;
                    }
                };
                if let Some(result) = self.select_candidate(&matcher, origin, candidates).await? {
                    return Ok(Some(result));
                }
            }

            // Strategy 3: nearby-search fallback by the requested name alone.
            let candidates = match self.maps.nearby_search(&request.name, origin, radius).await {
                Ok(candidates) => candidates,
                Err(error) => {
                    fail_soft(error, "nearbysearch")?;
                    continue;
                }
            };
            if let Some(result) = self.select_candidate(&matcher, origin, candidates).await? {
                return Ok(Some(result));
            }

            tracing::debug!(
                name = %request.name,
                radius,
                "no acceptable candidate at this radius"
            );
        }

        tracing::info!(name = %request.name, "all geocoding strategies exhausted");
        Ok(None)
    }

    /// Resolve the search origin: explicit coordinates win; otherwise the
    /// postal code is forward-geocoded.
    async fn search_origin(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<LatLng>, ResolverError> {
        if let Some(coordinates) = request.coordinates {
            return Ok(Some(coordinates));
        }
        let Some(zip) = request.postal_code.as_deref() else {
            return Ok(None);
        };
        match self.maps.geocode_address(zip).await {
            Ok(Some(geocoded)) => Ok(Some(LatLng {
                lat: geocoded.lat,
                lng: geocoded.lng,
            })),
            Ok(None) => {
                tracing::warn!(zip, "postal code did not geocode");
                Ok(None)
            }
            Err(error) => {
                fail_soft(error, "geocode postal code")?;
                Ok(None)
            }
        }
    }

    async fn try_address_hint(
        &self,
        request: &ResolveRequest,
        origin: Option<LatLng>,
    ) -> Result<Option<GeocodeResult>, ResolverError> {
        let Some(hint) = request.metadata.hint.as_deref() else {
            return Ok(None);
        };
        if !looks_like_street_address(hint) {
            return Ok(None);
        }

        let geocoded = match self.maps.geocode_address(hint).await {
            Ok(Some(geocoded)) => geocoded,
            Ok(None) => return Ok(None),
            Err(error) => {
                fail_soft(error, "geocode hint")?;
                return Ok(None);
            }
        };

        let location = LatLng {
            lat: geocoded.lat,
            lng: geocoded.lng,
        };
        let cap = self.config.search_radius_meters * self.config.radius_expansion_factor;
        if let Some(origin) = origin {
            let straight = haversine_meters(origin, location);
            if straight > cap {
                tracing::debug!(
                    hint,
                    straight,
                    cap,
                    "hint geocoded outside the radius budget — ignoring"
                );
                return Ok(None);
            }
        }

        // The hint was scraper-supplied for this exact store, so the
        // requested name is the matched label.
        Ok(Some(GeocodeResult {
            lat: geocoded.lat,
            lng: geocoded.lng,
            formatted_address: geocoded.formatted_address,
            matched_name: request.name.clone(),
        }))
    }

    /// All display-name variants worth a text search: brand-family members
    /// first, then scraper aliases not already covered.
    fn search_names(&self, request: &ResolveRequest) -> Vec<String> {
        let mut names = self.families.family_members(&request.name);
        for alias in &request.metadata.aliases {
            let sig = canonicalize(alias);
            if !sig.is_empty() && !names.iter().any(|n| canonicalize(n) == sig) {
                names.push(alias.clone());
            }
        }
        names
    }

    /// Filter candidates through the matcher, order by straight-line
    /// distance, and validate the survivors' driving distance against the
    /// travel budget (strict first, then relaxed).
    async fn select_candidate(
        &self,
        matcher: &StoreMatcher,
        origin: LatLng,
        candidates: Vec<PlaceCandidate>,
    ) -> Result<Option<GeocodeResult>, ResolverError> {
        let cap = self.config.search_radius_meters * self.config.radius_expansion_factor;

        let mut scored: Vec<(f64, PlaceCandidate)> = candidates
            .into_iter()
            .filter(|candidate| {
                let accepted = matcher.matches(&candidate.name);
                if !accepted {
                    tracing::debug!(name = %candidate.name, "candidate rejected by matcher");
                }
                accepted
            })
            .map(|candidate| {
                let location = LatLng {
                    lat: candidate.lat,
                    lng: candidate.lng,
                };
                (haversine_meters(origin, location), candidate)
            })
            .filter(|(straight, _)| *straight <= cap)
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let strict_budget = self.config.travel_budget_meters * self.config.strict_travel_multiplier;
        let relaxed_budget =
            self.config.travel_budget_meters * self.config.relaxed_travel_multiplier;
        let mut relaxed_fallback: Option<&PlaceCandidate> = None;

        for (straight, candidate) in &scored {
            let destination = LatLng {
                lat: candidate.lat,
                lng: candidate.lng,
            };
            let driving = match self.maps.driving_distance_meters(origin, destination).await {
                Ok(driving) => driving,
                Err(error) => {
                    fail_soft(error, "routes distance")?;
                    None
                }
            };

            match driving {
                Some(driving) if driving <= strict_budget => {
                    tracing::debug!(
                        name = %candidate.name,
                        straight,
                        driving,
                        "candidate accepted within strict travel budget"
                    );
                    return Ok(Some(to_result(candidate)));
                }
                Some(driving) if driving <= relaxed_budget => {
                    if relaxed_fallback.is_none() {
                        relaxed_fallback = Some(candidate);
                    }
                }
                Some(driving) => {
                    tracing::debug!(
                        name = %candidate.name,
                        driving,
                        relaxed_budget,
                        "candidate beyond relaxed travel budget — rejected"
                    );
                }
                // No route information: the straight-line cap already held,
                // so accept on that signal alone.
                None => return Ok(Some(to_result(candidate))),
            }
        }

        Ok(relaxed_fallback.map(to_result))
    }
}

fn to_result(candidate: &PlaceCandidate) -> GeocodeResult {
    GeocodeResult {
        lat: candidate.lat,
        lng: candidate.lng,
        formatted_address: candidate.formatted_address.clone(),
        matched_name: candidate.name.clone(),
    }
}

/// Quota exhaustion aborts the run; everything else is logged and absorbed
/// so the caller can fall through to its next strategy.
fn fail_soft(error: MapsError, context: &'static str) -> Result<(), ResolverError> {
    match error {
        MapsError::QuotaExceeded(_) => Err(ResolverError::Maps(error)),
        other => {
            tracing::warn!(context, error = %other, "maps call failed — falling through");
            Ok(())
        }
    }
}
