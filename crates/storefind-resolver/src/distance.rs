//! Straight-line distance on the WGS84 sphere.

use storefind_core::LatLng;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle (haversine) distance between two points, in meters.
#[must_use]
pub fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}
