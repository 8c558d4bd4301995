//! Great-circle geodesy on a spherical earth.
//!
//! Good to ~0.5% against the WGS-84 ellipsoid, which is well inside the
//! tolerance of a speed advisory that gets re-solved every cycle anyway.

/// Mean earth radius (m).
const R_EARTH_M: f64 = 6_371_000.0;

/// Bearing (degrees, 0 = north, CW positive) and great-circle distance (m)
/// from point 1 to point 2. Inputs in degrees.
pub fn qdr_dist(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> (f64, f64) {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlat = (lat2_deg - lat1_deg).to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();

    // Haversine distance
    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let dist = 2.0 * R_EARTH_M * a.sqrt().atan2((1.0 - a).sqrt());

    // Initial bearing
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let qdr = y.atan2(x).to_degrees().rem_euclid(360.0);

    (qdr, dist)
}

/// Great-circle distance only (m).
pub fn dist_m(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    qdr_dist(lat1_deg, lon1_deg, lat2_deg, lon2_deg).1
}

/// Destination point after travelling `dist_m` along `qdr_deg` from a start
/// point. Returns (lat, lon) in degrees.
pub fn pos_after(lat_deg: f64, lon_deg: f64, qdr_deg: f64, dist_m: f64) -> (f64, f64) {
    let lat1 = lat_deg.to_radians();
    let lon1 = lon_deg.to_radians();
    let brg = qdr_deg.to_radians();
    let delta = dist_m / R_EARTH_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brg.cos()).asin();
    let lon2 = lon1
        + (brg.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), normalize_lon(lon2.to_degrees()))
}

fn normalize_lon(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}
