// Great-circle helpers used for location distances and near-event lookups.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in km and initial bearing in degrees `[0, 360)` from
/// point 1 to point 2.
pub fn distance_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    (distance, bearing)
}

/// 8-point compass label (German abbreviations) for a bearing in degrees.
pub fn approx_direction(bearing: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NO", "O", "SO", "S", "SW", "W", "NW"];
    let normalized = bearing.rem_euclid(360.0);
    let index = ((normalized + 22.5) / 45.0) as usize % 8;
    DIRECTIONS[index]
}
