/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Great-circle distance in nautical miles between two lat/long points (degrees).
///
/// Inputs are not validated; NaN propagates.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c / KM_PER_NAUTICAL_MILE
}

/// Arithmetic mean of the given (lat, lon) points.
pub fn centroid<I>(points: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (count, lat_sum, lon_sum) = points
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), (p_lat, p_lon)| {
            (n + 1, lat + p_lat, lon + p_lon)
        });

    if count == 0 {
        None
    } else {
        Some((lat_sum / count as f64, lon_sum / count as f64))
    }
}
