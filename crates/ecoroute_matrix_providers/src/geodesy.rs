pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers using the haversine formula.
///
/// Points follow the `geo` convention: `x` is the longitude, `y` the latitude.
/// NaN coordinates yield NaN.
pub fn distance_km<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    let from: geo_types::Point = from.into();
    let to: geo_types::Point = to.into();

    let lat1_rad = from.y().to_radians();
    let lat2_rad = to.y().to_radians();

    let delta_lat = (to.y() - from.y()).to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use geo_types::Point;

    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let point = Point::new(14.459560361232214, 46.0506713158607);
        assert_eq!(distance_km(point, point), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(0.0, 1.0);

        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((distance_km(from, to) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let ljubljana = Point::new(14.5058, 46.0569);
        let maribor = Point::new(15.6459, 46.5547);

        let there = distance_km(ljubljana, maribor);
        let back = distance_km(maribor, ljubljana);

        assert!((there - back).abs() < 1e-9);
        assert!(there > 100.0 && there < 105.0);
    }

    #[test]
    fn test_nan_propagates() {
        let from = Point::new(f64::NAN, 46.0);
        let to = Point::new(14.0, 46.0);
        assert!(distance_km(from, to).is_nan());
    }
}
