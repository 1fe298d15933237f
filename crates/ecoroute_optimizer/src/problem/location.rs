use ecoroute_matrix_providers::geodesy;

/// A geographic coordinate. Stored as a `geo::Point`, so `x` is the longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn is_finite(&self) -> bool {
        self.lat().is_finite() && self.lon().is_finite()
    }

    pub fn distance_km(&self, to: &Location) -> f64 {
        geodesy::distance_km(self.point, to.point)
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

impl From<&Location> for geo::Coord<f64> {
    fn from(location: &Location) -> Self {
        location.point.0
    }
}
