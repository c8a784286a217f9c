use crate::cartesian::Point2d;
use crate::geo::{Datum, GeoPoint2d};

/// Latitude limit of the Web Mercator projection in degrees.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051128779806604;

/// Spherical Web Mercator projection (EPSG:3857). Projected coordinates are in meters.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection with the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    /// Datum of the projection.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Length of the equator in projected meters.
    pub fn world_size(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.datum.semimajor()
    }

    /// Projects a geographic point into meters. Returns `None` for the poles and non-finite input.
    pub fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + input.lat_rad() / 2.0)
                .tan()
                .ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2d::new(x, y))
        } else {
            None
        }
    }

    /// Converts projected meters back into a geographic point.
    pub fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        let lat = 2.0 * (input.y / self.datum.semimajor()).exp().atan() - std::f64::consts::FRAC_PI_2;
        let lon = input.x / self.datum.semimajor();

        let point = GeoPoint2d::latlon(lat.to_degrees(), lon.to_degrees());
        point.is_finite().then_some(point)
    }
}
