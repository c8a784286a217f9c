use std::sync::Arc;

use waymark_types::cartesian::Vector2d;
use waymark_types::geo::{WebMercator, MAX_MERCATOR_LATITUDE};
use waymark_types::Geometry;

use crate::camera::MapCamera;

/// Translates annotation geometries by screen-space deltas.
///
/// The first vertex of the geometry is moved by the delta on the screen using the live camera state.
/// The resulting Web Mercator shift is then applied to every vertex, so lines and polygons keep their
/// shape in projected space wherever on the map they are dragged.
#[derive(Clone)]
pub struct OffsetCalculator {
    camera: Arc<dyn MapCamera>,
    projection: WebMercator,
}

impl OffsetCalculator {
    /// Creates a calculator that uses the given camera.
    pub fn new(camera: Arc<dyn MapCamera>) -> Self {
        Self {
            camera,
            projection: WebMercator::default(),
        }
    }

    /// Returns the geometry moved by `translation` pixels (`x` to the right, `y` down).
    ///
    /// Returns `None` if any of the resulting vertices would leave the Web Mercator latitude range, or if
    /// the camera cannot convert the points.
    pub fn geometry(&self, translation: Vector2d, geometry: &Geometry) -> Option<Geometry> {
        let start = *geometry.first_point()?;
        let start_screen = self.camera.point_for(&start);
        let target = self.camera.coordinate_for(&(start_screen + translation));
        if !target.is_finite() {
            return None;
        }

        let shift = self.projection.project(&target)? - self.projection.project(&start)?;

        geometry.map_points(|point| {
            let shifted = self
                .projection
                .unproject(&(self.projection.project(point)? + shift))?;
            (shifted.lat().abs() <= MAX_MERCATOR_LATITUDE).then_some(shifted)
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use waymark_types::cartesian::Size;
    use waymark_types::{latlon, Contour, Polygon};

    use super::*;
    use crate::camera::{CameraState, MercatorCamera, TILE_SIZE};

    fn calculator() -> OffsetCalculator {
        OffsetCalculator::new(Arc::new(MercatorCamera::default()))
    }

    #[test]
    fn point_follows_the_pointer() {
        let calculator = calculator();
        let moved = calculator
            .geometry(
                Vector2d::new(TILE_SIZE / 4.0, 0.0),
                &Geometry::Point(latlon!(0.0, 0.0)),
            )
            .expect("offset failed");

        let Geometry::Point(point) = moved else {
            panic!("geometry type changed");
        };
        assert_abs_diff_eq!(point, latlon!(0.0, 90.0), epsilon = 1e-9);
    }

    #[test]
    fn screen_down_is_south() {
        let calculator = calculator();
        let moved = calculator
            .geometry(Vector2d::new(0.0, 10.0), &Geometry::Point(latlon!(0.0, 0.0)))
            .expect("offset failed");

        let Geometry::Point(point) = moved else {
            panic!("geometry type changed");
        };
        assert!(point.lat() < 0.0);
        assert_abs_diff_eq!(point.lon(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn polygon_keeps_its_projected_shape() {
        let camera = Arc::new(MercatorCamera::new(
            CameraState {
                zoom: 4.0,
                ..Default::default()
            },
            Size::new(800.0, 600.0),
        ));
        let calculator = OffsetCalculator::new(camera);
        let polygon = Polygon::from(Contour::open(vec![
            latlon!(0.0, 0.0),
            latlon!(0.0, 10.0),
            latlon!(10.0, 10.0),
        ]));

        let moved = calculator
            .geometry(Vector2d::new(100.0, -50.0), &Geometry::Polygon(polygon))
            .expect("offset failed");

        let Geometry::Polygon(moved) = moved else {
            panic!("geometry type changed");
        };
        let points = moved.outer_contour().points();
        assert_abs_diff_eq!(points[1].lon() - points[0].lon(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[0].lat(), points[1].lat(), epsilon = 1e-9);
        assert!(points[0].lat() > 0.0);
    }

    #[test]
    fn move_beyond_mercator_limit_is_rejected() {
        let calculator = calculator();
        let line = Geometry::LineString(Contour::open(vec![
            latlon!(0.0, 0.0),
            latlon!(84.0, 0.0),
        ]));

        assert!(calculator
            .geometry(Vector2d::new(0.0, -100.0), &line)
            .is_none());
    }

    #[test]
    fn zero_translation_keeps_geometry() {
        let calculator = calculator();
        let geometry = Geometry::Point(latlon!(12.0, 34.0));
        let moved = calculator
            .geometry(Vector2d::zeros(), &geometry)
            .expect("offset failed");

        let Geometry::Point(point) = moved else {
            panic!("geometry type changed");
        };
        assert_abs_diff_eq!(point, latlon!(12.0, 34.0), epsilon = 1e-9);
    }
}
