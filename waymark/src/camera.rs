use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::RwLock;
use waymark_types::cartesian::{Point2d, Size};
use waymark_types::geo::{GeoPoint2d, WebMercator};

/// Size of a map tile in pixels at integer zoom levels.
pub const TILE_SIZE: f64 = 512.0;

/// Position of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Geographic point at the center of the viewport.
    pub center: GeoPoint2d,
    /// Zoom level.
    pub zoom: f64,
    /// Rotation of the map in degrees clockwise from north.
    pub bearing: f64,
    /// Tilt of the map in degrees.
    pub pitch: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center: GeoPoint2d::default(),
            zoom: 0.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

/// Camera of the rendering engine. Used to convert between screen points and geographic coordinates.
///
/// Implementations must return live values: a drag that happens while the map is being panned uses
/// the camera state of the current frame.
pub trait MapCamera: MaybeSend + MaybeSync {
    /// Current camera state.
    fn camera_state(&self) -> CameraState;
    /// Screen point of the given coordinate.
    fn point_for(&self, coordinate: &GeoPoint2d) -> Point2d;
    /// Coordinate rendered at the given screen point.
    fn coordinate_for(&self, point: &Point2d) -> GeoPoint2d;
}

/// North-up, untilted Web Mercator camera.
///
/// This is enough for engines that render a flat map, and for tests. `bearing` and `pitch` of the state
/// are ignored by the conversions.
pub struct MercatorCamera {
    state: RwLock<CameraState>,
    size: RwLock<Size>,
    projection: WebMercator,
}

impl Default for MercatorCamera {
    fn default() -> Self {
        Self::new(CameraState::default(), Size::new(TILE_SIZE, TILE_SIZE))
    }
}

impl MercatorCamera {
    /// Creates a camera with the given state over a viewport of the given size.
    pub fn new(state: CameraState, size: Size) -> Self {
        Self {
            state: RwLock::new(state),
            size: RwLock::new(size),
            projection: WebMercator::default(),
        }
    }

    /// Moves the camera.
    pub fn set_state(&self, state: CameraState) {
        *self.state.write() = state;
    }

    /// Centers the camera at the given point.
    pub fn set_center(&self, center: GeoPoint2d) {
        self.state.write().center = center;
    }

    /// Sets the zoom level.
    pub fn set_zoom(&self, zoom: f64) {
        self.state.write().zoom = zoom;
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        *self.size.read()
    }

    /// Sets the viewport size.
    pub fn set_size(&self, size: Size) {
        *self.size.write() = size;
    }

    /// Projected meters per screen pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        self.projection.world_size() / (TILE_SIZE * 2f64.powf(self.camera_state().zoom))
    }

    fn projected_center(&self) -> Option<Point2d> {
        self.projection.project(&self.camera_state().center)
    }
}

impl MapCamera for MercatorCamera {
    fn camera_state(&self) -> CameraState {
        *self.state.read()
    }

    fn point_for(&self, coordinate: &GeoPoint2d) -> Point2d {
        let (Some(center), Some(projected)) =
            (self.projected_center(), self.projection.project(coordinate))
        else {
            return Point2d::new(f64::NAN, f64::NAN);
        };

        let size = self.size();
        let resolution = self.resolution();
        Point2d::new(
            size.half_width() + (projected.x - center.x) / resolution,
            size.half_height() - (projected.y - center.y) / resolution,
        )
    }

    fn coordinate_for(&self, point: &Point2d) -> GeoPoint2d {
        let Some(center) = self.projected_center() else {
            return GeoPoint2d::latlon(f64::NAN, f64::NAN);
        };

        let size = self.size();
        let resolution = self.resolution();
        let projected = Point2d::new(
            center.x + (point.x - size.half_width()) * resolution,
            center.y - (point.y - size.half_height()) * resolution,
        );

        self.projection
            .unproject(&projected)
            .unwrap_or(GeoPoint2d::latlon(f64::NAN, f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use waymark_types::latlon;

    use super::*;

    #[test]
    fn center_is_in_the_middle_of_the_viewport() {
        let camera = MercatorCamera::new(
            CameraState {
                center: latlon!(10.0, 20.0),
                zoom: 3.0,
                ..Default::default()
            },
            Size::new(400.0, 300.0),
        );

        assert_abs_diff_eq!(
            camera.point_for(&latlon!(10.0, 20.0)),
            Point2d::new(200.0, 150.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn world_fits_one_tile_at_zoom_zero() {
        let camera = MercatorCamera::default();

        assert_abs_diff_eq!(
            camera.point_for(&latlon!(0.0, -180.0)),
            Point2d::new(0.0, TILE_SIZE / 2.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            camera.point_for(&latlon!(0.0, 90.0)),
            Point2d::new(TILE_SIZE * 0.75, TILE_SIZE / 2.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn north_is_up() {
        let camera = MercatorCamera::default();
        let point = camera.point_for(&latlon!(45.0, 0.0));
        assert!(point.y < TILE_SIZE / 2.0);
    }

    #[test]
    fn coordinate_for_inverts_point_for() {
        let camera = MercatorCamera::new(
            CameraState {
                center: latlon!(-33.9, 151.2),
                zoom: 11.5,
                ..Default::default()
            },
            Size::new(800.0, 600.0),
        );

        let coordinate = latlon!(-33.85, 151.25);
        let point = camera.point_for(&coordinate);
        assert_abs_diff_eq!(camera.coordinate_for(&point), coordinate, epsilon = 1e-9);
    }

    #[test]
    fn conversions_follow_camera_moves() {
        let camera = MercatorCamera::default();
        let before = camera.point_for(&latlon!(0.0, 0.0));
        camera.set_center(latlon!(0.0, 90.0));
        let after = camera.point_for(&latlon!(0.0, 0.0));

        assert_abs_diff_eq!(before.x - after.x, TILE_SIZE / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn resolution_halves_with_each_zoom_level() {
        let camera = MercatorCamera::default();
        let world = camera.resolution() * TILE_SIZE;
        camera.set_zoom(1.0);

        assert_abs_diff_eq!(camera.resolution() * TILE_SIZE * 2.0, world, epsilon = 1e-6);
        assert_eq!(camera.camera_state().zoom, 1.0);
    }
}
