//! Contour is a sequence of points.
//!
//! An open contour corresponds to the OGC `LineString`. Closed contours are only used as polygon rings
//! and, unlike `LineString`, do not duplicate the first point at the end. The closing point is added back
//! when a ring is serialized with [`Contour::iter_points_closing`].

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint2d;

/// Sequence of geographic points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<GeoPoint2d>,
    is_closed: bool,
}

impl Contour {
    /// Creates a new contour.
    pub fn new(points: Vec<GeoPoint2d>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    /// Creates an open contour.
    pub fn open(points: Vec<GeoPoint2d>) -> Self {
        Self::new(points, false)
    }

    /// Creates a closed contour. If the last point repeats the first one, it is dropped.
    pub fn closed(mut points: Vec<GeoPoint2d>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        Self::new(points, true)
    }

    /// Whether the contour has a segment connecting the last and the first points.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Points of the contour. For closed contours the first point is not repeated.
    pub fn points(&self) -> &[GeoPoint2d] {
        &self.points
    }

    /// Iterates over the points of the contour.
    pub fn iter_points(&self) -> impl Iterator<Item = &GeoPoint2d> {
        self.points.iter()
    }

    /// Same as [`Contour::iter_points`] but for closed contours repeats the first point at the end.
    pub fn iter_points_closing(&self) -> impl Iterator<Item = &GeoPoint2d> {
        let closing = if self.is_closed {
            self.points.first()
        } else {
            None
        };

        self.points.iter().chain(closing)
    }

    /// Returns a contour with every point replaced by the result of `f`. Returns `None` if `f` fails for
    /// any of the points.
    pub fn map_points(&self, f: impl FnMut(&GeoPoint2d) -> Option<GeoPoint2d>) -> Option<Self> {
        Some(Self {
            points: self.points.iter().map(f).collect::<Option<Vec<_>>>()?,
            is_closed: self.is_closed,
        })
    }
}

impl From<Vec<GeoPoint2d>> for Contour {
    fn from(points: Vec<GeoPoint2d>) -> Self {
        Self::open(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;

    #[test]
    fn closed_drops_duplicated_last_point() {
        let contour = Contour::closed(vec![
            latlon!(0.0, 0.0),
            latlon!(0.0, 1.0),
            latlon!(1.0, 1.0),
            latlon!(0.0, 0.0),
        ]);

        assert_eq!(contour.points().len(), 3);
        assert_eq!(contour.iter_points_closing().count(), 4);
        assert_eq!(contour.iter_points_closing().last(), Some(&latlon!(0.0, 0.0)));
    }

    #[test]
    fn open_contour_is_not_closed_on_iteration() {
        let contour = Contour::open(vec![latlon!(0.0, 0.0), latlon!(0.0, 1.0)]);
        assert_eq!(contour.iter_points_closing().count(), 2);
    }

    #[test]
    fn map_points_aborts_on_failure() {
        let contour = Contour::open(vec![latlon!(0.0, 0.0), latlon!(10.0, 1.0)]);
        let mapped = contour.map_points(|p| (p.lat() < 5.0).then_some(*p));
        assert!(mapped.is_none());
    }
}
