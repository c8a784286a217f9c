//! Shapes of annotations.

use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::geo::GeoPoint2d;
use crate::polygon::Polygon;

/// Geometry of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Single point.
    Point(GeoPoint2d),
    /// Open sequence of points.
    LineString(Contour),
    /// Polygon with optional holes.
    Polygon(Polygon),
}

impl Geometry {
    /// Iterates over all vertices of the geometry.
    pub fn points(&self) -> Box<dyn Iterator<Item = &GeoPoint2d> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::LineString(c) => Box::new(c.iter_points()),
            Geometry::Polygon(p) => Box::new(p.iter_contours().flat_map(|c| c.iter_points())),
        }
    }

    /// First vertex of the geometry, if any.
    pub fn first_point(&self) -> Option<&GeoPoint2d> {
        self.points().next()
    }

    /// Returns a geometry of the same type with every vertex replaced by the result of `f`. Returns `None`
    /// if `f` returns `None` for any of the vertices.
    pub fn map_points(&self, mut f: impl FnMut(&GeoPoint2d) -> Option<GeoPoint2d>) -> Option<Self> {
        Some(match self {
            Geometry::Point(p) => Geometry::Point(f(p)?),
            Geometry::LineString(c) => Geometry::LineString(c.map_points(f)?),
            Geometry::Polygon(p) => Geometry::Polygon(p.map_points(f)?),
        })
    }
}

impl From<GeoPoint2d> for Geometry {
    fn from(value: GeoPoint2d) -> Self {
        Self::Point(value)
    }
}

impl From<Contour> for Geometry {
    fn from(value: Contour) -> Self {
        Self::LineString(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}
