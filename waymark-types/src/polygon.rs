use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::geo::GeoPoint2d;

/// Polygon geometry: an outer ring and zero or more holes. All rings are closed contours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    outer_contour: Contour,
    inner_contours: Vec<Contour>,
}

impl Polygon {
    /// Creates a new polygon. Rings are closed if they are not already.
    pub fn new(outer_contour: Contour, inner_contours: Vec<Contour>) -> Self {
        Self {
            outer_contour: close(outer_contour),
            inner_contours: inner_contours.into_iter().map(close).collect(),
        }
    }

    /// Outer ring.
    pub fn outer_contour(&self) -> &Contour {
        &self.outer_contour
    }

    /// Holes.
    pub fn inner_contours(&self) -> &[Contour] {
        &self.inner_contours
    }

    /// Iterates over all rings, the outer one first.
    pub fn iter_contours(&self) -> impl Iterator<Item = &Contour> {
        std::iter::once(&self.outer_contour).chain(self.inner_contours.iter())
    }

    /// Returns a polygon with every vertex replaced by the result of `f`.
    pub fn map_points(
        &self,
        mut f: impl FnMut(&GeoPoint2d) -> Option<GeoPoint2d>,
    ) -> Option<Self> {
        Some(Self {
            outer_contour: self.outer_contour.map_points(&mut f)?,
            inner_contours: self
                .inner_contours
                .iter()
                .map(|c| c.map_points(&mut f))
                .collect::<Option<Vec<_>>>()?,
        })
    }
}

impl From<Contour> for Polygon {
    fn from(outer_contour: Contour) -> Self {
        Self::new(outer_contour, vec![])
    }
}

fn close(contour: Contour) -> Contour {
    if contour.is_closed() {
        contour
    } else {
        Contour::closed(contour.points().to_vec())
    }
}
