//! Geometries in geographic coordinates (latitude and longitude) and the [`WebMercator`] projection.

mod datum;
mod point;
mod web_mercator;

pub use datum::Datum;
pub use point::GeoPoint2d;
pub use web_mercator::{WebMercator, MAX_MERCATOR_LATITUDE};
