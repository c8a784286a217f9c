//! Value types used by the `waymark` annotation engine.
//!
//! The crate is split into:
//! * [`geo`] - geographic points (latitude and longitude in degrees) and the Web Mercator projection
//!   that is used to translate screen-space deltas into geographic shifts,
//! * [`cartesian`] - screen-space points, vectors and viewport size,
//! * [`geometry`] - shapes an annotation can have: points, line strings and polygons.
//!
//! With the `geojson` feature enabled, geometries can be converted into [`geojson`] geometries, which is
//! the interchange format consumed by rendering engine sources.

pub mod cartesian;
pub mod contour;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod polygon;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use contour::Contour;
pub use geometry::Geometry;
pub use polygon::Polygon;
