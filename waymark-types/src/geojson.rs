//! Conversion between [`Geometry`] and [`geojson`] geometries.

use geojson::{PolygonType, Position, Value};

use crate::contour::Contour;
use crate::error::TypesError;
use crate::geo::GeoPoint2d;
use crate::geometry::Geometry;
use crate::polygon::Polygon;

fn position(point: &GeoPoint2d) -> Position {
    vec![point.lon(), point.lat()]
}

fn ring(contour: &Contour) -> Vec<Position> {
    contour.iter_points_closing().map(position).collect()
}

impl From<&Geometry> for geojson::Geometry {
    fn from(value: &Geometry) -> Self {
        let value = match value {
            Geometry::Point(p) => Value::Point(position(p)),
            Geometry::LineString(c) => Value::LineString(ring(c)),
            Geometry::Polygon(p) => Value::Polygon(p.iter_contours().map(ring).collect()),
        };

        geojson::Geometry::new(value)
    }
}

impl From<Geometry> for geojson::Geometry {
    fn from(value: Geometry) -> Self {
        (&value).into()
    }
}

fn point(position: &Position) -> Result<GeoPoint2d, TypesError> {
    match position[..] {
        [lon, lat, ..] => Ok(GeoPoint2d::lonlat(lon, lat)),
        _ => Err(TypesError::Conversion(format!(
            "position must have at least 2 coordinates, got {}",
            position.len()
        ))),
    }
}

fn points(positions: &[Position]) -> Result<Vec<GeoPoint2d>, TypesError> {
    positions.iter().map(point).collect()
}

fn polygon(rings: &PolygonType) -> Result<Polygon, TypesError> {
    let Some((outer, inner)) = rings.split_first() else {
        return Err(TypesError::Conversion("polygon has no rings".into()));
    };

    Ok(Polygon::new(
        Contour::closed(points(outer)?),
        inner
            .iter()
            .map(|r| Ok(Contour::closed(points(r)?)))
            .collect::<Result<Vec<_>, TypesError>>()?,
    ))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

impl TryFrom<geojson::Geometry> for Geometry {
    type Error = TypesError;

    fn try_from(value: geojson::Geometry) -> Result<Self, Self::Error> {
        match &value.value {
            Value::Point(p) => Ok(Geometry::Point(point(p)?)),
            Value::LineString(line) => Ok(Geometry::LineString(Contour::open(points(line)?))),
            Value::Polygon(rings) => Ok(Geometry::Polygon(polygon(rings)?)),
            other => Err(TypesError::Conversion(format!(
                "unsupported geometry type: {}",
                type_name(other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::latlon;

    #[test]
    fn point_uses_lon_lat_order() {
        let geometry = geojson::Geometry::from(Geometry::Point(latlon!(10.0, 20.0)));
        assert_eq!(geometry.value, Value::Point(vec![20.0, 10.0]));
    }

    #[test]
    fn polygon_rings_are_closed() {
        let polygon = Polygon::from(Contour::open(vec![
            latlon!(0.0, 0.0),
            latlon!(0.0, 1.0),
            latlon!(1.0, 1.0),
        ]));
        let geometry = geojson::Geometry::from(Geometry::Polygon(polygon.clone()));

        let Value::Polygon(rings) = &geometry.value else {
            panic!("not a polygon");
        };
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0].first(), rings[0].last());

        let restored = Geometry::try_from(geometry).expect("conversion failed");
        assert_eq!(restored, Geometry::Polygon(polygon));
    }

    #[test]
    fn multi_point_is_not_supported() {
        let geometry = geojson::Geometry::new(Value::MultiPoint(vec![vec![0.0, 0.0]]));
        assert_matches!(Geometry::try_from(geometry), Err(TypesError::Conversion(_)));
    }

    #[test]
    fn short_position_is_rejected() {
        let geometry = geojson::Geometry::new(Value::Point(vec![1.0]));
        assert_matches!(Geometry::try_from(geometry), Err(TypesError::Conversion(_)));
    }
}
