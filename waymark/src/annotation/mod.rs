//! Annotations are user-defined shapes drawn on top of the map: circles, symbols, lines and polygons.
//!
//! Annotations are plain values. To change an annotation on the map, modify the value and assign the
//! whole collection to its [`AnnotationManager`](crate::AnnotationManager) again.
//!
//! Each annotation type has a set of style properties that can be set per annotation (for example
//! [`CircleAnnotation::set_circle_radius`]). Properties that are not set on an annotation use the value
//! set for the whole layer on the manager, or the engine default.

use geojson::feature::Id;
use geojson::{Feature, JsonObject};
use maybe_sync::{MaybeSend, MaybeSync};
use serde_json::Value;
use std::fmt::Debug;
use waymark_types::Geometry;

use crate::style::LayerType;

mod circle;
mod point;
mod polygon;
mod polyline;
mod property;

pub use circle::CircleAnnotation;
pub use point::PointAnnotation;
pub use polygon::PolygonAnnotation;
pub use polyline::PolylineAnnotation;
pub use property::{
    CirclePitchAlignment, CirclePitchScale, LineCap, LineJoin, PropertyTable, StyleColor,
    StyleValue, SymbolAnchor, SymbolPlacement, TranslateAnchor,
};

pub(crate) use property::layer_properties;

/// Key of the feature property that holds per-annotation style properties.
pub const LAYER_PROPERTIES_KEY: &str = "layerProperties";
/// Key of the feature property that holds custom user data.
pub const USER_INFO_KEY: &str = "userInfo";

/// Common interface of annotation types.
pub trait Annotation: Clone + Debug + MaybeSend + MaybeSync + 'static {
    /// Type of the layer annotations of this type are drawn with.
    const LAYER_TYPE: LayerType;
    /// Style properties that can be set per annotation.
    const PROPERTY_NAMES: &'static [&'static str];
    /// Style properties that can only be set for the whole layer.
    const LAYER_PROPERTY_NAMES: &'static [&'static str];

    /// Identifier of the annotation. Unique within a manager.
    fn id(&self) -> &str;
    /// Geometry of the annotation.
    fn geometry(&self) -> Geometry;
    /// Returns a copy of the annotation with the geometry replaced. Returns `None` if the geometry type
    /// does not fit the annotation type.
    fn with_geometry(&self, geometry: Geometry) -> Option<Self>;
    /// Per-annotation style properties.
    fn properties(&self) -> &PropertyTable;
    /// Whether the annotation is selected.
    fn is_selected(&self) -> bool;
    /// Whether the annotation can be dragged.
    fn is_draggable(&self) -> bool;
    /// Custom user data attached to the annotation.
    fn user_info(&self) -> Option<&Value>;

    /// GeoJSON feature of the annotation as consumed by the engine's source.
    fn feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(
            LAYER_PROPERTIES_KEY.to_string(),
            Value::Object(self.properties().to_map()),
        );
        if let Some(user_info) = self.user_info() {
            properties.insert(USER_INFO_KEY.to_string(), user_info.clone());
        }

        Feature {
            bbox: None,
            geometry: Some(self.geometry().into()),
            id: Some(Id::String(self.id().to_string())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Implements the parts of an annotation type that do not depend on its geometry: identity, flags,
/// user info and the [`Annotation`] trait.
macro_rules! impl_annotation {
    ($target:ident, $field:ident: $geom:ty => $variant:ident, $layer_type:expr, $names:expr, $layer_names:expr) => {
        impl $target {
            #[doc = concat!("Creates a new `", stringify!($target), "` with a generated id.")]
            pub fn new($field: impl Into<$geom>) -> Self {
                Self {
                    id: $crate::annotation::generate_id(),
                    $field: $field.into(),
                    properties: $crate::annotation::PropertyTable::new($names),
                    is_selected: false,
                    is_draggable: false,
                    user_info: None,
                }
            }

            /// Replaces the id of the annotation.
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = id.into();
                self
            }

            /// Sets the selection flag.
            pub fn with_selected(mut self, is_selected: bool) -> Self {
                self.is_selected = is_selected;
                self
            }

            /// Sets whether the annotation can be dragged.
            pub fn with_draggable(mut self, is_draggable: bool) -> Self {
                self.is_draggable = is_draggable;
                self
            }

            /// Attaches custom user data to the annotation.
            pub fn with_user_info(mut self, user_info: serde_json::Value) -> Self {
                self.user_info = Some(user_info);
                self
            }

            /// Sets the selection flag.
            pub fn set_selected(&mut self, is_selected: bool) {
                self.is_selected = is_selected;
            }

            /// Sets whether the annotation can be dragged.
            pub fn set_draggable(&mut self, is_draggable: bool) {
                self.is_draggable = is_draggable;
            }

            /// Sets or removes custom user data.
            pub fn set_user_info(&mut self, user_info: Option<serde_json::Value>) {
                self.user_info = user_info;
            }

            /// Sets a style property by its style name. Returns `false` if the property cannot be
            /// set per annotation.
            pub fn set_property(&mut self, name: &str, value: Option<serde_json::Value>) -> bool {
                self.properties.set(name, value)
            }

            /// Value of a style property set on this annotation.
            pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
                self.properties.get(name)
            }
        }

        impl $crate::annotation::Annotation for $target {
            const LAYER_TYPE: $crate::style::LayerType = $layer_type;
            const PROPERTY_NAMES: &'static [&'static str] = $names;
            const LAYER_PROPERTY_NAMES: &'static [&'static str] = $layer_names;

            fn id(&self) -> &str {
                &self.id
            }

            fn geometry(&self) -> waymark_types::Geometry {
                waymark_types::Geometry::$variant(self.$field.clone())
            }

            fn with_geometry(&self, geometry: waymark_types::Geometry) -> Option<Self> {
                match geometry {
                    waymark_types::Geometry::$variant($field) => Some(Self {
                        $field,
                        ..self.clone()
                    }),
                    _ => None,
                }
            }

            fn properties(&self) -> &$crate::annotation::PropertyTable {
                &self.properties
            }

            fn is_selected(&self) -> bool {
                self.is_selected
            }

            fn is_draggable(&self) -> bool {
                self.is_draggable
            }

            fn user_info(&self) -> Option<&serde_json::Value> {
                self.user_info.as_ref()
            }
        }
    };
}

pub(crate) use impl_annotation;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use waymark_types::latlon;

    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = CircleAnnotation::new(latlon!(0.0, 0.0));
        let b = CircleAnnotation::new(latlon!(0.0, 0.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn feature_contains_only_set_properties() {
        let mut annotation = CircleAnnotation::new(latlon!(1.0, 2.0)).with_id("c1");
        annotation.set_circle_radius(Some(8.0));
        annotation.set_circle_color(Some(StyleColor::RED));
        annotation.set_circle_color(None);

        let feature = annotation.feature();
        assert_eq!(feature.id, Some(Id::String("c1".into())));
        assert_eq!(
            feature.properties,
            json!({ "layerProperties": { "circle-radius": 8.0 } })
                .as_object()
                .cloned()
        );
        assert_eq!(
            feature.geometry.map(|g| g.value),
            Some(geojson::Value::Point(vec![2.0, 1.0]))
        );
    }

    #[test]
    fn feature_contains_user_info() {
        let annotation = CircleAnnotation::new(latlon!(0.0, 0.0))
            .with_user_info(json!({ "name": "home" }));

        let properties = annotation.feature().properties.expect("no properties");
        assert_eq!(properties.get(USER_INFO_KEY), Some(&json!({ "name": "home" })));
    }

    #[test]
    fn with_geometry_rejects_other_geometry_types() {
        let annotation = CircleAnnotation::new(latlon!(0.0, 0.0));
        let line = Geometry::LineString(vec![latlon!(0.0, 0.0), latlon!(1.0, 1.0)].into());
        assert!(annotation.with_geometry(line).is_none());

        let moved = annotation
            .with_geometry(Geometry::Point(latlon!(5.0, 5.0)))
            .expect("point geometry rejected");
        assert_eq!(moved.geometry(), Geometry::Point(latlon!(5.0, 5.0)));
        assert_eq!(moved.id(), annotation.id());
    }
}
