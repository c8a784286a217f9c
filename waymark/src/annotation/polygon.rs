use serde_json::Value;
use waymark_types::Polygon;

use super::property::annotation_properties;
use super::{impl_annotation, layer_properties, PropertyTable, StyleColor, TranslateAnchor};
use crate::style::LayerType;

const PROPERTY_NAMES: &[&str] = &[
    "fill-sort-key",
    "fill-color",
    "fill-opacity",
    "fill-outline-color",
    "fill-pattern",
];

const LAYER_PROPERTY_NAMES: &[&str] = &[
    "fill-antialias",
    "fill-emissive-strength",
    "fill-translate",
    "fill-translate-anchor",
];

/// Filled polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonAnnotation {
    id: String,
    polygon: Polygon,
    properties: PropertyTable,
    is_selected: bool,
    is_draggable: bool,
    user_info: Option<Value>,
}

impl PolygonAnnotation {
    /// Shape of the annotation.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Replaces the shape of the annotation.
    pub fn set_polygon(&mut self, polygon: impl Into<Polygon>) {
        self.polygon = polygon.into();
    }
}

impl_annotation!(
    PolygonAnnotation,
    polygon: Polygon => Polygon,
    LayerType::Fill,
    PROPERTY_NAMES,
    LAYER_PROPERTY_NAMES
);

annotation_properties!(PolygonAnnotation.properties {
    /// Sorts polygons in ascending order of this key.
    fill_sort_key, set_fill_sort_key: f64 => "fill-sort-key";
    /// Fill color.
    fill_color, set_fill_color: StyleColor => "fill-color";
    /// Opacity of the fill, including its outline.
    fill_opacity, set_fill_opacity: f64 => "fill-opacity";
    /// Color of the outline.
    fill_outline_color, set_fill_outline_color: StyleColor => "fill-outline-color";
    /// Name of the style image used as the fill pattern.
    fill_pattern, set_fill_pattern: String => "fill-pattern";
});

layer_properties!(PolygonAnnotation {
    /// Whether the fill is antialiased.
    fill_antialias, set_fill_antialias: bool => "fill-antialias";
    /// Strength of the fill's emission.
    fill_emissive_strength, set_fill_emissive_strength: f64 => "fill-emissive-strength";
    /// Offset of polygons in pixels.
    fill_translate, set_fill_translate: [f64; 2] => "fill-translate";
    /// Frame of reference of `fill-translate`.
    fill_translate_anchor, set_fill_translate_anchor: TranslateAnchor => "fill-translate-anchor";
});
