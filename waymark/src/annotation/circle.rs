use serde_json::Value;
use waymark_types::geo::GeoPoint2d;

use super::property::annotation_properties;
use super::{
    impl_annotation, layer_properties, CirclePitchAlignment, CirclePitchScale, PropertyTable,
    StyleColor, TranslateAnchor,
};
use crate::style::LayerType;

const PROPERTY_NAMES: &[&str] = &[
    "circle-sort-key",
    "circle-blur",
    "circle-color",
    "circle-opacity",
    "circle-radius",
    "circle-stroke-color",
    "circle-stroke-opacity",
    "circle-stroke-width",
];

const LAYER_PROPERTY_NAMES: &[&str] = &[
    "circle-emissive-strength",
    "circle-pitch-alignment",
    "circle-pitch-scale",
    "circle-translate",
    "circle-translate-anchor",
];

/// Circle drawn at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleAnnotation {
    id: String,
    point: GeoPoint2d,
    properties: PropertyTable,
    is_selected: bool,
    is_draggable: bool,
    user_info: Option<Value>,
}

impl CircleAnnotation {
    /// Center of the circle.
    pub fn point(&self) -> GeoPoint2d {
        self.point
    }

    /// Moves the circle.
    pub fn set_point(&mut self, point: GeoPoint2d) {
        self.point = point;
    }
}

impl_annotation!(
    CircleAnnotation,
    point: GeoPoint2d => Point,
    LayerType::Circle,
    PROPERTY_NAMES,
    LAYER_PROPERTY_NAMES
);

annotation_properties!(CircleAnnotation.properties {
    /// Sorts circles in ascending order of this key.
    circle_sort_key, set_circle_sort_key: f64 => "circle-sort-key";
    /// Amount to blur the circle. `1` blurs it so that only the center is fully opaque.
    circle_blur, set_circle_blur: f64 => "circle-blur";
    /// Fill color of the circle.
    circle_color, set_circle_color: StyleColor => "circle-color";
    /// Opacity at which the circle is drawn.
    circle_opacity, set_circle_opacity: f64 => "circle-opacity";
    /// Radius of the circle in pixels.
    circle_radius, set_circle_radius: f64 => "circle-radius";
    /// Stroke color of the circle.
    circle_stroke_color, set_circle_stroke_color: StyleColor => "circle-stroke-color";
    /// Opacity of the circle's stroke.
    circle_stroke_opacity, set_circle_stroke_opacity: f64 => "circle-stroke-opacity";
    /// Width of the circle's stroke in pixels.
    circle_stroke_width, set_circle_stroke_width: f64 => "circle-stroke-width";
});

layer_properties!(CircleAnnotation {
    /// Strength of the circle's emission.
    circle_emissive_strength, set_circle_emissive_strength: f64 => "circle-emissive-strength";
    /// Orientation of circles when the map is pitched.
    circle_pitch_alignment, set_circle_pitch_alignment: CirclePitchAlignment => "circle-pitch-alignment";
    /// Scaling behavior of circles when the map is pitched.
    circle_pitch_scale, set_circle_pitch_scale: CirclePitchScale => "circle-pitch-scale";
    /// Offset of circles in pixels, `[x, y]` with `y` down.
    circle_translate, set_circle_translate: [f64; 2] => "circle-translate";
    /// Frame of reference of `circle-translate`.
    circle_translate_anchor, set_circle_translate_anchor: TranslateAnchor => "circle-translate-anchor";
});
