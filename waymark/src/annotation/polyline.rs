use serde_json::Value;
use waymark_types::Contour;

use super::property::annotation_properties;
use super::{
    impl_annotation, layer_properties, LineCap, LineJoin, PropertyTable, StyleColor,
    TranslateAnchor,
};
use crate::style::LayerType;

const PROPERTY_NAMES: &[&str] = &[
    "line-join",
    "line-sort-key",
    "line-blur",
    "line-color",
    "line-gap-width",
    "line-offset",
    "line-opacity",
    "line-pattern",
    "line-width",
];

const LAYER_PROPERTY_NAMES: &[&str] = &[
    "line-cap",
    "line-miter-limit",
    "line-round-limit",
    "line-dasharray",
    "line-emissive-strength",
    "line-translate",
    "line-translate-anchor",
];

/// Line through a sequence of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineAnnotation {
    id: String,
    line_string: Contour,
    properties: PropertyTable,
    is_selected: bool,
    is_draggable: bool,
    user_info: Option<Value>,
}

impl PolylineAnnotation {
    /// Points of the line.
    pub fn line_string(&self) -> &Contour {
        &self.line_string
    }

    /// Replaces the points of the line.
    pub fn set_line_string(&mut self, line_string: impl Into<Contour>) {
        self.line_string = line_string.into();
    }
}

impl_annotation!(
    PolylineAnnotation,
    line_string: Contour => LineString,
    LayerType::Line,
    PROPERTY_NAMES,
    LAYER_PROPERTY_NAMES
);

annotation_properties!(PolylineAnnotation.properties {
    /// Display of the line at its joins.
    line_join, set_line_join: LineJoin => "line-join";
    /// Sorts lines in ascending order of this key.
    line_sort_key, set_line_sort_key: f64 => "line-sort-key";
    /// Blur applied to the line, in pixels.
    line_blur, set_line_blur: f64 => "line-blur";
    /// Color of the line.
    line_color, set_line_color: StyleColor => "line-color";
    /// Draws a casing outside of the line with the given gap, in pixels.
    line_gap_width, set_line_gap_width: f64 => "line-gap-width";
    /// Offset of the line perpendicular to its direction, in pixels.
    line_offset, set_line_offset: f64 => "line-offset";
    /// Opacity at which the line is drawn.
    line_opacity, set_line_opacity: f64 => "line-opacity";
    /// Name of the style image used as the line pattern.
    line_pattern, set_line_pattern: String => "line-pattern";
    /// Width of the line in pixels.
    line_width, set_line_width: f64 => "line-width";
});

layer_properties!(PolylineAnnotation {
    /// Display of line endings.
    line_cap, set_line_cap: LineCap => "line-cap";
    /// Converts miter joins to bevel joins at sharp angles.
    line_miter_limit, set_line_miter_limit: f64 => "line-miter-limit";
    /// Converts round joins to miter joins at shallow angles.
    line_round_limit, set_line_round_limit: f64 => "line-round-limit";
    /// Lengths of alternating dashes and gaps, in line widths.
    line_dasharray, set_line_dasharray: Vec<f64> => "line-dasharray";
    /// Strength of the line's emission.
    line_emissive_strength, set_line_emissive_strength: f64 => "line-emissive-strength";
    /// Offset of lines in pixels.
    line_translate, set_line_translate: [f64; 2] => "line-translate";
    /// Frame of reference of `line-translate`.
    line_translate_anchor, set_line_translate_anchor: TranslateAnchor => "line-translate-anchor";
});
