use serde_json::Value;
use waymark_types::geo::GeoPoint2d;

use super::property::annotation_properties;
use super::{
    impl_annotation, layer_properties, PropertyTable, StyleColor, SymbolAnchor, SymbolPlacement,
    TranslateAnchor,
};
use crate::style::LayerType;

const PROPERTY_NAMES: &[&str] = &[
    "icon-anchor",
    "icon-image",
    "icon-offset",
    "icon-rotate",
    "icon-size",
    "symbol-sort-key",
    "text-anchor",
    "text-field",
    "text-max-width",
    "text-offset",
    "text-rotate",
    "text-size",
    "icon-color",
    "icon-halo-color",
    "icon-halo-width",
    "icon-opacity",
    "text-color",
    "text-halo-color",
    "text-halo-width",
    "text-opacity",
];

const LAYER_PROPERTY_NAMES: &[&str] = &[
    "icon-allow-overlap",
    "icon-ignore-placement",
    "icon-translate",
    "icon-translate-anchor",
    "symbol-placement",
    "symbol-spacing",
    "text-allow-overlap",
    "text-font",
    "text-ignore-placement",
    "text-translate",
    "text-translate-anchor",
];

/// Icon and/or label drawn at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointAnnotation {
    id: String,
    point: GeoPoint2d,
    properties: PropertyTable,
    is_selected: bool,
    is_draggable: bool,
    user_info: Option<Value>,
}

impl PointAnnotation {
    /// Anchor point of the symbol.
    pub fn point(&self) -> GeoPoint2d {
        self.point
    }

    /// Moves the symbol.
    pub fn set_point(&mut self, point: GeoPoint2d) {
        self.point = point;
    }
}

impl_annotation!(
    PointAnnotation,
    point: GeoPoint2d => Point,
    LayerType::Symbol,
    PROPERTY_NAMES,
    LAYER_PROPERTY_NAMES
);

annotation_properties!(PointAnnotation.properties {
    /// Part of the icon placed closest to the anchor.
    icon_anchor, set_icon_anchor: SymbolAnchor => "icon-anchor";
    /// Name of the style image used for the icon.
    icon_image, set_icon_image: String => "icon-image";
    /// Offset of the icon from its anchor.
    icon_offset, set_icon_offset: [f64; 2] => "icon-offset";
    /// Rotation of the icon in degrees clockwise.
    icon_rotate, set_icon_rotate: f64 => "icon-rotate";
    /// Scale factor of the icon's original size.
    icon_size, set_icon_size: f64 => "icon-size";
    /// Sorts symbols in ascending order of this key.
    symbol_sort_key, set_symbol_sort_key: f64 => "symbol-sort-key";
    /// Part of the label placed closest to the anchor.
    text_anchor, set_text_anchor: SymbolAnchor => "text-anchor";
    /// Label text.
    text_field, set_text_field: String => "text-field";
    /// Maximum line width for label wrapping, in ems.
    text_max_width, set_text_max_width: f64 => "text-max-width";
    /// Offset of the label from its anchor, in ems.
    text_offset, set_text_offset: [f64; 2] => "text-offset";
    /// Rotation of the label in degrees clockwise.
    text_rotate, set_text_rotate: f64 => "text-rotate";
    /// Font size of the label in pixels.
    text_size, set_text_size: f64 => "text-size";
    /// Color of SDF icons.
    icon_color, set_icon_color: StyleColor => "icon-color";
    /// Color of the icon's halo.
    icon_halo_color, set_icon_halo_color: StyleColor => "icon-halo-color";
    /// Width of the icon's halo in pixels.
    icon_halo_width, set_icon_halo_width: f64 => "icon-halo-width";
    /// Opacity at which the icon is drawn.
    icon_opacity, set_icon_opacity: f64 => "icon-opacity";
    /// Color of the label text.
    text_color, set_text_color: StyleColor => "text-color";
    /// Color of the label's halo.
    text_halo_color, set_text_halo_color: StyleColor => "text-halo-color";
    /// Width of the label's halo in pixels.
    text_halo_width, set_text_halo_width: f64 => "text-halo-width";
    /// Opacity at which the label is drawn.
    text_opacity, set_text_opacity: f64 => "text-opacity";
});

layer_properties!(PointAnnotation {
    /// Icons are drawn even if they collide with other symbols.
    icon_allow_overlap, set_icon_allow_overlap: bool => "icon-allow-overlap";
    /// Other symbols can be drawn even if they collide with the icon.
    icon_ignore_placement, set_icon_ignore_placement: bool => "icon-ignore-placement";
    /// Offset of icons in pixels.
    icon_translate, set_icon_translate: [f64; 2] => "icon-translate";
    /// Frame of reference of `icon-translate`.
    icon_translate_anchor, set_icon_translate_anchor: TranslateAnchor => "icon-translate-anchor";
    /// Placement of labels relative to their geometry.
    symbol_placement, set_symbol_placement: SymbolPlacement => "symbol-placement";
    /// Distance between two symbol anchors along a line, in pixels.
    symbol_spacing, set_symbol_spacing: f64 => "symbol-spacing";
    /// Labels are drawn even if they collide with other symbols.
    text_allow_overlap, set_text_allow_overlap: bool => "text-allow-overlap";
    /// Font stack used for labels.
    text_font, set_text_font: Vec<String> => "text-font";
    /// Other symbols can be drawn even if they collide with the label.
    text_ignore_placement, set_text_ignore_placement: bool => "text-ignore-placement";
    /// Offset of labels in pixels.
    text_translate, set_text_translate: [f64; 2] => "text-translate";
    /// Frame of reference of `text-translate`.
    text_translate_anchor, set_text_translate_anchor: TranslateAnchor => "text-translate-anchor";
});
