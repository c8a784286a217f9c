//! Interface of the rendering engine consumed by annotation managers.

use geojson::FeatureCollection;
use maybe_sync::{MaybeSend, MaybeSync};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waymark_types::cartesian::Point2d;

use crate::error::WaymarkError;

/// Layer property dictionary, keyed by style property names (`circle-radius`, `line-color`, ...).
///
/// The map is ordered by key, so two dictionaries with the same content always serialize the same way.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Type of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// Source holding a GeoJSON feature collection.
    #[serde(rename = "geojson")]
    GeoJson,
}

/// Description of a source to be added to the style.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    /// Source id.
    pub id: String,
    /// Type of the source.
    pub source_type: SourceType,
    /// Initial data of the source.
    pub data: FeatureCollection,
}

impl SourceDescriptor {
    /// GeoJSON source with an empty feature collection.
    pub fn geojson(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_type: SourceType::GeoJson,
            data: empty_feature_collection(),
        }
    }
}

pub(crate) fn empty_feature_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    }
}

/// Type of a style layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Circles drawn at point features.
    Circle,
    /// Icons and labels.
    Symbol,
    /// Stroked lines.
    Line,
    /// Filled polygons.
    Fill,
}

impl LayerType {
    /// Style name of the layer type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Circle => "circle",
            LayerType::Symbol => "symbol",
            LayerType::Line => "line",
            LayerType::Fill => "fill",
        }
    }
}

/// Position at which a layer is inserted into the style's layer stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerPosition {
    /// Directly above the layer with the given id.
    Above(String),
    /// Directly below the layer with the given id.
    Below(String),
    /// At the given index of the layer stack.
    At(usize),
}

/// Description of a layer to be added to the style.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    /// Layer id.
    pub id: String,
    /// Type of the layer.
    pub layer_type: LayerType,
    /// Id of the source the layer draws.
    pub source: String,
    /// Initial layer properties.
    pub properties: PropertyMap,
}

/// Style of the rendering engine: registry of sources and layers.
///
/// A source or a layer is exclusively owned by the manager that created it. All methods are called from
/// the thread that drives the display link.
pub trait Style: MaybeSend + MaybeSync {
    /// Adds a new source.
    fn add_source(&self, source: SourceDescriptor) -> Result<(), WaymarkError>;
    /// Replaces the whole content of a GeoJSON source.
    fn update_geojson_source(
        &self,
        source_id: &str,
        features: FeatureCollection,
    ) -> Result<(), WaymarkError>;
    /// Removes a source.
    fn remove_source(&self, source_id: &str) -> Result<(), WaymarkError>;
    /// Adds a layer that survives style reloads. If `position` is `None`, the layer is put on top.
    fn add_persistent_layer(
        &self,
        layer: LayerDescriptor,
        position: Option<LayerPosition>,
    ) -> Result<(), WaymarkError>;
    /// Sets the given properties of a layer in one call.
    fn set_layer_properties(
        &self,
        layer_id: &str,
        properties: PropertyMap,
    ) -> Result<(), WaymarkError>;
    /// Removes a layer.
    fn remove_layer(&self, layer_id: &str) -> Result<(), WaymarkError>;
    /// Documented default value of a layer property, if the engine knows the property.
    fn layer_property_default_value(&self, layer_type: LayerType, property: &str) -> Option<Value>;
}

/// Feature hit by a rendered feature query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueriedFeature {
    /// Layer the feature was rendered by.
    pub layer_id: String,
    /// Identifier of the feature.
    pub feature_id: String,
}

impl QueriedFeature {
    /// Creates a new hit.
    pub fn new(layer_id: impl Into<String>, feature_id: impl Into<String>) -> Self {
        Self {
            layer_id: layer_id.into(),
            feature_id: feature_id.into(),
        }
    }
}

/// Hit-testing of rendered features.
pub trait RenderedFeatureQuery: MaybeSend + MaybeSync {
    /// Returns features of the given layers rendered at the screen point, topmost first.
    fn query_rendered_features(&self, point: Point2d, layer_ids: &[String]) -> Vec<QueriedFeature>;
}
