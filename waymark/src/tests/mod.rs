//! Test doubles of the rendering engine and the display link.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use geojson::FeatureCollection;
use parking_lot::Mutex;
use serde_json::{json, Value};
use waymark_types::cartesian::Point2d;

use crate::annotation::CircleAnnotation;
use crate::camera::{MapCamera, MercatorCamera};
use crate::display_link::{DisplayLink, DisplayLinkCoordinator, DisplayLinkParticipant, ParticipantId};
use crate::error::WaymarkError;
use crate::manager::{AnnotationManager, AnnotationManagerBuilder};
use crate::style::{
    LayerDescriptor, LayerPosition, LayerType, PropertyMap, QueriedFeature, RenderedFeatureQuery,
    SourceDescriptor, Style,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StyleCall {
    AddSource(SourceDescriptor),
    UpdateGeoJsonSource {
        id: String,
        features: FeatureCollection,
    },
    RemoveSource(String),
    AddPersistentLayer {
        layer: LayerDescriptor,
        position: Option<LayerPosition>,
    },
    SetLayerProperties {
        layer_id: String,
        properties: PropertyMap,
    },
    RemoveLayer(String),
}

/// Style that records every call.
#[derive(Default)]
pub(crate) struct MockStyle {
    calls: Mutex<Vec<StyleCall>>,
    fail_layer_properties: AtomicBool,
    fail_source_updates: AtomicBool,
    query_result: Mutex<Vec<QueriedFeature>>,
    queried_layers: Mutex<Vec<Vec<String>>>,
}

impl MockStyle {
    pub(crate) fn calls(&self) -> Vec<StyleCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().clear();
    }

    pub(crate) fn source_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StyleCall::AddSource(source) => Some(source.id.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn layer_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StyleCall::AddPersistentLayer { layer, .. } => Some(layer.id.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn source_updates(&self, source_id: &str) -> Vec<FeatureCollection> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StyleCall::UpdateGeoJsonSource { id, features } if id == source_id => {
                    Some(features.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub(crate) fn layer_property_pushes(&self, layer: &str) -> Vec<PropertyMap> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StyleCall::SetLayerProperties {
                    layer_id,
                    properties,
                } if layer_id == layer => Some(properties.clone()),
                _ => None,
            })
            .collect()
    }

    /// Makes `set_layer_properties` fail. Failed calls are still recorded.
    pub(crate) fn fail_layer_properties(&self, fail: bool) {
        self.fail_layer_properties.store(fail, Ordering::Relaxed);
    }

    /// Makes `update_geojson_source` fail. Failed calls are still recorded.
    pub(crate) fn fail_source_updates(&self, fail: bool) {
        self.fail_source_updates.store(fail, Ordering::Relaxed);
    }

    pub(crate) fn set_query_result(&self, features: Vec<QueriedFeature>) {
        *self.query_result.lock() = features;
    }

    pub(crate) fn queried_layers(&self) -> Vec<Vec<String>> {
        self.queried_layers.lock().clone()
    }

    fn record(&self, call: StyleCall) {
        self.calls.lock().push(call);
    }
}

impl Style for MockStyle {
    fn add_source(&self, source: SourceDescriptor) -> Result<(), WaymarkError> {
        self.record(StyleCall::AddSource(source));
        Ok(())
    }

    fn update_geojson_source(
        &self,
        source_id: &str,
        features: FeatureCollection,
    ) -> Result<(), WaymarkError> {
        self.record(StyleCall::UpdateGeoJsonSource {
            id: source_id.to_string(),
            features,
        });

        if self.fail_source_updates.load(Ordering::Relaxed) {
            return Err(WaymarkError::Style(format!("source {source_id} is busy")));
        }

        Ok(())
    }

    fn remove_source(&self, source_id: &str) -> Result<(), WaymarkError> {
        self.record(StyleCall::RemoveSource(source_id.to_string()));
        Ok(())
    }

    fn add_persistent_layer(
        &self,
        layer: LayerDescriptor,
        position: Option<LayerPosition>,
    ) -> Result<(), WaymarkError> {
        self.record(StyleCall::AddPersistentLayer { layer, position });
        Ok(())
    }

    fn set_layer_properties(
        &self,
        layer_id: &str,
        properties: PropertyMap,
    ) -> Result<(), WaymarkError> {
        self.record(StyleCall::SetLayerProperties {
            layer_id: layer_id.to_string(),
            properties,
        });

        if self.fail_layer_properties.load(Ordering::Relaxed) {
            return Err(WaymarkError::Style(format!("layer {layer_id} is busy")));
        }

        Ok(())
    }

    fn remove_layer(&self, layer_id: &str) -> Result<(), WaymarkError> {
        self.record(StyleCall::RemoveLayer(layer_id.to_string()));
        Ok(())
    }

    fn layer_property_default_value(&self, layer_type: LayerType, property: &str) -> Option<Value> {
        let value = match (layer_type, property) {
            (LayerType::Circle, "circle-emissive-strength") => json!(1.0),
            (LayerType::Circle, "circle-pitch-alignment") => json!("viewport"),
            (LayerType::Circle, "circle-pitch-scale") => json!("map"),
            (LayerType::Circle, "circle-translate") => json!([0.0, 0.0]),
            (LayerType::Circle, "circle-translate-anchor") => json!("map"),
            (LayerType::Line, "line-cap") => json!("butt"),
            (LayerType::Line, "line-miter-limit") => json!(2.0),
            _ => return None,
        };

        Some(value)
    }
}

impl RenderedFeatureQuery for MockStyle {
    fn query_rendered_features(&self, _point: Point2d, layer_ids: &[String]) -> Vec<QueriedFeature> {
        self.queried_layers.lock().push(layer_ids.to_vec());
        self.query_result
            .lock()
            .iter()
            .filter(|feature| layer_ids.contains(&feature.layer_id))
            .cloned()
            .collect()
    }
}

/// Display link that counts registrations.
#[derive(Default)]
pub(crate) struct MockDisplayLink {
    inner: DisplayLink,
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl MockDisplayLink {
    pub(crate) fn tick(&self) {
        self.inner.tick();
    }

    pub(crate) fn added(&self) -> usize {
        self.added.load(Ordering::Relaxed)
    }

    pub(crate) fn removed(&self) -> usize {
        self.removed.load(Ordering::Relaxed)
    }
}

impl DisplayLinkCoordinator for MockDisplayLink {
    fn add(&self, participant: Weak<dyn DisplayLinkParticipant>) -> ParticipantId {
        self.added.fetch_add(1, Ordering::Relaxed);
        self.inner.add(participant)
    }

    fn remove(&self, id: ParticipantId) {
        self.removed.fetch_add(1, Ordering::Relaxed);
        self.inner.remove(id);
    }
}

/// Camera looking at `(0, 0)` at zoom 0 over a single 512 px tile.
pub(crate) fn camera() -> Arc<dyn MapCamera> {
    Arc::new(MercatorCamera::default())
}

pub(crate) fn circle_manager(
    style: &Arc<MockStyle>,
    id: &str,
) -> (AnnotationManager<CircleAnnotation>, Arc<MockDisplayLink>) {
    let display_link = Arc::new(MockDisplayLink::default());
    let manager = AnnotationManagerBuilder::new(style.clone(), display_link.clone(), camera())
        .with_id(id)
        .build();

    (manager, display_link)
}
