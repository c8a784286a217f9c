use ahash::AHashSet;
use geojson::FeatureCollection;
use serde_json::{json, Value};

use super::interaction::FeatureIndex;
use super::ManagerCore;
use crate::annotation::{Annotation, PropertyTable, LAYER_PROPERTIES_KEY};
use crate::style::{LayerType, PropertyMap, Style};

#[derive(Debug, Default)]
pub(super) struct SyncState {
    is_dirty: bool,
    last_pushed: PropertyMap,
    /// Layer-wide properties that were ever assigned, including assignments of `None`.
    assigned: AHashSet<String>,
}

impl SyncState {
    pub(super) fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub(super) fn mark_assigned(&mut self, name: &str) {
        if !self.assigned.contains(name) {
            self.assigned.insert(name.to_string());
        }
    }

    pub(super) fn last_pushed(&self) -> &PropertyMap {
        &self.last_pushed
    }

    /// Properties that get the engine default when nothing else sets them.
    fn reset_candidates(&self) -> impl Iterator<Item = &String> {
        self.last_pushed.keys().chain(self.assigned.iter())
    }
}

impl<A: Annotation> ManagerCore<A> {
    /// Pushes the annotations and the layer properties if anything changed since the last sync. A failed
    /// engine call leaves the manager dirty, so the push is repeated on the next tick.
    pub(super) fn sync_if_needed(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.is_destroyed || !state.sync.is_dirty {
            return;
        }

        state.sync.is_dirty = false;
        state.index = FeatureIndex::new(&state.annotations);

        let dragged_id = state.drag.dragged_id();
        let features = FeatureCollection {
            bbox: None,
            features: state
                .annotations
                .iter()
                .filter(|annotation| Some(annotation.id()) != dragged_id)
                .map(Annotation::feature)
                .collect(),
            foreign_members: None,
        };
        log::debug!(
            "Syncing {} features of annotation manager {}",
            features.features.len(),
            self.id
        );
        if let Err(err) = self.style.update_geojson_source(&self.id, features) {
            log::warn!("Failed to update source {}: {err}", self.id);
            state.sync.is_dirty = true;
        }

        let merged = merge_layer_properties(
            &state.annotations,
            &state.layer_properties,
            &state.sync,
            |name| default_value(&*self.style, A::LAYER_TYPE, name),
        );
        if merged == state.sync.last_pushed {
            return;
        }

        if let Err(err) = self.style.set_layer_properties(&self.id, merged.clone()) {
            log::warn!("Failed to set properties of layer {}: {err}", self.id);
            state.sync.is_dirty = true;
            return;
        }

        if state.drag.is_layer_created() {
            if let Err(err) = self
                .style
                .set_layer_properties(&self.drag_layer_id, merged.clone())
            {
                log::warn!(
                    "Failed to set properties of layer {}: {err}",
                    self.drag_layer_id
                );
                state.sync.is_dirty = true;
                return;
            }
        }

        state.sync.last_pushed = merged;
    }
}

fn default_value(style: &dyn Style, layer_type: LayerType, name: &str) -> Value {
    style
        .layer_property_default_value(layer_type, name)
        .unwrap_or(Value::Null)
}

/// Builds the layer property dictionary for the given annotations.
///
/// Properties set on any annotation are read from the feature data, layer-wide properties override
/// them, and properties that were pushed or assigned before but are not set now are reset to `default`.
pub(super) fn merge_layer_properties<A: Annotation>(
    annotations: &[A],
    layer_properties: &PropertyTable,
    sync: &SyncState,
    default: impl Fn(&str) -> Value,
) -> PropertyMap {
    let mut merged = PropertyMap::new();
    for annotation in annotations {
        for (name, _) in annotation.properties().iter_set() {
            if !merged.contains_key(name) {
                merged.insert(
                    name.to_string(),
                    json!(["get", name, ["get", LAYER_PROPERTIES_KEY]]),
                );
            }
        }
    }

    for (name, value) in layer_properties.iter_set() {
        merged.insert(name.to_string(), value.clone());
    }

    for name in sync.reset_candidates() {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), default(name));
        }
    }

    merged
}
