use geojson::{Feature, FeatureCollection};
use waymark_types::cartesian::Vector2d;

use super::interaction::FeatureIndex;
use super::{ManagerCore, ManagerState};
use crate::annotation::Annotation;
use crate::style::{LayerDescriptor, LayerPosition, PropertyMap, SourceDescriptor};

/// Drag state of a manager.
///
/// While an annotation is dragged, its live copy is drawn by a separate drag layer above the manager's
/// layer, and the manager's own source does not contain it. The drag source and layer are created on the
/// first drag and reused until the manager is destroyed.
pub(super) struct DragController<A> {
    dragged: Option<A>,
    is_layer_created: bool,
}

impl<A> Default for DragController<A> {
    fn default() -> Self {
        Self {
            dragged: None,
            is_layer_created: false,
        }
    }
}

impl<A: Annotation> DragController<A> {
    pub(super) fn dragged_id(&self) -> Option<&str> {
        self.dragged.as_ref().map(Annotation::id)
    }

    pub(super) fn is_layer_created(&self) -> bool {
        self.is_layer_created
    }

    pub(super) fn clear_session(&mut self) {
        self.dragged = None;
    }

    /// Copy of the annotations with the dragged one moved to its live position.
    pub(super) fn apply_to(&self, annotations: &[A]) -> Vec<A> {
        let Some(dragged) = &self.dragged else {
            return annotations.to_vec();
        };

        annotations
            .iter()
            .map(|annotation| {
                if annotation.id() == dragged.id() {
                    annotation
                        .with_geometry(dragged.geometry())
                        .unwrap_or_else(|| annotation.clone())
                } else {
                    annotation.clone()
                }
            })
            .collect()
    }
}

impl<A: Annotation> ManagerCore<A> {
    pub(super) fn drag_begin(&self, feature_ids: &[String]) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.is_destroyed {
            log::debug!("Drag ignored by destroyed manager {}", self.id);
            return false;
        }

        let Some(id) = feature_ids.iter().find_map(|feature_id| {
            state
                .index
                .get(feature_id)
                .and_then(|position| state.annotations.get(position))
                .filter(|annotation| annotation.is_draggable())
                .map(|annotation| annotation.id().to_string())
        }) else {
            return false;
        };

        if state.drag.dragged.is_some() {
            self.fold_back(state);
        }

        let Some(annotation) = state.annotations.iter().find(|a| a.id() == id).cloned() else {
            return false;
        };

        if !state.drag.is_layer_created {
            if !self.create_drag_layer(state.sync.last_pushed()) {
                return false;
            }
            state.drag.is_layer_created = true;
        }

        self.update_drag_source(vec![annotation.feature()]);
        state.drag.dragged = Some(annotation);
        state.sync.mark_dirty();

        log::debug!("Drag of annotation {id} started in manager {}", self.id);
        true
    }

    pub(super) fn drag_changed(&self, translation: Vector2d) {
        let mut state = self.state.lock();
        let Some(dragged) = state.drag.dragged.as_mut() else {
            return;
        };

        let moved = self
            .offset
            .geometry(translation, &dragged.geometry())
            .and_then(|geometry| dragged.with_geometry(geometry));
        let Some(moved) = moved else {
            log::debug!("Annotation {} cannot be moved further", dragged.id());
            return;
        };

        *dragged = moved;
        let feature = dragged.feature();
        self.update_drag_source(vec![feature]);
    }

    pub(super) fn drag_end(&self) {
        let mut state = self.state.lock();
        if !self.fold_back(&mut state) {
            return;
        }

        self.update_drag_source(vec![]);
        state.sync.mark_dirty();
    }

    pub(super) fn drag_cancel(&self) {
        let mut state = self.state.lock();
        let Some(dragged) = state.drag.dragged.take() else {
            return;
        };

        log::debug!("Drag of annotation {} cancelled", dragged.id());
        self.update_drag_source(vec![]);
        state.sync.mark_dirty();
    }

    /// Stops the drag without committing if the dragged annotation is no longer in the collection.
    pub(super) fn drop_orphaned_drag(&self, state: &mut ManagerState<A>) {
        let is_orphaned = state
            .drag
            .dragged_id()
            .is_some_and(|id| state.index.get(id).is_none());
        if !is_orphaned {
            return;
        }

        if let Some(dragged) = state.drag.dragged.take() {
            log::debug!("Dragged annotation {} was removed", dragged.id());
        }
        self.update_drag_source(vec![]);
    }

    /// Moves the dragged annotation's geometry into the annotation with the same id. Returns `false` if
    /// nothing was dragged.
    fn fold_back(&self, state: &mut ManagerState<A>) -> bool {
        let Some(dragged) = state.drag.dragged.take() else {
            return false;
        };

        if let Some(entry) = state.annotations.iter_mut().find(|a| a.id() == dragged.id()) {
            if let Some(updated) = entry.with_geometry(dragged.geometry()) {
                *entry = updated;
            }
        }

        state.index = FeatureIndex::new(&state.annotations);
        true
    }

    fn create_drag_layer(&self, properties: &PropertyMap) -> bool {
        if let Err(err) = self
            .style
            .add_source(SourceDescriptor::geojson(&self.drag_source_id))
        {
            log::warn!("Failed to add source {}: {err}", self.drag_source_id);
            return false;
        }

        let layer = LayerDescriptor {
            id: self.drag_layer_id.clone(),
            layer_type: A::LAYER_TYPE,
            source: self.drag_source_id.clone(),
            properties: properties.clone(),
        };
        if let Err(err) = self
            .style
            .add_persistent_layer(layer, Some(LayerPosition::Above(self.id.clone())))
        {
            log::warn!("Failed to add layer {}: {err}", self.drag_layer_id);
            self.remove_source(&self.drag_source_id);
            return false;
        }

        true
    }

    fn update_drag_source(&self, features: Vec<Feature>) {
        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        if let Err(err) = self
            .style
            .update_geojson_source(&self.drag_source_id, collection)
        {
            log::warn!("Failed to update source {}: {err}", self.drag_source_id);
        }
    }
}
