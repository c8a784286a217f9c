//! Annotation managers keep one annotation type's collection in sync with a source and a layer of the
//! rendering engine.

use std::any::Any;
use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use waymark_types::cartesian::Vector2d;

use crate::annotation::{generate_id, Annotation, PropertyTable};
use crate::camera::MapCamera;
use crate::display_link::{DisplayLinkCoordinator, DisplayLinkParticipant, ParticipantId};
use crate::offset::OffsetCalculator;
use crate::style::{LayerDescriptor, LayerPosition, PropertyMap, SourceDescriptor, Style};

mod drag;
mod interaction;
mod sync;

use drag::DragController;
use interaction::FeatureIndex;
use sync::SyncState;

pub use interaction::AnnotationInteractionObserver;

/// Builder of an [`AnnotationManager`].
pub struct AnnotationManagerBuilder<A: Annotation> {
    style: Arc<dyn Style>,
    display_link: Arc<dyn DisplayLinkCoordinator>,
    camera: Arc<dyn MapCamera>,
    id: Option<String>,
    layer_position: Option<LayerPosition>,
    observer: Option<Arc<dyn AnnotationInteractionObserver<A>>>,
}

impl<A: Annotation> AnnotationManagerBuilder<A> {
    /// Creates a builder of a manager that draws into the given style and syncs on the given display link.
    pub fn new(
        style: Arc<dyn Style>,
        display_link: Arc<dyn DisplayLinkCoordinator>,
        camera: Arc<dyn MapCamera>,
    ) -> Self {
        Self {
            style,
            display_link,
            camera,
            id: None,
            layer_position: None,
            observer: None,
        }
    }

    /// Sets the id of the manager. The id is also used as the id of its source and layer.
    ///
    /// If not set, a random id is generated.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Position of the manager's layer in the style. If not set, the layer is put on top.
    pub fn with_layer_position(mut self, position: LayerPosition) -> Self {
        self.layer_position = Some(position);
        self
    }

    /// Sets the observer notified when annotations of the manager are tapped.
    pub fn with_observer(mut self, observer: impl AnnotationInteractionObserver<A> + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Creates the manager.
    ///
    /// The manager's source and layer are added to the style right away, and the manager is registered
    /// with the display link.
    pub fn build(self) -> AnnotationManager<A> {
        let id = self.id.unwrap_or_else(generate_id);
        let core = Arc::new(ManagerCore::new(
            id,
            self.style,
            OffsetCalculator::new(self.camera),
        ));
        core.bootstrap(self.layer_position);

        let participant: Arc<dyn DisplayLinkParticipant> = core.clone();
        let participant_id = self.display_link.add(Arc::downgrade(&participant));

        AnnotationManager {
            core,
            display_link: self.display_link,
            participant_id,
            observer: RwLock::new(self.observer),
        }
    }
}

/// Owns one source and one layer of the rendering engine and keeps them in sync with a collection of
/// annotations of type `A`.
///
/// Changes to the annotations and to layer-wide properties are not pushed to the engine immediately.
/// They are accumulated and pushed together on the next display link tick, at most once per frame.
pub struct AnnotationManager<A: Annotation> {
    core: Arc<ManagerCore<A>>,
    display_link: Arc<dyn DisplayLinkCoordinator>,
    participant_id: ParticipantId,
    observer: RwLock<Option<Arc<dyn AnnotationInteractionObserver<A>>>>,
}

impl<A: Annotation> AnnotationManager<A> {
    /// Id of the manager.
    pub fn id(&self) -> &str {
        &self.core.id
    }

    /// Id of the source holding the annotations' features.
    pub fn source_id(&self) -> &str {
        &self.core.id
    }

    /// Id of the layer drawing the annotations.
    pub fn layer_id(&self) -> &str {
        &self.core.id
    }

    /// Id of the source used while an annotation is being dragged.
    pub fn drag_source_id(&self) -> &str {
        &self.core.drag_source_id
    }

    /// Id of the layer used while an annotation is being dragged.
    pub fn drag_layer_id(&self) -> &str {
        &self.core.drag_layer_id
    }

    /// Current annotations. An annotation that is being dragged has its live geometry.
    pub fn annotations(&self) -> Vec<A> {
        let state = self.core.state.lock();
        state.drag.apply_to(&state.annotations)
    }

    /// Replaces all annotations of the manager. The change is pushed to the engine on the next tick.
    pub fn set_annotations(&self, annotations: impl IntoIterator<Item = A>) {
        let mut state = self.core.state.lock();
        if state.is_destroyed {
            log::debug!("Annotations assigned to destroyed manager {}", self.core.id);
            return;
        }

        state.annotations = annotations.into_iter().collect();
        state.index = FeatureIndex::new(&state.annotations);
        self.core.drop_orphaned_drag(&mut state);
        state.sync.mark_dirty();
    }

    /// Value of a layer-wide property, if it is set.
    pub fn layer_property(&self, name: &str) -> Option<Value> {
        self.core.state.lock().layer_properties.get(name).cloned()
    }

    /// Sets a layer-wide property. `None` resets the property to the engine default on the next sync.
    ///
    /// Unknown property names are ignored.
    pub fn set_layer_property(&self, name: &str, value: Option<Value>) {
        let mut state = self.core.state.lock();
        if state.is_destroyed {
            log::debug!("Layer property {name} set on destroyed manager {}", self.core.id);
            return;
        }

        if state.layer_properties.set(name, value) {
            state.sync.mark_assigned(name);
            state.sync.mark_dirty();
        }
    }

    /// Sets the observer notified when annotations of the manager are tapped.
    pub fn set_observer(&self, observer: Option<Arc<dyn AnnotationInteractionObserver<A>>>) {
        *self.observer.write() = observer;
    }

    /// Pushes accumulated changes to the engine. Does nothing if nothing changed since the last sync.
    ///
    /// This is called by the display link on every frame.
    pub fn sync_if_needed(&self) {
        self.core.sync_if_needed();
    }

    /// Notifies the observer about the annotations with the given feature ids, in the given order.
    ///
    /// Ids that do not belong to the manager are ignored. The observer is not called if none of the ids
    /// match.
    pub fn handle_queried_feature_ids(&self, feature_ids: &[String]) {
        let tapped = self.core.resolve(feature_ids);
        if tapped.is_empty() {
            return;
        }

        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            observer.annotations_tapped(self, &tapped);
        }
    }

    /// Starts dragging the first draggable annotation among the given feature ids.
    ///
    /// Returns `false` without calling the engine if none of the ids is a draggable annotation of the
    /// manager.
    pub fn handle_drag_begin(&self, feature_ids: &[String]) -> bool {
        self.core.drag_begin(feature_ids)
    }

    /// Moves the dragged annotation by the given screen-space delta since the previous call.
    pub fn handle_drag_changed(&self, translation: Vector2d) {
        self.core.drag_changed(translation);
    }

    /// Finishes the drag and keeps the dragged annotation at its new position.
    pub fn handle_drag_end(&self) {
        self.core.drag_end();
    }

    /// Cancels the drag. The dragged annotation returns to its position before the drag.
    pub fn handle_drag_cancel(&self) {
        self.core.drag_cancel();
    }

    /// Removes the manager's layers and sources from the style and stops syncing.
    ///
    /// Calling this more than once has no effect.
    pub fn destroy(&self) {
        if self.core.destroy() {
            self.display_link.remove(self.participant_id);
        }
    }

    /// Returns true if the manager was destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.core.state.lock().is_destroyed
    }
}

/// Type-erased view of an [`AnnotationManager`], used to keep managers of different annotation types
/// together.
pub trait AnnotationManagerHandle: MaybeSend + MaybeSync {
    /// Id of the manager.
    fn id(&self) -> &str;
    /// Id of the layer drawing the annotations.
    fn layer_id(&self) -> &str;
    /// See [`AnnotationManager::sync_if_needed`].
    fn sync_if_needed(&self);
    /// See [`AnnotationManager::handle_queried_feature_ids`].
    fn handle_queried_feature_ids(&self, feature_ids: &[String]);
    /// See [`AnnotationManager::handle_drag_begin`].
    fn handle_drag_begin(&self, feature_ids: &[String]) -> bool;
    /// See [`AnnotationManager::handle_drag_changed`].
    fn handle_drag_changed(&self, translation: Vector2d);
    /// See [`AnnotationManager::handle_drag_end`].
    fn handle_drag_end(&self);
    /// See [`AnnotationManager::handle_drag_cancel`].
    fn handle_drag_cancel(&self);
    /// See [`AnnotationManager::destroy`].
    fn destroy(&self);
    /// Converts the handle into `Any` to get the typed manager back.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<A: Annotation + Send + Sync> AnnotationManagerHandle for AnnotationManager<A>
where
    AnnotationManager<A>: Send + Sync,
{
    fn id(&self) -> &str {
        AnnotationManager::id(self)
    }

    fn layer_id(&self) -> &str {
        AnnotationManager::layer_id(self)
    }

    fn sync_if_needed(&self) {
        AnnotationManager::sync_if_needed(self)
    }

    fn handle_queried_feature_ids(&self, feature_ids: &[String]) {
        AnnotationManager::handle_queried_feature_ids(self, feature_ids)
    }

    fn handle_drag_begin(&self, feature_ids: &[String]) -> bool {
        AnnotationManager::handle_drag_begin(self, feature_ids)
    }

    fn handle_drag_changed(&self, translation: Vector2d) {
        AnnotationManager::handle_drag_changed(self, translation)
    }

    fn handle_drag_end(&self) {
        AnnotationManager::handle_drag_end(self)
    }

    fn handle_drag_cancel(&self) {
        AnnotationManager::handle_drag_cancel(self)
    }

    fn destroy(&self) {
        AnnotationManager::destroy(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub(crate) struct ManagerState<A> {
    annotations: Vec<A>,
    index: FeatureIndex,
    layer_properties: PropertyTable,
    sync: SyncState,
    drag: DragController<A>,
    is_destroyed: bool,
}

/// Part of the manager shared with the display link.
pub(crate) struct ManagerCore<A: Annotation> {
    id: String,
    drag_source_id: String,
    drag_layer_id: String,
    style: Arc<dyn Style>,
    offset: OffsetCalculator,
    state: Mutex<ManagerState<A>>,
}

impl<A: Annotation> ManagerCore<A> {
    fn new(id: String, style: Arc<dyn Style>, offset: OffsetCalculator) -> Self {
        Self {
            drag_source_id: format!("{id}_drag-source"),
            drag_layer_id: format!("{id}_drag-layer"),
            id,
            style,
            offset,
            state: Mutex::new(ManagerState {
                annotations: vec![],
                index: FeatureIndex::default(),
                layer_properties: PropertyTable::new(A::LAYER_PROPERTY_NAMES),
                sync: SyncState::default(),
                drag: DragController::default(),
                is_destroyed: false,
            }),
        }
    }

    /// Adds the source and then the layer, so the layer never references a missing source.
    fn bootstrap(&self, position: Option<LayerPosition>) {
        if let Err(err) = self.style.add_source(SourceDescriptor::geojson(&self.id)) {
            log::warn!("Failed to add source {}: {err}", self.id);
        }

        let layer = LayerDescriptor {
            id: self.id.clone(),
            layer_type: A::LAYER_TYPE,
            source: self.id.clone(),
            properties: PropertyMap::new(),
        };
        if let Err(err) = self.style.add_persistent_layer(layer, position) {
            log::warn!("Failed to add layer {}: {err}", self.id);
        }

        log::debug!("Annotation manager {} created", self.id);
    }

    /// Returns `true` if the manager was destroyed by this call.
    fn destroy(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_destroyed {
            return false;
        }

        state.is_destroyed = true;
        state.drag.clear_session();

        let is_drag_created = state.drag.is_layer_created();
        if is_drag_created {
            self.remove_layer(&self.drag_layer_id);
        }
        self.remove_layer(&self.id);

        if is_drag_created {
            self.remove_source(&self.drag_source_id);
        }
        self.remove_source(&self.id);

        log::debug!("Annotation manager {} destroyed", self.id);
        true
    }

    fn remove_layer(&self, layer_id: &str) {
        if let Err(err) = self.style.remove_layer(layer_id) {
            log::warn!("Failed to remove layer {layer_id}: {err}");
        }
    }

    fn remove_source(&self, source_id: &str) {
        if let Err(err) = self.style.remove_source(source_id) {
            log::warn!("Failed to remove source {source_id}: {err}");
        }
    }
}

impl<A: Annotation> DisplayLinkParticipant for ManagerCore<A> {
    fn participate(&self) {
        self.sync_if_needed();
    }
}
