//! Ownership of annotation managers and routing of gestures to them.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use waymark_types::cartesian::{Point2d, Vector2d};

use crate::annotation::{
    Annotation, CircleAnnotation, PointAnnotation, PolygonAnnotation, PolylineAnnotation,
};
use crate::camera::MapCamera;
use crate::display_link::DisplayLinkCoordinator;
use crate::manager::{AnnotationManager, AnnotationManagerBuilder, AnnotationManagerHandle};
use crate::style::{LayerPosition, QueriedFeature, RenderedFeatureQuery, Style};

struct ManagerEntry {
    handle: Arc<dyn AnnotationManagerHandle>,
    any: Arc<dyn Any + Send + Sync>,
}

/// Creates and owns annotation managers of a map.
///
/// Managers are kept by id: creating a manager with the id of an existing one destroys the existing
/// manager first. Taps and drags are resolved with the engine's rendered feature query and routed to the
/// managers owning the hit features.
pub struct AnnotationOrchestrator {
    style: Arc<dyn Style>,
    query: Arc<dyn RenderedFeatureQuery>,
    display_link: Arc<dyn DisplayLinkCoordinator>,
    camera: Arc<dyn MapCamera>,
    managers: RwLock<Vec<ManagerEntry>>,
    dragged: Mutex<Option<Arc<dyn AnnotationManagerHandle>>>,
}

impl AnnotationOrchestrator {
    /// Creates an orchestrator without managers.
    pub fn new(
        style: Arc<dyn Style>,
        query: Arc<dyn RenderedFeatureQuery>,
        display_link: Arc<dyn DisplayLinkCoordinator>,
        camera: Arc<dyn MapCamera>,
    ) -> Self {
        Self {
            style,
            query,
            display_link,
            camera,
            managers: RwLock::new(vec![]),
            dragged: Mutex::new(None),
        }
    }

    /// Creates a manager of circle annotations.
    pub fn make_circle_annotation_manager(
        &self,
        id: Option<String>,
        layer_position: Option<LayerPosition>,
    ) -> Arc<AnnotationManager<CircleAnnotation>> {
        self.make_annotation_manager(id, layer_position)
    }

    /// Creates a manager of point (symbol) annotations.
    pub fn make_point_annotation_manager(
        &self,
        id: Option<String>,
        layer_position: Option<LayerPosition>,
    ) -> Arc<AnnotationManager<PointAnnotation>> {
        self.make_annotation_manager(id, layer_position)
    }

    /// Creates a manager of polyline annotations.
    pub fn make_polyline_annotation_manager(
        &self,
        id: Option<String>,
        layer_position: Option<LayerPosition>,
    ) -> Arc<AnnotationManager<PolylineAnnotation>> {
        self.make_annotation_manager(id, layer_position)
    }

    /// Creates a manager of polygon annotations.
    pub fn make_polygon_annotation_manager(
        &self,
        id: Option<String>,
        layer_position: Option<LayerPosition>,
    ) -> Arc<AnnotationManager<PolygonAnnotation>> {
        self.make_annotation_manager(id, layer_position)
    }

    /// Creates a manager of any annotation type. An existing manager with the same id is destroyed and
    /// replaced.
    pub fn make_annotation_manager<A: Annotation + Send + Sync>(
        &self,
        id: Option<String>,
        layer_position: Option<LayerPosition>,
    ) -> Arc<AnnotationManager<A>> {
        if let Some(id) = &id {
            if self.remove_annotation_manager(id) {
                log::debug!("Annotation manager {id} is replaced");
            }
        }

        let mut builder = AnnotationManagerBuilder::<A>::new(
            self.style.clone(),
            self.display_link.clone(),
            self.camera.clone(),
        );
        if let Some(id) = id {
            builder = builder.with_id(id);
        }
        if let Some(position) = layer_position {
            builder = builder.with_layer_position(position);
        }

        let manager = Arc::new(builder.build());
        self.managers.write().push(ManagerEntry {
            handle: manager.clone(),
            any: manager.clone(),
        });

        manager
    }

    /// Manager with the given id, if it exists and manages annotations of type `A`.
    pub fn annotation_manager<A: Annotation + Send + Sync>(
        &self,
        id: &str,
    ) -> Option<Arc<AnnotationManager<A>>> {
        self.managers
            .read()
            .iter()
            .find(|entry| entry.handle.id() == id)
            .and_then(|entry| entry.any.clone().downcast().ok())
    }

    /// Ids of all managers, in creation order.
    pub fn manager_ids(&self) -> Vec<String> {
        self.managers
            .read()
            .iter()
            .map(|entry| entry.handle.id().to_string())
            .collect()
    }

    /// Destroys the manager with the given id and stops owning it. Returns `false` if there is no such
    /// manager.
    pub fn remove_annotation_manager(&self, id: &str) -> bool {
        let removed = {
            let mut managers = self.managers.write();
            let Some(position) = managers.iter().position(|entry| entry.handle.id() == id) else {
                return false;
            };
            managers.remove(position)
        };

        let mut dragged = self.dragged.lock();
        if dragged
            .as_ref()
            .is_some_and(|handle| Arc::ptr_eq(handle, &removed.handle))
        {
            *dragged = None;
        }

        removed.handle.destroy();
        true
    }

    /// Notifies managers about their annotations rendered at the given screen point.
    pub fn handle_tap(&self, point: Point2d) {
        for (handle, feature_ids) in self.query_managers(point) {
            handle.handle_queried_feature_ids(&feature_ids);
        }
    }

    /// Starts dragging the topmost draggable annotation at the given screen point. Returns `true` if a
    /// drag was started.
    pub fn handle_drag_begin(&self, point: Point2d) -> bool {
        for (handle, feature_ids) in self.query_managers(point) {
            if handle.handle_drag_begin(&feature_ids) {
                let previous = self.dragged.lock().replace(handle.clone());
                if let Some(previous) = previous {
                    if !Arc::ptr_eq(&previous, &handle) {
                        previous.handle_drag_end();
                    }
                }
                return true;
            }
        }

        false
    }

    /// Moves the dragged annotation by the screen-space delta since the previous call.
    pub fn handle_drag_changed(&self, translation: Vector2d) {
        let dragged = self.dragged.lock().clone();
        if let Some(handle) = dragged {
            handle.handle_drag_changed(translation);
        }
    }

    /// Finishes the active drag.
    pub fn handle_drag_end(&self) {
        let dragged = self.dragged.lock().take();
        if let Some(handle) = dragged {
            handle.handle_drag_end();
        }
    }

    /// Cancels the active drag.
    pub fn handle_drag_cancel(&self) {
        let dragged = self.dragged.lock().take();
        if let Some(handle) = dragged {
            handle.handle_drag_cancel();
        }
    }

    /// Queries the engine for features of all managed layers and groups hit feature ids by manager, in
    /// the order managers are first hit.
    fn query_managers(&self, point: Point2d) -> Vec<(Arc<dyn AnnotationManagerHandle>, Vec<String>)> {
        let handles: Vec<_> = self
            .managers
            .read()
            .iter()
            .map(|entry| entry.handle.clone())
            .collect();
        if handles.is_empty() {
            return vec![];
        }

        let layer_ids: Vec<String> = handles.iter().map(|h| h.layer_id().to_string()).collect();
        let hits = self.query.query_rendered_features(point, &layer_ids);

        let mut grouped: Vec<(Arc<dyn AnnotationManagerHandle>, Vec<String>)> = vec![];
        for QueriedFeature {
            layer_id,
            feature_id,
        } in hits
        {
            if let Some((_, ids)) = grouped.iter_mut().find(|(h, _)| h.layer_id() == layer_id) {
                ids.push(feature_id);
                continue;
            }

            match handles.iter().find(|h| h.layer_id() == layer_id) {
                Some(handle) => grouped.push((handle.clone(), vec![feature_id])),
                None => log::debug!("Hit in unknown layer {layer_id} is ignored"),
            }
        }

        grouped
    }
}

impl Drop for AnnotationOrchestrator {
    fn drop(&mut self) {
        for entry in self.managers.get_mut().drain(..) {
            entry.handle.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use waymark_types::latlon;

    use super::*;
    use crate::tests::{camera, MockDisplayLink, MockStyle, StyleCall};

    fn orchestrator(style: &Arc<MockStyle>) -> AnnotationOrchestrator {
        AnnotationOrchestrator::new(
            style.clone(),
            style.clone(),
            Arc::new(MockDisplayLink::default()),
            camera(),
        )
    }

    fn point() -> Point2d {
        Point2d::new(256.0, 256.0)
    }

    #[test]
    fn same_id_replaces_manager() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);

        let first = orchestrator.make_circle_annotation_manager(Some("a".into()), None);
        style.clear();
        let second = orchestrator.make_circle_annotation_manager(Some("a".into()), None);

        assert!(first.is_destroyed());
        assert!(!second.is_destroyed());
        assert_eq!(orchestrator.manager_ids(), vec!["a".to_string()]);
        assert_eq!(
            &style.calls()[..2],
            &[
                StyleCall::RemoveLayer("a".into()),
                StyleCall::RemoveSource("a".into())
            ]
        );
    }

    #[test]
    fn manager_is_found_by_id_and_type() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);
        let lines = orchestrator.make_polyline_annotation_manager(Some("lines".into()), None);

        let found = orchestrator.annotation_manager::<PolylineAnnotation>("lines");
        assert!(found.is_some_and(|found| Arc::ptr_eq(&found, &lines)));
        assert!(orchestrator
            .annotation_manager::<CircleAnnotation>("lines")
            .is_none());
        assert!(orchestrator
            .annotation_manager::<PolylineAnnotation>("other")
            .is_none());
    }

    #[test]
    fn remove_destroys_manager() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);
        let manager = orchestrator.make_polygon_annotation_manager(None, None);

        assert!(orchestrator.remove_annotation_manager(&manager.id().to_string()));
        assert!(manager.is_destroyed());
        assert!(!orchestrator.remove_annotation_manager("unknown"));
        assert!(orchestrator.manager_ids().is_empty());
    }

    #[test]
    fn tap_is_routed_to_owning_manager() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);

        let circles_tapped = Arc::new(Mutex::new(vec![]));
        let circles = orchestrator.make_circle_annotation_manager(Some("circles".into()), None);
        let recorded = circles_tapped.clone();
        circles.set_observer(Some(Arc::new(
            move |_: &AnnotationManager<CircleAnnotation>, annotations: &[CircleAnnotation]| {
                recorded.lock().extend(annotations.iter().map(|a| a.id().to_string()));
            },
        )));
        circles.set_annotations(vec![
            CircleAnnotation::new(latlon!(0.0, 0.0)).with_id("c1"),
            CircleAnnotation::new(latlon!(0.0, 0.0)).with_id("c2"),
        ]);
        let _points = orchestrator.make_point_annotation_manager(Some("points".into()), None);

        style.set_query_result(vec![
            QueriedFeature::new("points", "p1"),
            QueriedFeature::new("circles", "c2"),
            QueriedFeature::new("circles", "c1"),
        ]);
        orchestrator.handle_tap(point());

        assert_eq!(*circles_tapped.lock(), vec!["c2".to_string(), "c1".to_string()]);
        assert_eq!(
            style.queried_layers(),
            vec![vec!["circles".to_string(), "points".to_string()]]
        );
    }

    #[test]
    fn drag_is_routed_to_first_accepting_manager() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);

        let fixed = orchestrator.make_circle_annotation_manager(Some("fixed".into()), None);
        fixed.set_annotations(vec![CircleAnnotation::new(latlon!(0.0, 0.0)).with_id("f")]);
        let movable = orchestrator.make_circle_annotation_manager(Some("movable".into()), None);
        movable.set_annotations(vec![CircleAnnotation::new(latlon!(0.0, 0.0))
            .with_id("m")
            .with_draggable(true)]);
        style.clear();

        style.set_query_result(vec![
            QueriedFeature::new("fixed", "f"),
            QueriedFeature::new("movable", "m"),
        ]);
        assert!(orchestrator.handle_drag_begin(point()));

        orchestrator.handle_drag_changed(Vector2d::new(0.0, -10.0));
        orchestrator.handle_drag_end();

        assert!(movable.annotations()[0].point().lat() > 0.0);
        assert_eq!(fixed.annotations()[0].point(), latlon!(0.0, 0.0));
        assert_eq!(style.layer_ids(), vec!["movable_drag-layer".to_string()]);
    }

    #[test]
    fn drag_without_hits_is_ignored() {
        let style = Arc::new(MockStyle::default());
        let orchestrator = orchestrator(&style);
        let _manager = orchestrator.make_circle_annotation_manager(Some("circles".into()), None);
        style.clear();

        assert!(!orchestrator.handle_drag_begin(point()));
        orchestrator.handle_drag_changed(Vector2d::new(1.0, 1.0));
        orchestrator.handle_drag_cancel();
        assert!(style.calls().is_empty());
    }

    #[test]
    fn drop_destroys_managers() {
        let style = Arc::new(MockStyle::default());
        let manager = {
            let orchestrator = orchestrator(&style);
            orchestrator.make_circle_annotation_manager(None, None)
        };

        assert!(manager.is_destroyed());
    }
}
