//! This example shows how annotation managers talk to a rendering engine. The engine here only logs the
//! calls it receives and hit-tests circles by their distance to the pointer.
//!
//! Run with `RUST_LOG=info cargo run --example circle_annotations`.

use std::sync::Arc;

use geojson::FeatureCollection;
use parking_lot::RwLock;
use serde_json::Value;
use waymark::annotation::{Annotation, CircleAnnotation, StyleColor};
use waymark::error::WaymarkError;
use waymark::waymark_types::cartesian::{Point2d, Vector2d};
use waymark::waymark_types::geo::GeoPoint2d;
use waymark::waymark_types::{latlon, Geometry};
use waymark::{
    AnnotationManager, AnnotationOrchestrator, DisplayLink, LayerDescriptor, LayerPosition,
    LayerType, MapCamera, MercatorCamera, PropertyMap, QueriedFeature, RenderedFeatureQuery,
    SourceDescriptor, Style,
};

const HIT_RADIUS: f64 = 10.0;

/// Engine that keeps the point features of its sources and logs all changes.
struct LoggingEngine {
    camera: Arc<MercatorCamera>,
    sources: RwLock<Vec<(String, Vec<(String, GeoPoint2d)>)>>,
}

impl LoggingEngine {
    fn new(camera: Arc<MercatorCamera>) -> Self {
        Self {
            camera,
            sources: RwLock::new(vec![]),
        }
    }
}

impl Style for LoggingEngine {
    fn add_source(&self, source: SourceDescriptor) -> Result<(), WaymarkError> {
        log::info!("add source {}", source.id);
        let mut sources = self.sources.write();
        if sources.iter().any(|(id, _)| *id == source.id) {
            return Err(WaymarkError::DuplicateId(source.id));
        }

        sources.push((source.id, vec![]));
        Ok(())
    }

    fn update_geojson_source(
        &self,
        source_id: &str,
        features: FeatureCollection,
    ) -> Result<(), WaymarkError> {
        log::info!("update source {source_id}: {} features", features.features.len());
        let points = features
            .features
            .into_iter()
            .filter_map(|feature| {
                let id = match feature.id? {
                    geojson::feature::Id::String(id) => id,
                    geojson::feature::Id::Number(id) => id.to_string(),
                };
                match Geometry::try_from(feature.geometry?).ok()? {
                    Geometry::Point(point) => Some((id, point)),
                    _ => None,
                }
            })
            .collect();

        let mut sources = self.sources.write();
        let (_, data) = sources
            .iter_mut()
            .find(|(id, _)| id == source_id)
            .ok_or_else(|| WaymarkError::Style(format!("unknown source {source_id}")))?;
        *data = points;
        Ok(())
    }

    fn remove_source(&self, source_id: &str) -> Result<(), WaymarkError> {
        log::info!("remove source {source_id}");
        self.sources.write().retain(|(id, _)| id != source_id);
        Ok(())
    }

    fn add_persistent_layer(
        &self,
        layer: LayerDescriptor,
        position: Option<LayerPosition>,
    ) -> Result<(), WaymarkError> {
        log::info!(
            "add {} layer {} at {position:?}",
            layer.layer_type.as_str(),
            layer.id
        );
        Ok(())
    }

    fn set_layer_properties(
        &self,
        layer_id: &str,
        properties: PropertyMap,
    ) -> Result<(), WaymarkError> {
        log::info!("set properties of {layer_id}: {}", Value::Object(properties));
        Ok(())
    }

    fn remove_layer(&self, layer_id: &str) -> Result<(), WaymarkError> {
        log::info!("remove layer {layer_id}");
        Ok(())
    }

    fn layer_property_default_value(&self, layer_type: LayerType, property: &str) -> Option<Value> {
        match (layer_type, property) {
            (LayerType::Circle, "circle-emissive-strength") => Some(Value::from(1.0)),
            _ => None,
        }
    }
}

impl RenderedFeatureQuery for LoggingEngine {
    fn query_rendered_features(&self, point: Point2d, layer_ids: &[String]) -> Vec<QueriedFeature> {
        // Layers draw the source with the same id.
        self.sources
            .read()
            .iter()
            .filter(|(id, _)| layer_ids.contains(id))
            .flat_map(|(layer_id, features)| {
                features
                    .iter()
                    .filter(move |(_, position)| {
                        (self.camera.point_for(position) - point).norm() <= HIT_RADIUS
                    })
                    .map(move |(feature_id, _)| QueriedFeature::new(layer_id, feature_id))
            })
            .collect()
    }
}

fn main() {
    env_logger::init();

    let camera = Arc::new(MercatorCamera::default());
    let engine = Arc::new(LoggingEngine::new(camera.clone()));
    let display_link = Arc::new(DisplayLink::new());
    let orchestrator =
        AnnotationOrchestrator::new(engine.clone(), engine, display_link.clone(), camera.clone());

    let circles = orchestrator.make_circle_annotation_manager(Some("circles".into()), None);
    circles.set_observer(Some(Arc::new(
        |_: &AnnotationManager<CircleAnnotation>, tapped: &[CircleAnnotation]| {
            for annotation in tapped {
                println!("Tapped {} at {:?}", annotation.id(), annotation.point());
            }
        },
    )));

    let annotations = (0..5).map(|i| {
        let mut annotation = CircleAnnotation::new(latlon!(0.0, i as f64 * 20.0))
            .with_id(format!("circle-{i}"))
            .with_draggable(i % 2 == 0);
        annotation.set_circle_radius(Some(6.0 + i as f64));
        annotation.set_circle_color(Some(StyleColor::rgb(50 * i as u8, 100, 200)));
        annotation
    });
    circles.set_annotations(annotations);
    circles.set_circle_emissive_strength(Some(0.5));
    display_link.tick();

    let second = camera.point_for(&latlon!(0.0, 40.0));
    orchestrator.handle_tap(second);

    if orchestrator.handle_drag_begin(second) {
        for _ in 0..10 {
            orchestrator.handle_drag_changed(Vector2d::new(0.0, -3.0));
            display_link.tick();
        }
        orchestrator.handle_drag_end();
    }
    display_link.tick();

    for annotation in circles.annotations() {
        println!("{} is at {:?}", annotation.id(), annotation.point());
    }

    circles.set_circle_emissive_strength(None);
    display_link.tick();

    orchestrator.remove_annotation_manager("circles");
}
