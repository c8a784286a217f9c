//! Waymark keeps collections of map annotations (circles, symbols, lines and polygons) in sync with the
//! sources and layers of a map rendering engine.
//!
//! # Main components
//!
//! * [`AnnotationManager`] owns one annotation type's source and layer in the rendering engine. The
//!   application assigns the desired annotations to it, and the manager pushes them to the engine on the
//!   next display frame.
//! * [`Style`] is the rendering engine seam: sources, layers and layer properties are created and updated
//!   through it. Waymark never renders anything itself.
//! * [`DisplayLink`] fires once per rendered frame and lets every live manager run at most one sync pass.
//! * [`AnnotationOrchestrator`] owns managers by id and routes tap and drag gestures, resolved by the
//!   engine's rendered feature query, to the manager that owns the hit features.
//!
//! ```no_run
//! use std::sync::Arc;
//! use waymark::annotation::CircleAnnotation;
//! use waymark::{AnnotationManagerBuilder, DisplayLink, MercatorCamera};
//! use waymark::waymark_types::latlon;
//! # fn engine() -> Arc<dyn waymark::Style> { todo!() }
//!
//! let display_link = Arc::new(DisplayLink::new());
//! let camera = Arc::new(MercatorCamera::default());
//! let manager = AnnotationManagerBuilder::<CircleAnnotation>::new(engine(), display_link.clone(), camera)
//!     .with_id("circles")
//!     .build();
//!
//! manager.set_annotations(vec![CircleAnnotation::new(latlon!(0.0, 0.0)).with_draggable(true)]);
//! display_link.tick();
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod annotation;
mod camera;
mod display_link;
pub mod error;
mod manager;
mod offset;
mod orchestrator;
mod style;

#[cfg(test)]
pub(crate) mod tests;

pub use camera::{CameraState, MapCamera, MercatorCamera, TILE_SIZE};
pub use display_link::{DisplayLink, DisplayLinkCoordinator, DisplayLinkParticipant, ParticipantId};
pub use manager::{
    AnnotationInteractionObserver, AnnotationManager, AnnotationManagerBuilder,
    AnnotationManagerHandle,
};
pub use offset::OffsetCalculator;
pub use orchestrator::AnnotationOrchestrator;
pub use style::{
    LayerDescriptor, LayerPosition, LayerType, PropertyMap, QueriedFeature, RenderedFeatureQuery,
    SourceDescriptor, SourceType, Style,
};

// Reexport waymark_types
pub use waymark_types;
