use ahash::{AHashMap, AHashSet};
use maybe_sync::{MaybeSend, MaybeSync};

use super::{AnnotationManager, ManagerCore};
use crate::annotation::Annotation;

/// Receives interaction events of an [`AnnotationManager`].
pub trait AnnotationInteractionObserver<A: Annotation>: MaybeSend + MaybeSync {
    /// Called when annotations of the manager were tapped. `annotations` is never empty and is ordered
    /// as reported by the engine's feature query.
    fn annotations_tapped(&self, manager: &AnnotationManager<A>, annotations: &[A]);
}

impl<A, F> AnnotationInteractionObserver<A> for F
where
    A: Annotation,
    F: Fn(&AnnotationManager<A>, &[A]) + MaybeSend + MaybeSync,
{
    fn annotations_tapped(&self, manager: &AnnotationManager<A>, annotations: &[A]) {
        self(manager, annotations)
    }
}

/// Lookup from feature id to the position of the annotation in the manager's collection.
#[derive(Debug, Default)]
pub(super) struct FeatureIndex {
    positions: AHashMap<String, usize>,
}

impl FeatureIndex {
    pub(super) fn new<A: Annotation>(annotations: &[A]) -> Self {
        let mut positions = AHashMap::with_capacity(annotations.len());
        for (position, annotation) in annotations.iter().enumerate() {
            if positions.contains_key(annotation.id()) {
                log::warn!("Duplicate annotation id {}", annotation.id());
                continue;
            }

            positions.insert(annotation.id().to_string(), position);
        }

        Self { positions }
    }

    pub(super) fn get(&self, feature_id: &str) -> Option<usize> {
        self.positions.get(feature_id).copied()
    }

    /// Positions of the annotations with the given feature ids, in the order of the ids. Unknown and
    /// repeated ids are skipped.
    pub(super) fn resolve(&self, feature_ids: &[String]) -> Vec<usize> {
        let mut seen = AHashSet::new();
        feature_ids
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|position| seen.insert(*position))
            .collect()
    }
}

impl<A: Annotation> ManagerCore<A> {
    pub(super) fn resolve(&self, feature_ids: &[String]) -> Vec<A> {
        let state = self.state.lock();
        if state.is_destroyed {
            log::debug!("Interaction ignored by destroyed manager {}", self.id);
            return vec![];
        }

        let annotations = state.drag.apply_to(&state.annotations);
        state
            .index
            .resolve(feature_ids)
            .into_iter()
            .filter_map(|position| annotations.get(position).cloned())
            .collect()
    }
}
