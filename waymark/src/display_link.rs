//! Per-frame callbacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::Mutex;

/// Object that wants to be called once per rendered frame.
pub trait DisplayLinkParticipant: MaybeSend + MaybeSync {
    /// Called by the display link coordinator once per frame.
    fn participate(&self);
}

/// Registration handle returned by [`DisplayLinkCoordinator::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(u64);

/// Coordinator that fires participants once per display frame.
///
/// Coordinators hold participants weakly: a participant that was dropped without being removed is simply
/// skipped.
pub trait DisplayLinkCoordinator: MaybeSend + MaybeSync {
    /// Registers a participant.
    fn add(&self, participant: Weak<dyn DisplayLinkParticipant>) -> ParticipantId;
    /// Deregisters a participant. Unknown ids are ignored.
    fn remove(&self, id: ParticipantId);
}

/// Default [`DisplayLinkCoordinator`]. The application calls [`DisplayLink::tick`] from its frame callback.
#[derive(Default)]
pub struct DisplayLink {
    participants: Mutex<Vec<(ParticipantId, Weak<dyn DisplayLinkParticipant>)>>,
    next_id: AtomicU64,
}

impl DisplayLink {
    /// Creates a display link without participants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every live participant once, in registration order.
    ///
    /// Participants are collected before any of them is called, so a participant can add or remove
    /// participants from its callback. Changes take effect on the next tick.
    pub fn tick(&self) {
        let live: Vec<Arc<dyn DisplayLinkParticipant>> = {
            let mut participants = self.participants.lock();
            participants.retain(|(_, p)| p.strong_count() > 0);
            participants.iter().filter_map(|(_, p)| p.upgrade()).collect()
        };

        for participant in live {
            participant.participate();
        }
    }

    /// Number of registered participants that are still alive.
    pub fn participant_count(&self) -> usize {
        self.participants
            .lock()
            .iter()
            .filter(|(_, p)| p.strong_count() > 0)
            .count()
    }
}

impl DisplayLinkCoordinator for DisplayLink {
    fn add(&self, participant: Weak<dyn DisplayLinkParticipant>) -> ParticipantId {
        let id = ParticipantId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.participants.lock().push((id, participant));
        id
    }

    fn remove(&self, id: ParticipantId) {
        self.participants.lock().retain(|(p_id, _)| *p_id != id);
    }
}
