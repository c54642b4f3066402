use crate::geometry::{Cell, Rotation};

use super::{InstanceId, PlacedInstance};

/// Committed registry change, delivered after the state has been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementEvent {
    Placed(PlacedInstance),
    Moved {
        instance_id: InstanceId,
        from: Cell,
        to: Cell,
    },
    Rotated {
        instance_id: InstanceId,
        rotation: Rotation,
    },
    Removed(PlacedInstance),
    /// The whole layout was rebuilt from saved records.
    Restored { restored: usize, skipped: usize },
    /// Session selection and edit-mode changes.
    Selected(InstanceId),
    Deselected,
    EditModeChanged(bool),
}

/// Listener notified synchronously, in registration order.
pub trait PlacementObserver {
    fn notify(&mut self, event: &PlacementEvent);
}

impl<F> PlacementObserver for F
where
    F: FnMut(&PlacementEvent),
{
    fn notify(&mut self, event: &PlacementEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

#[derive(Default)]
pub(crate) struct ObserverList {
    entries: Vec<(ObserverId, Box<dyn PlacementObserver>)>,
    next_id: u64,
}

impl ObserverList {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn PlacementObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn dispatch(&mut self, event: &PlacementEvent) {
        for (_, observer) in self.entries.iter_mut() {
            observer.notify(event);
        }
    }
}
