use rapier3d::prelude::*;
use std::sync::{Arc, Mutex};

/// Contact transition reported by the engine during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        body1: Option<RigidBodyHandle>,
        body2: Option<RigidBodyHandle>,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        body1: Option<RigidBodyHandle>,
        body2: Option<RigidBodyHandle>,
    },
}

impl ContactEvent {
    pub fn is_started(&self) -> bool {
        matches!(self, ContactEvent::Started { .. })
    }

    /// Bodies owning the two colliders
    pub fn bodies(&self) -> (Option<RigidBodyHandle>, Option<RigidBodyHandle>) {
        match *self {
            ContactEvent::Started { body1, body2, .. }
            | ContactEvent::Stopped { body1, body2, .. } => (body1, body2),
        }
    }

    /// Whether either side of the contact belongs to `body`
    pub fn involves(&self, body: RigidBodyHandle) -> bool {
        let (a, b) = self.bodies();
        a == Some(body) || b == Some(body)
    }
}

/// Collects contact events while the pipeline steps.
///
/// The engine's `EventHandler` only gets `&self`, hence the mutex.
pub struct ContactEventQueue {
    events: Arc<Mutex<Vec<ContactEvent>>>,
}

impl ContactEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Drain every event collected since the last call
    pub fn take(&self) -> Vec<ContactEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: ContactEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for ContactEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ContactEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let parent = |h: ColliderHandle| colliders.get(h).and_then(|c| c.parent());
        match event {
            CollisionEvent::Started(h1, h2, _flags) => self.push(ContactEvent::Started {
                collider1: h1,
                collider2: h2,
                body1: parent(h1),
                body2: parent(h2),
            }),
            CollisionEvent::Stopped(h1, h2, _flags) => self.push(ContactEvent::Stopped {
                collider1: h1,
                collider2: h2,
                body1: parent(h1),
                body2: parent(h2),
            }),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(started: bool) -> ContactEvent {
        let collider1 = ColliderHandle::from_raw_parts(0, 0);
        let collider2 = ColliderHandle::from_raw_parts(1, 0);
        let body1 = Some(RigidBodyHandle::from_raw_parts(0, 0));
        if started {
            ContactEvent::Started { collider1, collider2, body1, body2: None }
        } else {
            ContactEvent::Stopped { collider1, collider2, body1, body2: None }
        }
    }

    #[test]
    fn test_take_drains_queue() {
        let queue = ContactEventQueue::new();
        queue.push(sample_event(true));
        queue.push(sample_event(false));
        assert_eq!(queue.len(), 2);

        let events = queue.take();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_started());
        assert!(!events[1].is_started());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_involves() {
        let event = sample_event(true);
        assert!(event.involves(RigidBodyHandle::from_raw_parts(0, 0)));
        assert!(!event.involves(RigidBodyHandle::from_raw_parts(5, 0)));
    }
}
