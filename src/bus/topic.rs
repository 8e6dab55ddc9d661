use std::fmt;
use std::sync::Arc;

use crate::bus::event::{Event, EventName};

pub type SubscriptionId = u64;

/// A handler invoked for every event published under its name.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// The ordered subscriber list of a single event name.
#[derive(Clone)]
pub struct Topic {
    pub name: EventName,
    pub subscribers: Vec<(SubscriptionId, Handler)>,
}

impl Topic {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
        }
    }

    /// Appends a handler; handlers run in the order they subscribed.
    pub fn subscribe(&mut self, id: SubscriptionId, handler: Handler) {
        self.subscribers.push((id, handler));
    }

    /// Returns whether a handler was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn handlers(&self) -> Vec<Handler> {
        self.subscribers.iter().map(|(_, h)| h.clone()).collect()
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
