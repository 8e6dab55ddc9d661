use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::bus::event::{Event, EventName};
use crate::bus::topic::{Handler, Topic};

pub use crate::bus::topic::SubscriptionId;

#[derive(Debug, Default)]
struct Subscriptions {
    next_id: SubscriptionId,
    topics: HashMap<EventName, Topic>,
}

/// A synchronous, many-subscriber event channel.
///
/// Cloning a `Bus` yields another handle to the same subscriber table.
#[derive(Debug, Clone, Default)]
pub struct Bus {
    inner: Arc<Mutex<Subscriptions>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Subscriptions> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribes `handler` to events published under `name`.
    pub fn subscribe<F>(&self, name: EventName, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut subs = self.lock();
        subs.next_id += 1;
        let id = subs.next_id;
        subs.topics
            .entry(name)
            .or_insert_with(|| Topic::new(name))
            .subscribe(id, Arc::new(handler));
        id
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.lock();
        for topic in subs.topics.values_mut() {
            if topic.unsubscribe(id) {
                break;
            }
        }
    }

    /// Delivers `event` to every current subscriber of its name.
    ///
    /// The subscriber list is snapshotted before dispatch, so handlers may
    /// publish or (un)subscribe without deadlocking.
    pub fn publish(&self, event: Event) {
        let name = event.name();
        let handlers: Vec<Handler> = match self.lock().topics.get(&name) {
            Some(topic) => topic.handlers(),
            None => Vec::new(),
        };

        if handlers.is_empty() {
            tracing::trace!(event = %name, "no subscribers, event dropped");
            return;
        }

        for handler in handlers {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.lock()
            .topics
            .get(&name)
            .map_or(0, |topic| topic.subscribers.len())
    }
}
