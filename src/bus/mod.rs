//! The `bus` module is the in-process publish/subscribe channel that connects
//! the public API to the connection task and inbound frames to callbacks.
//!
//! Publication is synchronous: every handler subscribed to the event's name
//! runs in the publisher's context, in subscription order. Publishing an
//! event nobody listens to is a no-op, e.g. a command issued while no
//! connection holds the outbound subscriptions.

pub mod engine;
pub mod event;
pub mod topic;

pub use engine::{Bus, SubscriptionId};
pub use event::{Event, EventName};
