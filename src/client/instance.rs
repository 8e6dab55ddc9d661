use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::bus::{Bus, Event};
use crate::client::command::Command;
use crate::transport::message::ConsumerData;
use crate::utils::ClientError;

pub type ConsumerCallback = Arc<dyn Fn(ConsumerData) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&ClientError) + Send + Sync>;

#[derive(Default)]
struct InstanceState {
    connected: bool,
    has_consumer: bool,
    max_job: u32,
    consumer: Option<ConsumerCallback>,
    on_error: Option<ErrorCallback>,
    pending: VecDeque<Command>,
}

/// Live state of one topic identifier.
///
/// Lock discipline: bus handlers for outbound events (`ACKNOWLEDGE_JOB`,
/// `CREATE_JOB`, `DELETE_JOB`, `HAVE_CONSUMER`) may run while the state lock
/// is held and must not touch the instance. Callbacks are cloned out of the
/// lock before they are invoked.
pub struct Instance {
    topic_id: String,
    bus: Bus,
    max_pending: usize,
    state: Mutex<InstanceState>,
}

impl Instance {
    /// `max_pending` bounds the commands held while the broker is not ready.
    pub(crate) fn new(
        topic_id: impl Into<String>,
        max_job: u32,
        max_pending: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            topic_id: topic_id.into(),
            bus: Bus::new(),
            max_pending,
            state: Mutex::new(InstanceState {
                max_job,
                ..InstanceState::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, InstanceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn max_job(&self) -> u32 {
        self.lock().max_job
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Publishes `command` now if the broker reported the session ready,
    /// otherwise queues it behind any earlier pending commands.
    ///
    /// Fails with [`ClientError::QueueFull`] once `max_pending` commands are
    /// waiting; the queue is left untouched.
    pub(crate) fn submit(&self, command: Command) -> Result<(), ClientError> {
        let mut state = self.lock();
        if state.connected {
            self.bus.publish(command_event(command));
            return Ok(());
        }
        if state.pending.len() >= self.max_pending {
            tracing::warn!(topic_id = %self.topic_id, capacity = self.max_pending, "pending queue full, command refused");
            return Err(ClientError::QueueFull {
                capacity: self.max_pending,
            });
        }
        tracing::debug!(topic_id = %self.topic_id, "not connected, queueing command");
        state.pending.push_back(command);
        Ok(())
    }

    /// Applies a `STATUS` frame: records the flag, announces consumer
    /// capacity and, when ready, flushes pending commands in order.
    ///
    /// Done under one lock so a concurrent [`Instance::submit`] cannot
    /// overtake queued commands.
    pub(crate) fn apply_status(&self, connected: bool) {
        let mut state = self.lock();
        state.connected = connected;
        self.bus.publish(Event::HaveConsumer {
            have_consumer: state.has_consumer,
            max_job: state.max_job,
        });
        if connected {
            let flushed = state.pending.len();
            while let Some(command) = state.pending.pop_front() {
                self.bus.publish(command_event(command));
            }
            if flushed > 0 {
                tracing::debug!(topic_id = %self.topic_id, flushed, "flushed queued commands");
            }
        }
    }

    pub(crate) fn mark_disconnected(&self) {
        self.lock().connected = false;
    }

    /// Installs the consumer; announces it right away if already connected.
    pub(crate) fn set_consumer(&self, callback: ConsumerCallback, max_job: u32) {
        let mut state = self.lock();
        state.has_consumer = true;
        state.max_job = max_job;
        state.consumer = Some(callback);
        if state.connected {
            self.bus.publish(Event::HaveConsumer {
                have_consumer: true,
                max_job,
            });
        }
    }

    pub(crate) fn set_error_callback(&self, callback: ErrorCallback) {
        self.lock().on_error = Some(callback);
    }

    pub(crate) fn consumer(&self) -> Option<ConsumerCallback> {
        self.lock().consumer.clone()
    }

    pub(crate) fn error_callback(&self) -> Option<ErrorCallback> {
        self.lock().on_error.clone()
    }
}

fn command_event(command: Command) -> Event {
    match command {
        Command::Create(cmd) => Event::CreateJob(cmd),
        Command::Acknowledge(cmd) => Event::AcknowledgeJob(cmd),
        Command::Delete(cmd) => Event::DeleteJob(cmd),
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Instance")
            .field("topic_id", &self.topic_id)
            .field("connected", &state.connected)
            .field("has_consumer", &state.has_consumer)
            .field("max_job", &state.max_job)
            .field("pending", &state.pending.len())
            .field("max_pending", &self.max_pending)
            .finish()
    }
}
