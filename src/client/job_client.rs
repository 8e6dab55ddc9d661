use std::sync::Arc;
use std::time::Duration;

use crate::client::command::{AcknowledgeJob, Command, CreateJob, DeleteJob};
use crate::client::instance::Instance;
use crate::config::ClientSettings;
use crate::transport::message::ConsumerData;
use crate::utils::ClientError;

/// Everything needed to register a topic identifier with a [`Registry`].
///
/// [`Registry`]: crate::client::Registry
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub topic_id: String,
    /// Sent as `acknowledge_timeout_in_seconds` when positive.
    pub acknowledge_timeout_in_seconds: u32,
    /// Initial consumer capacity; [`JobClient::consumer`] overrides it.
    pub max_job: u32,
    /// Commands held while the broker is not ready. Beyond it, commands fail
    /// with [`ClientError::QueueFull`].
    pub max_pending: usize,
    pub connect_delay: Duration,
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    pub const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(5);
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_PENDING: usize = 10_000;

    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        topic_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            topic_id: topic_id.into(),
            acknowledge_timeout_in_seconds: 0,
            max_job: 0,
            max_pending: Self::DEFAULT_MAX_PENDING,
            connect_delay: Self::DEFAULT_CONNECT_DELAY,
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl From<&ClientSettings> for ClientConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
            topic_id: settings.topic_id.clone(),
            acknowledge_timeout_in_seconds: settings.acknowledge_timeout_in_seconds,
            max_job: settings.max_job,
            max_pending: settings.max_pending,
            connect_delay: Duration::from_millis(settings.connect_delay_ms),
            reconnect_delay: Duration::from_millis(settings.reconnect_delay_ms),
        }
    }
}

/// Handle to one registered topic identifier.
///
/// Calls never touch the socket: valid commands are handed to the bus, or
/// queued until the broker reports the session ready. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct JobClient {
    instance: Arc<Instance>,
}

impl JobClient {
    pub(crate) fn new(instance: Arc<Instance>) -> Self {
        Self { instance }
    }

    pub fn topic_id(&self) -> &str {
        self.instance.topic_id()
    }

    /// Whether the broker's last `STATUS` frame reported the session ready.
    pub fn is_connected(&self) -> bool {
        self.instance.is_connected()
    }

    /// Commands waiting for the connection to become ready.
    pub fn pending_commands(&self) -> usize {
        self.instance.pending_len()
    }

    pub fn create_job(&self, cmd: CreateJob) -> Result<(), ClientError> {
        cmd.validate().inspect_err(|e| self.rejected(e))?;
        self.instance
            .submit(Command::Create(cmd))
            .inspect_err(|e| self.rejected(e))
    }

    pub fn acknowledge_job(&self, cmd: AcknowledgeJob) -> Result<(), ClientError> {
        cmd.validate().inspect_err(|e| self.rejected(e))?;
        self.instance
            .submit(Command::Acknowledge(cmd))
            .inspect_err(|e| self.rejected(e))
    }

    pub fn delete_job(&self, cmd: DeleteJob) -> Result<(), ClientError> {
        cmd.validate().inspect_err(|e| self.rejected(e))?;
        self.instance
            .submit(Command::Delete(cmd))
            .inspect_err(|e| self.rejected(e))
    }

    /// Registers the job consumer and the number of jobs it may hold at once
    /// (`0` lets the broker default to 3).
    ///
    /// The callback runs on the connection task; it may call back into this
    /// client, e.g. to acknowledge the job it was handed.
    pub fn consumer<F>(&self, callback: F, max_job: u32)
    where
        F: Fn(ConsumerData) + Send + Sync + 'static,
    {
        self.instance.set_consumer(Arc::new(callback), max_job);
    }

    /// Registers the error sink. Without one, errors are only logged.
    pub fn on_error<F>(&self, callback: F)
    where
        F: Fn(&ClientError) + Send + Sync + 'static,
    {
        self.instance.set_error_callback(Arc::new(callback));
    }

    fn rejected(&self, err: &ClientError) {
        tracing::debug!(topic_id = %self.topic_id(), error = %err, "command rejected");
    }
}
