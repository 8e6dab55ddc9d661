use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::bus::{Event, EventName};
use crate::client::instance::Instance;
use crate::client::job_client::{ClientConfig, JobClient};
use crate::transport::{Connection, ConnectionSettings};

/// Owns the live instance of every registered topic identifier.
///
/// An entry is created by [`Registry::init`] and lives as long as the
/// registry. Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    instances: Arc<Mutex<HashMap<String, Arc<Instance>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Instance>>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `config.topic_id` and spawns its connection task on the
    /// current Tokio runtime.
    ///
    /// A topic identifier that is already registered yields a handle to the
    /// existing instance; no second connection is started.
    pub fn init(&self, config: ClientConfig) -> Result<JobClient, crate::utils::ClientError> {
        let runtime = tokio::runtime::Handle::try_current()?;
        let base_url = Url::parse(&config.base_url)?;

        let mut instances = self.lock();
        if let Some(instance) = instances.get(&config.topic_id) {
            tracing::debug!(topic_id = %config.topic_id, "topic already registered");
            return Ok(JobClient::new(instance.clone()));
        }

        let instance = Instance::new(config.topic_id.clone(), config.max_job, config.max_pending);
        bind_callbacks(&instance);
        instances.insert(config.topic_id.clone(), instance.clone());

        let connection = Connection::new(
            instance.clone(),
            ConnectionSettings {
                base_url,
                token: config.token,
                acknowledge_timeout_in_seconds: config.acknowledge_timeout_in_seconds,
                connect_delay: config.connect_delay,
                reconnect_delay: config.reconnect_delay,
            },
        );
        runtime.spawn(connection.run());
        tracing::info!(topic_id = %config.topic_id, "registered job client");

        Ok(JobClient::new(instance))
    }

    pub fn get(&self, topic_id: &str) -> Option<JobClient> {
        self.lock().get(topic_id).cloned().map(JobClient::new)
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.lock().keys().cloned().collect();
        topics.sort();
        topics
    }
}

/// Routes `CONSUMER`, `ON_ERROR` and `STATUS` events to the instance's
/// callbacks and log.
pub(crate) fn bind_callbacks(instance: &Arc<Instance>) {
    let bus = instance.bus();

    let weak = Arc::downgrade(instance);
    bus.subscribe(EventName::Consumer, move |event| {
        let (Event::Consumer(data), Some(instance)) = (event, weak.upgrade()) else {
            return;
        };
        match instance.consumer() {
            Some(callback) => callback(data.clone()),
            None => tracing::debug!(
                topic_id = %instance.topic_id(),
                job_id = %data.job_id,
                "job received without a registered consumer"
            ),
        }
    });

    let weak = Arc::downgrade(instance);
    bus.subscribe(EventName::OnError, move |event| {
        let (Event::Error(err), Some(instance)) = (event, weak.upgrade()) else {
            return;
        };
        match instance.error_callback() {
            Some(callback) => callback(err),
            None => tracing::error!(topic_id = %instance.topic_id(), error = %err, "job broker client error"),
        }
    });

    let topic_id = instance.topic_id().to_string();
    bus.subscribe(EventName::Status, move |event| {
        if let Event::Status(connected) = event {
            let status = if *connected { "connected" } else { "disconnected" };
            tracing::info!(topic_id = %topic_id, "job client {status}");
        }
    });
}
