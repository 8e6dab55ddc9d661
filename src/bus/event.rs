use std::fmt;

use crate::client::command::{AcknowledgeJob, CreateJob, DeleteJob};
use crate::transport::message::ConsumerData;
use crate::utils::ClientError;

/// Names under which handlers subscribe to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    AcknowledgeJob,
    CreateJob,
    DeleteJob,
    HaveConsumer,
    Status,
    Consumer,
    OnError,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::AcknowledgeJob => "ACKNOWLEDGE_JOB",
            EventName::CreateJob => "CREATE_JOB",
            EventName::DeleteJob => "DELETE_JOB",
            EventName::HaveConsumer => "HAVE_CONSUMER",
            EventName::Status => "STATUS",
            EventName::Consumer => "CONSUMER",
            EventName::OnError => "ON_ERROR",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value published on the bus. Its variant determines the [`EventName`].
#[derive(Debug)]
pub enum Event {
    AcknowledgeJob(AcknowledgeJob),
    CreateJob(CreateJob),
    DeleteJob(DeleteJob),
    HaveConsumer { have_consumer: bool, max_job: u32 },
    Status(bool),
    Consumer(ConsumerData),
    Error(ClientError),
}

impl Event {
    pub fn name(&self) -> EventName {
        match self {
            Event::AcknowledgeJob(_) => EventName::AcknowledgeJob,
            Event::CreateJob(_) => EventName::CreateJob,
            Event::DeleteJob(_) => EventName::DeleteJob,
            Event::HaveConsumer { .. } => EventName::HaveConsumer,
            Event::Status(_) => EventName::Status,
            Event::Consumer(_) => EventName::Consumer,
            Event::Error(_) => EventName::OnError,
        }
    }
}
