use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::Value;

use crate::utils::ClientError;

/// Asks the broker to schedule a new job on this topic.
///
/// `key` and `start_time` are required; `max_attempts` is only sent when it
/// is positive, otherwise the broker applies its own retry policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateJob {
    pub key: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub payload: Value,
    pub max_attempts: Option<u32>,
}

impl CreateJob {
    pub fn new<Tz: TimeZone>(key: impl Into<String>, start_time: DateTime<Tz>) -> Self {
        Self {
            key: key.into(),
            start_time: Some(start_time.fixed_offset()),
            payload: Value::Null,
            max_attempts: None,
        }
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.key.is_empty() {
            return Err(ClientError::InvalidCommand("create job requires a key"));
        }
        if self.start_time.is_none() {
            return Err(ClientError::InvalidCommand("create job requires a start time"));
        }
        Ok(())
    }
}

/// Reports the outcome of a job previously delivered to the consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcknowledgeJob {
    pub job_id: String,
    pub success: bool,
    pub message: String,
    pub payload: Value,
}

impl AcknowledgeJob {
    pub fn success(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            success: false,
            message: message.into(),
            payload: Value::Null,
        }
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.job_id.is_empty() {
            return Err(ClientError::InvalidCommand("acknowledge job requires a job id"));
        }
        Ok(())
    }
}

/// Removes a scheduled job, addressed by broker job id, by key, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteJob {
    pub job_id: String,
    pub key: String,
}

impl DeleteJob {
    pub fn by_id(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            key: String::new(),
        }
    }

    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            job_id: String::new(),
            key: key.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.job_id.is_empty() && self.key.is_empty() {
            return Err(ClientError::InvalidCommand(
                "delete job requires a job id or a key",
            ));
        }
        Ok(())
    }
}

/// A validated outbound command waiting for the connection to become ready.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(CreateJob),
    Acknowledge(AcknowledgeJob),
    Delete(DeleteJob),
}
