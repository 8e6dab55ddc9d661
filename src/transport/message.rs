use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Textual layout of `start_time` on the wire, e.g. `2024-05-01 09:30:00 +07:00`.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Capacity announced when the consumer registered without one.
pub const DEFAULT_MAX_JOB: u32 = 3;

/// Frames sent from the client to the broker.
///
/// Serialized as `{"type": <TAG>, "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutboundFrame {
    #[serde(rename = "ACKNOWLEDGE_JOB")]
    AcknowledgeJob(AcknowledgeJobData),

    #[serde(rename = "CREATE_JOB")]
    CreateJob(CreateJobData),

    #[serde(rename = "DELETE_JOB")]
    DeleteJob(DeleteJobData),

    #[serde(rename = "HAVE_CONSUMER")]
    HaveConsumer(HaveConsumerData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgeJobData {
    pub job_id: String,
    pub status: bool,
    pub message: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobData {
    pub key: String,
    pub start_time: String,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempt: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteJobData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaveConsumerData {
    pub have_consumer: bool,
    pub max_job: u32,
}

/// Discriminator of frames sent by the broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum FrameType {
    #[serde(rename = "NEW_JOB")]
    NewJob,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "STATUS")]
    Status,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A job delivered by the broker to this consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumerData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attempt: u32,
    #[serde(default)]
    pub job_data: Value,
}

/// Any frame received from the broker. Absent and `null` fields take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncomingFrame {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: FrameType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub data: Option<ConsumerData>,
}

/// Reads an explicit `null` as the field's default. The broker sends `null`
/// for unset scalars.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
