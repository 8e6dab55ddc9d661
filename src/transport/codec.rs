//! Conversion between local commands and the broker's JSON frames.
//!
//! Everything here is pure: no I/O, no instance state.

use chrono::{DateTime, FixedOffset};

use crate::bus::Event;
use crate::client::command::{AcknowledgeJob, CreateJob, DeleteJob};
use crate::transport::message::{
    AcknowledgeJobData, CreateJobData, DEFAULT_MAX_JOB, DeleteJobData, HaveConsumerData,
    IncomingFrame, OutboundFrame, START_TIME_FORMAT,
};

pub fn acknowledge_frame(cmd: &AcknowledgeJob) -> OutboundFrame {
    OutboundFrame::AcknowledgeJob(AcknowledgeJobData {
        job_id: cmd.job_id.clone(),
        status: cmd.success,
        message: cmd.message.clone(),
        data: cmd.payload.clone(),
    })
}

/// Builds the `CREATE_JOB` frame.
///
/// A command without a start time is encoded with an empty `start_time`;
/// the public API never lets such a command reach the transport.
pub fn create_frame(cmd: &CreateJob) -> OutboundFrame {
    OutboundFrame::CreateJob(CreateJobData {
        key: cmd.key.clone(),
        start_time: cmd
            .start_time
            .map(|t| format_start_time(&t))
            .unwrap_or_default(),
        data: cmd.payload.clone(),
        max_attempt: cmd.max_attempts.filter(|n| *n > 0),
    })
}

pub fn delete_frame(cmd: &DeleteJob) -> OutboundFrame {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    OutboundFrame::DeleteJob(DeleteJobData {
        job_ref_id: non_empty(&cmd.job_id),
        key: non_empty(&cmd.key),
    })
}

pub fn have_consumer_frame(have_consumer: bool, max_job: u32) -> OutboundFrame {
    OutboundFrame::HaveConsumer(HaveConsumerData {
        have_consumer,
        max_job: if max_job > 0 { max_job } else { DEFAULT_MAX_JOB },
    })
}

/// The frame an outbound bus event is written as, if it has one.
pub fn frame_for(event: &Event) -> Option<OutboundFrame> {
    match event {
        Event::AcknowledgeJob(cmd) => Some(acknowledge_frame(cmd)),
        Event::CreateJob(cmd) => Some(create_frame(cmd)),
        Event::DeleteJob(cmd) => Some(delete_frame(cmd)),
        Event::HaveConsumer {
            have_consumer,
            max_job,
        } => Some(have_consumer_frame(*have_consumer, *max_job)),
        _ => None,
    }
}

pub fn encode(frame: &OutboundFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}

pub fn decode(raw: &[u8]) -> Result<IncomingFrame, serde_json::Error> {
    serde_json::from_slice(raw)
}

/// Parses an outbound frame, as echoed back by the broker or captured in tests.
pub fn decode_outbound(raw: &[u8]) -> Result<OutboundFrame, serde_json::Error> {
    serde_json::from_slice(raw)
}

pub fn format_start_time(t: &DateTime<FixedOffset>) -> String {
    t.format(START_TIME_FORMAT).to_string()
}

pub fn parse_start_time(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(s, START_TIME_FORMAT)
}
