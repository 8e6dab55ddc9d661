use crate::bus::Event;
use crate::client::instance::Instance;
use crate::transport::codec;
use crate::transport::message::FrameType;
use crate::utils::ClientError;

/// Decodes one inbound frame and routes it onto the instance's bus.
///
/// Malformed frames are reported on `ON_ERROR` and discarded.
pub fn handle_message(instance: &Instance, raw: &[u8]) {
    let bus = instance.bus();
    let frame = match codec::decode(raw) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(
                topic_id = %instance.topic_id(),
                frame = %String::from_utf8_lossy(&raw[..raw.len().min(100)]),
                "discarding malformed frame"
            );
            bus.publish(Event::Error(err.into()));
            return;
        }
    };

    match frame.kind {
        FrameType::NewJob => match frame.data {
            Some(data) => {
                tracing::debug!(topic_id = %instance.topic_id(), job_id = %data.job_id, "new job");
                bus.publish(Event::Consumer(data));
            }
            None => bus.publish(Event::Error(ClientError::Decode(
                "NEW_JOB frame without data".to_string(),
            ))),
        },
        FrameType::Error => bus.publish(Event::Error(ClientError::Broker(frame.message))),
        FrameType::Status => {
            instance.apply_status(frame.status);
            bus.publish(Event::Status(frame.status));
        }
        FrameType::Unknown => {
            tracing::debug!(topic_id = %instance.topic_id(), "ignoring frame of unknown type");
        }
    }
}
