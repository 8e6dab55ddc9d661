use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;

use super::command::{AcknowledgeJob, CreateJob, DeleteJob};
use super::instance::Instance;
use super::job_client::{ClientConfig, JobClient};
use super::registry::{Registry, bind_callbacks};
use crate::transport::codec;
use crate::transport::dispatch::handle_message;
use crate::transport::message::{ConsumerData, OutboundFrame};
use crate::transport::websocket::OUTBOUND_EVENTS;
use crate::utils::ClientError;

/// Records every frame the connection task would write for this instance.
fn capture_outbound(instance: &Instance) -> Arc<Mutex<Vec<OutboundFrame>>> {
    let frames = Arc::new(Mutex::new(Vec::new()));
    for name in OUTBOUND_EVENTS {
        let frames = frames.clone();
        instance.bus().subscribe(name, move |event| {
            if let Some(frame) = codec::frame_for(event) {
                frames.lock().unwrap().push(frame);
            }
        });
    }
    frames
}

fn detached_client(topic_id: &str) -> (Arc<Instance>, JobClient) {
    let instance = Instance::new(topic_id, 0, 16);
    bind_callbacks(&instance);
    (instance.clone(), JobClient::new(instance))
}

const STATUS_READY: &[u8] = br#"{"type":"STATUS","status":true}"#;

#[test]
fn test_command_validation() {
    assert!(CreateJob::new("k", Utc::now()).validate().is_ok());
    assert!(CreateJob::new("", Utc::now()).validate().is_err());
    assert!(
        CreateJob {
            key: "k".to_string(),
            ..CreateJob::default()
        }
        .validate()
        .is_err()
    );

    assert!(AcknowledgeJob::success("J1").validate().is_ok());
    assert!(AcknowledgeJob::default().validate().is_err());

    assert!(DeleteJob::by_id("J1").validate().is_ok());
    assert!(DeleteJob::by_key("K1").validate().is_ok());
    assert!(DeleteJob::default().validate().is_err());
}

#[test]
fn test_invalid_commands_never_reach_transport() {
    let (instance, client) = detached_client("orders");
    handle_message(&instance, STATUS_READY);
    let frames = capture_outbound(&instance);

    let results = [
        client.create_job(CreateJob::new("", Utc::now())),
        client.create_job(CreateJob {
            key: "k".to_string(),
            ..CreateJob::default()
        }),
        client.acknowledge_job(AcknowledgeJob::default()),
        client.delete_job(DeleteJob::default()),
    ];

    for result in results {
        assert!(matches!(result, Err(ClientError::InvalidCommand(_))));
    }
    assert!(frames.lock().unwrap().is_empty());
    assert_eq!(client.pending_commands(), 0);
}

#[test]
fn test_commands_wait_for_ready_status_in_order() {
    let (instance, client) = detached_client("orders");
    let frames = capture_outbound(&instance);

    client
        .create_job(CreateJob::new("first", Utc::now()).payload(json!({"n": 1})))
        .unwrap();
    client.delete_job(DeleteJob::by_key("second")).unwrap();
    client.acknowledge_job(AcknowledgeJob::success("third")).unwrap();

    assert!(!client.is_connected());
    assert_eq!(client.pending_commands(), 3);
    assert!(frames.lock().unwrap().is_empty());

    handle_message(&instance, STATUS_READY);

    assert!(client.is_connected());
    assert_eq!(client.pending_commands(), 0);
    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 4);
    assert!(matches!(&frames[0], OutboundFrame::HaveConsumer(d) if !d.have_consumer && d.max_job == 3));
    assert!(matches!(&frames[1], OutboundFrame::CreateJob(d) if d.key == "first"));
    assert!(matches!(&frames[2], OutboundFrame::DeleteJob(d) if d.key.as_deref() == Some("second")));
    assert!(matches!(&frames[3], OutboundFrame::AcknowledgeJob(d) if d.job_id == "third" && d.status));
}

#[test]
fn test_commands_are_sent_immediately_once_ready() {
    let (instance, client) = detached_client("orders");
    handle_message(&instance, STATUS_READY);
    let frames = capture_outbound(&instance);

    client.delete_job(DeleteJob::by_id("J9")).unwrap();

    assert_eq!(client.pending_commands(), 0);
    assert_eq!(
        *frames.lock().unwrap(),
        vec![codec::delete_frame(&DeleteJob::by_id("J9"))]
    );
}

#[test]
fn test_not_ready_status_keeps_commands_queued() {
    let (instance, client) = detached_client("orders");
    client.acknowledge_job(AcknowledgeJob::success("J1")).unwrap();

    handle_message(&instance, br#"{"type":"STATUS","status":false}"#);

    assert_eq!(client.pending_commands(), 1);
}

#[test]
fn test_full_pending_queue_refuses_commands_until_ready() {
    let (instance, client) = detached_client("orders");
    let frames = capture_outbound(&instance);

    for n in 0..16 {
        client.delete_job(DeleteJob::by_key(format!("K{n}"))).unwrap();
    }
    let refused = client.delete_job(DeleteJob::by_key("K16"));

    assert!(matches!(refused, Err(ClientError::QueueFull { capacity: 16 })));
    assert_eq!(client.pending_commands(), 16);

    handle_message(&instance, STATUS_READY);
    client.delete_job(DeleteJob::by_key("K17")).unwrap();

    let frames = frames.lock().unwrap();
    // HAVE_CONSUMER, the 16 queued deletes, then the one sent while ready.
    assert_eq!(frames.len(), 18);
    assert!(matches!(&frames[16], OutboundFrame::DeleteJob(d) if d.key.as_deref() == Some("K15")));
    assert!(matches!(&frames[17], OutboundFrame::DeleteJob(d) if d.key.as_deref() == Some("K17")));
    assert_eq!(client.pending_commands(), 0);
}

#[test]
fn test_consumer_receives_job_and_can_acknowledge() {
    let (instance, client) = detached_client("orders");
    handle_message(&instance, STATUS_READY);
    let frames = capture_outbound(&instance);
    let received = Arc::new(Mutex::new(Vec::new()));

    let acker = client.clone();
    let sink = received.clone();
    client.consumer(
        move |job: ConsumerData| {
            acker
                .acknowledge_job(AcknowledgeJob::success(job.job_id.clone()))
                .unwrap();
            sink.lock().unwrap().push(job);
        },
        7,
    );

    handle_message(
        &instance,
        br#"{"type":"NEW_JOB","data":{"job_id":"J1","key":"K1","attempt":1,"job_data":{"x":1}}}"#,
    );

    assert_eq!(
        *received.lock().unwrap(),
        vec![ConsumerData {
            job_id: "J1".to_string(),
            key: "K1".to_string(),
            attempt: 1,
            job_data: json!({"x": 1}),
        }]
    );
    let frames = frames.lock().unwrap();
    // Registering while connected announces the new capacity first.
    assert!(matches!(&frames[0], OutboundFrame::HaveConsumer(d) if d.have_consumer && d.max_job == 7));
    assert!(matches!(&frames[1], OutboundFrame::AcknowledgeJob(d) if d.job_id == "J1"));
    assert_eq!(frames.len(), 2);
}

#[test]
fn test_error_callback_receives_broker_message() {
    let (instance, client) = detached_client("orders");
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    client.on_error(move |err| sink.lock().unwrap().push(err.to_string()));

    handle_message(&instance, br#"{"type":"ERROR","message":"boom"}"#);

    assert_eq!(*errors.lock().unwrap(), vec!["boom".to_string()]);
}

#[test]
fn test_instances_are_isolated_by_topic() {
    let (orders, orders_client) = detached_client("orders");
    let (billing, billing_client) = detached_client("billing");
    let orders_frames = capture_outbound(&orders);
    let billing_frames = capture_outbound(&billing);

    handle_message(&orders, STATUS_READY);
    orders_client.delete_job(DeleteJob::by_key("K")).unwrap();
    billing_client.delete_job(DeleteJob::by_key("K")).unwrap();

    assert_eq!(orders_frames.lock().unwrap().len(), 2);
    assert!(billing_frames.lock().unwrap().is_empty());
    assert_eq!(billing_client.pending_commands(), 1);
}

#[test]
fn test_init_requires_runtime() {
    let registry = Registry::new();
    let result = registry.init(ClientConfig::new("ws://127.0.0.1:1/ws", "t", "orders"));
    assert!(matches!(result, Err(ClientError::NoRuntime(_))));
    assert!(registry.topics().is_empty());
}

#[tokio::test]
async fn test_init_rejects_invalid_url() {
    let registry = Registry::new();
    let result = registry.init(ClientConfig::new("not a url", "t", "orders"));
    assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    assert!(registry.get("orders").is_none());
}

#[tokio::test]
async fn test_init_registers_one_instance_per_topic() {
    let registry = Registry::new();
    let first = registry
        .init(ClientConfig::new("ws://127.0.0.1:1/ws", "t", "orders"))
        .unwrap();
    let second = registry
        .init(ClientConfig::new("ws://127.0.0.1:1/ws", "other", "orders"))
        .unwrap();
    registry
        .init(ClientConfig::new("ws://127.0.0.1:1/ws", "t", "billing"))
        .unwrap();

    first.delete_job(DeleteJob::by_id("J1")).unwrap();

    assert_eq!(second.pending_commands(), 1);
    assert_eq!(registry.topics(), vec!["billing".to_string(), "orders".to_string()]);
    assert_eq!(registry.get("orders").unwrap().topic_id(), "orders");
}

#[test]
fn test_client_config_from_settings() {
    let settings = crate::config::Settings::default();
    let config = ClientConfig::from(&settings.client);

    assert_eq!(config.topic_id, "default");
    assert_eq!(config.connect_delay, ClientConfig::DEFAULT_CONNECT_DELAY);
    assert_eq!(config.reconnect_delay, ClientConfig::DEFAULT_RECONNECT_DELAY);
    assert_eq!(config.max_pending, ClientConfig::DEFAULT_MAX_PENDING);
}
