//! # Nunggu
//!
//! `nunggu` is a client for a remote job broker reachable over a WebSocket.
//! A process registers a topic identifier and can then create, acknowledge
//! and delete jobs, and consume the jobs the broker hands out. The client
//! keeps the connection alive for the lifetime of the process, reconnecting
//! after any transport failure.
//!
//! ## Core Modules
//!
//! - `bus`: the synchronous in-process publish/subscribe channel.
//! - `client`: commands, per-topic instances, the registry and the `JobClient` handle.
//! - `config`: loading settings from files and the environment.
//! - `transport`: wire frames, codec, inbound dispatcher and the connection manager.
//! - `utils`: the error type and logging bootstrap.
//!
//! ## Example
//!
//! ```no_run
//! use nunggu::client::{AcknowledgeJob, ClientConfig, CreateJob, Registry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nunggu::utils::ClientError> {
//!     let registry = Registry::new();
//!     let client = registry.init(ClientConfig::new("wss://broker.example.com/ws", "secret", "emails"))?;
//!
//!     let acker = client.clone();
//!     client.consumer(
//!         move |job| {
//!             let _ = acker.acknowledge_job(AcknowledgeJob::success(job.job_id));
//!         },
//!         5,
//!     );
//!     client.on_error(|err| eprintln!("broker error: {err}"));
//!
//!     client.create_job(CreateJob::new("welcome-mail", chrono::Utc::now()))?;
//!     tokio::signal::ctrl_c().await.ok();
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;

pub use client::{AcknowledgeJob, ClientConfig, CreateJob, DeleteJob, JobClient, Registry};
pub use transport::message::ConsumerData;
pub use utils::ClientError;
