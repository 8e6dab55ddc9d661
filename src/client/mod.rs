//! The `client` module is the embedding application's side of the system.
//!
//! It provides the command types, the per-topic [`Instance`] state, the
//! explicit [`Registry`] that owns one instance per topic identifier, and the
//! [`JobClient`] handle through which jobs are created, acknowledged and
//! deleted and callbacks are registered.

pub mod command;
pub mod instance;
pub mod job_client;
pub mod registry;

pub use command::{AcknowledgeJob, CreateJob, DeleteJob};
pub use instance::Instance;
pub use job_client::{ClientConfig, JobClient};
pub use registry::Registry;

#[cfg(test)]
mod tests;
