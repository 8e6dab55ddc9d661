//! The `error` module defines the error type shared by every layer of the
//! client.
//!
//! Transport failures (`Dial`, `Read`, `Write`, `KeepAlive`), inbound-frame
//! failures (`Decode`, `Broker`) and local failures (`InvalidUrl`,
//! `InvalidCommand`, `QueueFull`, `NoRuntime`) all surface as a
//! [`ClientError`]. Runtime failures are never
//! fatal: they are routed to the instance's error callback, and `Dial`, `Read`
//! and `Write` additionally schedule a reconnect.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The WebSocket handshake with the broker failed.
    #[error("failed to connect to job broker: {0}")]
    Dial(#[source] tungstenite::Error),

    /// An established connection was lost or closed.
    #[error("connection to job broker lost: {0}")]
    Read(#[source] tungstenite::Error),

    /// An inbound frame could not be parsed.
    #[error("malformed frame from job broker: {0}")]
    Decode(String),

    /// The broker answered with an explicit `ERROR` frame.
    #[error("{0}")]
    Broker(String),

    /// A frame other than a pong could not be written; the session ends.
    #[error("failed to write to job broker: {0}")]
    Write(#[source] tungstenite::Error),

    /// Answering a transport ping failed. The session carries on.
    #[error("failed to answer keep-alive ping: {0}")]
    KeepAlive(String),

    #[error("invalid broker url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A local command failed its required-field check and was not sent.
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),

    /// The broker has not been ready for long enough that the pending queue
    /// filled up. The command was not queued.
    #[error("pending command queue is full ({capacity} commands)")]
    QueueFull { capacity: usize },

    #[error("no tokio runtime available to drive the connection")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl ClientError {
    /// Whether this error ends the current session and schedules a reconnect.
    pub fn triggers_reconnect(&self) -> bool {
        matches!(
            self,
            ClientError::Dial(_) | ClientError::Read(_) | ClientError::Write(_)
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
