//! Connection manager
//!
//! Owns the WebSocket connection of one topic identifier for the lifetime of
//! the process. Each pass of [`Connection::run`] is one session:
//! - dial `base_url` with the authentication and capacity query parameters
//! - bind the outbound bus events to a writer task feeding the socket
//! - read frames into the dispatcher until the connection fails or the
//!   writer gives up
//! - unbind, report the failure on `ON_ERROR`, wait, and dial again
//!
//! Retries use a flat delay and never give up.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tracing::Instrument;
use tungstenite::protocol::Message as WsMessage;
use url::Url;
use uuid::Uuid;

use crate::bus::{Bus, Event, EventName, SubscriptionId};
use crate::client::instance::Instance;
use crate::transport::{codec, dispatch};
use crate::utils::ClientError;

/// Bus events whose payload is written to the socket.
pub const OUTBOUND_EVENTS: [EventName; 4] = [
    EventName::AcknowledgeJob,
    EventName::CreateJob,
    EventName::DeleteJob,
    EventName::HaveConsumer,
];

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub base_url: Url,
    pub token: String,
    pub acknowledge_timeout_in_seconds: u32,
    /// Wait before the very first dial, leaving room for callback registration.
    pub connect_delay: Duration,
    pub reconnect_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

pub struct Connection {
    instance: Arc<Instance>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

impl Connection {
    pub fn new(instance: Arc<Instance>, settings: ConnectionSettings) -> Self {
        Self {
            instance,
            settings,
            state: ConnectionState::Disconnected,
        }
    }

    /// The dial URL. Capacity is read from the instance on every call, so a
    /// consumer registered after start-up is honoured on the next dial.
    pub fn connect_url(&self) -> Url {
        let mut url = self.settings.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.settings.token);
            query.append_pair("topic_id", self.instance.topic_id());

            let max_job = self.instance.max_job();
            if max_job > 0 {
                query.append_pair("max_job", &max_job.to_string());
            }
            if self.settings.acknowledge_timeout_in_seconds > 0 {
                query.append_pair(
                    "acknowledge_timeout_in_seconds",
                    &self.settings.acknowledge_timeout_in_seconds.to_string(),
                );
            }
        }
        url
    }

    /// Runs the connect/listen/reconnect cycle. Never returns.
    pub async fn run(mut self) {
        tokio::time::sleep(self.settings.connect_delay).await;

        loop {
            let span = tracing::info_span!(
                "session",
                topic_id = %self.instance.topic_id(),
                session_id = %Uuid::new_v4()
            );
            let err = self.session().instrument(span).await;

            self.set_state(ConnectionState::Disconnected);
            tracing::warn!(
                topic_id = %self.instance.topic_id(),
                error = %err,
                "reconnecting in {:?}",
                self.settings.reconnect_delay
            );
            self.instance.bus().publish(Event::Error(err));

            tokio::time::sleep(self.settings.reconnect_delay).await;
        }
    }

    /// One connection attempt; returns the error that ended it.
    async fn session(&mut self) -> ClientError {
        self.set_state(ConnectionState::Connecting);

        let url = self.connect_url();
        let ws_stream = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => return ClientError::Dial(e),
        };
        self.set_state(ConnectionState::Connected);

        let (ws_sender, mut ws_receiver) = ws_stream.split();
        let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
        let bus = self.instance.bus().clone();
        let bindings = bind_outbound(&bus, &tx);
        let mut writer = tokio::spawn(forward_frames(ws_sender, rx, bus.clone()));

        let err = loop {
            let next = tokio::select! {
                next = ws_receiver.next() => next,
                written = &mut writer => {
                    break match written {
                        Ok(Some(e)) => ClientError::Write(e),
                        _ => ClientError::Write(tungstenite::Error::AlreadyClosed),
                    };
                }
            };
            match next {
                Some(Ok(WsMessage::Text(text))) => {
                    dispatch::handle_message(&self.instance, text.as_bytes());
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    dispatch::handle_message(&self.instance, &data);
                }
                Some(Ok(WsMessage::Ping(payload))) => {
                    if tx.send(WsMessage::Pong(payload)).is_err() {
                        bus.publish(Event::Error(ClientError::KeepAlive(
                            "writer closed".to_string(),
                        )));
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::debug!(?frame, "received close frame");
                    break ClientError::Read(tungstenite::Error::ConnectionClosed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break ClientError::Read(e),
                None => break ClientError::Read(tungstenite::Error::ConnectionClosed),
            }
        };

        self.instance.mark_disconnected();
        for id in bindings {
            bus.unsubscribe(id);
        }
        drop(tx);
        writer.abort();

        err
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            tracing::info!(topic_id = %self.instance.topic_id(), from = ?self.state, to = ?state, "connection state changed");
            self.state = state;
        }
    }
}

/// Writes queued frames to `sink` in publish order.
///
/// A failed pong is published as [`ClientError::KeepAlive`] and writing goes
/// on. Any other failed write stops the writer and is returned; `None` means
/// the channel closed.
pub(crate) async fn forward_frames<S>(
    mut sink: S,
    mut rx: mpsc::UnboundedReceiver<WsMessage>,
    bus: Bus,
) -> Option<tungstenite::Error>
where
    S: Sink<WsMessage, Error = tungstenite::Error> + Unpin,
{
    while let Some(msg) = rx.recv().await {
        let is_pong = matches!(msg, WsMessage::Pong(_));
        match sink.send(msg).await {
            Ok(()) => {}
            Err(e) if is_pong => {
                tracing::warn!(error = %e, "failed to answer ping");
                bus.publish(Event::Error(ClientError::KeepAlive(e.to_string())));
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to write frame, ending session");
                return Some(e);
            }
        }
    }
    None
}

/// Subscribes the outbound events of this session to the writer channel.
///
/// These handlers may run under the instance lock, so failures are logged
/// rather than published.
fn bind_outbound(bus: &Bus, tx: &mpsc::UnboundedSender<WsMessage>) -> Vec<SubscriptionId> {
    OUTBOUND_EVENTS
        .iter()
        .map(|name| {
            let tx = tx.clone();
            bus.subscribe(*name, move |event| {
                let Some(frame) = codec::frame_for(event) else {
                    return;
                };
                match codec::encode(&frame) {
                    Ok(text) => {
                        tracing::debug!(event = %event.name(), "writing frame");
                        if tx.send(WsMessage::text(text)).is_err() {
                            tracing::warn!(event = %event.name(), "writer closed, frame dropped");
                        }
                    }
                    Err(e) => tracing::warn!(event = %event.name(), error = %e, "failed to encode frame"),
                }
            })
        })
        .collect()
}
