//! The `transport` module is responsible for the network side of the client.
//!
//! It defines the JSON frames exchanged with the job broker, the pure codec
//! between those frames and local commands, the inbound dispatcher, and the
//! connection manager that keeps one WebSocket per topic identifier alive.

pub mod codec;
pub mod dispatch;
pub mod message;
pub mod websocket;

pub use websocket::{Connection, ConnectionSettings};
