//! Real-time session hub.
//!
//! ## 概要
//!
//! - `coordinator`: the hub handle and the coordinator task that serializes all room access
//! - `registry`: campaign rooms and the fan-out / eviction logic
//! - `client`: the connection proxy registered in a room and its bounded outbound queue
//! - `config`: per-connection limits and keep-alive timing

pub mod client;
pub mod config;
pub mod coordinator;
pub mod registry;

pub use client::{ConnectionProxy, EnqueueError, OutboundQueue};
pub use config::{
    ConnectionConfig, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_OUTBOUND_CAPACITY, DEFAULT_PONG_WAIT,
    DEFAULT_WRITE_WAIT,
};
pub use coordinator::{HubError, SessionHub};
pub use registry::{BroadcastReport, Registry};
