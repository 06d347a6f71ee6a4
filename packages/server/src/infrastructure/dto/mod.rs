//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! - `http`: request bodies, query strings and small response bodies
//! - `conversion`: validation of request DTOs into use-case commands
//!
//! Entities and session events already carry their wire shape, so they are serialized
//! directly.

pub mod conversion;
pub mod http;
