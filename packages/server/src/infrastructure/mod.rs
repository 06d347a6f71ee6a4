//! Infrastructure layer: the session hub, storage and wire DTOs.

pub mod dto;
pub mod hub;
pub mod repository;
