//! Campaign session server library.
//!
//! Serves the campaign API and pushes live game events (dice pools, rolls, challenges,
//! day changes) to every WebSocket connected to a campaign.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
