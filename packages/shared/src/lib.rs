//! Utilities shared by the Sleeper server and session watcher.

pub mod logger;
pub mod time;
