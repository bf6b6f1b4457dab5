//! HTTP server for the bracket tournament manager.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
