//! Blink action server for the hand cricket tournament.
//!
//! The binary wires these modules together: configuration from the
//! environment, structured logging, optional Prometheus metrics, and the
//! axum router in front of the tournament actor.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
