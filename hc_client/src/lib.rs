//! Internal modules for the hand cricket client.
//!
//! This library provides command parsing, the API client and the prompt loop
//! used by the hc_client binary.

pub mod api_client;
pub mod commands;
pub mod repl;
