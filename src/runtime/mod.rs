//! Application runtime
//!
//! Startup/shutdown lifecycle and the HTTP server mode.

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
