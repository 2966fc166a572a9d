//! Mode routing
//!
//! The service runs as a single HTTP server process.

pub mod server;

pub use server::run_server;
