//! Origintrack - marketing origin attribution service
//!
//! This library attributes user registrations to campaign origins: short
//! tracked codes redirect visitors to a landing page while a pending
//! attribution token rides in the visitor's cookie until a registration
//! event consumes it and the per-origin counters are updated.
//!
//! # Architecture
//! - `storage`: SeaORM-backed store with atomic counter mutations
//! - `services`: origin registry and registration recorder
//! - `session`: attribution token codec and cookie transport
//! - `api`: HTTP services and middleware (hit route, register hook, admin)
//! - `config`: configuration management
//! - `runtime`: application lifecycle and server mode
//! - `system`: logging and event bus

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod system;
pub mod utils;
