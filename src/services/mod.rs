//! Service layer for business logic
//!
//! This module provides unified business logic that can be shared between
//! different interfaces (HTTP API, embedding, tests).

mod origin_service;
mod registration_service;

pub use origin_service::*;
pub use registration_service::*;
