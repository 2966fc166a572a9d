//! System-level modules
//!
//! This module contains system-level functionality:
//! - Logging initialization
//! - Event bus and built-in subscribers

pub mod event;
pub mod logging;
