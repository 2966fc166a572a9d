//! Admin API service module
//!
//! Endpoints for managing the attribution registry:
//! - Origin CRUD and parameter counter listing
//! - Registration listing
//! - Origin group CRUD
//! - Guarded health check

pub mod error_code;
mod groups;
mod helpers;
mod origins;
mod registrations;
pub mod routes;
mod types;

// Re-export types
pub use types::*;

// Re-export helper functions
pub use helpers::{api_result, error_from_track, error_response, json_response, success_response};

// Re-export error codes
pub use error_code::ErrorCode;

// Re-export origin CRUD endpoints
pub use origins::{
    delete_origin, get_all_origins, get_origin, get_origin_parameters, post_origin, update_origin,
};

// Re-export registration endpoints
pub use registrations::get_all_registrations;

// Re-export group endpoints
pub use groups::{delete_group, get_all_groups, post_group, update_group};
