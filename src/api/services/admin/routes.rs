//! Admin API route configuration
//!
//! Routes are split by resource to keep the table readable.

use actix_web::web;

use super::groups::{delete_group, get_all_groups, post_group, update_group};
use super::origins::{
    delete_origin, get_all_origins, get_origin, get_origin_parameters, post_origin, update_origin,
};
use super::registrations::get_all_registrations;
use crate::api::services::health::HealthService;

/// Origin management routes `/origins`
///
/// - GET /origins - list origins (paginated, filterable)
/// - POST /origins - create origin
/// - GET /origins/{code}/parameters - parameter counters for one origin
/// - GET /origins/{code} - get single origin
/// - PUT /origins/{code} - update origin
/// - DELETE /origins/{code} - delete origin
pub fn origins_routes() -> actix_web::Scope {
    web::scope("/origins")
        .route("", web::get().to(get_all_origins))
        .route("", web::post().to(post_origin))
        // Parameter counters (must be before /{code})
        .route("/{code}/parameters", web::get().to(get_origin_parameters))
        .route("/{code}", web::get().to(get_origin))
        .route("/{code}", web::put().to(update_origin))
        .route("/{code}", web::delete().to(delete_origin))
}

/// Registration listing routes `/registrations`
pub fn registrations_routes() -> actix_web::Scope {
    web::scope("/registrations").route("", web::get().to(get_all_registrations))
}

/// Group management routes `/groups`
///
/// - GET /groups - list groups
/// - POST /groups - create group
/// - PUT /groups/{id} - update group
/// - DELETE /groups/{id} - delete group (refused while non-empty)
pub fn groups_routes() -> actix_web::Scope {
    web::scope("/groups")
        .route("", web::get().to(get_all_groups))
        .route("", web::post().to(post_group))
        .route("/{id}", web::put().to(update_group))
        .route("/{id}", web::delete().to(delete_group))
}

/// Admin API routes
///
/// Combines all resource routes plus the guarded health endpoint. The
/// caller mounts this under the configured admin prefix behind AdminAuth.
pub fn admin_routes() -> actix_web::Scope {
    web::scope("")
        .service(origins_routes())
        .service(registrations_routes())
        .service(groups_routes())
        .route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
}
