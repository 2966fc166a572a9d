//! Admin API origin group management

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{CreateGroupRequest, OriginService, UpdateGroupRequest};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_track, json_response, success_response};
use super::types::{PostNewGroup, UpdateGroupPayload};

/// List all groups
pub async fn get_all_groups(
    _req: HttpRequest,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: request to list origin groups");

    Ok(api_result(service.list_groups().await))
}

/// Create a new group
pub async fn post_group(
    _req: HttpRequest,
    payload: web::Json<PostNewGroup>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    let payload = payload.into_inner();
    info!("Admin API: create group request - title: {}", payload.title);

    let request = CreateGroupRequest {
        title: payload.title,
        description: payload.description,
    };

    match service.create_group(request).await {
        Ok(group) => {
            info!("Admin API: group created - {} (id {})", group.title, group.id);
            Ok(json_response(
                StatusCode::CREATED,
                ErrorCode::Success,
                "OK",
                Some(group),
            ))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}

/// Update a group
pub async fn update_group(
    _req: HttpRequest,
    id: web::Path<i64>,
    payload: web::Json<UpdateGroupPayload>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    info!("Admin API: update group request - id: {}", id);

    let payload = payload.into_inner();
    let request = UpdateGroupRequest {
        title: payload.title,
        description: payload.description,
    };

    Ok(api_result(service.update_group(id, request).await))
}

/// Delete a group (refused while origins still reference it)
pub async fn delete_group(
    _req: HttpRequest,
    id: web::Path<i64>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    info!("Admin API: delete group request - id: {}", id);

    match service.delete_group(id).await {
        Ok(()) => {
            info!("Admin API: group deleted - {}", id);
            Ok(success_response(serde_json::json!({
                "message": "Group deleted successfully"
            })))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}
