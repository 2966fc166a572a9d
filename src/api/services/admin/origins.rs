//! Admin API origin CRUD operations

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{CreateOriginRequest, OriginService, UpdateOriginRequest};
use crate::storage::OriginFilter;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_track, error_response, json_response, success_response};
use super::types::{
    GetOriginsQuery, OriginResponse, PaginatedResponse, PaginationInfo, ParameterResponse,
    PostNewOrigin, UpdateOriginPayload,
};

/// List origins with pagination and filtering
pub async fn get_all_origins(
    _req: HttpRequest,
    query: web::Query<GetOriginsQuery>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    trace!(
        "Admin API: request to list origins with filters: {:?}",
        query
    );

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);
    let filter = OriginFilter {
        search: query.search.clone(),
        group_id: query.group_id,
    };

    match service.list_origins(filter, page, page_size).await {
        Ok((origins, total)) => {
            let total_pages = total.div_ceil(page_size);
            let data: Vec<OriginResponse> =
                origins.into_iter().map(OriginResponse::from).collect();

            info!(
                "Admin API: returning {} origins (page {} of {}, total: {})",
                data.len(),
                page,
                total_pages,
                total
            );

            Ok(HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(PaginatedResponse {
                    code: 0,
                    data,
                    pagination: PaginationInfo {
                        page,
                        page_size,
                        total,
                        total_pages,
                    },
                }))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}

/// Create a new origin
pub async fn post_origin(
    _req: HttpRequest,
    payload: web::Json<PostNewOrigin>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    let payload = payload.into_inner();
    info!(
        "Admin API: create origin request - title: {}",
        payload.title
    );

    let request = CreateOriginRequest {
        code: payload.code,
        title: payload.title,
        description: payload.description,
        track_registrations: payload.track_registrations,
        querystring_parameters: payload.querystring_parameters,
        redirect_to: payload.redirect_to,
        origin_group_id: payload.origin_group_id,
    };

    match service.create_origin(request).await {
        Ok(result) => {
            let action = if result.generated_code {
                "created with generated code"
            } else {
                "created"
            };
            info!("Admin API: origin {} - {}", action, result.origin.code);
            Ok(json_response(
                StatusCode::CREATED,
                ErrorCode::Success,
                "OK",
                Some(OriginResponse::from(result.origin)),
            ))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}

/// Get a single origin
pub async fn get_origin(
    _req: HttpRequest,
    code: web::Path<String>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    info!("Admin API: get origin request - code: {}", code);

    match service.get_origin(&code).await {
        Ok(Some(origin)) => Ok(success_response(OriginResponse::from(origin))),
        Ok(None) => {
            info!("Admin API: origin not found - {}", code);
            Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::OriginNotFound,
                "Origin not found",
            ))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}

/// Update an origin (code, counter and creation time are immutable)
pub async fn update_origin(
    _req: HttpRequest,
    code: web::Path<String>,
    payload: web::Json<UpdateOriginPayload>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    info!("Admin API: update origin request - code: {}", code);

    let payload = payload.into_inner();
    let request = UpdateOriginRequest {
        title: payload.title,
        description: payload.description,
        track_registrations: payload.track_registrations,
        querystring_parameters: payload.querystring_parameters,
        redirect_to: payload.redirect_to,
        origin_group_id: payload.origin_group_id,
    };

    Ok(api_result(
        service
            .update_origin(&code, request)
            .await
            .map(OriginResponse::from),
    ))
}

/// Delete an origin along with its registrations and parameter counters
pub async fn delete_origin(
    _req: HttpRequest,
    code: web::Path<String>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    info!("Admin API: delete origin request - code: {}", code);

    match service.delete_origin(&code).await {
        Ok(()) => {
            info!("Admin API: origin deleted - {}", code);
            Ok(success_response(serde_json::json!({
                "message": "Origin deleted successfully"
            })))
        }
        Err(e) => Ok(error_from_track(&e)),
    }
}

/// Parameter counters recorded for an origin
pub async fn get_origin_parameters(
    _req: HttpRequest,
    code: web::Path<String>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: list parameter counters - code: {}", code);

    Ok(api_result(service.list_parameters(&code).await.map(
        |params| {
            params
                .into_iter()
                .map(ParameterResponse::from)
                .collect::<Vec<_>>()
        },
    )))
}
