//! Admin API registration listing

use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::OriginService;

use super::helpers::error_from_track;
use super::types::{
    GetRegistrationsQuery, PaginatedResponse, PaginationInfo, RegistrationResponse,
};

/// List recorded registrations, optionally restricted to one origin
pub async fn get_all_registrations(
    _req: HttpRequest,
    query: web::Query<GetRegistrationsQuery>,
    service: web::Data<Arc<OriginService>>,
) -> ActixResult<impl Responder> {
    trace!(
        "Admin API: request to list registrations with filters: {:?}",
        query
    );

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    match service
        .list_registrations(query.origin.as_deref(), page, page_size)
        .await
    {
        Ok((registrations, total)) => {
            let total_pages = total.div_ceil(page_size);
            let data: Vec<RegistrationResponse> = registrations
                .into_iter()
                .map(RegistrationResponse::from)
                .collect();

            info!(
                "Admin API: returning {} registrations (page {} of {}, total: {})",
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
