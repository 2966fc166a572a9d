//! Admin API helper functions

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::TrackError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// Build a JSON response in the envelope format
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// Build a success response
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// Build an error response
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Build an error response from a TrackError (maps HTTP status and ErrorCode)
pub fn error_from_track(err: &TrackError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// Unified Result → HttpResponse conversion
///
/// 200 OK + JSON data on success, automatic TrackError mapping otherwise.
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<TrackError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: TrackError = e.into();
            error_from_track(&err)
        }
    }
}
