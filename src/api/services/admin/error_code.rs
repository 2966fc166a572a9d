//! Unified API error code definitions

use crate::errors::TrackError;

/// API error codes carried in the response envelope.
///
/// Grouped by the thousands:
/// - 0: success
/// - 1000-1099: generic errors
/// - 3000-3099: origin registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // Generic errors 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // Origin registry errors 3000-3099
    OriginNotFound = 3000,
    DuplicateRegistration = 3001,
    CounterConflict = 3002,
}

impl From<TrackError> for ErrorCode {
    fn from(err: TrackError) -> Self {
        match err {
            TrackError::OriginNotFound(_) => ErrorCode::OriginNotFound,
            TrackError::DuplicateRegistration(_) => ErrorCode::DuplicateRegistration,
            TrackError::CounterConflict(_) => ErrorCode::CounterConflict,
            TrackError::Validation(_) => ErrorCode::BadRequest,
            TrackError::NotFound(_) => ErrorCode::NotFound,
            TrackError::Conflict(_) => ErrorCode::Conflict,
            TrackError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::InternalServerError,
        }
    }
}
