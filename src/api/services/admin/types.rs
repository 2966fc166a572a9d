//! Admin API type definitions

use serde::{Deserialize, Serialize};

use crate::storage::{Origin, QuerystringParameter, Registration};

/// Response envelope shared by every admin endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewOrigin {
    pub code: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub track_registrations: Option<bool>,
    pub querystring_parameters: Option<String>,
    pub redirect_to: Option<String>,
    pub origin_group_id: Option<i64>,
}

/// Update payload. Absent fields keep their stored value; empty strings
/// clear optional text fields; origin_group_id 0 detaches from the group.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateOriginPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub track_registrations: Option<bool>,
    pub querystring_parameters: Option<String>,
    pub redirect_to: Option<String>,
    pub origin_group_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetOriginsQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub group_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetRegistrationsQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Restrict to registrations attributed to one origin code.
    pub origin: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewGroup {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateGroupPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub data: T,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OriginResponse {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub track_registrations: bool,
    pub querystring_parameters: Option<String>,
    pub redirect_to: Option<String>,
    pub number_of_registrations: i64,
    pub origin_group_id: Option<i64>,
    pub created_at: String,
}

impl From<Origin> for OriginResponse {
    fn from(origin: Origin) -> Self {
        Self {
            code: origin.code,
            title: origin.title,
            description: origin.description,
            track_registrations: origin.track_registrations,
            querystring_parameters: origin.querystring_parameters,
            redirect_to: origin.redirect_to,
            number_of_registrations: origin.number_of_registrations,
            origin_group_id: origin.origin_group_id,
            created_at: origin.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParameterResponse {
    pub identifier: String,
    pub value: String,
    pub origin_code: String,
    pub number_of_registrations: i64,
}

impl From<QuerystringParameter> for ParameterResponse {
    fn from(param: QuerystringParameter) -> Self {
        Self {
            identifier: param.identifier,
            value: param.value,
            origin_code: param.origin_code,
            number_of_registrations: param.number_of_registrations,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegistrationResponse {
    pub id: i64,
    pub user_id: String,
    pub origin_code: String,
    pub created: String,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id,
            user_id: registration.user_id,
            origin_code: registration.origin_code,
            created: registration.created.to_rfc3339(),
        }
    }
}

// ============ Health check types ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageBackend {
    pub storage_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub origins_count: Option<u64>,
    pub backend: HealthStorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}
