use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::services::admin::{
    ApiResponse, ErrorCode, HealthChecks, HealthResponse, HealthStorageBackend, HealthStorageCheck,
};
use crate::storage::TrackingStorage;

/// Application start time, registered as app data at startup.
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Health Service
///
/// Calls storage directly instead of going through OriginService. Probes
/// need a fast answer and the count query is already semantic enough.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<TrackingStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = HealthStorageBackend {
            storage_type: storage.backend_name().to_string(),
        };

        // Count query only, never a full table load
        let storage_status =
            match tokio::time::timeout(Duration::from_secs(5), storage.count_origins()).await {
                Ok(Ok(count)) => {
                    trace!("Storage health check passed, {} origins found", count);
                    HealthStorageCheck {
                        status: "healthy".to_string(),
                        origins_count: Some(count),
                        backend,
                        error: None,
                    }
                }
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        origins_count: None,
                        backend,
                        error: Some(format!("database error: {}", e)),
                    }
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        origins_count: None,
                        backend,
                        error: Some("timeout".to_string()),
                    }
                }
            };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
        let is_healthy = storage_status.status == "healthy";

        let health_data = HealthResponse {
            status: if is_healthy {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            checks: HealthChecks {
                storage: storage_status,
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let health_response = ApiResponse {
            code: if is_healthy {
                ErrorCode::Success as i32
            } else {
                ErrorCode::ServiceUnavailable as i32
            },
            message: if is_healthy {
                "OK".to_string()
            } else {
                "Service Unavailable".to_string()
            },
            data: Some(health_data),
        };

        let response_status = if is_healthy {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            if is_healthy { "healthy" } else { "unhealthy" },
            uptime_seconds
        );

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(health_response)
    }
}
