//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::AdminAuth;
use crate::api::services::{AppStartTime, admin::routes::admin_routes, track_routes};
use crate::runtime::lifetime;

/// CORS configuration loaded from the static config
#[derive(Clone, Debug)]
struct CorsSettings {
    enabled: bool,
    allowed_origins: Vec<String>,
}

impl CorsSettings {
    fn from_config() -> Self {
        let config = crate::config::get_config();
        Self {
            enabled: config.api.cors_enabled,
            allowed_origins: config.api.cors_allowed_origins.clone(),
        }
    }
}

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsSettings) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsSettings) -> Cors {
    // When CORS is disabled, use browser's default same-origin policy (restrictive)
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    if cors_config.allowed_origins.is_empty() {
        // Empty origins = same-origin only (no cross-origin requests allowed)
    } else if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_header("Content-Type")
        .allowed_header("Authorization")
        .allowed_header("Accept")
        .max_age(3600)
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares server components (storage, services, routes)
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    // Record application start time
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // Prepare server startup (storage, services, routes)
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let storage = startup.storage.clone();
    let origin_service = startup.origin_service.clone();
    let registration_service = startup.registration_service.clone();
    let route = startup.route_config.clone();

    let admin_prefix = route.admin_prefix;
    let track_prefix = route.track_prefix;

    let config = crate::config::get_config();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let cpu_count = config.server.cpu_count.min(32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = CorsSettings::from_config();

    // Validate CORS configuration at startup (runs once, not per worker)
    validate_cors_config(&cors_config);

    // Clone storage reference before it moves into the HttpServer closure
    let storage_for_shutdown = storage.clone();

    warn!("Starting server at http://{}", bind_address);

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(origin_service.clone()))
            .app_data(web::Data::new(registration_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .service(
                web::scope(&admin_prefix)
                    .wrap(AdminAuth)
                    .service(admin_routes()),
            )
            .service(web::scope(&track_prefix).service(track_routes()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)?
    .run();

    // Wait for server exit or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&storage_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
