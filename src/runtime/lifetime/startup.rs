use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::get_config;
use crate::services::{OriginService, RegistrationService};
use crate::storage::{StorageFactory, TrackingStorage};
use crate::system::event::{Event, EventBusManager, EventType, TrafficLogHandler};

pub struct StartupContext {
    pub storage: Arc<TrackingStorage>,
    pub origin_service: Arc<OriginService>,
    pub registration_service: Arc<RegistrationService>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub admin_prefix: String,
    pub track_prefix: String,
}

/// Prepare the server startup context
/// Connects storage, builds the services and wires the event bus
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let origin_service = Arc::new(OriginService::new(storage.clone()));
    let registration_service = Arc::new(RegistrationService::new(storage.clone()));

    // Built-in event subscribers
    EventBusManager::register_handler(Arc::new(TrafficLogHandler));
    crate::publish_event!(Event::system_event(
        EventType::SystemStartup,
        "origintrack starting",
        "startup"
    ));
    debug!("Event bus handlers registered");

    let config = get_config();
    let route_config = RouteConfig {
        admin_prefix: config.api.admin_prefix.clone(),
        track_prefix: format!("/{}", config.tracking.route_prefix.trim_matches('/')),
    };

    check_component_enabled(&route_config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        origin_service,
        registration_service,
        route_config,
    })
}

fn check_component_enabled(route_config: &RouteConfig) {
    let config = get_config();

    if !config.tracking.cookie_secure {
        warn!(
            "WARNING: Cookie Secure flag is disabled. \
            Attribution cookies will be sent over unencrypted HTTP connections. \
            Enable cookie_secure=true for production environments."
        );
    }

    let admin_token = &config.api.admin_token;
    if admin_token.is_empty() {
        info!("Admin API is disabled (admin_token not set)");
    } else {
        if admin_token.len() < 8 {
            warn!("WARNING: Admin token is very short. Consider using a stronger token.");
        }
        info!("Admin API available at: {}", route_config.admin_prefix);
    }

    info!(
        "Tracking routes available at: {}/{{code}}",
        route_config.track_prefix
    );
}
