//! Origin management service
//!
//! Provides unified business logic for origin and group administration,
//! shared between the admin API handlers and embedding callers.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::get_config;
use crate::errors::{Result, TrackError};
use crate::storage::{
    Origin, OriginFilter, OriginGroup, QuerystringParameter, Registration, TrackingStorage,
};
use crate::utils::generate_hex_code;
use crate::utils::is_well_formed_code;
use crate::utils::url_validator::validate_url;

/// Group titles share the column limit of the store.
const MAX_GROUP_TITLE_LEN: usize = 50;

// ============ Request/Response DTOs ============

/// Request to create a new origin
#[derive(Debug, Clone, Default)]
pub struct CreateOriginRequest {
    /// Origin code (optional, will be generated if not provided)
    pub code: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to true when absent
    pub track_registrations: Option<bool>,
    /// Tracked parameter names, one per line
    pub querystring_parameters: Option<String>,
    /// Redirect target: absolute http(s) URL or a site-relative path
    pub redirect_to: Option<String>,
    pub origin_group_id: Option<i64>,
}

/// Request to update an existing origin
///
/// `None` keeps the stored value, `Some("")` clears an optional text field,
/// `origin_group_id: Some(0)` detaches the origin from its group. The code,
/// the registration counter and `created_at` are immutable through this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateOriginRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub track_registrations: Option<bool>,
    pub querystring_parameters: Option<String>,
    pub redirect_to: Option<String>,
    pub origin_group_id: Option<i64>,
}

/// Result of origin creation
#[derive(Debug, Clone)]
pub struct OriginCreateResult {
    /// The created origin
    pub origin: Origin,
    /// Whether the code was auto-generated
    pub generated_code: bool,
}

/// Request to create an origin group
#[derive(Debug, Clone)]
pub struct CreateGroupRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Request to update an origin group (None = keep, Some("") clears)
#[derive(Debug, Clone, Default)]
pub struct UpdateGroupRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

// ============ OriginService Implementation ============

/// Service for origin registry operations
///
/// This service encapsulates the business rules around origins, groups and
/// their counters, ensuring consistent behavior across interfaces.
pub struct OriginService {
    storage: Arc<TrackingStorage>,
}

impl OriginService {
    /// Create a new OriginService instance
    pub fn new(storage: Arc<TrackingStorage>) -> Self {
        Self { storage }
    }

    /// Draw random codes until one is free.
    ///
    /// Collisions simply retry; the loop fails only when the store is
    /// unreachable.
    async fn generate_code(&self) -> Result<String> {
        let length = get_config().tracking.code_length;
        loop {
            let code = generate_hex_code(length);
            if !self.storage.code_exists(&code).await? {
                return Ok(code);
            }
        }
    }

    // ============ Origin CRUD ============

    /// Create a new origin
    pub async fn create_origin(&self, req: CreateOriginRequest) -> Result<OriginCreateResult> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(TrackError::validation("origin title cannot be empty"));
        }

        // Generate code if not provided, or validate user-provided code
        let (code, generated) = match req.code.filter(|c| !c.is_empty()) {
            Some(c) => {
                if !is_well_formed_code(&c) {
                    return Err(TrackError::validation(format!(
                        "Invalid origin code '{}'. Up to 7 lowercase alphanumeric characters allowed.",
                        c
                    )));
                }
                (c, false)
            }
            None => (self.generate_code().await?, true),
        };

        // Check if a user-provided code already exists
        if !generated && self.storage.code_exists(&code).await? {
            return Err(TrackError::conflict(format!(
                "origin code '{}' already exists",
                code
            )));
        }

        let redirect_to = normalize_optional(req.redirect_to);
        if let Some(ref target) = redirect_to {
            validate_redirect(target)?;
        }

        if let Some(group_id) = req.origin_group_id {
            self.require_group(group_id).await?;
        }

        let origin = Origin {
            code,
            title,
            description: normalize_optional(req.description),
            track_registrations: req.track_registrations.unwrap_or(true),
            querystring_parameters: normalize_optional(req.querystring_parameters),
            redirect_to,
            number_of_registrations: 0,
            origin_group_id: req.origin_group_id,
            created_at: Utc::now(),
        };

        self.storage.insert_origin(&origin).await?;

        info!("OriginService: created '{}' ({})", origin.code, origin.title);
        Ok(OriginCreateResult {
            origin,
            generated_code: generated,
        })
    }

    /// Update an existing origin
    pub async fn update_origin(&self, code: &str, req: UpdateOriginRequest) -> Result<Origin> {
        let existing = self.storage.get_origin(code).await?.ok_or_else(|| {
            TrackError::origin_not_found(format!("origin '{}' not found", code))
        })?;

        let title = match req.title {
            Some(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(TrackError::validation("origin title cannot be empty"));
                }
                t
            }
            None => existing.title,
        };

        let redirect_to = match req.redirect_to {
            None => existing.redirect_to,
            Some(s) if s.trim().is_empty() => None,
            Some(s) => {
                validate_redirect(&s)?;
                Some(s)
            }
        };

        let origin_group_id = match req.origin_group_id {
            None => existing.origin_group_id,
            Some(0) => None,
            Some(id) => {
                self.require_group(id).await?;
                Some(id)
            }
        };

        let updated = Origin {
            code: code.to_string(),
            title,
            description: merge_optional_text(req.description, existing.description),
            track_registrations: req
                .track_registrations
                .unwrap_or(existing.track_registrations),
            querystring_parameters: merge_optional_text(
                req.querystring_parameters,
                existing.querystring_parameters,
            ),
            redirect_to,
            number_of_registrations: existing.number_of_registrations,
            origin_group_id,
            created_at: existing.created_at,
        };

        self.storage.update_origin(&updated).await?;

        info!("OriginService: updated '{}'", code);
        Ok(updated)
    }

    /// Delete an origin together with its registrations and counters
    pub async fn delete_origin(&self, code: &str) -> Result<()> {
        self.storage.remove_origin(code).await?;

        info!("OriginService: deleted '{}'", code);
        Ok(())
    }

    /// Get a single origin
    pub async fn get_origin(&self, code: &str) -> Result<Option<Origin>> {
        self.storage.get_origin(code).await
    }

    /// List origins with pagination and filtering
    pub async fn list_origins(
        &self,
        filter: OriginFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Origin>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        self.storage
            .load_origins_paginated(page, page_size, filter)
            .await
    }

    /// Querystring counters for one origin, busiest first
    pub async fn list_parameters(&self, code: &str) -> Result<Vec<QuerystringParameter>> {
        if self.storage.get_origin(code).await?.is_none() {
            return Err(TrackError::origin_not_found(format!(
                "origin '{}' not found",
                code
            )));
        }

        self.storage.list_parameters(code).await
    }

    /// List registrations, optionally narrowed to one origin
    pub async fn list_registrations(
        &self,
        origin_code: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Registration>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        self.storage
            .load_registrations_paginated(origin_code, page, page_size)
            .await
    }

    // ============ Group Operations ============

    /// Create an origin group
    pub async fn create_group(&self, req: CreateGroupRequest) -> Result<OriginGroup> {
        let title = validate_group_title(&req.title)?;

        let group = self
            .storage
            .insert_group(&title, normalize_optional(req.description).as_deref())
            .await?;

        info!("OriginService: created group '{}' (id {})", group.title, group.id);
        Ok(group)
    }

    /// List all origin groups
    pub async fn list_groups(&self) -> Result<Vec<OriginGroup>> {
        self.storage.list_groups().await
    }

    /// Update an origin group
    pub async fn update_group(&self, id: i64, req: UpdateGroupRequest) -> Result<OriginGroup> {
        let existing = self
            .storage
            .get_group(id)
            .await?
            .ok_or_else(|| TrackError::not_found(format!("origin group not found: {}", id)))?;

        let title = match req.title {
            Some(t) => validate_group_title(&t)?,
            None => existing.title,
        };

        let updated = OriginGroup {
            id,
            title,
            description: merge_optional_text(req.description, existing.description),
        };

        self.storage.update_group(&updated).await?;

        info!("OriginService: updated group {}", id);
        Ok(updated)
    }

    /// Delete a group. Refused while origins still reference it.
    pub async fn delete_group(&self, id: i64) -> Result<()> {
        self.storage.remove_group(id).await?;

        info!("OriginService: deleted group {}", id);
        Ok(())
    }

    async fn require_group(&self, id: i64) -> Result<()> {
        if self.storage.get_group(id).await?.is_none() {
            return Err(TrackError::validation(format!(
                "origin group {} does not exist",
                id
            )));
        }
        Ok(())
    }
}

/// Accepts absolute http(s) URLs and site-relative paths. Rejects
/// protocol-relative `//` targets, which browsers treat as absolute.
fn validate_redirect(target: &str) -> Result<()> {
    if target.starts_with('/') && !target.starts_with("//") {
        return Ok(());
    }
    validate_url(target).map_err(|e| TrackError::validation(e.to_string()))
}

/// Empty or whitespace-only optional text reads as unset.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Update-merge for optional text fields: absent keeps the stored value,
/// empty clears it.
fn merge_optional_text(new: Option<String>, current: Option<String>) -> Option<String> {
    match new {
        None => current,
        Some(s) if s.trim().is_empty() => None,
        Some(s) => Some(s),
    }
}

fn validate_group_title(raw: &str) -> Result<String> {
    let title = raw.trim().to_string();
    if title.is_empty() {
        return Err(TrackError::validation("group title cannot be empty"));
    }
    if title.chars().count() > MAX_GROUP_TITLE_LEN {
        return Err(TrackError::validation(format!(
            "group title is limited to {} characters",
            MAX_GROUP_TITLE_LEN
        )));
    }
    Ok(title)
}
