//! Registration recorder
//!
//! Consumes a visitor's pending attribution token on successful
//! authentication and performs the terminal counter update. Callable
//! directly for embedding and concurrency tests as well as through the
//! HTTP hook.

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::session::AttributionToken;
use crate::storage::{RegistrationOutcome, TrackingStorage};

/// Column limits of the counter store; longer hit values are cut before
/// the upsert so every backend behaves alike.
const MAX_IDENTIFIER_LEN: usize = 32;
const MAX_VALUE_LEN: usize = 50;

/// What consuming a pending token amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// No pending token accompanied the registration
    NoToken,
    /// The token's origin no longer exists; token discarded
    OriginUnknown,
    /// The origin stopped tracking registrations; token discarded
    TrackingDisabled,
    /// The user already has an attributed registration
    AlreadyRegistered,
    /// Registration row created and counters incremented
    Recorded,
}

/// Service attributing registrations to origins
pub struct RegistrationService {
    storage: Arc<TrackingStorage>,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(storage: Arc<TrackingStorage>) -> Self {
        Self { storage }
    }

    /// Consume a pending token for an authenticated user.
    ///
    /// The origin is read directly from the store rather than through the
    /// resolve cache, so an origin deleted after the hit reads as gone.
    /// Every branch short of a storage failure is a quiet no-op; the caller
    /// clears the token cookie regardless of the outcome.
    pub async fn record(
        &self,
        token: Option<AttributionToken>,
        user_id: &str,
    ) -> Result<RecordOutcome> {
        let Some(token) = token else {
            return Ok(RecordOutcome::NoToken);
        };

        let Some(origin) = self.storage.get_origin(&token.code).await? else {
            debug!("Pending token points at unknown origin '{}'", token.code);
            return Ok(RecordOutcome::OriginUnknown);
        };

        if !origin.track_registrations {
            debug!("Origin '{}' does not track registrations", origin.code);
            return Ok(RecordOutcome::TrackingDisabled);
        }

        let params = tracked_params(&origin.parameter_list(), &token);

        let outcome = self
            .storage
            .record_registration(&origin.code, user_id, &params)
            .await?;

        Ok(match outcome {
            RegistrationOutcome::Recorded => {
                crate::publish_registration_recorded!(&origin.code, user_id, "registration_service");
                RecordOutcome::Recorded
            }
            RegistrationOutcome::AlreadyRegistered => RecordOutcome::AlreadyRegistered,
            RegistrationOutcome::OriginMissing => RecordOutcome::OriginUnknown,
        })
    }
}

/// Intersect the origin's tracked parameter names with what the hit
/// actually carried, in the origin's declared order.
fn tracked_params(tracked: &[String], token: &AttributionToken) -> Vec<(String, String)> {
    tracked
        .iter()
        .filter_map(|name| {
            token.params.get(name.as_str()).map(|value| {
                (
                    truncate_chars(name, MAX_IDENTIFIER_LEN),
                    truncate_chars(value, MAX_VALUE_LEN),
                )
            })
        })
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn token(pairs: &[(&str, &str)]) -> AttributionToken {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AttributionToken::new("abc1234", params)
    }

    #[test]
    fn test_tracked_params_intersects_with_token() {
        let tracked = vec!["pid".to_string(), "oid".to_string()];
        let token = token(&[("pid", "7"), ("oid", "9"), ("zid", "1")]);

        let params = tracked_params(&tracked, &token);
        assert_eq!(
            params,
            vec![
                ("pid".to_string(), "7".to_string()),
                ("oid".to_string(), "9".to_string())
            ]
        );
    }

    #[test]
    fn test_tracked_params_skips_absent_names() {
        let tracked = vec!["pid".to_string(), "missing".to_string()];
        let token = token(&[("pid", "7")]);

        let params = tracked_params(&tracked, &token);
        assert_eq!(params, vec![("pid".to_string(), "7".to_string())]);
    }

    #[test]
    fn test_tracked_params_empty_without_tracked_names() {
        let token = token(&[("pid", "7")]);
        assert!(tracked_params(&[], &token).is_empty());
    }

    #[test]
    fn test_tracked_params_truncates_to_column_limits() {
        let long_name = "n".repeat(40);
        let long_value = "v".repeat(80);
        let tracked = vec![long_name.clone()];
        let token = token(&[(long_name.as_str(), long_value.as_str())]);

        let params = tracked_params(&tracked, &token);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0.len(), MAX_IDENTIFIER_LEN);
        assert_eq!(params[0].1.len(), MAX_VALUE_LEN);
    }
}
