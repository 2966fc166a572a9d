use serde::{Deserialize, Serialize};

/// A tracked marketing origin (campaign source).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub track_registrations: bool,
    /// Tracked parameter names, one per line.
    pub querystring_parameters: Option<String>,
    pub redirect_to: Option<String>,

    #[serde(default)]
    pub number_of_registrations: i64,
    pub origin_group_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Origin {
    /// Tracked parameter names as a list: trimmed, empty lines dropped,
    /// empty vec when unset.
    pub fn parameter_list(&self) -> Vec<String> {
        self.querystring_parameters
            .as_deref()
            .map(|raw| {
                raw.lines()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One attributed registration: at most one row per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: String,
    pub origin_code: String,
    pub created: chrono::DateTime<chrono::Utc>,
}

/// Per-(identifier, value, origin) registration counter, created lazily
/// on the first qualifying registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerystringParameter {
    pub id: i64,
    pub identifier: String,
    pub value: String,
    pub origin_code: String,
    pub number_of_registrations: i64,
}

/// Administrative grouping label over origins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginGroup {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}
