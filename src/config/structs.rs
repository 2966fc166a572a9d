use serde::{Deserialize, Serialize};

/// Cookie SameSite policy for the attribution cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: Strict, Lax, None",
                s
            )),
        }
    }
}

/// Static configuration loaded once at startup.
///
/// Sections:
/// - server: bind address, port, worker count
/// - database: connection string, pool, retry tuning
/// - tracking: public hit route, attribution cookie, code generation
/// - logging: level, format, optional file target
/// - api: admin token and prefix, CORS
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl StaticConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority: ENV > config.toml > defaults.
    /// ENV prefix: OT, separator: __
    /// Example: OT__SERVER__PORT=9999
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("OT")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// Attribution tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Path segment of the public hit route: GET /{route_prefix}/{code}/
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    /// Where hits land when the origin has no redirect_to, and on unknown codes.
    #[serde(default = "default_redirect")]
    pub default_redirect: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Attribution cookie lifetime in seconds.
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age: u64,
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    #[serde(default)]
    pub cookie_same_site: SameSitePolicy,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Generated origin code length, lowercase hex.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Cached origin lookups on the hit path, seconds. 0 disables the cache.
    #[serde(default = "default_resolve_cache_ttl")]
    pub resolve_cache_ttl: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token guarding the admin API. Empty disables the API entirely.
    #[serde(default)]
    pub admin_token: String,
    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "origins.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_route_prefix() -> String {
    "i".to_string()
}

fn default_redirect() -> String {
    "/".to_string()
}

fn default_cookie_name() -> String {
    "ot_attribution".to_string()
}

fn default_cookie_max_age() -> u64 {
    // 14 days; abandoned tokens expire with the cookie
    14 * 24 * 3600
}

fn default_cookie_secure() -> bool {
    false
}

fn default_code_length() -> usize {
    7
}

fn default_resolve_cache_ttl() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            default_redirect: default_redirect(),
            cookie_name: default_cookie_name(),
            cookie_max_age: default_cookie_max_age(),
            cookie_secure: default_cookie_secure(),
            cookie_same_site: SameSitePolicy::default(),
            cookie_domain: None,
            code_length: default_code_length(),
            resolve_cache_ttl: default_resolve_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            admin_token: String::new(),
            admin_prefix: default_admin_prefix(),
            cors_enabled: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}
