use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum TrackError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    OriginNotFound(String),
    DuplicateRegistration(String),
    CounterConflict(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
    FileOperation(String),
}

impl TrackError {
    pub fn code(&self) -> &'static str {
        match self {
            TrackError::DatabaseConfig(_) => "E001",
            TrackError::DatabaseConnection(_) => "E002",
            TrackError::DatabaseOperation(_) => "E003",
            TrackError::OriginNotFound(_) => "E004",
            TrackError::DuplicateRegistration(_) => "E005",
            TrackError::CounterConflict(_) => "E006",
            TrackError::Validation(_) => "E007",
            TrackError::NotFound(_) => "E008",
            TrackError::Conflict(_) => "E009",
            TrackError::Serialization(_) => "E010",
            TrackError::FileOperation(_) => "E011",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            TrackError::DatabaseConfig(_) => "Database Configuration Error",
            TrackError::DatabaseConnection(_) => "Database Connection Error",
            TrackError::DatabaseOperation(_) => "Database Operation Error",
            TrackError::OriginNotFound(_) => "Origin Not Found",
            TrackError::DuplicateRegistration(_) => "Duplicate Registration",
            TrackError::CounterConflict(_) => "Counter Conflict",
            TrackError::Validation(_) => "Validation Error",
            TrackError::NotFound(_) => "Resource Not Found",
            TrackError::Conflict(_) => "Resource Conflict",
            TrackError::Serialization(_) => "Serialization Error",
            TrackError::FileOperation(_) => "File Operation Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TrackError::DatabaseConfig(msg) => msg,
            TrackError::DatabaseConnection(msg) => msg,
            TrackError::DatabaseOperation(msg) => msg,
            TrackError::OriginNotFound(msg) => msg,
            TrackError::DuplicateRegistration(msg) => msg,
            TrackError::CounterConflict(msg) => msg,
            TrackError::Validation(msg) => msg,
            TrackError::NotFound(msg) => msg,
            TrackError::Conflict(msg) => msg,
            TrackError::Serialization(msg) => msg,
            TrackError::FileOperation(msg) => msg,
        }
    }

    /// HTTP status used by the admin API when mapping errors to responses.
    pub fn http_status(&self) -> StatusCode {
        match self {
            TrackError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            TrackError::CounterConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            TrackError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackError::OriginNotFound(_) | TrackError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackError::DuplicateRegistration(_) | TrackError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrackError {}

impl TrackError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TrackError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TrackError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TrackError::DatabaseOperation(msg.into())
    }

    pub fn origin_not_found<T: Into<String>>(msg: T) -> Self {
        TrackError::OriginNotFound(msg.into())
    }

    pub fn duplicate_registration<T: Into<String>>(msg: T) -> Self {
        TrackError::DuplicateRegistration(msg.into())
    }

    pub fn counter_conflict<T: Into<String>>(msg: T) -> Self {
        TrackError::CounterConflict(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TrackError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TrackError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        TrackError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TrackError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TrackError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for TrackError {
    fn from(err: sea_orm::DbErr) -> Self {
        match &err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                TrackError::DatabaseConnection(err.to_string())
            }
            _ => TrackError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        TrackError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
