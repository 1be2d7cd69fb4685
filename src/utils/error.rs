use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("{verb} {path} failed: {source}")]
    ApiError {
        verb: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{verb} {path} returned HTTP {status}: {body}")]
    HttpStatusError {
        verb: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("{verb} {path} returned an unreadable response: {message}")]
    ResponseDecodeError {
        verb: String,
        path: String,
        message: String,
    },

    #[error("Invalid timestamp in field '{field}': '{value}' ({reason})")]
    TimestampError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid version record: {message}")]
    InvalidRecordError { message: String },

    #[error("{verb} {path}: {source}")]
    RecordDecodeError {
        verb: String,
        path: String,
        #[source]
        source: Box<CleanupError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Confirmation prompt failed: {message}")]
    PromptError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CleanupError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanupError::ApiError { verb, path, .. } => {
                format!("Could not reach the package API ({} {})", verb, path)
            }
            CleanupError::HttpStatusError {
                verb, path, status, ..
            } => format!("The package API rejected {} {} with HTTP {}", verb, path, status),
            CleanupError::ResponseDecodeError { verb, path, .. } => {
                format!("The package API sent a malformed response to {} {}", verb, path)
            }
            CleanupError::TimestampError { field, value, .. } => {
                format!("A version has an unparseable '{}' timestamp: {}", field, value)
            }
            CleanupError::RecordDecodeError { verb, path, source } => {
                format!("Could not decode the response to {} {}: {}", verb, path, source)
            }
            CleanupError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CleanupError::ApiError { .. } => "Check network connectivity and --api-base-url",
            CleanupError::HttpStatusError { status: 401, .. }
            | CleanupError::HttpStatusError { status: 403, .. } => {
                "Check BINTRAY_USERNAME and BINTRAY_API_KEY"
            }
            CleanupError::HttpStatusError { status: 404, .. } => {
                "Check the subject, repository and package names"
            }
            CleanupError::HttpStatusError { .. } => "Retry later; the API may be unavailable",
            CleanupError::ResponseDecodeError { .. }
            | CleanupError::TimestampError { .. }
            | CleanupError::InvalidRecordError { .. }
            | CleanupError::RecordDecodeError { .. }
            | CleanupError::SerializationError(_) => {
                "Run clear-cache and retry; a stale cached response may be involved"
            }
            CleanupError::IoError(_) => "Check permissions on the cache directory",
            CleanupError::PromptError { .. } => "Run interactively or pass --yes",
            CleanupError::ConfigError { .. }
            | CleanupError::MissingConfigError { .. }
            | CleanupError::InvalidConfigValueError { .. } => {
                "Check command-line flags, environment variables and the config file"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CleanupError::ConfigError { .. }
            | CleanupError::MissingConfigError { .. }
            | CleanupError::InvalidConfigValueError { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
