use thiserror::Error;

/// Classification of non-success responses from the config service.
///
/// The kind is derived from the HTTP status code so callers can branch on
/// "not found" or "conflict" without matching raw numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Missing or invalid bearer token (401)
    Authentication,
    /// Token is valid but lacks permission (403)
    Forbidden,
    /// Cluster, node pool, storage or preset does not exist (404)
    NotFound,
    /// Resource already exists or is in a conflicting state (409)
    Conflict,
    /// Request payload rejected by the service (400, 422)
    Validation,
    /// Too many requests (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Unknown or unclassified status
    Unknown,
}

impl ApiErrorKind {
    /// Maps an HTTP status code to its error kind.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 | 422 => Self::Validation,
            401 => Self::Authentication,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimit,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Structured error details from a non-success config service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetails {
    /// The error category
    pub kind: ApiErrorKind,
    /// Message reported by the service, or the status reason
    pub message: String,
    /// HTTP status code
    pub status_code: u16,
}

impl ApiErrorDetails {
    pub fn new(kind: ApiErrorKind, message: String, status_code: u16) -> Self {
        Self {
            kind,
            message,
            status_code,
        }
    }

    /// Builds details for a status code, classifying it on the way.
    pub fn from_status(status_code: u16, message: String) -> Self {
        Self::new(ApiErrorKind::from_status(status_code), message, status_code)
    }
}

impl std::fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Config service error (HTTP {}): {}",
            self.status_code, self.message
        )
    }
}

/// Error type shared by the config client crates.
///
/// Transport failures, HTTP status errors and payload errors are kept as
/// distinct variants.
///
/// # Examples
///
/// ```
/// use neuro_config_core::error::{ApiErrorDetails, AppError};
///
/// let err = AppError::ApiError(ApiErrorDetails::from_status(404, "Cluster not found".into()));
/// assert!(err.is_not_found());
/// assert_eq!(err.status_code(), Some(404));
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The service answered with a non-success status.
    #[error("{0}")]
    ApiError(ApiErrorDetails),

    /// HTTP client request failed for a reason other than connect or timeout.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// JSON serialization or deserialization failed.
    ///
    /// Raised when a response body does not match the expected entity shape
    /// or when a request payload cannot be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing or joining failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The service reported a cloud provider type this client does not model.
    #[error("Cloud provider '{0}' is not supported")]
    UnsupportedCloudProvider(String),

    /// Connection could not be established.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// HTTP status code of the failed response, if the error came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::ApiError(details) => Some(details.status_code),
            _ => None,
        }
    }

    /// Error kind of the failed response, if the error came from one.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            AppError::ApiError(details) => Some(details.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Conflict)
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ApiError(details) => match details.kind {
                ApiErrorKind::Authentication => {
                    "Config service rejected the token.\n   Check NEURO_CONFIG_TOKEN.".to_string()
                }
                ApiErrorKind::Forbidden => format!(
                    "Access denied: {}\n   The token has no permission for this resource.",
                    details.message
                ),
                ApiErrorKind::NotFound => format!("Not found: {}", details.message),
                ApiErrorKind::Conflict => format!("Conflict: {}", details.message),
                ApiErrorKind::Validation => format!("Invalid request: {}", details.message),
                ApiErrorKind::RateLimit => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiErrorKind::ServerError => format!(
                    "Config service error (HTTP {}).\n   Please try again later.",
                    details.status_code
                ),
                ApiErrorKind::Unknown => details.to_string(),
            },
            AppError::NetworkError(msg) => format!(
                "Cannot reach the config service: {}\n   Check NEURO_CONFIG_URL and your network.",
                msg
            ),
            AppError::Timeout(secs) => format!(
                "Request timed out after {} seconds.\n   Increase --timeout or try again later.",
                secs
            ),
            AppError::ConfigError(msg) => format!(
                "Configuration error: {}\n   Check your CLI flags and environment.",
                msg
            ),
            _ => self.to_string(),
        }
    }
}
