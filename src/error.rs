/// Unified Error Handling
///
/// Every failure the service can produce is a domain-specific enum that maps
/// into one central `AppError`. The boundary renders each of them as the
/// uniform `{status, message}` JSON shape; nothing propagates as an
/// unhandled fault.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Input validation errors (username, name, password policy)
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
    SuspiciousContent(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
        }
    }
}

impl StdError for ValidationError {}

/// Token verification failures
///
/// Each kind is distinct so call sites and tests can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Structure cannot be parsed at all (segment count, base64, JSON)
    Malformed,
    /// Structurally valid but the signature check fails
    BadSignature,
    /// `now >= exp`
    Expired,
    /// Token kind does not match what the call site expects
    WrongType,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "token is malformed"),
            TokenError::BadSignature => write!(f, "token signature is invalid"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::WrongType => write!(f, "token type is not acceptable here"),
        }
    }
}

impl StdError for TokenError {}

/// Authentication and authorization failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password; never distinguished outwardly
    BadCredentials,
    /// Refresh exchange rejected: failed verification, not the currently
    /// active token, or lost a rotation race
    InvalidRefreshToken,
    /// Exchange request carried an unexpected grant-type marker
    BadGrantType,
    /// Protected route reached without any bearer token
    MissingToken,
    /// Authenticated but the role set lacks the required role
    InsufficientRole,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::BadCredentials => write!(f, "invalid username or password"),
            AuthError::InvalidRefreshToken => write!(f, "invalid refresh token"),
            AuthError::BadGrantType => write!(f, "unsupported grant type"),
            AuthError::MissingToken => write!(f, "missing authentication token"),
            AuthError::InsufficientRole => write!(f, "insufficient permissions"),
        }
    }
}

impl StdError for AuthError {}

/// Identity directory failures
///
/// "No such record" is not an error here — lookups return `Ok(None)` and the
/// caller decides what that means. These variants cover actual faults;
/// `Unavailable` (transient connectivity) is kept apart from everything else
/// so it surfaces as a retryable 503 instead of an auth failure.
#[derive(Debug)]
pub enum DirectoryError {
    /// Unique-key violation on create
    Duplicate(String),
    /// Transient fault: pool exhausted, connection refused, timeout
    Unavailable(String),
    /// Anything else the backing store reports
    Backend(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Duplicate(msg) => write!(f, "duplicate entry: {}", msg),
            DirectoryError::Unavailable(msg) => write!(f, "directory unavailable: {}", msg),
            DirectoryError::Backend(msg) => write!(f, "directory error: {}", msg),
        }
    }
}

impl StdError for DirectoryError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Token(TokenError),
    Auth(AuthError),
    Directory(DirectoryError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Token(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Directory(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Token(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::Directory(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        let error_msg = err.to_string();

        if error_msg.contains("duplicate key") || error_msg.contains("unique constraint") {
            DirectoryError::Duplicate("username already registered".to_string())
        } else if error_msg.contains("pool") || error_msg.contains("connect") {
            DirectoryError::Unavailable(error_msg)
        } else {
            DirectoryError::Backend(error_msg)
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Directory(err.into())
    }
}

/// Uniform failure body: `{status, message}`
#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl AppError {
    fn render(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),

            // Token failures on a protected route always come back 401;
            // the precise kind stays in the logs, not the body
            AppError::Token(e) => (StatusCode::UNAUTHORIZED, e.to_string()),

            AppError::Auth(e) => match e {
                AuthError::BadCredentials | AuthError::BadGrantType => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                AuthError::InvalidRefreshToken | AuthError::MissingToken => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::InsufficientRole => (StatusCode::FORBIDDEN, e.to_string()),
            },

            AppError::Directory(e) => match e {
                DirectoryError::Duplicate(_) => (StatusCode::CONFLICT, e.to_string()),
                DirectoryError::Unavailable(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "directory temporarily unavailable".to_string(),
                ),
                DirectoryError::Backend(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "directory error occurred".to_string(),
                ),
            },

            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server configuration error".to_string(),
            ),

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        }
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Token(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Token verification failed");
            }
            AppError::Auth(AuthError::BadCredentials) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Directory(DirectoryError::Duplicate(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Directory(e) => {
                tracing::error!(request_id = request_id, error = %e, "Directory error");
            }
            AppError::Config(e) => {
                tracing::error!(request_id = request_id, error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, message) = self.render();

        HttpResponse::build(status).json(ErrorBody {
            status: status.as_u16(),
            message,
        })
    }

    fn status_code(&self) -> StatusCode {
        self.render().0
    }
}
