use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Backend error ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected response: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NetworkError(_) => "NETWORK_ERROR",
            AppError::BackendError { .. } => "BACKEND_ERROR",
            AppError::Rejected(_) => "REJECTED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::DecodeError(_) => "DECODE_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = BackendMessage::extract(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => AppError::Rejected(message),
            _ => AppError::BackendError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the error came from local validation, before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::ValidationError(_))
    }
}

#[derive(Debug, Deserialize)]
struct BackendMessage {
    message: Option<String>,
    error: Option<String>,
}

impl BackendMessage {
    fn extract(body: &str) -> Option<String> {
        let parsed: BackendMessage = serde_json::from_str(body).ok()?;
        parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::DecodeError(err.to_string())
        } else {
            AppError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DecodeError(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
