use thiserror::Error;

/// Failure of a call against the application backend.
///
/// Every expected failure mode (transport, HTTP status, malformed body, a
/// backend refusal) is a value of this type; only `InvalidArgument` marks a
/// caller bug.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Gave up after {retries} retries")]
    RetriesExhausted { retries: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Short code and message suitable for a dismissible notice.
    pub fn user_facing(&self) -> (&'static str, String) {
        match self {
            ApiError::Http(e) if e.is_timeout() => (
                "TIMEOUT",
                "The server took too long to respond. Please try again.".to_string(),
            ),
            ApiError::Http(e) => {
                tracing::warn!("Transport error: {e}");
                (
                    "NETWORK_ERROR",
                    "Could not reach the server. Check your connection and try again.".to_string(),
                )
            }
            ApiError::Api { status, message } if *status == 401 || *status == 403 => {
                tracing::warn!("Session rejected ({status}): {message}");
                (
                    "UNAUTHORIZED",
                    "Your session has expired. Please sign in again.".to_string(),
                )
            }
            ApiError::Api { status, message } if *status >= 500 => {
                tracing::error!("Backend error ({status}): {message}");
                (
                    "SERVER_ERROR",
                    "Something went wrong on our side. Please try again.".to_string(),
                )
            }
            ApiError::Api { message, .. } | ApiError::Rejected(message) => {
                ("REJECTED", message.clone())
            }
            ApiError::Parse(e) => {
                tracing::error!("Unreadable response body: {e}");
                (
                    "BAD_RESPONSE",
                    "The server sent an unexpected response. Please try again.".to_string(),
                )
            }
            ApiError::MalformedResponse(detail) => {
                tracing::error!("Malformed response: {detail}");
                (
                    "BAD_RESPONSE",
                    "The server sent an unexpected response. Please try again.".to_string(),
                )
            }
            ApiError::RetriesExhausted { .. } => (
                "UNAVAILABLE",
                "The service is temporarily unavailable. Please try again.".to_string(),
            ),
            ApiError::InvalidArgument(detail) => {
                tracing::error!("Invalid argument: {detail}");
                (
                    "INTERNAL_ERROR",
                    "An internal error occurred.".to_string(),
                )
            }
        }
    }
}

/// Failure reading or writing the client-side session document.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}
