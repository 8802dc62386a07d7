use thiserror::Error;

/// Failures talking to the portal backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GatewayError::Transport(format!("Request timeout: {error}"))
        } else if error.is_connect() {
            GatewayError::Transport(format!("Connection error: {error}"))
        } else if error.is_decode() {
            GatewayError::MalformedResponse(format!("Failed to decode response: {error}"))
        } else {
            GatewayError::Transport(error.to_string())
        }
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(error: url::ParseError) -> Self {
        GatewayError::InvalidUrl(error.to_string())
    }
}
