//! Error types for the agent backend adapter

use summit_application::GatewayError;
use thiserror::Error;

/// Result type alias for agent backend operations
pub type Result<T> = std::result::Result<T, AgentHttpError>;

/// Errors that can occur when communicating with the agent backend
#[derive(Error, Debug)]
pub enum AgentHttpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Backend reported an error: {0}")]
    Backend(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<AgentHttpError> for GatewayError {
    fn from(err: AgentHttpError) -> Self {
        match err {
            AgentHttpError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            AgentHttpError::Http(e) if e.is_connect() => {
                GatewayError::ConnectionError(e.to_string())
            }
            AgentHttpError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            e @ AgentHttpError::Status { .. } => GatewayError::RequestFailed(e.to_string()),
            AgentHttpError::Backend(message) => GatewayError::RequestFailed(message),
            e @ AgentHttpError::ParseError { .. } => GatewayError::InvalidResponse(e.to_string()),
            e @ AgentHttpError::InvalidBaseUrl(_) => GatewayError::Other(e.to_string()),
        }
    }
}
