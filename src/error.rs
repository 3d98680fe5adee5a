use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum EyesError {
    #[error("IllegalArgument: {0}")]
    IllegalArgument(String),

    #[error("IllegalType: {0}")]
    IllegalType(String),

    #[error("IllegalState: {0}")]
    IllegalState(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Server error (status: {status:?}): {message}")]
    Transport {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EyesError {
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        EyesError::IllegalArgument(message.into())
    }

    pub fn illegal_type(message: impl Into<String>) -> Self {
        EyesError::IllegalType(message.into())
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        EyesError::IllegalState(message.into())
    }

    pub fn capture(message: impl Into<String>) -> Self {
        EyesError::Capture(message.into())
    }

    pub fn transport(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        EyesError::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EyesError::IllegalArgument(_) => ErrorCategory::IllegalArgument,
            EyesError::IllegalType(_) => ErrorCategory::IllegalType,
            EyesError::IllegalState(_) => ErrorCategory::IllegalState,
            EyesError::Capture(_) | EyesError::Image(_) => ErrorCategory::Capture,
            EyesError::Transport { .. } | EyesError::Network(_) | EyesError::Serialization(_) => {
                ErrorCategory::Transport
            }
            EyesError::InvalidUrl(_) | EyesError::Config(_) | EyesError::Io(_) => {
                ErrorCategory::Config
            }
        }
    }

    /// True for failures of the remote API call itself, as opposed to local
    /// programming errors.
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let remediation = match self {
            EyesError::IllegalArgument(_) | EyesError::IllegalType(_) => {
                "Fix the offending argument in the test code; validation errors are never retried."
            }
            EyesError::IllegalState(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("already closed") || lower.contains("not open") {
                    "Call open() before check()/close(); use abort_if_not_closed() in cleanup paths."
                } else {
                    "Check the order of open/check/close calls on this Eyes instance."
                }
            }
            EyesError::Capture(_) | EyesError::Image(_) => {
                "Verify the driver session is alive and returns base64-encoded PNG screenshots."
            }
            EyesError::Transport { status, .. } => match status.map(|s| s.as_u16()) {
                Some(401) | Some(403) => "Check APPLITOOLS_API_KEY for this server.",
                Some(404) => "The running session was not found; it may have timed out on the server.",
                Some(429) => "Rate limited by the server; retry after waiting.",
                _ => "Check connectivity to the server and retry the call.",
            },
            EyesError::Network(_) => "Check connectivity/proxy/VPN and retry.",
            EyesError::Serialization(_) => {
                "The server returned an unexpected payload; check the server URL and version."
            }
            EyesError::InvalidUrl(_) => {
                "Verify APPLITOOLS_SERVER_URL (e.g., https://eyesapi.applitools.com)."
            }
            EyesError::Config(_) => "Check the config file and APPLITOOLS_* environment variables.",
            EyesError::Io(_) => "Check file paths/permissions.",
        };

        ErrorPayload::new(self.category(), self.to_string(), remediation)
    }
}

pub type Result<T> = std::result::Result<T, EyesError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    IllegalArgument,
    IllegalType,
    IllegalState,
    Capture,
    Transport,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
