//! Error types for cwhisper-client

use thiserror::Error;

/// Error code the service uses for rejected credentials
pub const ACCESS_DENIED: &str = "AccessDeniedException";

/// Codes that signal throttling and are always worth retrying
const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestThrottledException",
    "ServiceUnavailableException",
];

/// A structured failure reported by the remote service (or the transport reaching it).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    pub status: Option<u16>,
    pub request_id: Option<String>,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let retryable = THROTTLING_CODES.contains(&code.as_str());
        Self {
            code,
            message: message.into(),
            retryable,
            status: None,
            request_id: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        if status >= 500 || status == 429 {
            self.retryable = true;
        }
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Access denied because the presented credentials have expired.
    pub fn is_expired_credentials(&self) -> bool {
        self.code == ACCESS_DENIED && self.message.to_lowercase().contains("expired")
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            "TimeoutError"
        } else {
            "NetworkingError"
        };
        ServiceError::new(code, e.to_string()).with_retryable(true)
    }
}

/// A credential or token provider could not produce what was asked of it.
#[derive(Debug, Error)]
pub enum CredentialProviderError {
    #[error("no credentials available: {message}")]
    MissingCredentials { message: String },

    #[error("no bearer token available: {message}")]
    MissingToken { message: String },

    #[error("re-authentication failed: {message}")]
    Reauthentication { message: String },
}

impl CredentialProviderError {
    pub fn missing_credentials(msg: impl Into<String>) -> Self {
        Self::MissingCredentials {
            message: msg.into(),
        }
    }

    pub fn missing_token(msg: impl Into<String>) -> Self {
        Self::MissingToken {
            message: msg.into(),
        }
    }

    pub fn reauthentication(msg: impl Into<String>) -> Self {
        Self::Reauthentication {
            message: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Credentials(#[from] CredentialProviderError),

    #[error("failed to encode or decode payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service client has not been installed")]
    NotInitialized,

    #[error("service client is already installed")]
    AlreadyInitialized,
}

impl ClientError {
    /// The remote error, when this failure came from the service.
    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }
}
