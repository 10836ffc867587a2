//! Per-call client handles
//!
//! A [`ClientHandle`] spells out everything the transport needs for one call:
//! where to send it, how to authenticate, which extra headers to attach and
//! how to treat failures. Handles are built fresh for every façade call and
//! dropped afterwards.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{AuthProvider, Credentials};
use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// IAM-signed API
    Legacy,
    /// Bearer-token API
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signing {
    SigV4(SigV4Signing),
    /// Authentication travels in the handle headers
    Unsigned,
}

/// SigV4 signing material for a legacy handle.
///
/// The first attempt is signed with the credentials fetched when the handle
/// was built. Retries ask the provider again, so a retry hook that
/// re-authenticated is picked up by the next attempt.
#[derive(Clone)]
pub struct SigV4Signing {
    pub credentials: Credentials,
    provider: Arc<dyn AuthProvider>,
}

impl SigV4Signing {
    pub fn new(credentials: Credentials, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            credentials,
            provider,
        }
    }

    /// Credentials to sign attempt number `attempt` (0-based) with.
    pub async fn credentials_for_attempt(&self, attempt: u32) -> Credentials {
        if attempt == 0 {
            return self.credentials.clone();
        }
        match self.provider.credentials().await {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, attempt, "could not refresh credentials, signing with previous ones");
                self.credentials.clone()
            }
        }
    }
}

impl PartialEq for SigV4Signing {
    fn eq(&self, other: &Self) -> bool {
        self.credentials == other.credentials
    }
}

impl Eq for SigV4Signing {}

impl fmt::Debug for SigV4Signing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigV4Signing")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Extra behavior run on every failed attempt, before the retry decision.
#[derive(Clone)]
pub enum RetryHook {
    /// Re-authenticate when the service reports expired credentials and mark the error retryable.
    ReauthenticateOnExpiry(Arc<dyn AuthProvider>),
}

impl fmt::Debug for RetryHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReauthenticateOnExpiry(_) => f.write_str("ReauthenticateOnExpiry"),
        }
    }
}

impl RetryHook {
    pub async fn on_retry(&self, error: &mut ServiceError) {
        match self {
            Self::ReauthenticateOnExpiry(auth) => {
                if !error.is_expired_credentials() {
                    return;
                }
                debug!(code = %error.code, "credentials expired, re-authenticating");
                if let Err(e) = auth.reauthenticate().await {
                    warn!(error = %e, "re-authentication failed");
                }
                error.retryable = true;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub hooks: Vec<RetryHook>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: RetryHook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Run every hook, in order, against a failed attempt's error.
    pub async fn on_retry(&self, error: &mut ServiceError) {
        for hook in &self.hooks {
            hook.on_retry(error).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub flavor: ApiFlavor,
    pub region: String,
    pub endpoint: String,
    pub signing: Signing,
    pub headers: Vec<(String, String)>,
    pub retry: RetryPolicy,
}

impl ClientHandle {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of a handle header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
