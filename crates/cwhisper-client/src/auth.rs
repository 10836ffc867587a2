//! Authentication providers
//!
//! The façade never acquires credentials itself; it asks an [`AuthProvider`]
//! for IAM credentials or a bearer token on every call. [`EnvAuth`] is the
//! provider the CLI uses: the bearer token and SSO details come from
//! environment variables, IAM credentials from the AWS default provider chain.

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials as AwsCredentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use tracing::debug;

use crate::error::CredentialProviderError;

/// Start URL of the free individual (Builder ID) SSO tier
pub const BUILDER_ID_START_URL: &str = "https://view.awsapps.com/start";

pub const BEARER_TOKEN_ENV: &str = "CWHISPER_BEARER_TOKEN";
pub const SSO_START_URL_ENV: &str = "CWHISPER_SSO_START_URL";
pub const PROFILE_ARN_ENV: &str = "CWHISPER_PROFILE_ARN";

/// Cached IAM credentials are refreshed this long before they expire.
const EXPIRY_BUFFER: Duration = Duration::from_secs(5 * 60);

/// IAM credentials used to sign legacy API requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }
}

impl From<&AwsCredentials> for Credentials {
    fn from(creds: &AwsCredentials) -> Self {
        Self {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().map(String::from),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of the caller's identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Whether calls should go to the bearer-token (user) API.
    fn is_bearer_token_auth(&self) -> bool;

    /// IAM credentials for the legacy API.
    async fn credentials(&self) -> Result<Credentials, CredentialProviderError>;

    /// Bearer token for the user API.
    async fn bearer_token(&self) -> Result<String, CredentialProviderError>;

    /// Profile of the active connection, if it has one.
    fn active_profile_arn(&self) -> Option<String>;

    /// Whether the active connection is a valid enterprise (non Builder ID) SSO connection.
    fn is_valid_enterprise_sso_in_use(&self) -> bool;

    /// Refresh whatever the provider holds after the service rejected it as expired.
    async fn reauthenticate(&self) -> Result<(), CredentialProviderError>;
}

#[derive(Debug, Default, Clone)]
struct EnvState {
    bearer_token: Option<String>,
    sso_start_url: Option<String>,
    profile_arn: Option<String>,
}

impl EnvState {
    fn read(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            bearer_token: get(BEARER_TOKEN_ENV),
            sso_start_url: get(SSO_START_URL_ENV),
            profile_arn: get(PROFILE_ARN_ENV),
        }
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// IAM side of [`EnvAuth`]: a credentials provider plus the last credentials it gave.
#[derive(Default)]
struct IamSource {
    provider: Option<SharedCredentialsProvider>,
    cached: Option<AwsCredentials>,
    /// Reload the default chain on re-authentication
    reload_defaults: bool,
}

/// Environment-backed provider.
///
/// A bearer token selects the user API; otherwise IAM credentials from the
/// configured provider are used. Re-authentication re-reads the environment,
/// drops cached IAM credentials and, for the default chain, rebuilds it.
pub struct EnvAuth {
    lookup: Lookup,
    state: RwLock<EnvState>,
    iam: RwLock<IamSource>,
}

impl EnvAuth {
    /// Environment variables for the bearer token, the AWS default chain for IAM.
    pub async fn from_env() -> Self {
        let mut auth = Self::from_lookup(|key| std::env::var(key).ok());
        auth.iam = RwLock::new(IamSource {
            provider: load_default_chain().await,
            cached: None,
            reload_defaults: true,
        });
        auth
    }

    /// Bearer token and SSO details from `lookup`; no IAM credentials until
    /// [`with_credentials_provider`](Self::with_credentials_provider) supplies some.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        let lookup: Lookup = Box::new(lookup);
        let state = EnvState::read(&*lookup);
        Self {
            lookup,
            state: RwLock::new(state),
            iam: RwLock::new(IamSource::default()),
        }
    }

    pub fn with_credentials_provider(self, provider: impl ProvideCredentials + 'static) -> Self {
        *self.iam.write().unwrap_or_else(PoisonError::into_inner) = IamSource {
            provider: Some(SharedCredentialsProvider::new(provider)),
            cached: None,
            reload_defaults: false,
        };
        self
    }

    fn snapshot(&self) -> EnvState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start URL of the SSO connection, if one is configured.
    pub fn sso_start_url(&self) -> Option<String> {
        self.snapshot().sso_start_url
    }

    fn cached_credentials(&self) -> Option<AwsCredentials> {
        let iam = self.iam.read().unwrap_or_else(PoisonError::into_inner);
        iam.cached
            .as_ref()
            .filter(|creds| !expires_soon(creds.expiry()))
            .cloned()
    }
}

async fn load_default_chain() -> Option<SharedCredentialsProvider> {
    aws_config::load_defaults(BehaviorVersion::latest())
        .await
        .credentials_provider()
}

fn expires_soon(expiry: Option<SystemTime>) -> bool {
    match expiry {
        Some(at) => at <= SystemTime::now() + EXPIRY_BUFFER,
        None => false,
    }
}

#[async_trait]
impl AuthProvider for EnvAuth {
    fn is_bearer_token_auth(&self) -> bool {
        self.snapshot().bearer_token.is_some()
    }

    async fn credentials(&self) -> Result<Credentials, CredentialProviderError> {
        if let Some(creds) = self.cached_credentials() {
            return Ok(Credentials::from(&creds));
        }

        let provider = self
            .iam
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .provider
            .clone()
            .ok_or_else(|| {
                CredentialProviderError::missing_credentials("no AWS credentials provider configured")
            })?;

        let fresh = provider
            .provide_credentials()
            .await
            .map_err(|e| CredentialProviderError::missing_credentials(e.to_string()))?;
        debug!(expiry = ?fresh.expiry(), "loaded IAM credentials");

        let creds = Credentials::from(&fresh);
        self.iam.write().unwrap_or_else(PoisonError::into_inner).cached = Some(fresh);
        Ok(creds)
    }

    async fn bearer_token(&self) -> Result<String, CredentialProviderError> {
        self.snapshot()
            .bearer_token
            .ok_or_else(|| CredentialProviderError::missing_token(format!("set {BEARER_TOKEN_ENV}")))
    }

    fn active_profile_arn(&self) -> Option<String> {
        self.snapshot().profile_arn
    }

    fn is_valid_enterprise_sso_in_use(&self) -> bool {
        let state = self.snapshot();
        match (state.bearer_token, state.sso_start_url) {
            (Some(_), Some(url)) => {
                url.trim_end_matches('/') != BUILDER_ID_START_URL.trim_end_matches('/')
            }
            _ => false,
        }
    }

    async fn reauthenticate(&self) -> Result<(), CredentialProviderError> {
        debug!("re-reading environment and dropping cached IAM credentials");
        let fresh = EnvState::read(&*self.lookup);
        let has_token = fresh.bearer_token.is_some();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = fresh;

        let reload = {
            let mut iam = self.iam.write().unwrap_or_else(PoisonError::into_inner);
            iam.cached = None;
            iam.reload_defaults
        };
        if reload {
            let provider = load_default_chain().await;
            self.iam.write().unwrap_or_else(PoisonError::into_inner).provider = provider;
        }

        if has_token {
            return Ok(());
        }
        self.credentials()
            .await
            .map(|_| ())
            .map_err(|e| CredentialProviderError::reauthentication(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::future;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn auth_from(vars: &[(&str, &str)]) -> EnvAuth {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvAuth::from_lookup(move |key| map.get(key).cloned())
    }

    /// Hands out `KEY0`, `KEY1`, ... one per call.
    #[derive(Debug, Default)]
    struct RotatingKeys {
        calls: AtomicUsize,
    }

    impl ProvideCredentials for RotatingKeys {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            future::ProvideCredentials::ready(Ok(AwsCredentials::new(
                format!("KEY{n}"),
                "secret",
                None,
                None,
                "rotating",
            )))
        }
    }

    #[tokio::test]
    async fn test_bearer_token_selects_user_api() {
        let auth = auth_from(&[(BEARER_TOKEN_ENV, "tok")]);
        assert!(auth.is_bearer_token_auth());
        assert_eq!(auth.bearer_token().await.unwrap(), "tok");
        assert!(auth.credentials().await.is_err());
    }

    #[tokio::test]
    async fn test_iam_credentials_with_session_token() {
        let auth = auth_from(&[]).with_credentials_provider(AwsCredentials::new(
            "AKID",
            "secret",
            Some("session".to_string()),
            None,
            "static",
        ));
        assert!(!auth.is_bearer_token_auth());
        let creds = auth.credentials().await.unwrap();
        assert_eq!(creds.access_key_id, "AKID");
        assert_eq!(creds.session_token.as_deref(), Some("session"));
        assert!(matches!(
            auth.bearer_token().await,
            Err(CredentialProviderError::MissingToken { .. })
        ));
    }

    #[tokio::test]
    async fn test_credentials_cached_until_reauthenticate() {
        let auth = auth_from(&[]).with_credentials_provider(RotatingKeys::default());

        assert_eq!(auth.credentials().await.unwrap().access_key_id, "KEY0");
        assert_eq!(auth.credentials().await.unwrap().access_key_id, "KEY0");

        // re-authentication drops KEY0 and verifies by fetching KEY1
        auth.reauthenticate().await.unwrap();
        assert_eq!(auth.credentials().await.unwrap().access_key_id, "KEY1");
    }

    #[tokio::test]
    async fn test_expiring_credentials_are_refreshed() {
        let auth = auth_from(&[]).with_credentials_provider(AwsCredentials::new(
            "AKID",
            "secret",
            None,
            Some(SystemTime::now() + Duration::from_secs(60)),
            "short-lived",
        ));
        auth.credentials().await.unwrap();
        assert!(auth.cached_credentials().is_none());
    }

    #[test]
    fn test_expires_soon() {
        assert!(!expires_soon(None));
        assert!(expires_soon(Some(SystemTime::now())));
        assert!(!expires_soon(Some(SystemTime::now() + Duration::from_secs(3600))));
    }

    #[test]
    fn test_enterprise_sso_requires_non_builder_id_start_url() {
        let enterprise = auth_from(&[
            (BEARER_TOKEN_ENV, "tok"),
            (SSO_START_URL_ENV, "https://my-company.awsapps.com/start"),
        ]);
        let builder_id = auth_from(&[
            (BEARER_TOKEN_ENV, "tok"),
            (SSO_START_URL_ENV, "https://view.awsapps.com/start/"),
        ]);
        let no_token = auth_from(&[(SSO_START_URL_ENV, "https://my-company.awsapps.com/start")]);

        assert!(enterprise.is_valid_enterprise_sso_in_use());
        assert!(!builder_id.is_valid_enterprise_sso_in_use());
        assert!(!no_token.is_valid_enterprise_sso_in_use());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut creds = Credentials::new("AKID", "very-secret");
        creds.session_token = Some("also-secret".into());
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("also-secret"));
    }

    #[tokio::test]
    async fn test_reauthenticate_picks_up_new_token() {
        let token = Arc::new(Mutex::new("old".to_string()));
        let source = token.clone();
        let auth = EnvAuth::from_lookup(move |key| {
            (key == BEARER_TOKEN_ENV).then(|| source.lock().unwrap().clone())
        });

        *token.lock().unwrap() = "new".to_string();
        assert_eq!(auth.bearer_token().await.unwrap(), "old");
        auth.reauthenticate().await.unwrap();
        assert_eq!(auth.bearer_token().await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_reauthenticate_fails_without_token_or_credentials() {
        let auth = auth_from(&[]);
        assert!(matches!(
            auth.reauthenticate().await,
            Err(CredentialProviderError::Reauthentication { .. })
        ));
    }
}
