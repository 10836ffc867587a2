//! Shared helpers for CLI commands

use std::sync::Arc;

use anyhow::{Context, Result};
use cwhisper_client::auth::EnvAuth;
use cwhisper_client::global;
use cwhisper_client::settings::FileSettings;
use cwhisper_client::transport::HttpTransport;
use cwhisper_client::{ClientError, CodeWhispererClient};
use cwhisper_core::config::Settings;
use tracing::debug;

/// The process-wide service client, built and installed on first use.
pub async fn client() -> Result<Arc<CodeWhispererClient>> {
    match global::client() {
        Ok(client) => Ok(client),
        Err(ClientError::NotInitialized) => {
            let settings = Settings::load_or_default().context("failed to load settings")?;
            let client = CodeWhispererClient::new(
                Arc::new(EnvAuth::from_env().await),
                Arc::new(FileSettings::new(settings)),
                Arc::new(HttpTransport::new()?),
            );
            debug!(bearer = client.is_bearer_token_auth(), "installing service client");
            Ok(global::install(client)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Token for the next page; `None` once the service stops returning one or
/// hands back the token it was just sent.
pub fn next_page(sent: Option<&str>, returned: Option<String>) -> Option<String> {
    returned.filter(|token| sent != Some(token.as_str()))
}
