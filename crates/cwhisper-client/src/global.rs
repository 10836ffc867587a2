//! Process-wide client instance
//!
//! Installed once at startup by the binary. Library code takes a
//! [`CodeWhispererClient`] explicitly instead of reaching for this.

use std::sync::{Arc, OnceLock};

use crate::client::CodeWhispererClient;
use crate::error::ClientError;

static CLIENT: OnceLock<Arc<CodeWhispererClient>> = OnceLock::new();

/// Install the process-wide client. Fails if one is already installed.
pub fn install(client: CodeWhispererClient) -> Result<Arc<CodeWhispererClient>, ClientError> {
    let client = Arc::new(client);
    CLIENT
        .set(client.clone())
        .map_err(|_| ClientError::AlreadyInitialized)?;
    Ok(client)
}

/// The installed client.
pub fn client() -> Result<Arc<CodeWhispererClient>, ClientError> {
    CLIENT.get().cloned().ok_or(ClientError::NotInitialized)
}
