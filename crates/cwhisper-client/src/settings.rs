//! Settings provider seam
//!
//! The façade reads user preferences through [`SettingsProvider`] so callers
//! (and tests) decide where they come from.

use cwhisper_core::config::Settings;
use cwhisper_core::endpoint::ServiceConfig;
use cwhisper_core::telemetry::IdeIdentity;

pub trait SettingsProvider: Send + Sync {
    /// User opted out of content sharing.
    fn is_opt_out_enabled(&self) -> bool;

    /// Usage telemetry may be sent.
    fn telemetry_enabled(&self) -> bool;

    /// Region and endpoint to talk to.
    fn service_config(&self) -> ServiceConfig;

    fn client_id(&self) -> String;

    fn ide(&self) -> IdeIdentity;
}

/// Provider over a loaded settings file.
///
/// Endpoint overrides from the environment are re-read on every call.
#[derive(Debug, Clone)]
pub struct FileSettings {
    settings: Settings,
    client_id: String,
}

impl FileSettings {
    /// Wrap loaded settings; a missing client id is generated but not persisted.
    pub fn new(mut settings: Settings) -> Self {
        let (client_id, _) = settings.ensure_client_id();
        Self {
            settings,
            client_id,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl SettingsProvider for FileSettings {
    fn is_opt_out_enabled(&self) -> bool {
        self.settings.opt_out
    }

    fn telemetry_enabled(&self) -> bool {
        self.settings.telemetry_enabled
    }

    fn service_config(&self) -> ServiceConfig {
        ServiceConfig::resolve(&self.settings)
    }

    fn client_id(&self) -> String {
        self.client_id.clone()
    }

    fn ide(&self) -> IdeIdentity {
        self.settings.ide()
    }
}
