//! Service endpoint and region resolution
//!
//! Precedence: environment overrides > settings file > built-in defaults.
//! Region and endpoint are resolved independently.

use crate::config::Settings;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ENDPOINT: &str = "https://codewhisperer.us-east-1.amazonaws.com/";

/// Environment variable overriding the service region
pub const REGION_ENV: &str = "__CODEWHISPERER_REGION";

/// Environment variable overriding the service endpoint
pub const ENDPOINT_ENV: &str = "__CODEWHISPERER_ENDPOINT";

/// Where the service lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub region: String,
    pub endpoint: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve against the process environment.
    pub fn resolve(settings: &Settings) -> Self {
        Self::resolve_with(settings, |key| std::env::var(key).ok())
    }

    /// Resolve using an explicit environment lookup.
    pub fn resolve_with(settings: &Settings, env: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, configured: &Option<String>, fallback: &str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| configured.clone())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            region: pick(REGION_ENV, &settings.region, DEFAULT_REGION),
            endpoint: pick(ENDPOINT_ENV, &settings.endpoint, DEFAULT_ENDPOINT),
        }
    }
}
