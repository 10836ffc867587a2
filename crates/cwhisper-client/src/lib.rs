//! Code-assistant service client façade, authentication and transport for cwhisper

pub mod auth;
pub mod client;
pub mod error;
pub mod global;
pub mod handle;
pub mod operation;
pub mod settings;
pub mod sigv4;
pub mod transport;

pub use client::CodeWhispererClient;
pub use error::{ClientError, CredentialProviderError, ServiceError};
