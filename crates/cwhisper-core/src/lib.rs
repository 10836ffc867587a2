//! Settings, endpoint resolution and service request/response types for cwhisper

pub mod codefix;
pub mod common;
pub mod config;
pub mod endpoint;
pub mod recommendation;
pub mod scan;
pub mod telemetry;
pub mod testgen;
pub mod transform;
