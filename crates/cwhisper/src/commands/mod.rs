//! CLI command implementations

pub mod auth;
pub mod common;
pub mod complete;
pub mod completion;
pub mod config;
pub mod customizations;
pub mod fix;
pub mod scan;
pub mod testgen;
pub mod transform;
