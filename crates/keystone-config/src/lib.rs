//! # Keystone Config
//!
//! Configuration management for Keystone.
//! Supports layered configuration from files, `.env`, and environment
//! variables, with fail-fast validation.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
