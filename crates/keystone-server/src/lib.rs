//! # Keystone Server Library
//!
//! Dependency injection wiring and startup utilities for the Keystone
//! server binary.

pub mod di;
pub mod startup;
