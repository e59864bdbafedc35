//! # Keystone REST
//!
//! REST API layer using Axum for Keystone.
//! Thin handlers that translate HTTP requests into `UserService` calls and
//! render the results.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
