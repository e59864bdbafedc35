//! # Keystone Security
//!
//! Salted password hashing. Plaintext passwords are hashed here before any
//! record reaches the database.

pub mod password;

pub use password::*;
