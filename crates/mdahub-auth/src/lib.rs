//! MDAHub Auth - authentication and account services
//!
//! This crate provides:
//! - JWT token handling for the user and admin namespaces
//! - Password hashing and policy checks
//! - User and admin account services

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::*;
