//! MDAHub Persistence - database entities
//!
//! This crate provides the SeaORM entity definitions for the portal's
//! four tables: users, mdas, admins and the activity log.

pub mod entity;

// Re-export sea-orm for convenience
pub use sea_orm;
