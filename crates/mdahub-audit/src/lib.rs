//! MDAHub Audit - administrative activity trail
//!
//! This crate provides:
//! - The activity record model and builder
//! - Request classification (HTTP verb/path to action/resource)
//! - Persistence, search, export and retention for the activity log

pub mod classify;
pub mod model;
pub mod service;

pub use model::{ActivityRecord, ActivitySearch, AuditDetail, action, resource};
