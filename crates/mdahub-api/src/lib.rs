//! Shared API models for MDAHub.

pub mod model;

pub use model::Page;
