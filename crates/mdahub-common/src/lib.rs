//! Shared foundation for the MDAHub workspace.

pub mod error;

pub use error::PortalError;
