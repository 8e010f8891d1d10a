//! MDAHub server library
//!
//! Exposes the server building blocks so integration tests and the
//! binary share one implementation.

pub mod api;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod secured;
pub mod service;
pub mod startup;
