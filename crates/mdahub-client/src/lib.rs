//! MDAHub Client - Rust SDK for the administration portal
//!
//! This crate provides:
//! - Local JWT payload inspection without signature verification
//! - A dual-slot session store (user and admin sessions side by side)
//! - An HTTP client that attaches the right bearer token per request path
//!   and drops a session when the server answers 401

pub mod http;
pub mod session;
pub mod token;

pub use http::PortalClient;
pub use session::{Session, SessionIdentity, SessionSlot, SessionStore};
pub use token::{TokenClaims, decode_claims};
