//! Shared types, adapter traits, and error types for Postshield.
//!
//! This crate contains the foundational types that are shared between the
//! gate core, the admin surface, the server and all adapter implementations.
//! Keeping them separate lets adapter crates compile without the web stack.

pub mod auth_provider;
pub mod content_store;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod settings_store;
pub mod types;

// vim: ts=4
