//! Postshield web server
//!
//! Serves content items from a [`ContentStore`](postshield_types::content_store::ContentStore)
//! and applies the shield to single-item views. The admin surface comes from
//! `postshield-admin` and is mounted on the same router.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod auth;
pub mod content;
pub mod middleware;
pub mod pages;
pub mod prelude;
pub mod routes;

pub use app::{App, AppBuilder, AppState};
pub use auth::JwtAuthProvider;

// vim: ts=4
