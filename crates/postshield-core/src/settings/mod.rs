//! Shield settings subsystem
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): the settings record and its stored form
//! - **HTML filter** (`html_filter.rs`): allow-list filter for the shield message
//! - **Sanitizer** (`sanitize.rs`): raw input to complete record, never fails
//! - **Service** (`service.rs`): per-request snapshots and sanitized saves

pub mod html_filter;
pub mod sanitize;
pub mod service;
pub mod types;

pub use sanitize::Sanitizer;
pub use service::ShieldSettingsService;
pub use types::{SETTINGS_KEY, ShieldSettings};

// vim: ts=4
