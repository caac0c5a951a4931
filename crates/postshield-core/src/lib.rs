//! Core of the Postshield content gate.
//!
//! This crate contains everything that decides whether a content item is
//! shown: the settings record and its sanitizer, the access decision, and the
//! response transformer applying the decision. It has no web framework
//! dependency; the server and admin crates wire it into HTTP.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod decision;
pub mod i18n;
pub mod lifecycle;
pub mod memory_store;
pub mod prelude;
pub mod registry;
pub mod settings;
pub mod transform;

// Re-export commonly used types
pub use decision::{Decision, RequestContext, evaluate};
pub use i18n::{Locale, Text};
pub use settings::{Sanitizer, ShieldSettings, ShieldSettingsService};
pub use transform::{PreRender, ShieldTransformer};

// vim: ts=4
