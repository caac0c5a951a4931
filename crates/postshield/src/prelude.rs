pub use crate::app::{App, AppState};

pub use postshield_types::error::{ClResult, Error};
pub use postshield_types::extract::{Auth, OptionalAuth, OptionalRequestId, RequestId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
