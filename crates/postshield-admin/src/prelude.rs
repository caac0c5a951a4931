pub use postshield_types::error::{ClResult, Error};
pub use postshield_types::extract::{Auth, OptionalRequestId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
