//! Error type shared by the host surfaces (admin, adapters, server).
//!
//! The access gate itself never fails; these errors only reach the admin API,
//! storage adapters and startup code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	Unauthorized,
	DbError,
	Parse,
	ValidationError(String),
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable error code used in JSON error bodies
	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::Unauthorized => "E-AUTH-UNAUTH",
			Error::DbError => "E-CORE-DBERR",
			Error::Parse => "E-CORE-PARSE",
			Error::ValidationError(_) => "E-VAL-INVALID",
			Error::ConfigError(_) => "E-CORE-CONFIG",
			Error::Internal(_) | Error::Io(_) => "E-CORE-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::Parse | Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Unauthorized => write!(f, "authentication required"),
			Error::DbError => write!(f, "database error"),
			Error::Parse => write!(f, "parse error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("JSON error: {}", err);
		Self::Parse
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the log
		let message = match &self {
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				tracing::error!("Request failed: {}", self);
				"Internal server error".to_string()
			}
			_ => self.to_string(),
		};
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});

		(status, Json(body)).into_response()
	}
}


// vim: ts=4
