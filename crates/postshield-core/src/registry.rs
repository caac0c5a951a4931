//! Static content-type registry

use postshield_types::content_store::ContentTypeRegistry;
use postshield_types::types::ContentType;

use crate::prelude::*;

/// Content types fixed at startup
#[derive(Debug, Clone, Default)]
pub struct StaticContentTypes {
	types: Vec<ContentType>,
}

impl StaticContentTypes {
	/// Later duplicates of a name are ignored
	pub fn new(types: impl IntoIterator<Item = ContentType>) -> Self {
		let mut registry = Self { types: Vec::new() };
		for ct in types {
			registry.register(ct);
		}
		registry
	}

	/// Parse a registry definition: a comma separated list of `name:Label[:private]`.
	///
	/// # Examples
	/// - `"post:Posts,page:Pages"`
	/// - `"post:Posts,product:Products,draft:Drafts:private"`
	pub fn parse(definition: &str) -> ClResult<Self> {
		let mut registry = Self::default();
		for entry in definition.split(',').map(str::trim).filter(|e| !e.is_empty()) {
			let mut parts = entry.split(':').map(str::trim);
			let name = parts.next().unwrap_or_default();
			let label = parts.next().filter(|l| !l.is_empty()).unwrap_or(name);
			let ct = match parts.next() {
				None | Some("public") => ContentType::new(name, label),
				Some("private") => ContentType::private(name, label),
				Some(other) => {
					return Err(Error::ConfigError(format!(
						"Invalid visibility '{}' for content type '{}'",
						other, name
					)));
				}
			};
			if ct.name.is_empty() {
				return Err(Error::ConfigError(format!("Invalid content type name '{}'", name)));
			}
			registry.register(ct);
		}
		Ok(registry)
	}

	fn register(&mut self, ct: ContentType) {
		if self.types.iter().any(|t| t.name == ct.name) {
			warn!("Content type '{}' registered twice, ignoring", ct.name);
			return;
		}
		debug!("Registering content type: {}", ct.name);
		self.types.push(ct);
	}
}

impl ContentTypeRegistry for StaticContentTypes {
	fn list(&self) -> Vec<ContentType> {
		self.types.clone()
	}

	fn get(&self, name: &str) -> Option<ContentType> {
		self.types.iter().find(|ct| ct.name == name).cloned()
	}
}


// vim: ts=4
