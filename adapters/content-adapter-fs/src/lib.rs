//! Filesystem content adapter
//!
//! Content items live at `<base_dir>/<content_type>/<slug>.html`. A file may
//! start with YAML front matter:
//!
//! ```text
//! ---
//! title: Hello World
//! ---
//! <p>Body HTML...</p>
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use postshield::{
	content_store::ContentStore,
	prelude::*,
	types::{ContentItem, ContentSummary, sanitize_key},
};

const EXTENSION: &str = "html";

/// Metadata extracted from front matter
#[derive(Debug, Default, Deserialize)]
struct ItemMetadata {
	title: Option<String>,
}

/// Path segments must already be in key form; anything else could escape the base directory
fn valid_segment(segment: &str) -> bool {
	!segment.is_empty() && sanitize_key(segment) == segment
}

/// Split YAML front matter from the body
fn parse_front_matter(content: &str) -> (ItemMetadata, &str) {
	let trimmed = content.trim_start();
	let Some(after_first) = trimmed.strip_prefix("---") else {
		return (ItemMetadata::default(), content);
	};

	let Some(end_pos) = after_first.find("\n---") else {
		return (ItemMetadata::default(), content);
	};
	let yaml = &after_first[..end_pos];
	let body = &after_first[end_pos + 4..];

	match serde_yaml::from_str::<ItemMetadata>(yaml) {
		Ok(metadata) => (metadata, body.trim_start_matches(['\r', '\n'])),
		Err(e) => {
			warn!("Failed to parse front matter YAML: {}", e);
			(ItemMetadata::default(), content)
		}
	}
}

#[derive(Debug)]
pub struct ContentAdapterFs {
	base_dir: Box<Path>,
}

impl ContentAdapterFs {
	pub async fn new(base_dir: impl AsRef<Path>) -> ClResult<Self> {
		fs::create_dir_all(base_dir.as_ref()).await?;
		Ok(Self { base_dir: base_dir.as_ref().into() })
	}

	fn item_path(&self, content_type: &str, slug: &str) -> ClResult<PathBuf> {
		if !valid_segment(content_type) || !valid_segment(slug) {
			debug!("Rejecting content path {}/{}", content_type, slug);
			return Err(Error::NotFound);
		}
		Ok(self.base_dir.join(content_type).join(format!("{}.{}", slug, EXTENSION)))
	}

	async fn load(&self, content_type: &str, slug: &str) -> ClResult<ContentItem> {
		let path = self.item_path(content_type, slug)?;
		let content = match fs::read_to_string(&path).await {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(Error::NotFound),
			Err(err) => return Err(err.into()),
		};

		let (metadata, body) = parse_front_matter(&content);
		Ok(ContentItem {
			content_type: content_type.to_string(),
			slug: slug.to_string(),
			title: metadata.title.unwrap_or_else(|| slug.to_string()),
			body: body.to_string(),
		})
	}
}

#[async_trait]
impl ContentStore for ContentAdapterFs {
	async fn read_item(&self, content_type: &str, slug: &str) -> ClResult<ContentItem> {
		self.load(content_type, slug).await
	}

	async fn list_items(&self, content_type: &str) -> ClResult<Vec<ContentSummary>> {
		if !valid_segment(content_type) {
			return Ok(Vec::new());
		}

		let dir = self.base_dir.join(content_type);
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(err) => return Err(err.into()),
		};

		let mut items = Vec::new();
		while let Some(entry) = entries.next_entry().await? {
			let path = entry.path();
			if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
				continue;
			}
			let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
				continue;
			};
			if !valid_segment(slug) {
				continue;
			}
			match self.load(content_type, slug).await {
				Ok(item) => items.push(ContentSummary::from(&item)),
				Err(err) => warn!("Skipping content item {}/{}: {}", content_type, slug, err),
			}
		}

		items.sort_by(|a, b| a.slug.cmp(&b.slug));
		Ok(items)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_front_matter() {
		let (metadata, body) = parse_front_matter("---\ntitle: Hello\n---\n<p>Body</p>");
		assert_eq!(metadata.title.as_deref(), Some("Hello"));
		assert_eq!(body, "<p>Body</p>");
	}

	#[test]
	fn test_parse_without_front_matter() {
		let (metadata, body) = parse_front_matter("<p>Just body</p>");
		assert!(metadata.title.is_none());
		assert_eq!(body, "<p>Just body</p>");
	}

	#[test]
	fn test_parse_unclosed_front_matter() {
		let content = "---\ntitle: Hello\n<p>Body</p>";
		let (metadata, body) = parse_front_matter(content);
		assert!(metadata.title.is_none());
		assert_eq!(body, content);
	}

	#[test]
	fn test_valid_segment() {
		assert!(valid_segment("hello-world_2"));
		assert!(!valid_segment(""));
		assert!(!valid_segment(".."));
		assert!(!valid_segment("a/b"));
		assert!(!valid_segment("Hello"));
	}
}

// vim: ts=4
