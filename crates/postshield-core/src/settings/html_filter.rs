//! HTML allow-list filter for shield messages.
//!
//! Keeps the tag subset that is acceptable inside post content and removes
//! everything that can execute or restyle the page:
//! - `<script>`, `<style>` and similar elements together with their content
//! - HTML comments
//! - tags outside the allow-list (their text is kept)
//! - attributes outside the per-tag allow-list, including all `on*` handlers
//! - URLs with schemes other than http(s), mailto and tel
//!
//! Allowed tags are re-emitted in canonical form and stray `<`/`>` in text are
//! escaped, so filtering an already filtered string returns it unchanged.

use regex::Regex;
use std::sync::LazyLock;

/// Elements removed together with their content
const STRIPPED_ELEMENTS: &[&str] = &[
	"script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "title",
	"frame", "frameset", "svg", "math", "xmp", "noembed", "noframes",
];

/// Attributes allowed on every allowed tag
const GLOBAL_ATTRS: &[&str] = &["class", "id", "title", "lang", "dir"];

/// Allowed tags with their tag-specific attributes
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
	("a", &["href", "rel", "target", "name"]),
	("abbr", &[]),
	("b", &[]),
	("blockquote", &["cite"]),
	("br", &[]),
	("cite", &[]),
	("code", &[]),
	("del", &["datetime"]),
	("div", &[]),
	("em", &[]),
	("figcaption", &[]),
	("figure", &[]),
	("h1", &[]),
	("h2", &[]),
	("h3", &[]),
	("h4", &[]),
	("h5", &[]),
	("h6", &[]),
	("hr", &[]),
	("i", &[]),
	("img", &["src", "alt", "width", "height"]),
	("ins", &["datetime"]),
	("li", &[]),
	("mark", &[]),
	("ol", &["start", "reversed"]),
	("p", &[]),
	("pre", &[]),
	("q", &["cite"]),
	("s", &[]),
	("small", &[]),
	("span", &[]),
	("strike", &[]),
	("strong", &[]),
	("sub", &[]),
	("sup", &[]),
	("table", &[]),
	("tbody", &[]),
	("td", &["colspan", "rowspan"]),
	("th", &["colspan", "rowspan", "scope"]),
	("thead", &[]),
	("tr", &[]),
	("u", &[]),
	("ul", &[]),
];

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

const URL_ATTRS: &[&str] = &["href", "src", "cite"];

const ALLOWED_PROTOCOLS: &[&str] = &["http", "https", "mailto", "tel"];

struct Patterns {
	stripped: Vec<Regex>,
	comment: Regex,
	tag: Regex,
	attr: Regex,
}

fn build_patterns() -> Result<Patterns, regex::Error> {
	let mut stripped = Vec::with_capacity(STRIPPED_ELEMENTS.len());
	for element in STRIPPED_ELEMENTS {
		stripped.push(Regex::new(&format!(r"(?is)<{}\b[^>]*>.*?</{}\s*>", element, element))?);
	}

	Ok(Patterns {
		stripped,
		comment: Regex::new(r"(?s)<!--.*?-->")?,
		tag: Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\b([^<>]*)>")?,
		attr: Regex::new(
			r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
		)?,
	})
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| {
	build_patterns()
		.inspect_err(|err| tracing::error!("HTML filter patterns failed to compile: {}", err))
		.ok()
});

/// Filter an HTML fragment down to the post-content allow-list
pub fn filter_post_html(input: &str) -> String {
	let Some(patterns) = PATTERNS.as_ref() else {
		// Without patterns nothing can be kept as markup
		return escape_text(input);
	};

	let mut html = input.to_string();

	// Removing one element can join the halves of another, so repeat
	loop {
		let mut next = patterns.comment.replace_all(&html, "").into_owned();
		for re in &patterns.stripped {
			next = re.replace_all(&next, "").into_owned();
		}
		if next == html {
			break;
		}
		html = next;
	}

	let mut out = String::with_capacity(html.len());
	let mut last = 0;
	for caps in patterns.tag.captures_iter(&html) {
		let Some(whole) = caps.get(0) else { continue };
		out.push_str(&escape_text(&html[last..whole.start()]));
		last = whole.end();

		let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
		let name = caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
		let Some(tag_attrs) = allowed_attrs(&name) else {
			continue;
		};

		if closing {
			if !VOID_TAGS.contains(&name.as_str()) {
				out.push_str("</");
				out.push_str(&name);
				out.push('>');
			}
			continue;
		}

		out.push('<');
		out.push_str(&name);
		let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
		for (attr, value) in filter_attrs(&patterns.attr, attrs, tag_attrs) {
			out.push(' ');
			out.push_str(&attr);
			out.push_str("=\"");
			out.push_str(&escape_attr(&value));
			out.push('"');
		}
		if VOID_TAGS.contains(&name.as_str()) {
			out.push_str(" />");
		} else {
			out.push('>');
		}
	}
	out.push_str(&escape_text(&html[last..]));

	out
}

fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
	ALLOWED_TAGS.iter().find(|(name, _)| *name == tag).map(|(_, attrs)| *attrs)
}

/// Parse and filter the attribute part of a tag. Keeps the first occurrence of each name.
fn filter_attrs(re: &Regex, attrs: &str, tag_attrs: &[&str]) -> Vec<(String, String)> {
	let mut result: Vec<(String, String)> = Vec::new();

	for caps in re.captures_iter(attrs) {
		let Some(name) = caps.get(1).map(|m| m.as_str().to_ascii_lowercase()) else {
			continue;
		};
		if name.starts_with("on")
			|| !(GLOBAL_ATTRS.contains(&name.as_str()) || tag_attrs.contains(&name.as_str()))
			|| result.iter().any(|(n, _)| *n == name)
		{
			continue;
		}

		let value = caps
			.get(2)
			.or_else(|| caps.get(3))
			.or_else(|| caps.get(4))
			.map(|m| decode_entities(m.as_str()))
			.unwrap_or_default();

		if URL_ATTRS.contains(&name.as_str()) && !is_safe_url(&value) {
			continue;
		}

		result.push((name, value));
	}

	result
}

/// Check the scheme of a decoded URL attribute value. Relative URLs are allowed.
fn is_safe_url(value: &str) -> bool {
	let decoded: String = value
		.chars()
		.filter(|c| !c.is_ascii_whitespace() && !c.is_control())
		.collect::<String>()
		.to_ascii_lowercase();

	match decoded.find(':') {
		Some(pos) => {
			let scheme = &decoded[..pos];
			// A ':' after a path, query or fragment separator is not a scheme
			if scheme.contains(['/', '?', '#']) {
				return true;
			}
			ALLOWED_PROTOCOLS.contains(&scheme)
		}
		None => true,
	}
}

/// Decode character references in an attribute value.
///
/// Numeric references follow HTML parsing: the trailing `;` is optional, any
/// number of digits is accepted, and invalid code points become U+FFFD. Named
/// references need the `;` and only the markup and scheme-hiding ones are known.
fn decode_entities(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	let mut rest = value;

	while let Some(pos) = rest.find('&') {
		out.push_str(&rest[..pos]);
		rest = &rest[pos + 1..];
		match decode_reference(rest) {
			Some((c, len)) => {
				out.push(c);
				rest = &rest[len..];
			}
			None => out.push('&'),
		}
	}
	out.push_str(rest);

	out
}

/// Decode the reference following a `&`, returning the character and the bytes consumed
fn decode_reference(rest: &str) -> Option<(char, usize)> {
	if let Some(num) = rest.strip_prefix('#') {
		let (radix, start) = match num.as_bytes().first() {
			Some(b'x' | b'X') => (16, 2),
			_ => (10, 1),
		};
		let digits: &str = &rest[start..];
		let len = digits.bytes().take_while(|b| char::from(*b).is_digit(radix)).count();
		if len == 0 {
			return None;
		}
		let code = digits[..len]
			.chars()
			.filter_map(|c| c.to_digit(radix))
			.fold(0u32, |acc, d| acc.saturating_mul(radix).saturating_add(d));
		let c = char::from_u32(code).filter(|c| *c != '\0').unwrap_or(char::REPLACEMENT_CHARACTER);
		let end = start + len;
		let consumed = if digits[len..].starts_with(';') { end + 1 } else { end };
		return Some((c, consumed));
	}

	let end = rest.find(';')?;
	let name = &rest[..end];
	if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
		return None;
	}
	let c = match name.to_ascii_lowercase().as_str() {
		"amp" => '&',
		"lt" => '<',
		"gt" => '>',
		"quot" => '"',
		"apos" => '\'',
		"nbsp" => '\u{a0}',
		"colon" => ':',
		"tab" => '\t',
		"newline" => '\n',
		_ => return None,
	};
	Some((c, end + 1))
}

fn escape_text(text: &str) -> String {
	text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
	value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}


// vim: ts=4
