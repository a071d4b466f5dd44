use url::{ParseError, Url};

use crate::token::{Attribute, XMLNS_XML};

fn is_base_attribute(attr: &Attribute) -> bool {
	(attr.space == XMLNS_XML || attr.space == "xml") && attr.name.as_str() == "base"
}

/// Resolve `reference` against `base`.
///
/// The path of `base` is treated as a directory: if it does not end with a
/// slash, one is appended before joining. Without a base, a relative
/// reference resolves to `None`.
pub(crate) fn resolve(base: Option<&Url>, reference: &str) -> Result<Option<Url>, ParseError> {
	let base = match base {
		Some(base) => base,
		None => {
			return match Url::parse(reference) {
				Ok(url) => Ok(Some(url)),
				Err(ParseError::RelativeUrlWithoutBase) => Ok(None),
				Err(e) => Err(e),
			}
		}
	};
	if reference.is_empty() {
		return Ok(Some(base.clone()));
	}
	if base.cannot_be_a_base() || base.path().ends_with('/') {
		return base.join(reference).map(Some);
	}
	let mut dir = base.clone();
	let path = format!("{}/", base.path());
	dir.set_path(&path);
	dir.join(reference).map(Some)
}

/// Resolved `xml:base` URI per open element.
#[derive(Debug, Default)]
pub(crate) struct BaseStack(Vec<Option<Url>>);

impl BaseStack {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// The base URI in effect for the innermost open element.
	pub(crate) fn top(&self) -> Option<&Url> {
		self.0.last().and_then(Option::as_ref)
	}

	/// Push the base for a new element with the given attributes.
	pub(crate) fn push(&mut self, attrs: &[Attribute]) {
		let parent = self.top().cloned();
		let reference = attrs
			.iter()
			.find(|a| is_base_attribute(a))
			.map(|a| a.value.as_str())
			.filter(|v| !v.is_empty());
		let next = match reference {
			None => parent,
			Some(reference) => match resolve(parent.as_ref(), reference) {
				Ok(Some(url)) => Some(url),
				Ok(None) => {
					tracing::debug!(reference, "relative xml:base without a base in effect");
					None
				}
				Err(e) => {
					tracing::debug!(reference, error = %e, "ignoring malformed xml:base");
					parent
				}
			},
		};
		self.0.push(next);
	}

	pub(crate) fn pop(&mut self) {
		self.0.pop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn url(s: &str) -> Url {
		Url::parse(s).unwrap()
	}

	fn resolved(base: &str, reference: &str) -> String {
		resolve(Some(&url(base)), reference)
			.unwrap()
			.unwrap()
			.to_string()
	}

	#[test]
	fn resolve_without_base_accepts_absolute_urls() {
		assert_eq!(
			resolve(None, "http://example.org/a").unwrap(),
			Some(url("http://example.org/a"))
		);
	}

	#[test]
	fn resolve_without_base_drops_relative_references() {
		assert_eq!(resolve(None, "relative/path").unwrap(), None);
	}

	#[test]
	fn resolve_empty_reference_is_base() {
		assert_eq!(
			resolved("https://example.org/path/file", ""),
			"https://example.org/path/file"
		);
	}

	#[test]
	fn resolve_treats_base_path_as_directory() {
		assert_eq!(
			resolved("https://example.org/path/relative", "test"),
			"https://example.org/path/relative/test"
		);
		assert_eq!(
			resolved("https://example.org/path/", "relative"),
			"https://example.org/path/relative"
		);
	}

	#[test]
	fn resolve_absolute_path_keeps_authority() {
		assert_eq!(
			resolved("https://example.org/path/", "/absolute"),
			"https://example.org/absolute"
		);
	}

	#[test]
	fn resolve_absolute_reference_replaces_base() {
		assert_eq!(
			resolved("https://example.org/path/", "http://other.example/x"),
			"http://other.example/x"
		);
	}

	#[test]
	fn resolve_reports_malformed_references() {
		match resolve(Some(&url("https://example.org/")), "http://[::1") {
			Err(_) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn base_stack_inherits_and_restores() {
		let mut bases = BaseStack::new();
		bases.push(&[Attribute::new(XMLNS_XML, "base", "https://example.org/path/")]);
		assert_eq!(bases.top(), Some(&url("https://example.org/path/")));
		bases.push(&[]);
		assert_eq!(bases.top(), Some(&url("https://example.org/path/")));
		bases.push(&[Attribute::new("xml", "base", "sub")]);
		assert_eq!(bases.top(), Some(&url("https://example.org/path/sub")));
		bases.pop();
		bases.pop();
		assert_eq!(bases.top(), Some(&url("https://example.org/path/")));
		bases.pop();
		assert_eq!(bases.top(), None);
	}

	#[test]
	fn base_stack_ignores_empty_and_malformed_values() {
		let mut bases = BaseStack::new();
		bases.push(&[Attribute::new(XMLNS_XML, "base", "https://example.org/")]);
		bases.push(&[Attribute::new(XMLNS_XML, "base", "")]);
		assert_eq!(bases.top(), Some(&url("https://example.org/")));
		bases.push(&[Attribute::new(XMLNS_XML, "base", "http://[::1")]);
		assert_eq!(bases.top(), Some(&url("https://example.org/")));
	}

	#[test]
	fn base_stack_ignores_unqualified_base_attribute() {
		let mut bases = BaseStack::new();
		bases.push(&[Attribute::new("", "base", "https://example.org/")]);
		assert_eq!(bases.top(), None);
	}
}
