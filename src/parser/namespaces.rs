use std::collections::HashMap;

use crate::token::Attribute;

/// One frame per element which declared at least one namespace.
struct Frame {
	depth: usize,
	/// (uri, prefix) pairs in declaration order
	decls: Vec<(String, String)>,
}

/**
# Namespace declarations in lexical scope

Maps namespace URIs to the prefix which was bound to them, scoped to the
declaring element and its descendants. A declaration of the same URI on a
nested element shadows the outer one until the nested element closes.
*/
#[derive(Default)]
pub(crate) struct NamespaceScopes {
	frames: Vec<Frame>,
}

impl NamespaceScopes {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Record the declarations among `attrs`, tagged with `depth`.
	///
	/// Must be called after the depth was incremented for the start tag.
	pub(crate) fn push(&mut self, depth: usize, attrs: &[Attribute]) {
		let mut decls = Vec::new();
		for attr in attrs.iter().filter(|a| a.is_namespace_declaration()) {
			let prefix = if attr.space.is_empty() {
				// xmlns="..."
				""
			} else {
				attr.name.as_str()
			};
			decls.push((attr.value.clone(), prefix.to_string()));
		}
		if !decls.is_empty() {
			self.frames.push(Frame { depth, decls });
		}
	}

	/// Drop all declarations made at `depth`.
	///
	/// Must be called before the depth is decremented for the end tag.
	pub(crate) fn pop(&mut self, depth: usize) {
		while let Some(frame) = self.frames.last() {
			if frame.depth < depth {
				break;
			}
			self.frames.pop();
		}
	}

	/// Return the innermost prefix bound to `uri`.
	pub(crate) fn prefix(&self, uri: &str) -> Option<&str> {
		for frame in self.frames.iter().rev() {
			// within one start tag, a later declaration wins
			if let Some((_, prefix)) = frame.decls.iter().rev().find(|(u, _)| u == uri) {
				return Some(prefix);
			}
		}
		None
	}

	/// Snapshot of all URIs in scope with their innermost prefix.
	pub(crate) fn snapshot(&self) -> HashMap<String, String> {
		let mut result = HashMap::new();
		for frame in self.frames.iter() {
			for (uri, prefix) in frame.decls.iter() {
				result.insert(uri.clone(), prefix.clone());
			}
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::token::XMLNS_XMLNS;

	fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(u, p)| (u.to_string(), p.to_string()))
			.collect()
	}

	#[test]
	fn namespace_scopes_start_empty() {
		let scopes = NamespaceScopes::new();
		assert_eq!(scopes.snapshot(), map(&[]));
		assert_eq!(scopes.prefix("urn:x"), None);
	}

	#[test]
	fn namespace_scopes_record_prefixed_and_default_declarations() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(
			1,
			&[
				Attribute::new(XMLNS_XMLNS, "a", "urn:a"),
				Attribute::new("", "xmlns", "urn:default"),
				Attribute::new("", "href", "urn:ignored"),
			],
		);
		assert_eq!(
			scopes.snapshot(),
			map(&[("urn:a", "a"), ("urn:default", "")])
		);
		assert_eq!(scopes.prefix("urn:default"), Some(""));
		assert_eq!(scopes.prefix("urn:ignored"), None);
	}

	#[test]
	fn namespace_scopes_accept_literal_xmlns_space() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(1, &[Attribute::new("xmlns", "a", "urn:a")]);
		assert_eq!(scopes.prefix("urn:a"), Some("a"));
	}

	#[test]
	fn namespace_scopes_end_with_declaring_element() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(1, &[Attribute::new(XMLNS_XMLNS, "a", "z")]);
		assert_eq!(scopes.snapshot(), map(&[("z", "a")]));
		scopes.pop(1);
		assert_eq!(scopes.snapshot(), map(&[]));
	}

	#[test]
	fn namespace_scopes_survive_nested_elements() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(1, &[Attribute::new(XMLNS_XMLNS, "a", "z")]);
		scopes.push(2, &[]);
		assert_eq!(scopes.snapshot(), map(&[("z", "a")]));
		scopes.pop(2);
		assert_eq!(scopes.snapshot(), map(&[("z", "a")]));
		scopes.pop(1);
		assert_eq!(scopes.snapshot(), map(&[]));
	}

	#[test]
	fn namespace_scopes_shadow_and_restore_redeclarations() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(1, &[Attribute::new(XMLNS_XMLNS, "outer", "urn:x")]);
		scopes.push(3, &[Attribute::new(XMLNS_XMLNS, "inner", "urn:x")]);
		assert_eq!(scopes.prefix("urn:x"), Some("inner"));
		assert_eq!(scopes.snapshot(), map(&[("urn:x", "inner")]));
		scopes.pop(3);
		assert_eq!(scopes.prefix("urn:x"), Some("outer"));
	}

	#[test]
	fn namespace_scopes_pop_ignores_undeclaring_elements() {
		let mut scopes = NamespaceScopes::new();
		scopes.push(1, &[Attribute::new(XMLNS_XMLNS, "a", "z")]);
		// depth 2 declared nothing
		scopes.pop(2);
		assert_eq!(scopes.prefix("z"), Some("a"));
	}
}
