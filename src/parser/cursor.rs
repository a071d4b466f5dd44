use crate::error::{Error, EventTriple, Result};
use crate::event::XmlEvent;
use crate::token::TokenRead;

use super::Parser;

impl<S: TokenRead> Parser<S> {
	fn current(&self) -> EventTriple {
		match self.event {
			XmlEvent::StartTag | XmlEvent::EndTag => {
				EventTriple::new(self.event, Some(self.space.as_str()), Some(self.name.as_str()))
			}
			_ => EventTriple::new(self.event, None, None),
		}
	}

	/// Advance to the next start or end tag.
	///
	/// A single whitespace-only text event in front of the tag is skipped.
	/// Any other text, a second whitespace run (for instance after a
	/// comment), or the end of the document is an
	/// [`Error::UnexpectedEvent`].
	pub fn next_tag(&mut self) -> Result<XmlEvent> {
		let mut ev = self.next()?;
		if ev == XmlEvent::Text && self.text.trim().is_empty() {
			ev = self.next()?;
		}
		match ev {
			XmlEvent::StartTag | XmlEvent::EndTag => Ok(ev),
			_ => Err(Error::UnexpectedEvent {
				expected: "StartTag or EndTag",
				actual: self.current(),
			}),
		}
	}

	/**
	Read the text content of a text-only element.

	The cursor must be on a start tag. On success, the cursor is on the
	matching end tag and the (coalesced) text is returned; an empty element
	yields the empty string. Whitespace is returned unchanged.

	# Errors

	- [`Error::Contract`] if the cursor is not on a start tag or the element
	  starts with a child element.
	- [`Error::MixedContent`] if the text is followed by anything but the end
	  tag.
	*/
	pub fn next_text(&mut self) -> Result<String> {
		if self.event != XmlEvent::StartTag {
			return Err(Error::Contract {
				operation: "next_text",
				requirement: "on a StartTag",
			});
		}
		match self.next()? {
			XmlEvent::EndTag => Ok(String::new()),
			XmlEvent::Text => {
				let text = std::mem::take(&mut self.text);
				match self.next()? {
					XmlEvent::EndTag => Ok(text),
					_ => Err(Error::MixedContent {
						actual: self.current(),
					}),
				}
			}
			_ => Err(Error::Contract {
				operation: "next_text",
				requirement: "on a StartTag followed by text or its EndTag",
			}),
		}
	}

	/// Skip the current element including all of its children.
	///
	/// The cursor must be on a start tag; afterwards it is on the matching
	/// end tag.
	pub fn skip(&mut self) -> Result<()> {
		if self.event != XmlEvent::StartTag {
			return Err(Error::Contract {
				operation: "skip",
				requirement: "on a StartTag",
			});
		}
		let mut open = 1usize;
		loop {
			match self.next_token()? {
				XmlEvent::StartTag => open += 1,
				XmlEvent::EndTag => {
					open -= 1;
					if open == 0 {
						return Ok(());
					}
				}
				XmlEvent::EndDocument => {
					return Err(Error::UnexpectedEvent {
						expected: "EndTag",
						actual: self.current(),
					})
				}
				_ => (),
			}
		}
	}

	/// Value of the first attribute of the current start tag with the
	/// given local name, regardless of its namespace.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|a| a.name.as_str() == name)
			.map(|a| a.value.as_str())
	}

	/// Return true if the cursor is on `event` with the local name `name`.
	/// `None` matches any name.
	pub fn matches(&self, event: XmlEvent, name: Option<&str>) -> bool {
		self.matches_all(event, None, name)
	}

	/// Return true if the cursor is on `event` with the namespace `space`
	/// and local name `name`. `None` matches anything.
	pub fn matches_all(&self, event: XmlEvent, space: Option<&str>, name: Option<&str>) -> bool {
		self.event == event
			&& space.map_or(true, |s| s == self.space)
			&& name.map_or(true, |n| n == self.name.as_str())
	}

	/// Fail with [`Error::Mismatch`] unless [`Parser::matches`] holds.
	///
	/// ```
	/// use xpp::{Parser, XmlEvent};
	///
	/// let mut p = Parser::new(&b"<rss/>"[..]);
	/// p.next_tag().unwrap();
	/// p.expect(XmlEvent::StartTag, Some("rss")).unwrap();
	/// let err = p.expect(XmlEvent::StartTag, Some("feed")).unwrap_err();
	/// assert_eq!(err.to_string(), "expected StartTag feed, found StartTag {}rss");
	/// ```
	pub fn expect(&self, event: XmlEvent, name: Option<&str>) -> Result<()> {
		self.expect_all(event, None, name)
	}

	/// Fail with [`Error::Mismatch`] unless [`Parser::matches_all`] holds.
	pub fn expect_all(&self, event: XmlEvent, space: Option<&str>, name: Option<&str>) -> Result<()> {
		if self.matches_all(event, space, name) {
			return Ok(());
		}
		Err(Error::Mismatch {
			expected: EventTriple::new(event, space, name),
			actual: self.current(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::error::TokenError;
	use crate::token::{Attribute, Token};

	fn parser(doc: &'static str) -> Parser<crate::XmlSource<'static>> {
		Parser::new(doc.as_bytes())
	}

	#[test]
	fn next_tag_skips_single_whitespace_run() {
		let mut p = parser("<a>\n  <b/>\n</a>");
		assert_eq!(p.next_tag().unwrap(), XmlEvent::StartTag);
		assert_eq!(p.next_tag().unwrap(), XmlEvent::StartTag);
		assert_eq!(p.name(), "b");
		assert_eq!(p.next_tag().unwrap(), XmlEvent::EndTag);
		assert_eq!(p.name(), "b");
		assert_eq!(p.next_tag().unwrap(), XmlEvent::EndTag);
		assert_eq!(p.name(), "a");
	}

	#[test]
	fn next_tag_rejects_whitespace_split_by_comment() {
		let mut p = parser("<a> <!--c--> <b/></a>");
		assert_eq!(p.next_tag().unwrap(), XmlEvent::StartTag);
		match p.next_tag() {
			Err(Error::UnexpectedEvent { actual, .. }) => {
				assert_eq!(actual.event, XmlEvent::Text);
			}
			other => panic!("unexpected result: {:?}", other),
		}
		assert_eq!(p.text(), " ");
	}

	#[test]
	fn next_tag_rejects_text() {
		let mut p = parser("<a>text</a>");
		p.next_tag().unwrap();
		match p.next_tag() {
			Err(Error::UnexpectedEvent { actual, .. }) => {
				assert_eq!(actual.event, XmlEvent::Text);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn next_tag_rejects_end_of_document() {
		let mut p = parser("<a/>");
		p.next_tag().unwrap();
		p.next_tag().unwrap();
		match p.next_tag() {
			Err(Error::UnexpectedEvent { actual, .. }) => {
				assert_eq!(actual.event, XmlEvent::EndDocument);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn next_text_requires_start_tag() {
		let mut p = parser("<a>x</a>");
		match p.next_text() {
			Err(Error::Contract { operation, .. }) => assert_eq!(operation, "next_text"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn next_text_rejects_child_element() {
		let mut p = parser("<a><b/></a>");
		p.next_tag().unwrap();
		match p.next_text() {
			Err(Error::Contract { .. }) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn next_text_leaves_cursor_on_end_tag() {
		let mut p = parser("<a>x</a>");
		p.next_tag().unwrap();
		assert_eq!(p.next_text().unwrap(), "x");
		assert!(p.matches(XmlEvent::EndTag, Some("a")));
		assert_eq!(p.depth(), 0);
	}

	#[test]
	fn skip_requires_start_tag() {
		let mut p = parser("<a/>");
		match p.skip() {
			Err(Error::Contract { operation, .. }) => assert_eq!(operation, "skip"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn skip_passes_nested_elements() {
		let mut p = parser("<r><a><a>t</a><!-- c --><a/></a><b/></r>");
		p.next_tag().unwrap();
		p.next_tag().unwrap();
		assert_eq!(p.depth(), 2);
		p.skip().unwrap();
		assert!(p.matches(XmlEvent::EndTag, Some("a")));
		assert_eq!(p.depth(), 1);
		p.next_tag().unwrap();
		assert_eq!(p.name(), "b");
	}

	#[test]
	fn skip_rejects_truncated_token_stream() {
		let toks = vec![Token::StartElement {
			space: String::new(),
			name: "a".into(),
			attrs: Vec::new(),
		}];
		let mut p = Parser::wrap(toks.into_iter().map(Ok::<Token, TokenError>));
		p.next().unwrap();
		match p.skip() {
			Err(Error::UnexpectedEvent { expected, actual }) => {
				assert_eq!(expected, "EndTag");
				assert_eq!(actual.event, XmlEvent::EndDocument);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn attribute_ignores_namespace() {
		let mut p = parser("<a xmlns:x='urn:x' x:href='1' href='2'/>");
		p.next_tag().unwrap();
		assert_eq!(p.attribute("href"), Some("1"));
		assert_eq!(p.attribute("x"), Some("urn:x"));
		assert_eq!(p.attribute("missing"), None);
		assert_eq!(
			p.attrs()[1],
			Attribute::new("urn:x", "href", "1")
		);
	}

	#[test]
	fn matches_treats_none_as_wildcard() {
		let mut p = parser("<feed xmlns='http://www.w3.org/2005/Atom'/>");
		p.next_tag().unwrap();
		assert!(p.matches(XmlEvent::StartTag, None));
		assert!(p.matches(XmlEvent::StartTag, Some("feed")));
		assert!(!p.matches(XmlEvent::EndTag, Some("feed")));
		assert!(p.matches_all(
			XmlEvent::StartTag,
			Some("http://www.w3.org/2005/Atom"),
			Some("feed")
		));
		assert!(p.matches_all(XmlEvent::StartTag, Some("http://www.w3.org/2005/Atom"), None));
		assert!(!p.matches_all(XmlEvent::StartTag, Some(""), Some("feed")));
	}

	#[test]
	fn expect_all_reports_both_triples() {
		let mut p = parser("<feed xmlns='urn:atom'/>");
		p.next_tag().unwrap();
		p.expect_all(XmlEvent::StartTag, Some("urn:atom"), Some("feed"))
			.unwrap();
		match p.expect_all(XmlEvent::EndTag, Some("urn:rss"), None) {
			Err(Error::Mismatch { expected, actual }) => {
				assert_eq!(
					expected,
					EventTriple::new(XmlEvent::EndTag, Some("urn:rss"), None)
				);
				assert_eq!(
					actual,
					EventTriple::new(XmlEvent::StartTag, Some("urn:atom"), Some("feed"))
				);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}
}
