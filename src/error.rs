/*!
# Error types

This module holds the error types returned by the various functions of this
crate.
*/
use std::fmt;
use std::io;
use std::result::Result as StdResult;
use std::sync::Arc;

use crate::event::XmlEvent;

/// Error reported by a token source.
///
/// All token errors are fatal: once a [`Parser`](crate::Parser) observed one,
/// it returns the same error from every further call which needs a token.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
	/// The input violates the XML grammar.
	#[error("malformed xml at byte {position}: {source}")]
	Syntax {
		/// Byte offset into the (decoded) input near which the error was
		/// detected.
		position: u64,
		#[source]
		source: Arc<quick_xml::Error>,
	},

	/// An I/O error was encountered while reading or decoding the input.
	#[error("I/O error: {0}")]
	Io(#[source] Arc<io::Error>),

	/// Input bytes are not valid UTF-8 (only reported in strict mode).
	#[error("invalid utf-8 near byte {position}")]
	InvalidUtf8 {
		/// Byte offset into the (decoded) input near which the invalid data
		/// was found.
		position: u64,
	},

	/// The XML declaration names a charset other than UTF-8, but no charset
	/// reader was configured.
	#[error("encoding {0:?} declared but no charset reader is configured")]
	UnsupportedCharset(String),
}

impl From<io::Error> for TokenError {
	fn from(e: io::Error) -> TokenError {
		TokenError::Io(Arc::new(e))
	}
}

/// Compact description of the cursor (or an expectation about it) used in
/// diagnostics.
///
/// `None` in `space` or `name` stands for "any" in expectations and for
/// "not applicable" in observed states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTriple {
	pub event: XmlEvent,
	pub space: Option<String>,
	pub name: Option<String>,
}

impl EventTriple {
	pub(crate) fn new(event: XmlEvent, space: Option<&str>, name: Option<&str>) -> Self {
		Self {
			event,
			space: space.map(ToOwned::to_owned),
			name: name.map(ToOwned::to_owned),
		}
	}
}

impl fmt::Display for EventTriple {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.event)?;
		match (self.space.as_deref(), self.name.as_deref()) {
			(None, None) => Ok(()),
			(Some(space), Some(name)) => write!(f, " {{{}}}{}", space, name),
			(Some(space), None) => write!(f, " {{{}}}*", space),
			(None, Some(name)) => write!(f, " {}", name),
		}
	}
}

/// Error types which may be returned from the [`Parser`](crate::Parser).
///
/// Only [`Error::Token`] is fatal for the stream. The other variants report
/// a misuse or an unexpected document structure; how to continue after them
/// is up to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
	/// The token source reported malformed input or an I/O problem.
	#[error(transparent)]
	Token(#[from] TokenError),

	/// A convenience operation was invoked while the cursor was not in the
	/// state it requires.
	#[error("{operation} requires the cursor {requirement}")]
	Contract {
		operation: &'static str,
		requirement: &'static str,
	},

	/// The cursor reached an event which the operation cannot accept.
	#[error("expected {expected}, found {actual}")]
	UnexpectedEvent {
		expected: &'static str,
		actual: EventTriple,
	},

	/// Text was followed by something other than the end tag of the
	/// element whose text was requested.
	#[error("mixed content: expected EndTag after text, found {actual}")]
	MixedContent { actual: EventTriple },

	/// The cursor state does not match the expectation passed to
	/// [`Parser::expect`](crate::Parser::expect) or
	/// [`Parser::expect_all`](crate::Parser::expect_all).
	#[error("expected {expected}, found {actual}")]
	Mismatch {
		expected: EventTriple,
		actual: EventTriple,
	},

	/// A URL reference could not be resolved.
	#[error("invalid url: {0}")]
	Url(#[from] url::ParseError),
}

pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn event_triple_display() {
		let t = EventTriple::new(XmlEvent::StartTag, Some("urn:x"), Some("foo"));
		assert_eq!(t.to_string(), "StartTag {urn:x}foo");
		let t = EventTriple::new(XmlEvent::EndTag, None, Some("foo"));
		assert_eq!(t.to_string(), "EndTag foo");
		let t = EventTriple::new(XmlEvent::Text, None, None);
		assert_eq!(t.to_string(), "Text");
	}

	#[test]
	fn mismatch_names_both_sides() {
		let e = Error::Mismatch {
			expected: EventTriple::new(XmlEvent::StartTag, None, Some("feed")),
			actual: EventTriple::new(XmlEvent::StartTag, Some(""), Some("rss")),
		};
		assert_eq!(e.to_string(), "expected StartTag feed, found StartTag {}rss");
	}

	#[test]
	fn token_error_is_transparent() {
		let e: Error = TokenError::UnsupportedCharset("latin1".to_string()).into();
		assert_eq!(
			e.to_string(),
			"encoding \"latin1\" declared but no charset reader is configured"
		);
	}
}
