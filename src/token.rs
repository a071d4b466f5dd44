/*!
# Primitive lexical tokens

This module holds the vocabulary spoken between a token source (the
tokenizer) and the [`Parser`](crate::Parser). Tokens map one-to-one onto the
constructs of an XML document; the parser turns them into cursor events.
*/
use smartstring::alias::String as SmartString;

use crate::error::TokenError;

/// XML core namespace URI (for the `xml:` prefix)
pub const XMLNS_XML: &str = "http://www.w3.org/XML/1998/namespace";
/// XML namespace URI (for the `xmlns:` prefix)
pub const XMLNS_XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Local part of an element or attribute name.
pub type LocalName = SmartString;

/// A single attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// Namespace URI of the attribute, empty for un-prefixed attributes.
	///
	/// Namespace declarations (`xmlns:foo`) carry [`XMLNS_XMLNS`] here.
	pub space: String,
	/// Local part of the attribute name.
	pub name: LocalName,
	/// Attribute value with references expanded.
	pub value: String,
}

impl Attribute {
	/// Construct a new attribute triple.
	pub fn new<S: Into<String>, N: Into<LocalName>, V: Into<String>>(
		space: S,
		name: N,
		value: V,
	) -> Self {
		Self {
			space: space.into(),
			name: name.into(),
			value: value.into(),
		}
	}

	/// Return true if this attribute declares a namespace prefix
	/// (`xmlns:prefix="uri"`) or the default namespace (`xmlns="uri"`).
	pub fn is_namespace_declaration(&self) -> bool {
		self.space == XMLNS_XMLNS
			|| self.space == "xmlns"
			|| (self.space.is_empty() && self.name.as_str() == "xmlns")
	}
}

/**
A single primitive XML token

Tokens are what a [`TokenRead`] hands to the parser. In contrast to the
events of the parser, no coalescing happens on this level: a text node
interrupted by a CDATA section arrives as several [`Token::CharData`]
tokens.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
	/// An element start tag. Self-closing elements are reported as a start
	/// tag immediately followed by an [`Token::EndElement`].
	StartElement {
		/// Resolved namespace URI, empty if the element is not namespaced.
		space: String,
		/// Local part of the element name.
		name: LocalName,
		/// Attributes in document order, including namespace declarations.
		attrs: Vec<Attribute>,
	},

	/// An element end tag.
	EndElement {
		/// Resolved namespace URI, empty if the element is not namespaced.
		space: String,
		/// Local part of the element name.
		name: LocalName,
	},

	/// Character data, with references expanded and CDATA unwrapped.
	CharData(String),

	/// Comment text, without the `<!--` and `-->` delimiters.
	Comment(String),

	/// A processing instruction. The XML declaration is reported as a
	/// processing instruction with the target `xml`.
	ProcInst {
		/// Target of the instruction.
		target: String,
		/// Instruction data, without leading whitespace.
		data: String,
	},

	/// Anything between `<!` and `>` which is neither a comment nor a CDATA
	/// section, e.g. `DOCTYPE html`.
	Directive(String),
}

/**
# Read individual tokens from a source

Analogously to [`std::io::Read`], this trait provides individual tokens to
the [`Parser`](crate::Parser).

Any iterator over `Result<Token, TokenError>` is a token source, which is
handy for feeding synthetic token streams.
*/
pub trait TokenRead {
	/// Return a single token from the source.
	///
	/// If the end of input has been reached without errors, `None` is
	/// returned.
	///
	/// Malformed input is reported as a [`TokenError`], never as a token.
	fn read(&mut self) -> Result<Option<Token>, TokenError>;
}

impl<I: Iterator<Item = Result<Token, TokenError>>> TokenRead for I {
	fn read(&mut self) -> Result<Option<Token>, TokenError> {
		self.next().transpose()
	}
}
