/*!
# Pull parser

The [`Parser`] turns [`Token`]s into cursor events. It keeps one token of
lookahead, tracks the element depth and the namespace declarations and
`xml:base` URIs in scope.
*/
use std::collections::HashMap;
use std::io::Read;

use url::Url;

use crate::error::{Result, TokenError};
use crate::event::XmlEvent;
use crate::source::{ParserOptions, XmlSource};
use crate::token::{Attribute, LocalName, Token, TokenRead};

mod base;
mod cursor;
mod namespaces;

use base::BaseStack;
use namespaces::NamespaceScopes;

/// Content of the lookahead slot.
#[derive(Debug)]
enum Lookahead {
	/// Nothing was read from the source yet.
	Unprimed,
	Token(Token),
	Eof,
	/// The source failed; the error is returned on every further pull.
	Failed(TokenError),
}

/**
# Pull parser over a token source

The parser is a cursor: each advancing call moves it onto one event, which
is then described by the accessor methods ([`Parser::event`],
[`Parser::name`], [`Parser::text`], ...).

There are two levels of advancing:

- [`Parser::next_token`] reports every token, including comments,
  processing instructions and directives, and distinguishes
  whitespace-only character data ([`XmlEvent::IgnorableWhitespace`]).
- [`Parser::next`] only stops on start tags, end tags, text and the end of
  the document. Adjacent character data (including CDATA sections) is
  merged into a single [`XmlEvent::Text`].

## Example

```
use xpp::{Parser, XmlEvent};

let mut p = Parser::new(&b"<feed><title>Hello <![CDATA[world]]></title></feed>"[..]);
assert_eq!(p.next_tag().unwrap(), XmlEvent::StartTag);
assert_eq!(p.name(), "feed");
assert_eq!(p.next_tag().unwrap(), XmlEvent::StartTag);
assert_eq!(p.next_text().unwrap(), "Hello world");
assert_eq!(p.next_tag().unwrap(), XmlEvent::EndTag);
assert_eq!(p.next().unwrap(), XmlEvent::EndDocument);
```

## Errors

Errors from the token source are fatal: the first one is returned from the
call which encountered it and from every later call which needs a token.
Errors of the convenience operations ([`Parser::next_text`],
[`Parser::expect`], ...) leave the parser usable.
*/
pub struct Parser<S> {
	source: S,
	lookahead: Lookahead,
	depth: usize,
	event: XmlEvent,
	name: LocalName,
	space: String,
	attrs: Vec<Attribute>,
	text: String,
	namespaces: NamespaceScopes,
	bases: BaseStack,
}

impl<'r> Parser<XmlSource<'r>> {
	/// Create a parser reading XML from `r` with default options.
	pub fn new<R: Read + 'r>(r: R) -> Self {
		Self::with_options(r, ParserOptions::default())
	}

	/// Create a parser reading XML from `r`.
	pub fn with_options<R: Read + 'r>(r: R, options: ParserOptions) -> Self {
		Self::wrap(XmlSource::new(r, options))
	}
}

impl<S: TokenRead> Parser<S> {
	/// Create a parser reading tokens from an arbitrary token source.
	///
	/// ```
	/// use xpp::{Parser, Token, XmlEvent};
	///
	/// let tokens = vec![
	/// 	Ok(Token::StartElement { space: String::new(), name: "a".into(), attrs: Vec::new() }),
	/// 	Ok(Token::EndElement { space: String::new(), name: "a".into() }),
	/// ];
	/// let mut p = Parser::wrap(tokens.into_iter());
	/// assert_eq!(p.next().unwrap(), XmlEvent::StartTag);
	/// assert_eq!(p.next().unwrap(), XmlEvent::EndTag);
	/// assert_eq!(p.next().unwrap(), XmlEvent::EndDocument);
	/// ```
	pub fn wrap(source: S) -> Self {
		Self {
			source,
			lookahead: Lookahead::Unprimed,
			depth: 0,
			event: XmlEvent::StartDocument,
			name: LocalName::new(),
			space: String::new(),
			attrs: Vec::new(),
			text: String::new(),
			namespaces: NamespaceScopes::new(),
			bases: BaseStack::new(),
		}
	}

	fn pull(&mut self) -> Lookahead {
		match self.source.read() {
			Ok(Some(tok)) => Lookahead::Token(tok),
			Ok(None) => Lookahead::Eof,
			Err(e) => Lookahead::Failed(e),
		}
	}

	fn reset(&mut self) {
		self.name = LocalName::new();
		self.space.clear();
		self.attrs.clear();
		self.text.clear();
	}

	/// Take the lookahead token and refill the slot.
	///
	/// End of input and errors stay in the slot.
	fn advance(&mut self) -> std::result::Result<Option<Token>, TokenError> {
		if let Lookahead::Unprimed = self.lookahead {
			self.lookahead = self.pull();
		}
		match &self.lookahead {
			Lookahead::Eof => return Ok(None),
			Lookahead::Failed(e) => return Err(e.clone()),
			Lookahead::Unprimed | Lookahead::Token(_) => (),
		}
		let next = self.pull();
		match std::mem::replace(&mut self.lookahead, next) {
			Lookahead::Token(tok) => Ok(Some(tok)),
			// excluded above
			_ => Ok(None),
		}
	}

	fn process(&mut self, tok: Token) {
		match tok {
			Token::StartElement { space, name, attrs } => {
				self.depth += 1;
				self.event = XmlEvent::StartTag;
				self.space = space;
				self.name = name;
				self.attrs = attrs;
				self.namespaces.push(self.depth, &self.attrs);
				self.bases.push(&self.attrs);
			}
			Token::EndElement { space, name } => {
				self.event = XmlEvent::EndTag;
				self.space = space;
				self.name = name;
				self.namespaces.pop(self.depth);
				self.bases.pop();
				self.depth = self.depth.saturating_sub(1);
			}
			Token::CharData(text) => {
				self.event = if text.trim().is_empty() {
					XmlEvent::IgnorableWhitespace
				} else {
					XmlEvent::Text
				};
				self.text = text;
			}
			Token::Comment(text) => {
				self.event = XmlEvent::Comment;
				self.text = text;
			}
			Token::ProcInst { target, data } => {
				self.event = XmlEvent::ProcessingInstruction;
				self.text = format!("{} {}", target, data);
			}
			Token::Directive(text) => {
				self.event = XmlEvent::Directive;
				self.text = text;
			}
		}
	}

	/// Advance to the next token and return its event kind.
	///
	/// Every token of the source is reported, one event per token. Once the
	/// source is exhausted, [`XmlEvent::EndDocument`] is returned, on this and
	/// every following call.
	pub fn next_token(&mut self) -> Result<XmlEvent> {
		self.reset();
		match self.advance()? {
			Some(tok) => self.process(tok),
			None => self.event = XmlEvent::EndDocument,
		}
		tracing::trace!(
			event = %self.event,
			depth = self.depth,
			name = %self.name,
			"consumed token"
		);
		Ok(self.event)
	}

	fn text_follows(&self) -> bool {
		matches!(self.lookahead, Lookahead::Token(Token::CharData(_)))
	}

	/// Advance to the next start tag, end tag, text run or end of document.
	///
	/// Comments, processing instructions and directives are skipped.
	/// Consecutive character data is merged into a single
	/// [`XmlEvent::Text`], even if it consists of whitespace only. Anything
	/// which is not character data ends the text run, including a skipped
	/// comment: `a<!-- -->b` yields two text events.
	pub fn next(&mut self) -> Result<XmlEvent> {
		loop {
			match self.next_token()? {
				XmlEvent::Comment | XmlEvent::ProcessingInstruction | XmlEvent::Directive => {
					continue
				}
				XmlEvent::Text | XmlEvent::IgnorableWhitespace => {
					let mut text = std::mem::take(&mut self.text);
					while self.text_follows() {
						self.next_token()?;
						text.push_str(&self.text);
					}
					self.text = text;
					self.event = XmlEvent::Text;
					return Ok(XmlEvent::Text);
				}
				ev => return Ok(ev),
			}
		}
	}

	/// Nesting depth of the current element.
	///
	/// The depth is 0 before the root start tag and after the root end tag.
	/// Processing a start tag increments it, processing an end tag
	/// decrements it.
	///
	/// ```
	/// let mut p = xpp::Parser::new(&b"<a><b/></a>"[..]);
	/// p.next().unwrap();
	/// assert_eq!(p.depth(), 1);
	/// p.next().unwrap();
	/// assert_eq!(p.depth(), 2);
	/// p.next().unwrap();
	/// assert_eq!(p.depth(), 1);
	/// ```
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Kind of the current event.
	pub fn event(&self) -> XmlEvent {
		self.event
	}

	/// Local name of the current start or end tag, empty otherwise.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Namespace URI of the current start or end tag, empty otherwise.
	pub fn space(&self) -> &str {
		&self.space
	}

	/// Attributes of the current start tag, in document order.
	pub fn attrs(&self) -> &[Attribute] {
		&self.attrs
	}

	/// Payload of the current event.
	///
	/// For processing instructions, this is the target and the data joined
	/// by a space. For directives, it is everything between `<!` and `>`.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Snapshot of the namespace declarations in scope, as URI to prefix
	/// map. The default namespace has the empty prefix.
	pub fn namespaces(&self) -> HashMap<String, String> {
		self.namespaces.snapshot()
	}

	/// Prefix bound to the namespace `uri` in the current scope.
	pub fn namespace_prefix(&self, uri: &str) -> Option<&str> {
		self.namespaces.prefix(uri)
	}

	/// `xml:base` URI in effect for the innermost open element.
	pub fn base(&self) -> Option<&Url> {
		self.bases.top()
	}

	/// Resolve a URL reference against [`Parser::base`].
	///
	/// The path of the base is treated as a directory. Without a base in
	/// effect, relative references resolve to `None`.
	///
	/// ```
	/// let mut p = xpp::Parser::new(&b"<feed xml:base='https://example.org/blog'/>"[..]);
	/// p.next().unwrap();
	/// let url = p.resolve_url("post/1").unwrap().unwrap();
	/// assert_eq!(url.as_str(), "https://example.org/blog/post/1");
	/// ```
	pub fn resolve_url(&self, reference: &str) -> Result<Option<Url>> {
		Ok(base::resolve(self.bases.top(), reference)?)
	}

	/// Access the token source.
	pub fn get_ref(&self) -> &S {
		&self.source
	}

	/// Consume the parser, returning the token source.
	///
	/// The lookahead token, if any, is lost.
	pub fn into_inner(self) -> S {
		self.source
	}
}

impl<S> std::fmt::Debug for Parser<S> {
	fn fmt<'f>(&self, f: &'f mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Parser")
			.field("lookahead", &self.lookahead)
			.field("depth", &self.depth)
			.field("event", &self.event)
			.field("name", &self.name)
			.field("space", &self.space)
			.field("text", &self.text)
			.finish_non_exhaustive()
	}
}

impl<S: TokenRead> From<S> for Parser<S> {
	fn from(source: S) -> Self {
		Self::wrap(source)
	}
}
