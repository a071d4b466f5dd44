/*!
# Default token source

[`XmlSource`] adapts a [`quick_xml::NsReader`] to the [`TokenRead`] trait.
The reader resolves namespace prefixes; this module converts its borrowed
events into owned [`Token`]s and implements the charset hook.
*/
use std::borrow::Cow;
use std::fmt;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::mem;
use std::str;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::TokenError;
use crate::token::{Attribute, Token, TokenRead, XMLNS_XML, XMLNS_XMLNS};

mod charset;

/// Function converting an input stream in the named charset into a UTF-8
/// stream.
pub type CharsetReader =
	dyn for<'a> Fn(&str, Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>>;

/**
# Options for the default token source

## Example

```
use xpp::{Parser, ParserOptions};

let options = ParserOptions::default()
	.strict(false)
	.charset_reader(|_charset, input| Ok(input));
let mut p = Parser::with_options(&b"<root/>"[..], options);
assert_eq!(p.next_tag().unwrap(), xpp::XmlEvent::StartTag);
```
*/
pub struct ParserOptions {
	/// Enforce well-formedness where the tokenizer can be lenient.
	///
	/// In strict mode, end tag names must match their start tag, unknown
	/// entities and invalid UTF-8 are errors, and duplicate attributes are
	/// rejected. In non-strict mode, mismatched end tags are accepted, text
	/// containing unknown entities is passed on without expanding any
	/// references and invalid UTF-8 is replaced.
	pub strict: bool,

	/// Decoder for documents declaring a charset other than UTF-8.
	pub charset_reader: Option<Box<CharsetReader>>,
}

impl ParserOptions {
	/// Set the [`ParserOptions::strict`] value.
	pub fn strict(mut self, v: bool) -> ParserOptions {
		self.strict = v;
		self
	}

	/// Set the [`ParserOptions::charset_reader`].
	///
	/// The function receives the charset label from the XML declaration and
	/// the complete input (including the declaration) and must return a
	/// reader producing UTF-8.
	pub fn charset_reader<F>(mut self, f: F) -> ParserOptions
	where
		F: for<'a> Fn(&str, Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> + 'static,
	{
		self.charset_reader = Some(Box::new(f));
		self
	}
}

impl Default for ParserOptions {
	/// Strict parsing, no charset reader.
	fn default() -> Self {
		Self {
			strict: true,
			charset_reader: None,
		}
	}
}

impl fmt::Debug for ParserOptions {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("ParserOptions")
			.field("strict", &self.strict)
			.field("charset_reader", &self.charset_reader.is_some())
			.finish()
	}
}

enum State<'r> {
	Pending(Box<dyn Read + 'r>),
	Reading(NsReader<Box<dyn BufRead + 'r>>),
	Failed,
}

/**
# Token source backed by `quick-xml`

Reads XML from an [`io::Read`] and provides [`Token`]s.

Nothing is read on construction. On the first call to [`TokenRead::read`],
the XML declaration is inspected and, if it names a charset other than
UTF-8, the input is routed through the configured
[`ParserOptions::charset_reader`].

Self-closing elements are reported as a start and an end token. CDATA
sections become character data, the XML declaration becomes a processing
instruction with the `xml` target and `<!DOCTYPE ...>` becomes a directive.

If opening the input fails, the error is returned once and the source
reports end of input afterwards. A [`Parser`](crate::Parser) caches the
first error, so this is not observable through it.
*/
pub struct XmlSource<'r> {
	state: State<'r>,
	options: ParserOptions,
	buf: Vec<u8>,
}

impl<'r> XmlSource<'r> {
	/// Wrap a reader with the given options.
	pub fn new<R: Read + 'r>(r: R, options: ParserOptions) -> Self {
		Self {
			state: State::Pending(Box::new(r)),
			options,
			buf: Vec::new(),
		}
	}

	/// Access the options.
	pub fn options(&self) -> &ParserOptions {
		&self.options
	}

	fn open(
		options: &ParserOptions,
		input: Box<dyn Read + 'r>,
	) -> Result<NsReader<Box<dyn BufRead + 'r>>, TokenError> {
		let mut input: Box<dyn BufRead + 'r> = Box::new(BufReader::new(input));
		let prolog = charset::read_prolog(&mut input)?;
		let declared = charset::declared_charset(&prolog);
		let replay = Cursor::new(prolog).chain(input);
		let stream: Box<dyn BufRead + 'r> = match declared {
			Some(label) if !charset::is_utf8(&label) => match options.charset_reader.as_ref() {
				Some(decode) => {
					tracing::debug!(charset = %label, "decoding input through charset reader");
					Box::new(BufReader::new(decode(&label, Box::new(replay))?))
				}
				None => return Err(TokenError::UnsupportedCharset(label)),
			},
			_ => Box::new(replay),
		};

		let mut reader = NsReader::from_reader(stream);
		let config = reader.config_mut();
		config.expand_empty_elements = true;
		config.trim_text_start = false;
		config.trim_text_end = false;
		config.check_end_names = options.strict;
		Ok(reader)
	}
}

fn syntax_error(position: u64, e: quick_xml::Error) -> TokenError {
	match e {
		quick_xml::Error::Io(e) => TokenError::Io(e),
		e => TokenError::Syntax {
			position,
			source: Arc::new(e),
		},
	}
}

fn decode_utf8(bytes: &[u8], strict: bool, position: u64) -> Result<String, TokenError> {
	match str::from_utf8(bytes) {
		Ok(s) => Ok(s.to_owned()),
		Err(_) if strict => Err(TokenError::InvalidUtf8 { position }),
		Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
	}
}

/// Expand references; in non-strict mode, fall back to the raw text if
/// expansion fails.
fn unescaped(
	result: quick_xml::Result<Cow<str>>,
	raw: &[u8],
	strict: bool,
	position: u64,
) -> Result<String, TokenError> {
	match result {
		Ok(s) => Ok(s.into_owned()),
		Err(e) if strict => Err(syntax_error(position, e)),
		Err(_) => decode_utf8(raw, false, position),
	}
}

fn namespace_name(ns: ResolveResult, strict: bool, position: u64) -> Result<String, TokenError> {
	match ns {
		ResolveResult::Bound(ns) => decode_utf8(ns.as_ref(), strict, position),
		ResolveResult::Unbound => Ok(String::new()),
		// undeclared prefix: report the prefix itself
		ResolveResult::Unknown(prefix) => decode_utf8(&prefix, strict, position),
	}
}

fn read_attributes<R>(
	reader: &NsReader<R>,
	start: &BytesStart,
	strict: bool,
	position: u64,
) -> Result<Vec<Attribute>, TokenError> {
	let mut result = Vec::new();
	let mut attributes = start.attributes();
	attributes.with_checks(strict);
	for attr in attributes {
		let attr = attr.map_err(|e| syntax_error(position, quick_xml::Error::from(e)))?;
		let name = decode_utf8(attr.key.local_name().as_ref(), strict, position)?;
		let space = match attr.key.prefix() {
			Some(prefix) if prefix.as_ref() == b"xmlns" => XMLNS_XMLNS.to_string(),
			Some(prefix) if prefix.as_ref() == b"xml" => XMLNS_XML.to_string(),
			Some(_) => {
				let (ns, _) = reader.resolve_attribute(attr.key);
				namespace_name(ns, strict, position)?
			}
			// un-prefixed attributes are never in a namespace
			None => String::new(),
		};
		let value = unescaped(attr.unescape_value(), &attr.value, strict, position)?;
		result.push(Attribute {
			space,
			name: name.into(),
			value,
		});
	}
	Ok(result)
}

impl<'r> TokenRead for XmlSource<'r> {
	fn read(&mut self) -> Result<Option<Token>, TokenError> {
		if let State::Pending(_) = self.state {
			let input = match mem::replace(&mut self.state, State::Failed) {
				State::Pending(input) => input,
				_ => unreachable!(),
			};
			self.state = State::Reading(Self::open(&self.options, input)?);
		}
		let reader = match &mut self.state {
			State::Reading(reader) => reader,
			_ => return Ok(None),
		};
		let strict = self.options.strict;

		loop {
			self.buf.clear();
			let position = reader.buffer_position() as u64;
			let (ns, event) = match reader.read_resolved_event_into(&mut self.buf) {
				Ok(v) => v,
				Err(e) => return Err(syntax_error(reader.error_position() as u64, e)),
			};
			// converting the namespace releases the borrow of the reader
			let space = namespace_name(ns, strict, position)?;

			let token = match event {
				Event::Start(e) => Token::StartElement {
					space,
					name: decode_utf8(e.local_name().as_ref(), strict, position)?.into(),
					attrs: read_attributes(reader, &e, strict, position)?,
				},
				Event::End(e) => Token::EndElement {
					space,
					name: decode_utf8(e.local_name().as_ref(), strict, position)?.into(),
				},
				// never emitted with expand_empty_elements
				Event::Empty(_) => continue,
				Event::Text(e) => {
					let text = unescaped(e.unescape(), &e, strict, position)?;
					if text.is_empty() {
						continue;
					}
					Token::CharData(text)
				}
				Event::CData(e) => Token::CharData(decode_utf8(&e, strict, position)?),
				Event::Comment(e) => Token::Comment(decode_utf8(&e, strict, position)?),
				Event::Decl(e) => {
					let content = decode_utf8(&e, strict, position)?;
					let data = content.strip_prefix("xml").unwrap_or(&content).trim_start();
					Token::ProcInst {
						target: "xml".to_string(),
						data: data.to_string(),
					}
				}
				Event::PI(e) => Token::ProcInst {
					target: decode_utf8(e.target(), strict, position)?,
					data: decode_utf8(e.content(), strict, position)?
						.trim_start()
						.to_string(),
				},
				Event::DocType(e) => {
					let decl = decode_utf8(&e, strict, position)?;
					Token::Directive(format!("DOCTYPE {}", decl.trim_start()))
				}
				Event::Eof => return Ok(None),
			};
			return Ok(Some(token));
		}
	}
}
