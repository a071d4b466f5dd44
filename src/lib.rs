/*!
# Pull-style XML cursor

This crate provides a cursor over an XML document which is advanced
explicitly by the caller. It is meant for code which walks documents of a
known shape (feeds, configuration files, API responses) without building a
tree first.

## Features

* One event per call, with the cursor state readable through accessors
* Text runs (including CDATA sections) merged into single events
* Namespace declarations in scope available at every element
* `xml:base` tracking and resolution of relative URLs
* Convenience operations for skipping elements and reading text content
* Tokenizing via `quick-xml`, or any custom [`TokenRead`]
* Optional charset conversion for documents not encoded in UTF-8

## Example

```
use xpp::{Parser, XmlEvent};

let doc = b"<?xml version='1.0'?>
<feed xmlns='http://www.w3.org/2005/Atom' xml:base='https://example.org/'>
	<title>Example</title>
	<entry><link href='posts/1'/></entry>
</feed>";
let mut p = Parser::new(&doc[..]);
p.next_tag().unwrap();
p.expect(XmlEvent::StartTag, Some("feed")).unwrap();
assert_eq!(p.namespace_prefix("http://www.w3.org/2005/Atom"), Some(""));

p.next_tag().unwrap();
assert_eq!(p.next_text().unwrap(), "Example");

p.next_tag().unwrap();
p.next_tag().unwrap();
assert!(p.matches(XmlEvent::StartTag, Some("link")));
let href = p.attribute("href").unwrap().to_string();
assert_eq!(
	p.resolve_url(&href).unwrap().unwrap().as_str(),
	"https://example.org/posts/1",
);
```

## Error handling

Malformed input ends the document: the [`TokenError`] is returned by the
call which ran into it and by every later call. Misuse of the convenience
operations and unexpected document structure are reported as the other
[`Error`] variants and leave the parser usable.
*/
pub mod error;
mod event;
mod parser;
mod source;
pub mod token;


#[doc(inline)]
pub use error::{Error, EventTriple, Result, TokenError};
pub use event::XmlEvent;
pub use parser::Parser;
pub use source::{CharsetReader, ParserOptions, XmlSource};
#[doc(inline)]
pub use token::{Attribute, Token, TokenRead, XMLNS_XML, XMLNS_XMLNS};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
