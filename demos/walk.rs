//! Print the events of the XML document on stdin, one per line.
//!
//! Set `RUST_LOG=xpp=trace` to see every consumed token.
use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xpp::{Error, Parser, XmlEvent};

fn main() {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "xpp=info".into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
		.init();

	let stdin = io::stdin();
	let mut p = Parser::new(stdin.lock());
	loop {
		let ev = match p.next_token() {
			Ok(XmlEvent::EndDocument) => break,
			Ok(ev) => ev,
			Err(Error::Token(e)) => panic!("invalid XML on input: {}", e),
			Err(e) => panic!("{}", e),
		};
		let indent = "  ".repeat(p.depth());
		match ev {
			XmlEvent::StartTag => {
				print!("{}<{{{}}}{}", indent, p.space(), p.name());
				for attr in p.attrs() {
					print!(" {{{}}}{}={:?}", attr.space, attr.name, attr.value);
				}
				match p.base() {
					Some(base) => println!("> base={}", base),
					None => println!(">"),
				}
			}
			XmlEvent::EndTag => println!("{}  </{{{}}}{}>", indent, p.space(), p.name()),
			ev => println!("{}  {}: {:?}", indent, ev, p.text()),
		}
	}
}
