#[macro_use]
extern crate afl;

use xpp::{Error, Parser, ParserOptions, XmlEvent};

fn drive(data: &[u8], strict: bool) {
	let mut p = Parser::with_options(data, ParserOptions::default().strict(strict));
	let mut depth = 0usize;
	loop {
		match p.next_token() {
			Err(Error::Token(_)) => return,
			Err(e) => panic!("non-token error from next_token: {}", e),
			Ok(XmlEvent::EndDocument) => break,
			Ok(XmlEvent::StartTag) => {
				depth += 1;
				assert_eq!(p.depth(), depth);
				let _ = p.resolve_url("x");
			}
			Ok(XmlEvent::EndTag) => {
				depth = depth.saturating_sub(1);
				assert_eq!(p.depth(), depth);
			}
			Ok(_) => (),
		}
	}
	// terminal state is sticky
	assert_eq!(p.next().unwrap(), XmlEvent::EndDocument);
}

fn main() {
	fuzz!(|data: &[u8]| {
		drive(data, true);
		drive(data, false);
	});
}
