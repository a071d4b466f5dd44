use std::io::{self, BufRead, Read};

const DECL_START: &[u8] = b"<?xml";

/// Read the XML declaration, if present, from the start of `input`.
///
/// The returned bytes have been consumed from `input` and must be replayed
/// in front of it. If the input does not start with an XML declaration, at
/// most the first five bytes are consumed.
pub(super) fn read_prolog<R: BufRead>(input: &mut R) -> io::Result<Vec<u8>> {
	let mut prolog = Vec::with_capacity(64);
	input.by_ref().take(DECL_START.len() as u64).read_to_end(&mut prolog)?;
	if prolog != DECL_START {
		return Ok(prolog);
	}
	input.read_until(b'>', &mut prolog)?;
	Ok(prolog)
}

fn trim_start(mut s: &[u8]) -> &[u8] {
	while let Some((first, rest)) = s.split_first() {
		if !first.is_ascii_whitespace() {
			break;
		}
		s = rest;
	}
	s
}

/// Extract the `encoding` pseudo-attribute from an XML declaration.
pub(super) fn declared_charset(prolog: &[u8]) -> Option<String> {
	let decl = prolog.strip_prefix(DECL_START)?;
	// `<?xml-stylesheet` and friends are processing instructions, not the
	// declaration
	if !decl.first()?.is_ascii_whitespace() {
		return None;
	}
	let at = decl.windows(8).position(|w| w == b"encoding")?;
	let rest = trim_start(&decl[at + 8..]);
	let rest = trim_start(rest.strip_prefix(b"=")?);
	let (&quote, rest) = rest.split_first()?;
	if quote != b'"' && quote != b'\'' {
		return None;
	}
	let end = rest.iter().position(|b| *b == quote)?;
	Some(String::from_utf8_lossy(&rest[..end]).into_owned())
}

/// Return true if `label` names a charset which needs no decoding.
pub(super) fn is_utf8(label: &str) -> bool {
	label.eq_ignore_ascii_case("utf-8") || label.eq_ignore_ascii_case("utf8")
}
