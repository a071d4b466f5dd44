use std::fmt;

/**
# Kind of the event the cursor is positioned on

The term *Event* is borrowed from the pull-parsing APIs of other languages.
Each call to [`Parser::next_token`](crate::Parser::next_token) moves the
cursor onto exactly one event; [`Parser::next`](crate::Parser::next) only
ever stops on [`XmlEvent::StartTag`], [`XmlEvent::EndTag`],
[`XmlEvent::Text`] and [`XmlEvent::EndDocument`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlEvent {
	/// Initial state, before anything was read.
	StartDocument,
	/// Terminal state, returned forever once the input is exhausted.
	EndDocument,
	StartTag,
	EndTag,
	/// Character data containing at least one non-whitespace character, or
	/// a coalesced text run returned by [`Parser::next`](crate::Parser::next).
	Text,
	Comment,
	ProcessingInstruction,
	Directive,
	/// Character data consisting of whitespace only.
	IgnorableWhitespace,
}

impl XmlEvent {
	/// Display name of the event kind.
	///
	/// ```
	/// assert_eq!(xpp::XmlEvent::StartTag.name(), "StartTag");
	/// ```
	pub fn name(&self) -> &'static str {
		match self {
			Self::StartDocument => "StartDocument",
			Self::EndDocument => "EndDocument",
			Self::StartTag => "StartTag",
			Self::EndTag => "EndTag",
			Self::Text => "Text",
			Self::Comment => "Comment",
			Self::ProcessingInstruction => "ProcessingInstruction",
			Self::Directive => "Directive",
			Self::IgnorableWhitespace => "IgnorableWhitespace",
		}
	}

	/// Return true for the two kinds produced from character data.
	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text | Self::IgnorableWhitespace)
	}
}

impl fmt::Display for XmlEvent {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}
