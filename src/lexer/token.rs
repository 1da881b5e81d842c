//! Token definitions produced by the markup lexer.

use std::fmt;

use crate::error::SourceLocation;

/// The kind of a lexical token.
///
/// The comment on each variant shows an example lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<name`
    TagBegin,
    /// `>`
    TagEnd,
    /// `</name>`
    TagClose,
    /// `/>`
    TagEndAndClose,
    /// `name` inside a tag
    AttributeName,
    /// `=`
    EqualSign,
    /// quoted text inside a tag, quotes stripped
    AttributeValue,
    /// character data between tags
    Content,
    /// `<!--`
    CommentBegin,
    /// comment text
    Comment,
    /// `-->`
    CommentEnd,
    /// `<![CDATA[`
    CdataBegin,
    /// CDATA text
    Cdata,
    /// `]]>`
    CdataEnd,
    /// `<? ... ?>`
    Pi,
    /// `<!DOCTYPE ... >`
    Doctype,
    /// A character sequence that is not valid in the current mode.
    Invalid,
    /// End of input.
    EndOfFile,
}

impl TokenKind {
    /// Returns the stable upper-case name of this token kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TagBegin => "TAG_BEGIN",
            Self::TagEnd => "TAG_END",
            Self::TagClose => "TAG_CLOSE",
            Self::TagEndAndClose => "TAG_END_AND_CLOSE",
            Self::AttributeName => "ATTRIBUTE_NAME",
            Self::EqualSign => "EQUAL_SIGN",
            Self::AttributeValue => "ATTRIBUTE_VALUE",
            Self::Content => "CONTENT",
            Self::CommentBegin => "COMMENT_BEGIN",
            Self::Comment => "COMMENT",
            Self::CommentEnd => "COMMENT_END",
            Self::CdataBegin => "CDATA_BEGIN",
            Self::Cdata => "CDATA",
            Self::CdataEnd => "CDATA_END",
            Self::Pi => "PROCESSING_INSTRUCTION",
            Self::Doctype => "DOCTYPE",
            Self::Invalid => "INVALID",
            Self::EndOfFile => "END_OF_FILE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token: its kind, its text, and where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The token text. Delimiters are kept for tag tokens (`<a`, `</a>`)
    /// and stripped for attribute values.
    pub value: String,
    /// Location of the first character of the token.
    pub location: SourceLocation,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\": \"{}\"", self.kind, self.value)
    }
}
