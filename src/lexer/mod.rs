//! Modal markup tokenizer.
//!
//! The lexer turns a markup string into a lazy, forward-only sequence of
//! [`Token`]s. It looks at one current byte plus a one-byte peek and keeps a
//! [`Mode`] that decides how the next characters are classified:
//!
//! - [`Mode::Content`]: character data and the start of markup (`<name`,
//!   `</name>`, `<!--`, `<![CDATA[`, `<!DOCTYPE ...>`, `<? ... ?>`).
//! - [`Mode::Tag`]: attribute names, `=`, quoted values, `>` and `/>`.
//! - [`Mode::Cdata`]: raw text up to `]]>`.
//! - [`Mode::Comment`]: raw text up to `-->`.
//!
//! No entity expansion or escaping is performed. To restart, construct a new
//! lexer over the same input.

mod token;

pub use token::{Token, TokenKind};

use crate::error::{SourceLocation, SyntaxError};
use crate::util::name::{is_name_char, is_name_start_char};

/// The lexer's current scanning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Between tags.
    Content,
    /// Inside a start tag, after `<name`.
    Tag,
    /// Inside `<![CDATA[ ... ]]>`.
    Cdata,
    /// Inside `<!-- ... -->`.
    Comment,
}

/// Markup tokenizer.
///
/// # Examples
///
/// ```
/// use xmlarbor::lexer::{Lexer, TokenKind};
///
/// let tokens = Lexer::new("<a x='1'/>").tokenize().unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::TagBegin,
///         TokenKind::AttributeName,
///         TokenKind::EqualSign,
///         TokenKind::AttributeValue,
///         TokenKind::TagEndAndClose,
///         TokenKind::EndOfFile,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    mode: Mode,
    /// Set once `END_OF_FILE` or an error has been handed out by the iterator.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`, in content mode.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            mode: Mode::Content,
            finished: false,
        }
    }

    /// Returns the current scanning mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the location of the current character.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` once all input has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Produces the next token.
    ///
    /// After the input is exhausted every call returns `END_OF_FILE`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] for input no token can describe: a `>` in
    /// character data, an unterminated attribute value, declaration, or
    /// processing instruction, or a malformed end tag.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        match self.mode {
            Mode::Content => self.content_mode(),
            Mode::Tag => self.tag_mode(),
            Mode::Cdata => Ok(self.cdata_mode()),
            Mode::Comment => Ok(self.comment_mode()),
        }
    }

    /// Tokenizes the remaining input, including the final `END_OF_FILE`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyntaxError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn content_mode(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        let start = self.location();

        let Some(ch) = self.current() else {
            return Ok(Token::new(TokenKind::EndOfFile, "", start));
        };

        if ch != b'<' {
            let begin = self.pos;
            while let Some(b) = self.current() {
                match b {
                    b'<' => break,
                    b'>' => {
                        return Err(SyntaxError::at(
                            "unexpected '>' in character data",
                            self.location(),
                        ))
                    }
                    _ => self.advance(),
                }
            }
            return Ok(Token::new(
                TokenKind::Content,
                &self.input[begin..self.pos],
                start,
            ));
        }

        match self.peek() {
            Some(b) if is_name_start_char(b) => {
                self.advance();
                let name = self.read_name();
                self.mode = Mode::Tag;
                Ok(Token::new(TokenKind::TagBegin, format!("<{name}"), start))
            }
            Some(b'/') => self.read_close_tag(start),
            Some(b'!') => {
                if self.looking_at(b"<!--") {
                    self.advance_by(4);
                    self.mode = Mode::Comment;
                    Ok(Token::new(TokenKind::CommentBegin, "<!--", start))
                } else if self.looking_at(b"<![CDATA[") {
                    self.advance_by(9);
                    self.mode = Mode::Cdata;
                    Ok(Token::new(TokenKind::CdataBegin, "<![CDATA[", start))
                } else {
                    self.read_declaration(start)
                }
            }
            Some(b'?') => self.read_processing_instruction(start),
            _ => {
                let begin = self.pos;
                self.advance();
                self.advance_char();
                Ok(Token::new(
                    TokenKind::Invalid,
                    &self.input[begin..self.pos],
                    start,
                ))
            }
        }
    }

    fn tag_mode(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        let start = self.location();

        let Some(ch) = self.current() else {
            return Ok(Token::new(TokenKind::EndOfFile, "", start));
        };

        match ch {
            b'>' => {
                self.advance();
                self.mode = Mode::Content;
                Ok(Token::new(TokenKind::TagEnd, ">", start))
            }
            b'/' => {
                if self.peek() == Some(b'>') {
                    self.advance_by(2);
                    self.mode = Mode::Content;
                    Ok(Token::new(TokenKind::TagEndAndClose, "/>", start))
                } else {
                    self.advance();
                    Ok(Token::new(TokenKind::Invalid, "/", start))
                }
            }
            b'=' => {
                self.advance();
                Ok(Token::new(TokenKind::EqualSign, "=", start))
            }
            b'"' | b'\'' => {
                self.advance();
                let value = self.read_until_byte(ch);
                if self.at_end() {
                    return Err(SyntaxError::at("unterminated attribute value", start));
                }
                self.advance();
                Ok(Token::new(TokenKind::AttributeValue, value, start))
            }
            _ if is_name_start_char(ch) => {
                let name = self.read_name();
                Ok(Token::new(TokenKind::AttributeName, name, start))
            }
            _ => {
                let begin = self.pos;
                self.advance_char();
                Ok(Token::new(
                    TokenKind::Invalid,
                    &self.input[begin..self.pos],
                    start,
                ))
            }
        }
    }

    fn cdata_mode(&mut self) -> Token {
        let start = self.location();

        if self.at_end() {
            return Token::new(TokenKind::EndOfFile, "", start);
        }

        if self.looking_at(b"]]>") {
            self.advance_by(3);
            self.mode = Mode::Content;
            return Token::new(TokenKind::CdataEnd, "]]>", start);
        }

        let text = self.read_until_seq(b"]]>");
        Token::new(TokenKind::Cdata, text, start)
    }

    fn comment_mode(&mut self) -> Token {
        let start = self.location();

        if self.at_end() {
            return Token::new(TokenKind::EndOfFile, "", start);
        }

        if self.looking_at(b"-->") {
            self.advance_by(3);
            self.mode = Mode::Content;
            return Token::new(TokenKind::CommentEnd, "-->", start);
        }

        // `--` may only appear as part of the terminator.
        if self.looking_at(b"--") {
            self.advance_by(2);
            return Token::new(TokenKind::Invalid, "--", start);
        }

        let text = self.read_until_seq(b"--");
        Token::new(TokenKind::Comment, text, start)
    }

    /// Reads `</name>` starting at `<`.
    fn read_close_tag(&mut self, start: SourceLocation) -> Result<Token, SyntaxError> {
        self.advance_by(2);
        if !self.current().is_some_and(is_name_start_char) {
            return Err(SyntaxError::at("expected element name after '</'", start));
        }
        let name = self.read_name();
        self.skip_whitespace();
        if self.current() != Some(b'>') {
            return Err(SyntaxError::at(
                format!("expected '>' to close end tag </{name}"),
                self.location(),
            ));
        }
        self.advance();
        Ok(Token::new(TokenKind::TagClose, format!("</{name}>"), start))
    }

    /// Reads a `<! ... >` declaration verbatim, allowing a bracketed internal
    /// subset and quoted literals to contain `>`.
    fn read_declaration(&mut self, start: SourceLocation) -> Result<Token, SyntaxError> {
        let begin = self.pos;
        self.advance_by(2);
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;

        loop {
            let Some(b) = self.current() else {
                return Err(SyntaxError::at("unterminated declaration", start));
            };
            self.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => break,
                _ => {}
            }
        }

        Ok(Token::new(
            TokenKind::Doctype,
            &self.input[begin..self.pos],
            start,
        ))
    }

    /// Reads a `<? ... ?>` processing instruction verbatim.
    fn read_processing_instruction(&mut self, start: SourceLocation) -> Result<Token, SyntaxError> {
        let begin = self.pos;
        self.advance_by(2);
        self.read_until_seq(b"?>");
        if self.at_end() {
            return Err(SyntaxError::at("unterminated processing instruction", start));
        }
        self.advance_by(2);
        Ok(Token::new(TokenKind::Pi, &self.input[begin..self.pos], start))
    }

    // --- Utility methods ---

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn looking_at(&self, seq: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(seq)
    }

    /// Advances by one byte, keeping line and column current.
    fn advance(&mut self) {
        let Some(b) = self.current() else {
            return;
        };
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            // Count columns in characters: skip UTF-8 continuation bytes.
            self.column += 1;
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Advances over one whole character.
    fn advance_char(&mut self) {
        let len = self.input[self.pos..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        self.advance_by(len);
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.advance();
        }
    }

    fn read_name(&mut self) -> &'a str {
        let begin = self.pos;
        while self.current().is_some_and(is_name_char) {
            self.advance();
        }
        &self.input[begin..self.pos]
    }

    /// Reads up to (not including) `stop` or the end of input.
    fn read_until_byte(&mut self, stop: u8) -> &'a str {
        let begin = self.pos;
        while self.current().is_some_and(|b| b != stop) {
            self.advance();
        }
        &self.input[begin..self.pos]
    }

    /// Reads up to (not including) `seq` or the end of input.
    fn read_until_seq(&mut self, seq: &[u8]) -> &'a str {
        let begin = self.pos;
        while !self.at_end() && !self.looking_at(seq) {
            self.advance();
        }
        &self.input[begin..self.pos]
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, SyntaxError>;

    /// Yields tokens up to and including `END_OF_FILE` (or the first error),
    /// then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(t) if t.kind != TokenKind::EndOfFile) {
            self.finished = true;
        }
        Some(result)
    }
}
