//! Recursive descent over the token stream.

use crate::error::{Error, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::tracing_macros::{debug, trace};
use crate::tree::{Document, NodeId, NodeKind};

use super::ParseOptions;

/// The core parser.
pub(crate) struct XmlParser<'a> {
    lexer: Lexer<'a>,
    /// The token being examined.
    current: Token,
    /// One token of lookahead past `current`.
    peek: Token,
    /// The document being built.
    doc: Document,
    max_depth: u32,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            peek,
            doc: Document::new(),
            max_depth: options.max_depth,
        })
    }

    /// Main parse entry point. Parses the entire document.
    pub fn parse(mut self) -> Result<Document, Error> {
        debug!(max_depth = self.max_depth, "parsing document");
        let root = self.doc.root();

        // A processing instruction is only accepted as the very first token.
        if self.current.kind == TokenKind::Pi {
            let prolog = std::mem::take(&mut self.current.value);
            self.doc.set_prolog(Some(prolog));
            self.advance()?;
        }

        loop {
            match self.current.kind {
                TokenKind::EndOfFile => break,
                TokenKind::TagBegin => {
                    self.parse_element(root, 1)?;
                }
                TokenKind::Doctype => {
                    let doctype = std::mem::take(&mut self.current.value);
                    self.doc.set_doctype(doctype)?;
                    self.advance()?;
                }
                TokenKind::CommentBegin => self.parse_comment(root)?,
                _ => {
                    return Err(self.unexpected("at document level").into());
                }
            }
        }

        if self.doc.root_element().is_none() {
            return Err(SyntaxError::at("document has no root element", self.current.location).into());
        }

        debug!(nodes = self.doc.node_count(), "parsed document");
        Ok(self.doc)
    }

    /// Parses an element starting at its `TAG_BEGIN` and attaches it to
    /// `parent`.
    fn parse_element(&mut self, parent: NodeId, depth: u32) -> Result<NodeId, Error> {
        let begin = self.expect(TokenKind::TagBegin)?;
        let name = begin
            .value
            .strip_prefix('<')
            .unwrap_or(&begin.value)
            .to_string();

        if depth > self.max_depth {
            return Err(SyntaxError::at("maximum nesting depth exceeded", begin.location).into());
        }

        let element = self.doc.create_node(NodeKind::element(name.as_str()));
        self.doc.append_child(parent, element)?;
        trace!(name = %name, depth, "element");

        // Attributes up to `>` or `/>`.
        loop {
            match self.current.kind {
                TokenKind::TagEnd => {
                    self.advance()?;
                    break;
                }
                TokenKind::TagEndAndClose => {
                    self.advance()?;
                    return Ok(element);
                }
                TokenKind::AttributeName => self.parse_attribute(element, &name)?,
                _ => return Err(self.expected(TokenKind::AttributeName).into()),
            }
        }

        // Content up to the matching close tag.
        loop {
            match self.current.kind {
                TokenKind::Content => {
                    let content = std::mem::take(&mut self.current.value);
                    let text = self.doc.create_node(NodeKind::Text { content });
                    self.doc.append_child(element, text)?;
                    self.advance()?;
                }
                TokenKind::TagBegin => {
                    self.parse_element(element, depth + 1)?;
                }
                TokenKind::CdataBegin => self.parse_cdata(element)?,
                TokenKind::CommentBegin => self.parse_comment(element)?,
                TokenKind::TagClose => {
                    let close = &self.current.value;
                    let close_name = close
                        .strip_prefix("</")
                        .and_then(|s| s.strip_suffix('>'))
                        .unwrap_or(close);
                    if close_name != name {
                        return Err(SyntaxError::at(
                            format!("mismatched closing tag: expected </{name}>, found {close}"),
                            self.current.location,
                        )
                        .into());
                    }
                    self.advance()?;
                    return Ok(element);
                }
                TokenKind::EndOfFile => {
                    return Err(SyntaxError::at(
                        format!("unterminated element <{name}>"),
                        begin.location,
                    )
                    .into());
                }
                _ => return Err(self.unexpected(&format!("in content of <{name}>")).into()),
            }
        }
    }

    /// Parses `name = "value"` and stores it on `element`.
    fn parse_attribute(&mut self, element: NodeId, element_name: &str) -> Result<(), Error> {
        let attr = std::mem::take(&mut self.current.value);
        let location = self.current.location;
        if self.peek.kind != TokenKind::EqualSign {
            return Err(SyntaxError::at(
                format!("expected {}, found {}", TokenKind::EqualSign, self.peek.kind),
                self.peek.location,
            )
            .into());
        }
        self.advance()?;
        self.advance()?;
        let value = self.expect(TokenKind::AttributeValue)?.value;

        if self.doc.has_attribute(element, &attr) {
            return Err(SyntaxError::at(
                format!("element '{element_name}' has repeated attribute '{attr}'"),
                location,
            )
            .into());
        }
        self.doc.set_attribute(element, attr, value)?;
        Ok(())
    }

    /// Parses `<![CDATA[ ... ]]>`, joining chunked section text.
    fn parse_cdata(&mut self, parent: NodeId) -> Result<(), Error> {
        let begin = self.expect(TokenKind::CdataBegin)?;
        let mut content = String::new();
        loop {
            match self.current.kind {
                TokenKind::Cdata => {
                    content.push_str(&self.current.value);
                    self.advance()?;
                }
                TokenKind::CdataEnd => {
                    self.advance()?;
                    break;
                }
                TokenKind::EndOfFile => {
                    return Err(SyntaxError::at("unterminated CDATA section", begin.location).into());
                }
                _ => return Err(self.expected(TokenKind::CdataEnd).into()),
            }
        }
        let node = self.doc.create_node(NodeKind::CData { content });
        self.doc.append_child(parent, node)?;
        Ok(())
    }

    /// Parses `<!-- ... -->`, joining chunked comment text.
    fn parse_comment(&mut self, parent: NodeId) -> Result<(), Error> {
        let begin = self.expect(TokenKind::CommentBegin)?;
        let mut content = String::new();
        loop {
            match self.current.kind {
                TokenKind::Comment => {
                    content.push_str(&self.current.value);
                    self.advance()?;
                }
                TokenKind::CommentEnd => {
                    self.advance()?;
                    break;
                }
                TokenKind::Invalid => {
                    return Err(SyntaxError::at(
                        format!("'{}' is not allowed inside a comment", self.current.value),
                        self.current.location,
                    )
                    .into());
                }
                TokenKind::EndOfFile => {
                    return Err(SyntaxError::at("unterminated comment", begin.location).into());
                }
                _ => return Err(self.expected(TokenKind::CommentEnd).into()),
            }
        }
        let node = self.doc.create_node(NodeKind::Comment { content });
        self.doc.append_child(parent, node)?;
        Ok(())
    }

    // --- Token plumbing ---

    /// Shifts the lookahead window by one token.
    fn advance(&mut self) -> Result<(), SyntaxError> {
        let next = self.lexer.next_token()?;
        self.current = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    /// Consumes the current token if it has the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.current.kind != kind {
            return Err(self.expected(kind));
        }
        let next = self.lexer.next_token()?;
        let consumed = std::mem::replace(&mut self.current, std::mem::replace(&mut self.peek, next));
        Ok(consumed)
    }

    fn expected(&self, kind: TokenKind) -> SyntaxError {
        SyntaxError::at(
            format!("expected {kind}, found {}", self.current.kind),
            self.current.location,
        )
    }

    fn unexpected(&self, context: &str) -> SyntaxError {
        SyntaxError::at(
            format!("unexpected {} {context}", self.current.kind),
            self.current.location,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::parse_str_with_options;
    use crate::tree::NodeType;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Document {
        Document::parse_str(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn parse_err(input: &str) -> Error {
        match Document::parse_str(input) {
            Ok(_) => panic!("expected parse of {input:?} to fail"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_parse_empty_element() {
        let doc = parse("<root/>");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.node_name(root), "root");
        assert_eq!(doc.first_child(root), None);
    }

    #[test]
    fn test_parse_element_with_text() {
        let doc = parse("<greeting>Hello, world!</greeting>");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.node_name(root), "greeting");
        assert_eq!(doc.text_content(root), "Hello, world!");
    }

    #[test]
    fn test_parse_nested_elements() {
        let doc = parse("<a><b><c/></b></a>");
        let a = doc.root_element().unwrap();
        let b = doc.first_child(a).unwrap();
        assert_eq!(doc.node_name(b), "b");
        let c = doc.first_child(b).unwrap();
        assert_eq!(doc.node_name(c), "c");
        assert_eq!(doc.parent(c), Some(b));
    }

    #[test]
    fn test_parse_attributes() {
        let doc = parse("<div id=\"main\" class='big'/>");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.attribute(root, "id"), Some("main"));
        assert_eq!(doc.attribute(root, "class"), Some("big"));
    }

    #[test]
    fn test_parse_whitespace_in_tag() {
        let doc = parse("<a\n  x = \"1\"\n  y='2'  >t</a  >");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.attributes(root).count(), 2);
        assert_eq!(doc.text_content(root), "t");
    }

    #[test]
    fn test_parse_repeated_attribute() {
        let err = parse_err("<a x=\"1\" x=\"2\"/>");
        assert!(err.is_syntax());
        assert_eq!(err.message(), "element 'a' has repeated attribute 'x'");
    }

    #[test]
    fn test_parse_missing_equal_sign() {
        let err = parse_err("<a x \"1\"/>");
        assert_eq!(err.message(), "expected EQUAL_SIGN, found ATTRIBUTE_VALUE");
    }

    #[test]
    fn test_parse_missing_attribute_value() {
        let err = parse_err("<a x=/>");
        assert_eq!(err.message(), "expected ATTRIBUTE_VALUE, found TAG_END_AND_CLOSE");
    }

    #[test]
    fn test_parse_mixed_content() {
        let doc = parse("<p>Hello <b>world</b> again</p>");
        let p = doc.root_element().unwrap();
        let kinds: Vec<NodeType> = doc
            .children(p)
            .filter_map(|c| doc.node_type(c))
            .collect();
        assert_eq!(kinds, vec![NodeType::Text, NodeType::Element, NodeType::Text]);
        assert_eq!(doc.text_content(p), "Hello  world again");
    }

    #[test]
    fn test_whitespace_between_tags_produces_no_text() {
        let doc = parse("<a>\n  <b/>\n  <c/>\n</a>");
        let a = doc.root_element().unwrap();
        assert_eq!(doc.child_count(a), 2);
    }

    #[test]
    fn test_parse_comment() {
        let doc = parse("<a><!--c1--></a>");
        let a = doc.root_element().unwrap();
        let c = doc.first_child(a).unwrap();
        assert_eq!(doc.node_type(c), Some(NodeType::Comment));
        assert_eq!(doc.node_value(c), Some("c1"));
    }

    #[test]
    fn test_parse_comment_with_single_dashes() {
        let doc = parse("<a><!-- a-b - c --></a>");
        let c = doc.first_child(doc.root_element().unwrap()).unwrap();
        assert_eq!(doc.node_value(c), Some(" a-b - c "));
    }

    #[test]
    fn test_parse_double_dash_in_comment() {
        let err = parse_err("<a><!-- a -- b --></a>");
        assert_eq!(err.message(), "'--' is not allowed inside a comment");
    }

    #[test]
    fn test_parse_cdata() {
        let doc = parse("<a><![CDATA[x < y && ]] z]]></a>");
        let c = doc.first_child(doc.root_element().unwrap()).unwrap();
        assert_eq!(doc.node_type(c), Some(NodeType::CDataSection));
        assert_eq!(doc.node_value(c), Some("x < y && ]] z"));
    }

    #[test]
    fn test_parse_empty_cdata() {
        let doc = parse("<a><![CDATA[]]></a>");
        let c = doc.first_child(doc.root_element().unwrap()).unwrap();
        assert_eq!(doc.node_value(c), Some(""));
    }

    #[test]
    fn test_parse_prolog_and_doctype() {
        let doc = parse(
            "<?xml version=\"1.0\"?>\n<!DOCTYPE a [ <!ELEMENT a ANY> ]>\n<!-- top -->\n<a/>",
        );
        assert_eq!(doc.prolog(), Some("<?xml version=\"1.0\"?>"));
        assert_eq!(doc.doctype(), Some("<!DOCTYPE a [ <!ELEMENT a ANY> ]>"));
        assert_eq!(doc.child_count(doc.root()), 2);
    }

    #[test]
    fn test_parse_late_processing_instruction() {
        let err = parse_err("<a/><?pi x?>");
        assert!(err.is_syntax());
        assert_eq!(err.message(), "unexpected PROCESSING_INSTRUCTION at document level");
    }

    #[test]
    fn test_parse_second_doctype() {
        let err = parse_err("<!DOCTYPE a><!DOCTYPE b><a/>");
        assert!(err.is_dom());
    }

    #[test]
    fn test_parse_second_root() {
        let err = parse_err("<a/><b/>");
        assert!(err.is_dom());
        assert_eq!(err.message(), "document can't have more than one root element");
    }

    #[test]
    fn test_parse_top_level_text() {
        let err = parse_err("<a/>tail");
        assert_eq!(err.message(), "unexpected CONTENT at document level");
    }

    #[test]
    fn test_parse_error_mismatched_tags() {
        let err = parse_err("<a></b>");
        assert!(err.is_syntax());
        assert_eq!(err.message(), "mismatched closing tag: expected </a>, found </b>");
    }

    #[test]
    fn test_parse_error_unexpected_eof() {
        let err = parse_err("<a><b></b>");
        assert_eq!(err.message(), "unterminated element <a>");
        let err = parse_err("<a x='1'");
        assert_eq!(err.message(), "expected ATTRIBUTE_NAME, found END_OF_FILE");
    }

    #[test]
    fn test_parse_error_no_root() {
        for input in ["", "   ", "<!-- only -->", "<?xml version=\"1.0\"?>"] {
            let err = parse_err(input);
            assert_eq!(err.message(), "document has no root element");
        }
    }

    #[test]
    fn test_parse_error_location() {
        let err = parse_err("<a>\n  <b></c>\n</a>");
        match err {
            Error::Syntax(e) => {
                let loc = e.location.unwrap();
                assert_eq!((loc.line, loc.column), (2, 6));
            }
            Error::Dom(e) => panic!("unexpected DOM error: {e}"),
        }
    }

    #[test]
    fn test_parse_gt_in_text() {
        let err = parse_err("<a>1 > 0</a>");
        assert_eq!(err.message(), "unexpected '>' in character data");
    }

    #[test]
    fn test_max_depth() {
        let opts = ParseOptions::default().max_depth(2);
        assert!(parse_str_with_options("<a><b/></a>", &opts).is_ok());
        let err = parse_str_with_options("<a><b><c/></b></a>", &opts).unwrap_err();
        assert_eq!(err.message(), "maximum nesting depth exceeded");
    }

    #[test]
    fn test_deep_nesting_rejected_by_default() {
        let depth = 1000;
        let input = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let err = parse_err(&input);
        assert_eq!(err.message(), "maximum nesting depth exceeded");
    }

    #[test]
    fn test_name_chars() {
        let doc = parse("<my-el.v2 a:b='1' _c='2'/>");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.node_name(root), "my-el.v2");
        assert_eq!(doc.attribute(root, "a:b"), Some("1"));
    }
}
