//! The document tree, and the token-stream assembly behind every loader
//! entry point.
use crate::{
    error::{ParseError, ParseErrorKind, XmlResult},
    loader::ParserOptions,
    node::{Attribute, Element, Node, ProcessingInstruction},
    to_xml,
};
use std::io::Write;
use xmlparser::{ElementEnd, Token, Tokenizer};

/// An XML document parsed into an owned tree.
///
/// The tree contains:
/// - The XML declaration node, if present
/// - Any items before the root element (comments, processing instructions)
/// - The root element itself, absent only for documents created empty
/// - Any items after the root element (comments, processing instructions)
///
/// A parsed document always has a root element; only [`Document::new`]
/// produces a rootless tree, for callers who build one programmatically.
///
/// The tree is an ordinary owned value: concurrent readers are fine,
/// concurrent mutation needs external synchronization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// The `<?xml ?>` declaration, if present.
    pub declaration: Option<Declaration>,

    /// Nodes occurring before the root element.
    pub prolog: Vec<Node>,

    /// The root of the tree.
    pub root: Option<Element>,

    /// Nodes occurring after the root element.
    pub epilog: Vec<Node>,
}
impl Document {
    /// Parse a document from the given source string, using the shared
    /// default [`ParserOptions`].
    ///
    /// # Errors
    /// Returns [`XmlError::Parse`](crate::XmlError::Parse) if the source is
    /// not well-formed XML.
    ///
    /// # Example
    /// ```rust
    /// use xmldoc::Document;
    ///
    /// let doc = Document::parse_str("<test><test2>test</test2></test>").unwrap();
    /// assert_eq!(doc.root.unwrap().name, "test");
    /// ```
    pub fn parse_str(source: &str) -> XmlResult<Self> {
        Self::parse_str_with(source, ParserOptions::shared())
    }

    /// Parse a document from the given source string with explicit options.
    ///
    /// # Errors
    /// Returns [`XmlError::Parse`](crate::XmlError::Parse) if the source is
    /// not well-formed XML.
    pub fn parse_str_with(source: &str, options: &ParserOptions) -> XmlResult<Self> {
        Ok(Self::parse(source, options)?)
    }

    /// Returns the element whose `id` attribute equals the given value, or
    /// `None` if there is none.
    ///
    /// With duplicate id values, the first match in depth-first document
    /// order is returned; see [`Element::get_element_by_id`].
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.root.as_ref().and_then(|root| root.get_element_by_id(id))
    }

    /// Render the document as a compact XML string.
    ///
    /// The document's own declaration is emitted when present; nothing is
    /// indented.
    ///
    /// # Errors
    /// Can fail if a string in the document cannot be entity encoded.
    pub fn to_xml(&self) -> XmlResult<String> {
        let mut buffer = vec![];
        self.write_xml(&mut buffer)?;

        let text = String::from_utf8(buffer).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to convert to UTF-8: {e}"),
            )
        })?;
        Ok(text)
    }

    /// Write the document as compact XML using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Can fail if the writer fails, or if a string in the document cannot be
    /// entity encoded.
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> XmlResult<()> {
        to_xml::write_document(writer, self)?;
        Ok(())
    }

    #[expect(clippy::too_many_lines, reason = "State machine; what did you expect")]
    fn parse(src: &str, options: &ParserOptions) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::from(src);

        let mut state = ParserState::Prolog;
        let mut stack: Vec<Element> = vec![];

        let mut declaration = None;
        let mut prolog = vec![];
        let mut epilog = vec![];
        let mut root: Option<Element> = None;

        while let Some(token) = tokenizer.next() {
            let token = token.map_err(ParseError::syntax)?;

            match state {
                ParserState::Prolog => match token {
                    Token::Declaration {
                        version,
                        encoding,
                        standalone,
                        span,
                    } => {
                        if !prolog.is_empty() {
                            return Err(ParseError::at(
                                src,
                                span.start(),
                                ParseErrorKind::DeclarationNotFirst,
                            ));
                        }

                        declaration = Some(Declaration {
                            version: version.as_str().to_string(),
                            encoding: encoding.map(|s| s.as_str().to_string()),
                            standalone,
                        });
                    }

                    Token::Comment { text, .. } => {
                        if options.keep_comments {
                            prolog.push(Node::Comment(text.as_str().to_string()));
                        }
                    }

                    Token::ProcessingInstruction {
                        target, content, ..
                    } => {
                        prolog.push(Node::ProcessingInstruction(ProcessingInstruction {
                            target: target.as_str().to_string(),
                            content: content.map(|s| s.as_str().to_string()),
                        }));
                    }

                    //
                    // DTD processing is out of scope; the section is consumed
                    // and discarded
                    Token::EmptyDtd { .. } => {}
                    Token::DtdStart { .. } => {
                        while let Some(dtd_token) = tokenizer.next() {
                            if matches!(
                                dtd_token.map_err(ParseError::syntax)?,
                                Token::DtdEnd { .. }
                            ) {
                                break;
                            }
                        }
                    }

                    Token::ElementStart { prefix, local, .. } => {
                        stack.push(Element::new(qualified_name(
                            prefix.as_str(),
                            local.as_str(),
                        )));
                        state = ParserState::TagAttributes;
                    }

                    Token::Text { text } => {
                        if !text.as_str().trim().is_empty() {
                            return Err(unexpected(src, &token, "before the root element"));
                        }
                    }

                    _ => return Err(unexpected(src, &token, "before the root element")),
                },

                ParserState::TagAttributes => match token {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        span,
                    } => {
                        let Some(element) = stack.last_mut() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        let value = decode_text(value.as_str(), src, span.start())?;
                        element.attributes.push(Attribute::new(
                            qualified_name(prefix.as_str(), local.as_str()),
                            value,
                        ));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Open,
                        ..
                    } => {
                        state = ParserState::TagChildren;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Empty,
                        ..
                    } => {
                        let Some(element) = stack.pop() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Element(element));
                            state = ParserState::TagChildren;
                        } else {
                            root = Some(element);
                            state = ParserState::Epilog;
                        }
                    }

                    Token::Text { .. } => {
                        // ignore
                    }

                    _ => return Err(unexpected(src, &token, "in a start tag")),
                },

                ParserState::TagChildren => match token {
                    Token::ElementStart { prefix, local, .. } => {
                        stack.push(Element::new(qualified_name(
                            prefix.as_str(),
                            local.as_str(),
                        )));
                        state = ParserState::TagAttributes;
                    }

                    Token::Text { text } => {
                        let Some(element) = stack.last_mut() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        let raw = text.as_str();
                        let value = if options.trim_text { raw.trim() } else { raw };
                        if !value.is_empty() {
                            let value = decode_text(value, src, text.start())?;
                            element.children.push(Node::Text(value));
                        }
                    }

                    Token::Cdata { text, .. } => {
                        let Some(element) = stack.last_mut() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        element.children.push(Node::Cdata(text.as_str().to_string()));
                    }

                    Token::Comment { text, .. } => {
                        if options.keep_comments {
                            let Some(element) = stack.last_mut() else {
                                return Err(unexpected(src, &token, "outside of a tag"));
                            };

                            element
                                .children
                                .push(Node::Comment(text.as_str().to_string()));
                        }
                    }

                    Token::ProcessingInstruction {
                        target, content, ..
                    } => {
                        let Some(element) = stack.last_mut() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        element
                            .children
                            .push(Node::ProcessingInstruction(ProcessingInstruction {
                                target: target.as_str().to_string(),
                                content: content.map(|s| s.as_str().to_string()),
                            }));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        span,
                    } => {
                        let Some(element) = stack.pop() else {
                            return Err(unexpected(src, &token, "outside of a tag"));
                        };

                        let closing = qualified_name(prefix.as_str(), local.as_str());
                        if element.name != closing {
                            return Err(ParseError::at(
                                src,
                                span.start(),
                                ParseErrorKind::MismatchedClosingTag {
                                    expected: element.name,
                                    found: closing,
                                },
                            ));
                        }

                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Element(element));
                        } else {
                            root = Some(element);
                            state = ParserState::Epilog;
                        }
                    }

                    _ => return Err(unexpected(src, &token, "inside an element")),
                },

                ParserState::Epilog => match token {
                    Token::Comment { text, .. } => {
                        if options.keep_comments {
                            epilog.push(Node::Comment(text.as_str().to_string()));
                        }
                    }

                    Token::ProcessingInstruction {
                        target, content, ..
                    } => {
                        epilog.push(Node::ProcessingInstruction(ProcessingInstruction {
                            target: target.as_str().to_string(),
                            content: content.map(|s| s.as_str().to_string()),
                        }));
                    }

                    Token::Text { text } => {
                        if !text.as_str().trim().is_empty() {
                            return Err(unexpected(src, &token, "after the root element"));
                        }
                    }

                    _ => return Err(unexpected(src, &token, "after the root element")),
                },
            }
        }

        if let Some(unclosed) = stack.pop() {
            return Err(ParseError::at(
                src,
                src.len(),
                ParseErrorKind::UnclosedTag(unclosed.name),
            ));
        }

        match root {
            Some(root) => Ok(Self {
                declaration,
                prolog,
                root: Some(root),
                epilog,
            }),
            None => Err(ParseError::at(src, src.len(), ParseErrorKind::NoRootElement)),
        }
    }
}

impl std::str::FromStr for Document {
    type Err = crate::XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The XML declaration node.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The version of the XML declaration.
    pub version: String,

    /// The encoding of the XML declaration.
    pub encoding: Option<String>,

    /// The standalone attribute of the XML declaration.
    pub standalone: Option<bool>,
}
impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: None,
            standalone: None,
        }
    }
}

#[derive(PartialEq, Debug)]
enum ParserState {
    Prolog,
    TagAttributes,
    TagChildren,
    Epilog,
}

fn unexpected(src: &str, token: &Token<'_>, context: &'static str) -> ParseError {
    ParseError::at(
        src,
        token_offset(token),
        ParseErrorKind::Unexpected {
            token: token_label(token),
            context,
        },
    )
}

fn decode_text(value: &str, src: &str, offset: usize) -> Result<String, ParseError> {
    to_xml::decode_entities(value)
        .map_err(|e| ParseError::at(src, offset, ParseErrorKind::Entity(e.to_string())))
}

fn qualified_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

fn token_offset(token: &Token<'_>) -> usize {
    match token {
        Token::Declaration { span, .. }
        | Token::ProcessingInstruction { span, .. }
        | Token::Comment { span, .. }
        | Token::DtdStart { span, .. }
        | Token::EmptyDtd { span, .. }
        | Token::EntityDeclaration { span, .. }
        | Token::DtdEnd { span }
        | Token::ElementStart { span, .. }
        | Token::Attribute { span, .. }
        | Token::ElementEnd { span, .. }
        | Token::Cdata { span, .. } => span.start(),
        Token::Text { text } => text.start(),
    }
}

fn token_label(token: &Token<'_>) -> &'static str {
    match token {
        Token::Declaration { .. } => "XML declaration",
        Token::ProcessingInstruction { .. } => "processing instruction",
        Token::Comment { .. } => "comment",
        Token::DtdStart { .. } | Token::EmptyDtd { .. } | Token::DtdEnd { .. } => {
            "document type declaration"
        }
        Token::EntityDeclaration { .. } => "entity declaration",
        Token::ElementStart { .. } => "start tag",
        Token::Attribute { .. } => "attribute",
        Token::ElementEnd { .. } => "end tag",
        Token::Text { .. } => "text",
        Token::Cdata { .. } => "CDATA section",
    }
}
