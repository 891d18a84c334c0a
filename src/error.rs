//! Error handling for document loading and serialization
use std::path::PathBuf;

/// A result type for document operations, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while loading, querying, or serializing a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// A required input was empty or missing
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A file path could not be opened or read
    #[error("cannot access `{}`: {source}", path.display())]
    FileAccess {
        /// The path that could not be accessed
        path: PathBuf,

        /// The underlying IO failure
        source: std::io::Error,
    },

    /// IO error on a source that carries no path, such as a reader
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL source could not be fetched
    #[error("cannot fetch `{url}`: {reason}")]
    Network {
        /// The URL that could not be fetched
        url: String,

        /// Human-readable description of the connection failure
        reason: String,
    },

    /// The document is not well-formed XML
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A loader configuration could not be constructed
    #[error("invalid loader configuration: {0}")]
    Configuration(String),
}

/// A well-formedness failure, carrying the position of the offending input.
#[derive(Debug)]
pub struct ParseError {
    /// The kind of failure
    pub kind: ParseErrorKind,

    /// 1-based row of the offending token
    pub row: u32,

    /// 1-based column of the offending token
    pub col: u32,
}
impl ParseError {
    pub(crate) fn at(source: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let (row, col) = position_in_text(offset, source);
        Self { kind, row, col }
    }

    pub(crate) fn syntax(error: xmlparser::Error) -> Self {
        let pos = error.pos();
        Self {
            kind: ParseErrorKind::Syntax(error),
            row: pos.row,
            col: pos.col,
        }
    }
}
impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            // Tokenizer errors already render their own position
            ParseErrorKind::Syntax(e) => write!(f, "{e}"),
            kind => write!(f, "{kind} at {}:{}", self.row, self.col),
        }
    }
}
impl std::error::Error for ParseError {}

/// The kind of well-formedness failure.
#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    /// The XML declaration was not first
    #[error("the <?xml ?> declaration must appear at the start of the document")]
    DeclarationNotFirst,

    /// A tag in the document was not closed
    #[error("unclosed tag: {0}")]
    UnclosedTag(String),

    /// A closing tag did not match the open element
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// Name of the element left open
        expected: String,

        /// Name the closing tag carried instead
        found: String,
    },

    /// Input ended without a root element
    #[error("document has no root element")]
    NoRootElement,

    /// A token appeared somewhere it is not allowed
    #[error("unexpected {token} {context}")]
    Unexpected {
        /// Human-readable token label
        token: &'static str,

        /// Where the token appeared
        context: &'static str,
    },

    /// A character reference could not be decoded
    #[error("invalid character reference: {0}")]
    Entity(String),

    /// Token-level XML syntax error
    #[error("{0}")]
    Syntax(xmlparser::Error),
}

/// Calculates the 1-based row and column of a byte offset in the source text.
pub(crate) fn position_in_text(offset: usize, source: &str) -> (u32, u32) {
    let mut row = 1;
    let mut col = 1;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            row += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_in_text() {
        let source = "line1\nline2\nline3";
        assert_eq!(position_in_text(0, source), (1, 1));
        assert_eq!(position_in_text(6, source), (2, 1));
        assert_eq!(position_in_text(8, source), (2, 3));
        assert_eq!(position_in_text(source.len(), source), (3, 6));
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::at(
            "<a><b></a>",
            6,
            ParseErrorKind::MismatchedClosingTag {
                expected: "b".to_string(),
                found: "a".to_string(),
            },
        );
        let message = error.to_string();
        assert!(message.contains("mismatched closing tag"));
        assert!(message.contains("at 1:7"));
    }

    #[test]
    fn test_file_access_display() {
        let error = XmlError::FileAccess {
            path: PathBuf::from("/no/such/file.xml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/no/such/file.xml"));
    }
}
