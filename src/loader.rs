//! Loader entry points: every way a [`Document`] can be constructed.
//!
//! All of them funnel into the same parse path, configured by a shared,
//! process-wide immutable [`ParserOptions`] value.
use crate::{
    document::Document,
    error::{XmlError, XmlResult},
    node::Element,
};
use std::{fs, io::Read, path::Path, sync::LazyLock, time::Duration};
use tracing::debug;

/// Parser settings shared by every loader entry point.
///
/// Namespace handling has no toggle here: it is disabled, and `prefix:local`
/// names pass through verbatim.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Trim surrounding whitespace from text nodes and drop the ones that
    /// become empty.
    pub trim_text: bool,

    /// Keep comment nodes in the tree.
    pub keep_comments: bool,
}
impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            trim_text: true,
            keep_comments: true,
        }
    }
}
impl ParserOptions {
    /// The process-wide default configuration, constructed once.
    #[must_use]
    pub fn shared() -> &'static ParserOptions {
        static SHARED: LazyLock<ParserOptions> = LazyLock::new(ParserOptions::default);
        &SHARED
    }
}

impl Document {
    /// Create an empty document with no root element, for callers who build
    /// the tree programmatically.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a deep copy of the given element as its root.
    ///
    /// The new tree is independent of the original node.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        Self {
            declaration: None,
            prolog: vec![],
            root: Some(element.clone()),
            epilog: vec![],
        }
    }

    /// Load and parse the file at `path`.
    ///
    /// # Errors
    /// Returns [`XmlError::FileAccess`] if the file cannot be opened or read,
    /// [`XmlError::Parse`](crate::XmlError::Parse) if its content is not
    /// well-formed XML, and [`XmlError::InvalidArgument`] for an empty path.
    pub fn from_file(path: impl AsRef<Path>) -> XmlResult<Self> {
        Self::from_file_with(path, ParserOptions::shared())
    }

    /// Load and parse the file at `path` with explicit options.
    ///
    /// # Errors
    /// Same failure modes as [`Document::from_file`].
    pub fn from_file_with(path: impl AsRef<Path>, options: &ParserOptions) -> XmlResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(XmlError::InvalidArgument("file path is empty"));
        }

        debug!(path = %path.display(), "loading XML document from file");
        let source = fs::read_to_string(path).map_err(|source| XmlError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_str_with(&source, options)
    }

    /// Read `reader` to the end and parse the contents. The reader is
    /// consumed by the call.
    ///
    /// # Errors
    /// Returns [`XmlError::Io`] if the reader fails or yields bytes that are
    /// not UTF-8, [`XmlError::Parse`](crate::XmlError::Parse) if the content
    /// is not well-formed XML.
    pub fn from_reader(reader: impl Read) -> XmlResult<Self> {
        Self::from_reader_with(reader, ParserOptions::shared())
    }

    /// Read `reader` to the end and parse the contents, with explicit
    /// options.
    ///
    /// # Errors
    /// Same failure modes as [`Document::from_reader`].
    pub fn from_reader_with(mut reader: impl Read, options: &ParserOptions) -> XmlResult<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;

        debug!(bytes = source.len(), "parsing XML document from reader");
        Self::parse_str_with(&source, options)
    }

    /// Fetch `url` over HTTP(S) and parse the response body.
    ///
    /// `proxy` is a proxy specification such as `localhost:3128` or
    /// `http://host:port`; `None` connects directly. `timeout` bounds each
    /// read on the connection.
    ///
    /// # Errors
    /// Returns [`XmlError::Network`] on connection, timeout, or HTTP-status
    /// failure, [`XmlError::Configuration`] if the proxy specification cannot
    /// be parsed, [`XmlError::Parse`](crate::XmlError::Parse) if the body is
    /// not well-formed XML, and [`XmlError::InvalidArgument`] for an empty
    /// URL.
    pub fn from_url(url: &str, proxy: Option<&str>, timeout: Duration) -> XmlResult<Self> {
        if url.is_empty() {
            return Err(XmlError::InvalidArgument("url is empty"));
        }

        debug!(url, ?timeout, "loading XML document from url");
        let mut builder = ureq::AgentBuilder::new().timeout_read(timeout);
        if let Some(spec) = proxy {
            let proxy = ureq::Proxy::new(spec)
                .map_err(|e| XmlError::Configuration(format!("invalid proxy `{spec}`: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let response = builder.build().get(url).call().map_err(|e| XmlError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut source = String::new();
        response
            .into_reader()
            .read_to_string(&mut source)
            .map_err(|e| XmlError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Self::parse_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_options_default() {
        let options = ParserOptions::default();
        assert!(options.trim_text);
        assert!(options.keep_comments);
    }

    #[test]
    fn test_shared_options_match_default() {
        let shared = ParserOptions::shared();
        assert!(shared.trim_text);
        assert!(shared.keep_comments);
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.root.is_none());
        assert!(doc.declaration.is_none());
    }

    #[test]
    fn test_from_element_deep_copies() {
        let mut element = Element::new("root");
        element.set_attribute("id", "r");

        let doc = Document::from_element(&element);
        element.set_attribute("id", "changed");

        assert_eq!(doc.root.unwrap().attribute("id"), Some("r"));
    }

    #[test]
    fn test_from_reader() {
        let doc = Document::from_reader(std::io::Cursor::new(b"<a/>".as_slice())).unwrap();
        assert_eq!(doc.root.unwrap().name, "a");
    }

    #[test]
    fn test_from_reader_invalid_utf8() {
        let err = Document::from_reader(std::io::Cursor::new(vec![0xffu8, 0xfe])).unwrap_err();
        assert!(matches!(err, XmlError::Io(_)));
    }

    #[test]
    fn test_from_file_empty_path() {
        let err = Document::from_file("").unwrap_err();
        assert!(matches!(err, XmlError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_url_empty() {
        let err = Document::from_url("", None, Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, XmlError::InvalidArgument(_)));
    }
}
