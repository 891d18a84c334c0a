//! DOM-style XML document loading, id lookup and serialization.
//!
//! `xmldoc` is a thin convenience layer over the `xmlparser` tokenizer: it
//! loads XML from files, readers, strings, or URLs into an owned
//! [`Document`] tree, finds elements by their `id` attribute, and renders
//! nodes back to XML text.
//!
//! ```rust
//! use xmldoc::Document;
//!
//! let doc = Document::parse_str(
//!     r#"<root><tag id="yahoo"><tag id="a" value="1"/></tag></root>"#,
//! )
//! .unwrap();
//!
//! let element = doc.get_element_by_id("yahoo").unwrap();
//! for tag in element.elements_by_name("tag") {
//!     assert_eq!(tag.attribute("id"), Some("a"));
//!     assert_eq!(tag.attribute("value"), Some("1"));
//! }
//! ```
//!
//! Deliberate scope limits:
//! - Namespace-aware processing is disabled: `prefix:local` names are stored
//!   verbatim and never resolved.
//! - DTD sections are consumed and discarded; there is no ID typing, so the
//!   attribute named `id` is the designated id attribute for lookups.
//! - Lookup behavior with duplicate id values is documented
//!   non-determinism: the first match in depth-first document order.

mod document;
mod error;
mod loader;
mod node;
mod report;
mod to_xml;

pub use document::{Declaration, Document};
pub use error::{ParseError, ParseErrorKind, XmlError, XmlResult};
pub use loader::ParserOptions;
pub use node::{Attribute, Element, Node, ProcessingInstruction};
pub use report::{DEFAULT_ERROR_TITLE, error_xml, error_xml_full, error_xml_with_source};
pub use to_xml::xml_string;
