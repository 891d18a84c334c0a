//! XML error-report fragments.
//!
//! These helpers assemble a fixed-shape `<errNode/>` string by plain
//! concatenation. Nothing is escaped: a message containing `"` or `<`
//! corrupts the fragment. The output is best-effort diagnostic text for
//! humans, never a security-relevant encoding.
//!
//! ```rust
//! let fragment = xmldoc::error_xml("connection lost");
//! assert!(fragment.contains(r#"errMsg="connection lost""#));
//! ```

/// Title used when the caller does not provide one.
pub const DEFAULT_ERROR_TITLE: &str = "System Error";

/// The declaration prefixed to every fragment, and to every
/// [`xml_string`](crate::xml_string) rendering. The `gb2312` label is a
/// fixed historical choice.
pub(crate) const GB2312_DECLARATION: &str = r#"<?xml version="1.0" encoding="gb2312" ?>"#;

/// Build an error fragment with the default title and no source identifier:
/// `<errNode title="System Error" errMsg="..."/>`
#[must_use]
pub fn error_xml(err_msg: &str) -> String {
    format!(r#"{GB2312_DECLARATION}<errNode title="{DEFAULT_ERROR_TITLE}" errMsg="{err_msg}"/>"#)
}

/// Build an error fragment with the default title and an error-source
/// identifier, usually a type name.
#[must_use]
pub fn error_xml_with_source(err_msg: &str, err_source: &str) -> String {
    format!(
        r#"{GB2312_DECLARATION}<errNode title="{DEFAULT_ERROR_TITLE}" errMsg="{err_msg}" errSource="{err_source}"/>"#
    )
}

/// Build an error fragment with an explicit title, message, and error-source
/// identifier.
#[must_use]
pub fn error_xml_full(title: &str, err_msg: &str, err_source: &str) -> String {
    format!(
        r#"{GB2312_DECLARATION}<errNode title="{title}" errMsg="{err_msg}" errSource="{err_source}"/>"#
    )
}
