//! XML output module
//!
//! Use [`Document::to_xml`] for whole documents; [`xml_string`] renders a
//! single node behind a degrade-to-string contract.
use crate::{
    document::{Declaration, Document},
    node::{Element, Node},
    report,
};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, decode, encode};

/// Flatten a document as a compact XML string using the given writer.
///
/// # Errors
/// This function will return an error if the writer fails, or if a string in
/// the document cannot be entity encoded.
pub(crate) fn write_document(
    writer: &mut dyn std::io::Write,
    document: &Document,
) -> std::io::Result<()> {
    if let Some(declaration) = &document.declaration {
        write_declaration(writer, declaration)?;
    }

    for item in &document.prolog {
        write_node(writer, item)?;
    }

    if let Some(root) = &document.root {
        write_element(writer, root)?;
    }

    for item in &document.epilog {
        write_node(writer, item)?;
    }

    Ok(())
}

/// Render a single node and its subtree as an XML string.
///
/// The output configuration is fixed: XML method, version 1.0, no
/// indentation, and a `gb2312` encoding label in the leading declaration.
/// The label is a fixed historical choice kept for compatibility with
/// existing consumers of these fragments; the returned value itself is an
/// ordinary Rust string.
///
/// This entry point never fails: if the node cannot be serialized, the
/// returned string is the [`report`](crate::report) error fragment
/// describing the failure instead of the node. Use [`Document::to_xml`] for
/// `Result`-based serialization.
#[must_use]
pub fn xml_string(node: &Node) -> String {
    let mut buffer: Vec<u8> = report::GB2312_DECLARATION.as_bytes().to_vec();

    match write_node(&mut buffer, node) {
        Ok(()) => match String::from_utf8(buffer) {
            Ok(text) => text,
            Err(e) => report::error_xml(&format!("cannot render the node as XML: {e}")),
        },
        Err(e) => report::error_xml(&format!("cannot render the node as XML: {e}")),
    }
}

fn write_declaration(
    writer: &mut dyn std::io::Write,
    declaration: &Declaration,
) -> std::io::Result<()> {
    let version = encode_entities(&declaration.version)?;
    write!(writer, r#"<?xml version="{version}""#)?;

    if let Some(encoding) = &declaration.encoding {
        let encoding = encode_entities(encoding)?;
        write!(writer, r#" encoding="{encoding}""#)?;
    }

    if let Some(standalone) = declaration.standalone {
        let standalone = if standalone { "yes" } else { "no" };
        write!(writer, r#" standalone="{standalone}""#)?;
    }

    write!(writer, "?>")?;
    Ok(())
}

fn write_node(writer: &mut dyn std::io::Write, node: &Node) -> std::io::Result<()> {
    write_tasks(writer, WriteTask::Open(node))
}

fn write_element(writer: &mut dyn std::io::Write, element: &Element) -> std::io::Result<()> {
    write_tasks(writer, WriteTask::OpenElement(element))
}

//
// Uses an explicit task stack rather than recursion, so deeply nested
// documents cannot overflow the call stack
fn write_tasks(writer: &mut dyn std::io::Write, first: WriteTask<'_>) -> std::io::Result<()> {
    let mut stack = vec![first];

    while let Some(task) = stack.pop() {
        match task {
            WriteTask::Close(name) => {
                write!(writer, "</{name}>")?;
            }

            WriteTask::Open(Node::Element(element)) => {
                stack.push(WriteTask::OpenElement(element));
            }

            WriteTask::OpenElement(element) => {
                let name = encode_entities(&element.name)?;
                write!(writer, "<{name}")?;

                for attr in &element.attributes {
                    let attr_name = encode_entities(&attr.name)?;
                    let attr_value = encode_entities(&attr.value)?;
                    write!(writer, r#" {attr_name}="{attr_value}""#)?;
                }

                if element.children.is_empty() {
                    write!(writer, "/>")?;
                    continue;
                }

                write!(writer, ">")?;
                stack.push(WriteTask::Close(name));
                for child in element.children.iter().rev() {
                    stack.push(WriteTask::Open(child));
                }
            }

            WriteTask::Open(Node::Text(text)) => {
                let text = encode_entities(text)?;
                write!(writer, "{text}")?;
            }

            WriteTask::Open(Node::Cdata(content)) => {
                write!(writer, "<![CDATA[{content}]]>")?;
            }

            WriteTask::Open(Node::Comment(comment)) => {
                write!(writer, "<!--{comment}-->")?;
            }

            WriteTask::Open(Node::ProcessingInstruction(pi)) => {
                write!(writer, "<?{}", pi.target)?;
                if let Some(content) = &pi.content {
                    write!(writer, " {content}")?;
                }
                write!(writer, "?>")?;
            }
        }
    }

    Ok(())
}

enum WriteTask<'src> {
    Open(&'src Node),
    OpenElement(&'src Element),
    Close(String),
}

/// Encode the XML special characters of `input` as entities.
pub(crate) fn encode_entities(input: &str) -> std::io::Result<String> {
    encode(
        input.as_bytes(),
        &EncodeType::NamedOrHex,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Decode entity and character references in `input`.
pub(crate) fn decode_entities(input: &str) -> std::io::Result<String> {
    decode(input.as_bytes())
        .to_string()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attribute, Element};

    #[test]
    fn test_write_document_compact() {
        let doc = Document::parse_str("<test>\n\t<test2>test</test2>\n</test>").unwrap();
        assert_eq!(doc.to_xml().unwrap(), "<test><test2>test</test2></test>");
    }

    #[test]
    fn test_write_document_with_declaration() {
        let doc =
            Document::parse_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><r/>"#)
                .unwrap();
        assert_eq!(
            doc.to_xml().unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><r/>"#
        );
    }

    #[test]
    fn test_empty_element_self_closes() {
        let mut element = Element::new("root");
        element.attributes.push(Attribute::new("id", "123"));

        let doc = Document::from_element(&element);
        assert_eq!(doc.to_xml().unwrap(), r#"<root id="123"/>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut element = Element::new("a");
        element.push_child(Node::Text("1 < 2 & 3".to_string()));

        let doc = Document::from_element(&element);
        assert_eq!(doc.to_xml().unwrap(), "<a>1 &lt; 2 &amp; 3</a>");
    }

    #[test]
    fn test_cdata_not_escaped() {
        let mut element = Element::new("a");
        element.push_child(Node::Cdata("1 < 2".to_string()));

        let doc = Document::from_element(&element);
        assert_eq!(doc.to_xml().unwrap(), "<a><![CDATA[1 < 2]]></a>");
    }

    #[test]
    fn test_xml_string_declaration() {
        let node = Node::Element(Element::new("tag"));
        assert_eq!(
            xml_string(&node),
            r#"<?xml version="1.0" encoding="gb2312" ?><tag/>"#
        );
    }

    #[test]
    fn test_xml_string_subtree() {
        let mut inner = Element::new("tag");
        inner.set_attribute("id", "a");
        inner.set_attribute("value", "1");

        let mut outer = Element::new("tag");
        outer.set_attribute("id", "yahoo");
        outer.push_child(Node::Element(inner));

        assert_eq!(
            xml_string(&Node::Element(outer)),
            r#"<?xml version="1.0" encoding="gb2312" ?><tag id="yahoo"><tag id="a" value="1"/></tag>"#
        );
    }

    #[test]
    fn test_roundtrip_preserves_content() {
        let source = r#"<root a="1"><child>fish &amp; chips</child><child/></root>"#;
        let first = Document::parse_str(source).unwrap();
        let second = Document::parse_str(&first.to_xml().unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
