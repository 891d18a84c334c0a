//! The types of nodes that make up a document tree.
use std::io::Write;

/// A node in the document tree. Can be any of:
/// - `Element` - a tag node
/// - `Text` - character data between tags
/// - `Cdata` - a CDATA section
/// - `Comment` - a comment node
/// - `ProcessingInstruction` - a processing instruction node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element node.
    Element(Element),

    /// A text node.
    Text(String),

    /// A CDATA node.
    Cdata(String),

    /// A comment node.
    Comment(String),

    /// A processing instruction node.
    ProcessingInstruction(ProcessingInstruction),
}
impl Node {
    /// Returns the text value carried by this node, if any.
    ///
    /// Elements have no value of their own; their character data lives in
    /// child text nodes.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Text(s) | Node::Cdata(s) | Node::Comment(s) => Some(s),
            Node::ProcessingInstruction(pi) => pi.content.as_deref(),
        }
    }

    /// Returns the child nodes; empty for anything but an element.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            _ => &[],
        }
    }

    /// Borrows this node as an element, if it is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Writes one `depth:value` line per value-carrying node in this subtree,
    /// depth-first, with the depth zero-padded to two digits.
    ///
    /// Debug utility only; the line format is not a stable API.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn dump_values(&self, depth: usize, out: &mut dyn Write) -> std::io::Result<()> {
        if let Some(value) = self.value() {
            writeln!(out, "{depth:02}:{value}")?;
        }
        for child in self.children() {
            child.dump_values(depth + 1, out)?;
        }
        Ok(())
    }

    /// Convenience wrapper around [`Node::dump_values`] that writes to stdout.
    pub fn print_values(&self, depth: usize) {
        let _ = self.dump_values(depth, &mut std::io::stdout().lock());
    }
}

/// An element node with a name, attributes, and children:
/// `<name attr="value">...</name>`
///
/// Names are stored verbatim: a `prefix:local` name keeps its prefix as part
/// of the name and is never resolved against namespace declarations.
///
/// Duplicate attributes are allowed (searches use the last attribute with the
/// same name).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The qualified tag name.
    pub name: String,

    /// The attributes of the element, in document order.
    pub attributes: Vec<Attribute>,

    /// The child nodes of the element, in document order.
    pub children: Vec<Node>,
}
impl Element {
    /// Create an element with the given name and no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            children: vec![],
        }
    }

    /// Get an attribute value by name.
    ///
    /// Searches the attributes in reverse order, so the last attribute with
    /// the same name is returned.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value, replacing the attribute that lookups currently
    /// see, or appending a new one.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attribute) = self.attributes.iter_mut().rev().find(|a| a.name == name) {
            attribute.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Append a child node.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns the concatenated character data of the direct text and CDATA
    /// children.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(s) | Node::Cdata(s) => out.push_str(s),
                _ => {}
            }
        }
        out
    }

    /// Iterate over the direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Collects the descendant elements with the given tag name, in document
    /// order.
    #[must_use]
    pub fn elements_by_name(&self, name: &str) -> Vec<&Element> {
        let mut found = vec![];
        self.collect_elements_by_name(name, &mut found);
        found
    }

    fn collect_elements_by_name<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.name == name {
                found.push(child);
            }
            child.collect_elements_by_name(name, found);
        }
    }

    /// Returns the first element in this subtree (including this element)
    /// whose `id` attribute equals the given value, searching depth-first in
    /// document order. Returns `None` if there is no match.
    ///
    /// When more than one element carries the same id value, which one you
    /// get is deliberately left undefined; the current behavior is the first
    /// match in document order. The attribute named `id` is the designated id
    /// attribute: without DTD processing there is no ID typing information.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }
        for child in self.child_elements() {
            if let Some(found) = child.get_element_by_id(id) {
                return Some(found);
            }
        }
        None
    }
}

/// An attribute set on an element, with a name and value:
/// `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The qualified name of the attribute.
    pub name: String,

    /// The value of the attribute.
    pub value: String,
}
impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A processing instruction node:
/// `<?target content?>`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    /// The target of the processing instruction.
    pub target: String,

    /// Everything after the target, if anything.
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        let mut inner = Element::new("tag");
        inner.set_attribute("id", "a");
        inner.set_attribute("value", "1");

        let mut outer = Element::new("tag");
        outer.set_attribute("id", "yahoo");
        outer.push_child(Node::Element(inner));

        let mut root = Element::new("root");
        root.push_child(Node::Element(outer));
        root
    }

    #[test]
    fn test_attribute_last_wins() {
        let mut element = Element::new("a");
        element.attributes.push(Attribute::new("id", "1"));
        element.attributes.push(Attribute::new("id", "2"));
        assert_eq!(element.attribute("id"), Some("2"));
    }

    #[test]
    fn test_set_attribute_replaces_last() {
        let mut element = Element::new("a");
        element.attributes.push(Attribute::new("id", "1"));
        element.attributes.push(Attribute::new("id", "2"));
        element.set_attribute("id", "3");
        assert_eq!(element.attribute("id"), Some("3"));
        assert_eq!(element.attributes.len(), 2);
    }

    #[test]
    fn test_text_concatenates_direct_children() {
        let mut element = Element::new("a");
        element.push_child(Node::Text("hello ".to_string()));
        element.push_child(Node::Element(Element::new("b")));
        element.push_child(Node::Cdata("world".to_string()));
        assert_eq!(element.text(), "hello world");
    }

    #[test]
    fn test_elements_by_name_document_order() {
        let root = sample_tree();
        let tags = root.elements_by_name("tag");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].attribute("id"), Some("yahoo"));
        assert_eq!(tags[1].attribute("id"), Some("a"));
    }

    #[test]
    fn test_get_element_by_id() {
        let root = sample_tree();
        let element = root.get_element_by_id("a").unwrap();
        assert_eq!(element.attribute("value"), Some("1"));
        assert!(root.get_element_by_id("missing").is_none());
    }

    #[test]
    fn test_get_element_by_id_first_in_document_order() {
        let mut first = Element::new("a");
        first.set_attribute("id", "x");
        first.set_attribute("n", "1");

        let mut second = Element::new("b");
        second.set_attribute("id", "x");
        second.set_attribute("n", "2");

        let mut root = Element::new("root");
        root.push_child(Node::Element(first));
        root.push_child(Node::Element(second));

        let element = root.get_element_by_id("x").unwrap();
        assert_eq!(element.attribute("n"), Some("1"));
    }

    #[test]
    fn test_node_value() {
        assert_eq!(Node::Text("t".to_string()).value(), Some("t"));
        assert_eq!(Node::Comment("c".to_string()).value(), Some("c"));
        assert_eq!(Node::Element(Element::new("a")).value(), None);
    }

    #[test]
    fn test_dump_values() {
        let mut inner = Element::new("b");
        inner.push_child(Node::Text("world".to_string()));

        let mut root = Element::new("a");
        root.push_child(Node::Text("hello".to_string()));
        root.push_child(Node::Element(inner));

        let mut out = vec![];
        Node::Element(root).dump_values(0, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "01:hello\n02:world\n");
    }
}
