//! Owned, mutable SVG document tree
//!
//! Documents are parsed with roxmltree (read-only) and copied into an owned
//! tree that cleanup and template passes can mutate in place. Each element
//! exclusively owns its children. Serialization keeps the original
//! namespace prefixes, comments and text.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::DocumentError;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Name with no namespace (plain SVG attributes).
    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A namespace declaration (`xmlns` / `xmlns:prefix`) made on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub namespaces: Vec<Namespace>,
    pub children: Vec<Node>,
}

/// A parsed document: the root element plus any comments or processing
/// instructions that precede it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
}

impl Document {
    /// Parse an SVG document. DTDs are allowed; plotting libraries emit them.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;

        let mut prolog = Vec::new();
        for child in xml.root().children() {
            if child.is_element() {
                break;
            }
            if let Some(node) = convert_node(child, &[]) {
                prolog.push(node);
            }
        }

        let root = convert_element(xml.root_element(), &[]);
        Ok(Self { prolog, root })
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize with an XML declaration.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        for node in &self.prolog {
            write_node(&mut out, node, &mut Vec::new());
            out.push('\n');
        }
        write_element(&mut out, &self.root, &mut Vec::new());
        out.push('\n');
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_xml_string())?;
        Ok(())
    }

    /// True if any comment in the document, before or inside the root,
    /// satisfies `pred`.
    pub fn any_comment(&self, pred: impl Fn(&str) -> bool) -> bool {
        let in_prolog = self.prolog.iter().any(|node| match node {
            Node::Comment(text) => pred(text),
            _ => false,
        });
        in_prolog || self.root.any_comment(&pred)
    }
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespaces: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Local tag name, namespace ignored.
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// True if this element is in the SVG namespace (or in none, for
    /// fragments written without `xmlns`).
    pub fn is_svg(&self) -> bool {
        matches!(self.name.namespace.as_deref(), None | Some(SVG_NS))
    }

    /// Value of the un-namespaced attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.namespace.is_none() && a.name.local == name)
        {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: QName::local(name),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|a| a.name.namespace.is_none() && a.name.local == name)?;
        Some(self.attributes.remove(index).value)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// This element and all descendant elements in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visit this element and every descendant element in document order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.walk_mut(f);
            }
        }
    }

    /// Remove every descendant element matching `pred` (the element itself
    /// is never removed). Matching elements are removed with their subtrees
    /// and not descended into. Returns the number removed.
    pub fn remove_descendants(&mut self, pred: &mut impl FnMut(&Element) -> bool) -> usize {
        let mut removed = 0;
        self.children.retain(|node| match node {
            Node::Element(e) if pred(e) => {
                removed += 1;
                false
            }
            _ => true,
        });
        for child in &mut self.children {
            if let Node::Element(e) = child {
                removed += e.remove_descendants(pred);
            }
        }
        removed
    }

    /// Concatenated text of all descendant text nodes.
    pub fn deep_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn any_comment(&self, pred: &impl Fn(&str) -> bool) -> bool {
        self.children.iter().any(|node| match node {
            Node::Comment(text) => pred(text),
            Node::Element(e) => e.any_comment(pred),
            _ => false,
        })
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
            _ => {}
        }
    }
}

/// Pre-order iterator over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let children: Vec<&Element> = next.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(next)
    }
}

// ---------------------------------------------------------------------------
// roxmltree conversion
// ---------------------------------------------------------------------------

fn convert_node(node: roxmltree::Node<'_, '_>, in_scope: &[Namespace]) -> Option<Node> {
    match node.node_type() {
        roxmltree::NodeType::Element => Some(Node::Element(convert_element(node, in_scope))),
        roxmltree::NodeType::Text => node.text().map(|t| Node::Text(t.to_string())),
        roxmltree::NodeType::Comment => node.text().map(|t| Node::Comment(t.to_string())),
        roxmltree::NodeType::PI => node.pi().map(|pi| Node::ProcessingInstruction {
            target: pi.target.to_string(),
            value: pi.value.map(str::to_string),
        }),
        roxmltree::NodeType::Root => None,
    }
}

fn convert_element(node: roxmltree::Node<'_, '_>, parent_scope: &[Namespace]) -> Element {
    let scope: Vec<Namespace> = node
        .namespaces()
        .filter(|ns| ns.uri() != XML_NS)
        .map(|ns| Namespace {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect();

    // roxmltree reports every namespace in scope; keep only the ones this
    // element introduces so serialization does not repeat them
    let declared = scope
        .iter()
        .filter(|ns| !parent_scope.contains(ns))
        .cloned()
        .collect();

    let tag = node.tag_name();
    let attributes = node
        .attributes()
        .map(|a| Attribute {
            name: QName::new(a.namespace(), a.name()),
            value: a.value().to_string(),
        })
        .collect();

    let children = node
        .children()
        .filter_map(|child| convert_node(child, &scope))
        .collect();

    Element {
        name: QName::new(tag.namespace(), tag.name()),
        attributes,
        namespaces: declared,
        children,
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

fn write_node(out: &mut String, node: &Node, scope: &mut Vec<Namespace>) {
    match node {
        Node::Element(e) => write_element(out, e, scope),
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Comment(c) => {
            let _ = write!(out, "<!--{c}-->");
        }
        Node::ProcessingInstruction { target, value } => match value {
            Some(v) => {
                let _ = write!(out, "<?{target} {v}?>");
            }
            None => {
                let _ = write!(out, "<?{target}?>");
            }
        },
    }
}

fn write_element(out: &mut String, element: &Element, scope: &mut Vec<Namespace>) {
    let depth = scope.len();
    scope.extend(element.namespaces.iter().cloned());

    let name = qualified_name(&element.name, scope, false);
    out.push('<');
    out.push_str(&name);

    for ns in &element.namespaces {
        match &ns.prefix {
            Some(prefix) => {
                let _ = write!(out, " xmlns:{prefix}=\"{}\"", escape_attr(&ns.uri));
            }
            None => {
                let _ = write!(out, " xmlns=\"{}\"", escape_attr(&ns.uri));
            }
        }
    }

    for attr in &element.attributes {
        let attr_name = qualified_name(&attr.name, scope, true);
        let _ = write!(out, " {attr_name}=\"{}\"", escape_attr(&attr.value));
    }

    if element.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in &element.children {
            write_node(out, child, scope);
        }
        let _ = write!(out, "</{name}>");
    }

    scope.truncate(depth);
}

/// Resolve the prefix for a namespaced name from the innermost declaration.
/// Attributes never use the default namespace.
fn qualified_name(name: &QName, scope: &[Namespace], is_attribute: bool) -> String {
    let Some(uri) = name.namespace.as_deref() else {
        return name.local.clone();
    };
    if uri == XML_NS {
        return format!("xml:{}", name.local);
    }

    let prefix = scope
        .iter()
        .rev()
        .find(|ns| ns.uri == uri && !(is_attribute && ns.prefix.is_none()))
        .map(|ns| ns.prefix.as_deref());

    match prefix {
        Some(Some(p)) => format!("{p}:{}", name.local),
        _ => name.local.clone(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- leading comment -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="100" height="50">
  <defs><path id="m" d="M 0 0 L 1 1"/></defs>
  <use xlink:href="#m" x="5"/>
  <text x="1" y="2" xml:space="preserve">a &amp; b</text>
</svg>"##;

    #[test]
    fn test_parse_structure() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.root.tag(), "svg");
        assert_eq!(doc.root.name.namespace.as_deref(), Some(SVG_NS));
        assert_eq!(doc.root.attr("width"), Some("100"));
        assert_eq!(doc.prolog, vec![Node::Comment(" leading comment ".to_string())]);

        let tags: Vec<&str> = doc.root.descendants().map(Element::tag).collect();
        assert_eq!(tags, ["svg", "defs", "path", "use", "text"]);
    }

    #[test]
    fn test_round_trip_preserves_prefixes() {
        let doc = Document::parse(SAMPLE).unwrap();
        let xml = doc.to_xml_string();

        assert!(xml.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(xml.contains(r##"xlink:href="#m""##));
        assert!(xml.contains(r#"xml:space="preserve""#));
        assert!(xml.contains("a &amp; b"));

        let reparsed = Document::parse(&xml).unwrap();
        assert_eq!(reparsed.root, doc.root);
    }

    #[test]
    fn test_nested_namespace_declared_once() {
        let doc = Document::parse(SAMPLE).unwrap();
        let defs = doc.root.child_elements().next().unwrap();
        assert!(defs.namespaces.is_empty());
        assert_eq!(doc.root.namespaces.len(), 2);
    }

    #[test]
    fn test_attribute_editing() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        doc.root.set_attr("width", "200");
        doc.root.set_attr("fill", "none");
        assert_eq!(doc.root.attr("width"), Some("200"));
        assert_eq!(doc.root.attr("fill"), Some("none"));
        assert_eq!(doc.root.remove_attr("fill").as_deref(), Some("none"));
        assert_eq!(doc.root.attr("fill"), None);
    }

    #[test]
    fn test_attribute_whitespace_survives_reparse() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        doc.root.set_attr("data-label", "a\tb\r\nc");
        let xml = doc.to_xml_string();
        assert!(xml.contains("a&#9;b&#13;&#10;c"));

        let reparsed = Document::parse(&xml).unwrap();
        assert_eq!(reparsed.root.attr("data-label"), Some("a\tb\r\nc"));
    }

    #[test]
    fn test_remove_descendants_counts() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let removed = doc.root.remove_descendants(&mut |e| e.tag() == "path" || e.tag() == "use");
        assert_eq!(removed, 2);
        assert!(doc.root.descendants().all(|e| e.tag() != "path"));
    }

    #[test]
    fn test_comment_search_reaches_nested_comments() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><!-- made by hand --></g></svg>"#,
        )
        .unwrap();
        assert!(doc.any_comment(|c| c.contains("by hand")));
        assert!(!doc.any_comment(|c| c.contains("machine")));
    }

    #[test]
    fn test_parse_error() {
        let err = Document::parse("<svg><g></svg>").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn test_deep_text() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><title>A</title><desc>B<tspan>C</tspan></desc></g></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.root.deep_text(), "ABC");
    }
}
