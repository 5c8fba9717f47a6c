//! XML tree representation
//!
//! The tree keeps the raw source text of every node it did not touch, so a
//! descriptor that is parsed and written back unchanged is byte-identical.
//! Only elements whose start tag was edited are re-rendered.

use crate::errors::{malformed_xml, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node inside an element or around the root
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, kept escaped as it appears in the source
    Text(String),
    /// `<![CDATA[...]]>` including markers
    CData(String),
    /// `<!--...-->` including markers
    Comment(String),
    /// XML declaration, processing instruction or doctype, verbatim
    Markup(String),
}

impl XmlNode {
    /// Text node from unescaped content
    pub fn text(content: &str) -> Self {
        XmlNode::Text(escape(content).into_owned())
    }

    /// True for text nodes that hold only whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.chars().all(char::is_whitespace))
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            XmlNode::Element(el) => el.write(out),
            XmlNode::Text(raw)
            | XmlNode::CData(raw)
            | XmlNode::Comment(raw)
            | XmlNode::Markup(raw) => out.push_str(raw),
        }
    }
}

/// An element with its attributes and children
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    self_closing: bool,
    raw_start: Option<String>,
    raw_end: Option<String>,
}

impl XmlElement {
    /// New empty element, rendered as `<name/>` until it gets children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
            raw_start: None,
            raw_end: None,
        }
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: add a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.self_closing = false;
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder: add text content
    pub fn with_text(mut self, text: &str) -> Self {
        self.self_closing = false;
        self.children.push(XmlNode::text(text));
        self
    }

    /// Qualified name as written, e.g. `jee:jndi-lookup`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Namespace prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Attribute value (unescaped)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Set or replace an attribute; the start tag is re-rendered on output
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self.raw_start = None;
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// First child element with the given local name
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements()
            .find(|el| el.local_name() == local_name)
    }

    /// Trimmed, unescaped text content of direct text and CDATA children
    pub fn text(&self) -> String {
        let mut s = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(raw) => match unescape(raw) {
                    Ok(text) => s.push_str(&text),
                    Err(_) => s.push_str(raw),
                },
                XmlNode::CData(raw) => s.push_str(
                    raw.trim_start_matches("<![CDATA[")
                        .trim_end_matches("]]>"),
                ),
                _ => {}
            }
        }
        s.trim().to_string()
    }

    /// Text of the first child element with the given local name
    pub fn child_text(&self, local_name: &str) -> Option<String> {
        self.child(local_name).map(XmlElement::text)
    }

    /// Append a child element after the last existing child
    ///
    /// When the container is laid out one child per line, the new element
    /// gets the same indentation as its siblings and its own inner lines are
    /// shifted to match.
    pub fn append_child(&mut self, mut child: XmlElement) {
        if self.self_closing {
            self.self_closing = false;
            self.raw_start = None;
        }

        let trailing = match self.children.last() {
            Some(node @ XmlNode::Text(t)) if node.is_whitespace() => Some(t.clone()),
            _ => None,
        };
        let sibling_indent = self.sibling_indent();

        let indent = match (&sibling_indent, &trailing) {
            (Some(indent), _) => Some(indent.clone()),
            (None, Some(closing)) => Some(format!("{}{}", closing, DEFAULT_INDENT_UNIT)),
            (None, None) => None,
        };

        if let Some(indent) = &indent {
            child.reindent(line_indent(indent));
        }

        let at = if trailing.is_some() {
            self.children.len() - 1
        } else {
            self.children.len()
        };
        match indent {
            Some(indent) => {
                self.children.insert(at, XmlNode::Text(indent));
                self.children.insert(at + 1, XmlNode::Element(child));
            }
            None => self.children.insert(at, XmlNode::Element(child)),
        }
    }

    /// Remove the child node at `index`, together with the whitespace that
    /// indents it. Returns the removed element, if the node was one.
    pub fn remove_child(&mut self, index: usize) -> Option<XmlElement> {
        if index >= self.children.len() {
            return None;
        }
        let removed = self.children.remove(index);
        if index > 0 && self.children[index - 1].is_whitespace() {
            self.children.remove(index - 1);
        }
        match removed {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Remove every direct child element for which `predicate` holds
    pub fn remove_children_where<F>(&mut self, mut predicate: F) -> Vec<XmlElement>
    where
        F: FnMut(&XmlElement) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.children.len() {
            let matched = self.children[index]
                .as_element()
                .map(&mut predicate)
                .unwrap_or(false);
            if matched {
                let had_indent = index > 0 && self.children[index - 1].is_whitespace();
                if let Some(el) = self.remove_child(index) {
                    removed.push(el);
                }
                if had_indent {
                    index -= 1;
                }
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Structural equality ignoring formatting whitespace and comments
    #[cfg(test)]
    pub(crate) fn same_content(&self, other: &XmlElement) -> bool {
        if self.name != other.name {
            return false;
        }
        let mut a = self.attributes.clone();
        let mut b = other.attributes.clone();
        a.sort();
        b.sort();
        if a != b || self.text() != other.text() {
            return false;
        }
        let mine: Vec<_> = self.child_elements().collect();
        let theirs: Vec<_> = other.child_elements().collect();
        mine.len() == theirs.len()
            && mine
                .iter()
                .zip(theirs.iter())
                .all(|(x, y)| x.same_content(y))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Whitespace preceding the last child element
    fn sibling_indent(&self) -> Option<String> {
        let last = self
            .children
            .iter()
            .rposition(|node| matches!(node, XmlNode::Element(_)))?;
        match last.checked_sub(1).map(|i| &self.children[i]) {
            Some(node @ XmlNode::Text(t)) if node.is_whitespace() => Some(t.clone()),
            _ => None,
        }
    }

    /// Shift inner indentation from this element's own column to `target`
    fn reindent(&mut self, target: &str) {
        let own = match self.children.last() {
            Some(node @ XmlNode::Text(t)) if node.is_whitespace() && t.contains('\n') => {
                line_indent(t).to_string()
            }
            _ => return,
        };
        if own == target {
            return;
        }
        self.shift_indent(&own, target);
    }

    fn shift_indent(&mut self, from: &str, to: &str) {
        for child in &mut self.children {
            match child {
                XmlNode::Text(t) if t.contains('\n') && t.chars().all(char::is_whitespace) => {
                    if let Some((head, tail)) = t.rsplit_once('\n') {
                        if let Some(rest) = tail.strip_prefix(from) {
                            *t = format!("{}\n{}{}", head, to, rest);
                        }
                    }
                }
                XmlNode::Element(el) => el.shift_indent(from, to),
                _ => {}
            }
        }
    }

    fn write(&self, out: &mut String) {
        let empty = self.self_closing && self.children.is_empty();
        match &self.raw_start {
            Some(raw) => out.push_str(raw),
            None => {
                out.push('<');
                out.push_str(&self.name);
                for (k, v) in &self.attributes {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape(v.as_str()));
                    out.push('"');
                }
                out.push_str(if empty { "/>" } else { ">" });
            }
        }
        if empty {
            return;
        }
        for child in &self.children {
            child.write(out);
        }
        match &self.raw_end {
            Some(raw) => out.push_str(raw),
            None => {
                out.push_str("</");
                out.push_str(&self.name);
                out.push('>');
            }
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| malformed_xml("parse", format!("invalid element name: {}", e)))?
            .to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed_xml("parse", format!("attribute error in <{}>: {}", name, e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| malformed_xml("parse", format!("invalid attribute name: {}", e)))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| malformed_xml("parse", format!("invalid value for '{}': {}", key, e)))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            self_closing: false,
            raw_start: None,
            raw_end: None,
        })
    }
}

const DEFAULT_INDENT_UNIT: &str = "    ";

/// Indentation of the last line in a whitespace run
fn line_indent(ws: &str) -> &str {
    ws.rsplit('\n').next().unwrap_or(ws)
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    prolog: Vec<XmlNode>,
    root: XmlElement,
    epilog: Vec<XmlNode>,
}

impl XmlDocument {
    /// Document with just a root element and an XML declaration
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: vec![
                XmlNode::Markup(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string()),
                XmlNode::Text("\n".to_string()),
            ],
            root,
            epilog: vec![XmlNode::Text("\n".to_string())],
        }
    }

    /// Parse a document, keeping the raw text of every node
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                malformed_xml(
                    "parse",
                    format!("XML error near byte {}: {}", reader.buffer_position(), e),
                )
            })?;
            let end = reader.buffer_position() as usize;
            let raw = xml
                .get(start..end)
                .ok_or_else(|| malformed_xml("parse", "event boundary is not a character boundary"))?
                .to_string();

            let node = match event {
                Event::Start(ref e) => {
                    let mut el = XmlElement::from_start(e)?;
                    el.raw_start = Some(raw);
                    stack.push(el);
                    continue;
                }
                Event::End(_) => {
                    let mut el = stack
                        .pop()
                        .ok_or_else(|| malformed_xml("parse", "unexpected closing tag"))?;
                    el.raw_end = Some(raw);
                    XmlNode::Element(el)
                }
                Event::Empty(ref e) => {
                    let mut el = XmlElement::from_start(e)?;
                    el.self_closing = true;
                    el.raw_start = Some(raw);
                    XmlNode::Element(el)
                }
                Event::Text(_) => XmlNode::Text(raw),
                Event::CData(_) => XmlNode::CData(raw),
                Event::Comment(_) => XmlNode::Comment(raw),
                Event::Eof => break,
                _ => XmlNode::Markup(raw),
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }
            match node {
                XmlNode::Element(el) => {
                    if root.is_some() {
                        return Err(malformed_xml("parse", "more than one root element"));
                    }
                    root = Some(el);
                }
                other if root.is_none() => prolog.push(other),
                other => epilog.push(other),
            }
        }

        if !stack.is_empty() {
            let unclosed: Vec<&str> = stack.iter().map(|el| el.name.as_str()).collect();
            return Err(malformed_xml(
                "parse",
                format!("unclosed element(s): <{}>", unclosed.join(">, <")),
            ));
        }

        let root = root.ok_or_else(|| malformed_xml("parse", "document has no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize the whole document
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.prolog {
            node.write(&mut out);
        }
        self.root.write(&mut out);
        for node in &self.epilog {
            node.write(&mut out);
        }
        out
    }

    /// Namespace declarations on the root element, as (prefix, uri);
    /// the default namespace has an empty prefix
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.root
            .attributes
            .iter()
            .filter_map(|(k, v)| {
                if k == "xmlns" {
                    Some((String::new(), v.clone()))
                } else {
                    k.strip_prefix("xmlns:")
                        .map(|prefix| (prefix.to_string(), v.clone()))
                }
            })
            .collect()
    }

    /// Namespace URI bound to `prefix` on the root element
    pub fn namespace_uri(&self, prefix: &str) -> Option<String> {
        self.namespaces()
            .into_iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- keep me -->
<project xmlns="http://maven.apache.org/POM/4.0.0"  xmlns:xsi='http://www.w3.org/2001/XMLSchema-instance'>
    <modelVersion>4.0.0</modelVersion>
    <name>a &amp; b</name>
    <build>
        <plugins/>
    </build>
    <description><![CDATA[raw <text>]]></description>
</project>
"#;

    #[test]
    fn test_unchanged_document_round_trips_byte_for_byte() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.to_xml_string(), POM);
    }

    #[test]
    fn test_text_is_unescaped_and_cdata_unwrapped() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.root().child_text("name").as_deref(), Some("a & b"));
        assert_eq!(
            doc.root().child_text("description").as_deref(),
            Some("raw <text>")
        );
    }

    #[test]
    fn test_namespaces_from_root() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(
            doc.namespace_uri("").as_deref(),
            Some("http://maven.apache.org/POM/4.0.0")
        );
        assert!(doc.namespace_uri("xsi").is_some());
        assert!(doc.namespace_uri("jee").is_none());
    }

    #[test]
    fn test_append_to_self_closing_container_rerenders_tag() {
        let mut doc = XmlDocument::parse("<a><b/></a>").unwrap();
        let b = doc.root_mut().children_mut()[0].as_element_mut().unwrap();
        b.append_child(XmlElement::new("c").with_text("x"));
        assert_eq!(doc.to_xml_string(), "<a><b><c>x</c></b></a>");
    }

    #[test]
    fn test_append_matches_sibling_indentation() {
        let xml = "<r>\n  <a/>\n</r>";
        let mut doc = XmlDocument::parse(xml).unwrap();
        doc.root_mut().append_child(XmlElement::new("b"));
        assert_eq!(doc.to_xml_string(), "<r>\n  <a/>\n  <b/>\n</r>");
    }

    #[test]
    fn test_appended_element_inner_lines_are_shifted() {
        let source = XmlDocument::parse("<x>\n    <p>\n        <q/>\n    </p>\n</x>").unwrap();
        let p = source.root().child("p").unwrap().clone();

        let mut doc = XmlDocument::parse("<r>\n  <a/>\n</r>").unwrap();
        doc.root_mut().append_child(p);
        assert_eq!(
            doc.to_xml_string(),
            "<r>\n  <a/>\n  <p>\n      <q/>\n  </p>\n</r>"
        );
    }

    #[test]
    fn test_remove_child_takes_indentation_along() {
        let xml = "<r>\n  <a/>\n  <b/>\n</r>";
        let mut doc = XmlDocument::parse(xml).unwrap();
        let removed = doc
            .root_mut()
            .remove_children_where(|el| el.local_name() == "a");
        assert_eq!(removed.len(), 1);
        assert_eq!(doc.to_xml_string(), "<r>\n  <b/>\n</r>");
    }

    #[test]
    fn test_new_attribute_values_are_escaped() {
        let el = XmlElement::new("bean").with_attribute("value", "a<b & \"c\"");
        let doc = XmlDocument {
            prolog: Vec::new(),
            root: el,
            epilog: Vec::new(),
        };
        let out = doc.to_xml_string();
        assert!(out.starts_with("<bean value=\""));
        assert!(!out.contains("a<b"));
        let reparsed = XmlDocument::parse(&out).unwrap();
        assert_eq!(reparsed.root().attribute("value"), Some("a<b & \"c\""));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("<a>").is_err());
        assert!(XmlDocument::parse("   ").is_err());
    }

    #[test]
    fn test_same_content_ignores_formatting() {
        let a = XmlDocument::parse("<p>\n  <g>x</g>\n  <a>y</a>\n</p>").unwrap();
        let b = XmlDocument::parse("<p><g>x</g><a>y</a></p>").unwrap();
        let c = XmlDocument::parse("<p><g>x</g><a>z</a></p>").unwrap();
        assert!(a.root().same_content(b.root()));
        assert!(!a.root().same_content(c.root()));
    }
}
