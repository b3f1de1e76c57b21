// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small mutable XML tree on top of quick-xml's event reader and writer.
//!
//! Whitespace-only text is dropped when reading and documents are written with
//! two-space indentation, so reading and re-writing a document written by this
//! module gives identical bytes.

use std::borrow::Cow;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

use super::ObXmlError;

/// A node in an XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An XML element. Attribute order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Element {
        Element {
            name: name.to_string(),
            attributes: vec![],
            children: vec![],
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr<V: Into<String>>(&mut self, key: &str, value: V) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Find the first element with this name, depth first. This element is
    /// included in the search.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        if self.name == name {
            return Some(self);
        }
        self.child_elements_mut().find_map(|c| c.find_mut(name))
    }

    /// Get all elements with this name, depth first.
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for c in self.child_elements() {
            c.find_all(name, out);
        }
    }

    /// Remove the child elements for which `remove` is true, at any depth.
    pub fn remove_descendants<F: Fn(&Element) -> bool + Copy>(&mut self, remove: F) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, Node::Element(e) if remove(e)));
        let mut removed = before - self.children.len();
        for c in self.child_elements_mut() {
            removed += c.remove_descendants(remove);
        }
        removed
    }

    fn start_event(&self) -> BytesStart<'_> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }
        start
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), quick_xml::Error> {
        if self.children.is_empty() {
            writer.write_event(Event::Empty(self.start_event()))?;
            return Ok(());
        }
        writer.write_event(Event::Start(self.start_event()))?;
        for child in &self.children {
            match child {
                Node::Element(e) => e.write(writer)?,
                Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
                Node::Comment(c) => {
                    writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ObXmlError> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|e| ObXmlError::Syntax(e.to_string()))
}

fn element_from_start(start: &BytesStart) -> Result<Element, ObXmlError> {
    let mut element = Element::new(&utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ObXmlError::Syntax(e.to_string()))?;
        let value: Cow<str> = attr.unescape_value()?;
        element
            .attributes
            .push((utf8(attr.key.as_ref())?, value.into_owned()));
    }
    Ok(element)
}

/// Parse a document, returning its root element.
pub(crate) fn parse_document(contents: &str) -> Result<Element, ObXmlError> {
    let mut reader = Reader::from_str(contents);
    reader.trim_text(true);

    // Elements that have been opened but not closed.
    let mut stack: Vec<Element> = vec![];
    let mut root = None;
    loop {
        let event = reader.read_event()?;
        let finished = match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
                None
            }
            Event::Empty(start) => Some(element_from_start(&start)?),
            Event::End(_) => Some(stack.pop().ok_or_else(|| {
                ObXmlError::Syntax("closing tag without an opening tag".to_string())
            })?),
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.unescape()?.into_owned()));
                }
                None
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(utf8(&data)?));
                }
                None
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(utf8(&comment)?));
                }
                None
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
            Event::Eof => break,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.push_child(element),
                None if root.is_none() => root = Some(element),
                None => return Err(ObXmlError::Syntax("more than one root element".to_string())),
            }
        }
    }

    if !stack.is_empty() {
        return Err(ObXmlError::Syntax(format!(
            "element <{}> is never closed",
            stack[stack.len() - 1].name
        )));
    }
    root.ok_or(ObXmlError::NoRoot)
}

/// Serialise a document with an XML declaration.
pub(crate) fn write_document(root: &Element) -> Result<Vec<u8>, ObXmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    root.write(&mut writer)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const DOC: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <weave datamver="8.00" author="%%%">
          <!-- a comment -->
          <surveys>
            <survey name="A &amp; B" max_fibres="%%%"/>
          </surveys>
          <fields>
            <field RA_d="%%%" Dec_d="%%%">
              <target targsrvy="%%%" targid="x"/>
              <target targsrvy="GA" targid="y">
                <photometry mag_g="17.5"/>
              </target>
            </field>
          </fields>
        </weave>
    "#};

    #[test]
    fn test_parse() {
        let root = parse_document(DOC).unwrap();
        assert_eq!(root.name, "weave");
        assert_eq!(root.attr("datamver"), Some("8.00"));
        let survey = root.find("survey").unwrap();
        assert_eq!(survey.attr("name"), Some("A & B"));
        let mut targets = vec![];
        root.find_all("target", &mut targets);
        assert_eq!(targets.len(), 2);
        assert_eq!(
            targets[1].find("photometry").unwrap().attr("mag_g"),
            Some("17.5")
        );
        assert!(matches!(root.children[0], Node::Comment(_)));
    }

    #[test]
    fn test_rewrite_is_stable() {
        let root = parse_document(DOC).unwrap();
        let written = write_document(&root).unwrap();
        let reparsed = parse_document(std::str::from_utf8(&written).unwrap()).unwrap();
        assert_eq!(reparsed, root);
        assert_eq!(write_document(&reparsed).unwrap(), written);
    }

    #[test]
    fn test_set_attr_keeps_order() {
        let mut root = parse_document(DOC).unwrap();
        root.set_attr("datamver", "9.00");
        root.set_attr("cc_report", "b@domain.com");
        let keys: Vec<_> = root.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["datamver", "author", "cc_report"]);
    }

    #[test]
    fn test_remove_descendants() {
        let mut root = parse_document(DOC).unwrap();
        let removed =
            root.remove_descendants(|e| e.name == "target" && e.attr("targsrvy") == Some("%%%"));
        assert_eq!(removed, 1);
        let mut targets = vec![];
        root.find_all("target", &mut targets);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].attr("targid"), Some("y"));
    }

    #[test]
    fn test_bad_documents() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a>").is_err());
        assert!(matches!(parse_document(""), Err(ObXmlError::NoRoot)));
    }
}
