//! # Markup tree
//!
//! The assembly phase produces a plain tree of named elements with ordered
//! attributes, ordered children, and optional inline text. Serialization
//! goes through `quick-xml`'s event writer; a document root may carry a
//! doctype which is emitted between the XML declaration and the tree.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::io::Write;

use crate::Error;

/// one node of the produced markup tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    doctype: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            ..XmlElement::default()
        }
    }

    /// a root element carrying a doctype (the content between `<!DOCTYPE `
    /// and `>`)
    pub fn document(name: &str, doctype: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            doctype: Some(doctype.to_string()),
            ..XmlElement::default()
        }
    }

    /// append a new child element and return a handle to it
    pub fn child(&mut self, name: &str) -> &mut XmlElement {
        self.children.push(XmlElement::new(name));
        // the element was just appended
        self.children.last_mut().unwrap()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.push((name.to_string(), value.to_string()));
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attribute_name, _)| attribute_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// the first child with the given element name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// serialize the whole document (declaration, doctype, tree)
    pub fn write_document<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut writer = Writer::new_with_indent(writer, b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        if let Some(doctype) = &self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }

        self.write_element(&mut writer)
    }

    fn write_element<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;

        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for element in &self.children {
            element.write_element(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;

        Ok(())
    }

    /// serialize the whole document to a string
    pub fn to_document_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.write_document(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
