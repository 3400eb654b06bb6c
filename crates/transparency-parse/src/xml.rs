//! Owned element tree over `quick-xml` events.
//!
//! Element names are stored as lowercased local names, so lookups are
//! case-insensitive and ignore namespace prefixes. Searches walk descendants
//! in document order.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use transparency_core::{Result, TransparencyError};

/// Name of the synthetic root returned by [`parse_xml`].
pub const DOCUMENT: &str = "#document";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = lowercase(start.local_name().as_ref());
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| TransparencyError::Xml(e.to_string()))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| TransparencyError::Xml(e.to_string()))?;
            attributes.push((
                lowercase(attribute.key.local_name().as_ref()),
                value.into_owned(),
            ));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Returns the lowercased local name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an attribute value by case-insensitive local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the direct child elements.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Returns the concatenated text of all descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Returns the descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children().rev().collect(),
        }
    }

    /// Returns the first descendant named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        self.descendants().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Returns every descendant named `name`, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Self> {
        self.descendants()
            .filter(|e| e.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Returns the trimmed text of the first descendant named `name`.
    #[must_use]
    pub fn find_text(&self, name: &str) -> Option<String> {
        self.find(name).map(|e| e.text().trim().to_string())
    }

    /// Like [`find`](Self::find), but a missing element is a schema error.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::MissingElement`] when absent.
    pub fn require(&self, name: &str) -> Result<&Self> {
        self.find(name)
            .ok_or_else(|| TransparencyError::missing(name, &self.name))
    }

    /// Like [`find_text`](Self::find_text), but a missing element is a
    /// schema error.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::MissingElement`] when absent.
    pub fn require_text(&self, name: &str) -> Result<String> {
        self.require(name).map(|e| e.text().trim().to_string())
    }

    /// Parses the text of the first descendant named `name` as a timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when the element is absent or malformed.
    pub fn require_timestamp(&self, name: &str) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.require_text(name)?)
    }
}

/// Depth-first iterator over the descendants of an [`Element`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children().rev());
        Some(next)
    }
}

fn lowercase(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_lowercase()
}

/// Parses a document into a tree rooted at a synthetic [`DOCUMENT`] element.
///
/// # Errors
///
/// Returns [`TransparencyError::Xml`] if the text is not well-formed.
pub fn parse_xml(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Element {
        name: DOCUMENT.to_string(),
        attributes: Vec::new(),
        children: Vec::new(),
    }];

    let xml_error = |reader: &Reader<&[u8]>, e: &dyn std::fmt::Display| {
        TransparencyError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
    };

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, &e))?;
        match event {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                push_child(&mut stack, Node::Element(element))?;
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(xml_error(&reader, &"unbalanced closing tag"));
                }
                if let Some(element) = stack.pop() {
                    push_child(&mut stack, Node::Element(element))?;
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| xml_error(&reader, &e))?;
                push_child(&mut stack, Node::Text(text.into_owned()))?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_child(&mut stack, Node::Text(text))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(TransparencyError::Xml("unexpected end of document".to_string())),
    }
}

fn push_child(stack: &mut [Element], node: Node) -> Result<()> {
    let parent = stack
        .last_mut()
        .ok_or_else(|| TransparencyError::Xml("unbalanced closing tag".to_string()))?;
    parent.children.push(node);
    Ok(())
}

/// Parses a document timestamp such as `2023-03-26T00:00Z`.
///
/// Minute and second precision are accepted, with or without a trailing
/// `Z`, as well as full RFC 3339 strings with an offset. Naive values are
/// taken to be UTC.
///
/// # Errors
///
/// Returns [`TransparencyError::MalformedTimestamp`] otherwise.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    let naive = text.strip_suffix('Z').unwrap_or(text);
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|t| t.and_utc())
        .ok_or_else(|| TransparencyError::MalformedTimestamp(text.to_string()))
}
