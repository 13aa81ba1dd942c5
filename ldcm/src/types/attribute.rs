//! Hierarchical attribute model produced by record decoders.
//!
//! An `AttributeTree` is an ordered list of elements. Each element carries a
//! tag, a value representation code, and either a text value or a list of
//! nested trees (sequence items).

use std::fmt;
use std::str::FromStr;

/// A fixed-width attribute key: `(group, element)`.
///
/// Displays as eight uppercase hex digits (`00080016`), which is the form
/// used both in schema property names and in structural entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub group: u16,
    pub element: u16,
}

impl Tag {
    /// Create a tag from its group and element numbers.
    #[must_use]
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}{:04X}", self.group, self.element)
    }
}

/// Error returned when a tag string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagParseError(pub String);

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tag '{}': expected 8 hex digits", self.0)
    }
}

impl std::error::Error for TagParseError {}

impl FromStr for Tag {
    type Err = TagParseError;

    /// Parse `GGGGEEEE` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.is_ascii() {
            return Err(TagParseError(s.to_owned()));
        }
        let group =
            u16::from_str_radix(&s[..4], 16).map_err(|_| TagParseError(s.to_owned()))?;
        let element =
            u16::from_str_radix(&s[4..], 16).map_err(|_| TagParseError(s.to_owned()))?;
        Ok(Self { group, element })
    }
}

/// The value of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// A scalar value, already rendered to its string form.
    Text(String),
    /// A sequence: an ordered list of nested item trees.
    Sequence(Vec<AttributeTree>),
}

/// One element of an attribute tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    /// Two-letter value representation code (`SQ` for sequences).
    pub vr: String,
    pub value: ElementValue,
}

impl Element {
    /// Create a simple (non-sequence) element.
    #[must_use]
    pub fn text(tag: Tag, vr: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag,
            vr: vr.into(),
            value: ElementValue::Text(value.into()),
        }
    }

    /// Create a sequence element from its items.
    #[must_use]
    pub fn sequence(tag: Tag, items: Vec<AttributeTree>) -> Self {
        Self {
            tag,
            vr: "SQ".to_owned(),
            value: ElementValue::Sequence(items),
        }
    }

    /// Whether this element is a container of nested items.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self.value, ElementValue::Sequence(_))
    }

    /// The text value, or `None` for sequences.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            ElementValue::Text(text) => Some(text),
            ElementValue::Sequence(_) => None,
        }
    }
}

/// An ordered collection of elements, as decoded from one record or one
/// sequence item.
///
/// # Invariants
///
/// - Element order is the decoder's order; it carries no mapping semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTree {
    elements: Vec<Element>,
}

impl AttributeTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Find the first element with the given tag.
    #[must_use]
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.iter().find(|element| element.tag == tag)
    }

    /// Iterate over the elements in decoder order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Element> for AttributeTree {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AttributeTree {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
