use std::fmt;

/// Head element types that are declared as lists of tag records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TagKind {
    Base,
    Link,
    Meta,
    Noscript,
    Script,
    Style,
}

/// One attribute that can identify a tag record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryAttribute {
    /// A regular attribute, named in HTML casing.
    Named(&'static str),
    /// The record's inline content.
    Content,
}

impl TagKind {
    /// Commit and render order.
    pub const ALL: [TagKind; 6] = [
        TagKind::Base,
        TagKind::Link,
        TagKind::Meta,
        TagKind::Noscript,
        TagKind::Script,
        TagKind::Style,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Base => "base",
            TagKind::Link => "link",
            TagKind::Meta => "meta",
            TagKind::Noscript => "noscript",
            TagKind::Script => "script",
            TagKind::Style => "style",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TagKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Ordered list of attributes that may identify a record of this kind.
    pub fn primary_attributes(self) -> &'static [PrimaryAttribute] {
        use PrimaryAttribute::{Content, Named};
        match self {
            TagKind::Base => &[Named("href")],
            TagKind::Link => &[Named("rel"), Named("href")],
            TagKind::Meta => &[
                Named("name"),
                Named("charset"),
                Named("http-equiv"),
                Named("property"),
                Named("itemprop"),
            ],
            TagKind::Noscript => &[Content],
            TagKind::Script => &[Named("src"), Content],
            TagKind::Style => &[Content],
        }
    }

    /// Content-bearing kinds render as `<x>content</x>`, the rest self-close.
    pub fn carries_content(self) -> bool {
        matches!(self, TagKind::Noscript | TagKind::Script | TagKind::Style)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Elements whose own attributes are merged rather than listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AttributeKind {
    Html,
    Body,
    Title,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] =
        [AttributeKind::Html, AttributeKind::Body, AttributeKind::Title];

    pub fn element_name(self) -> &'static str {
        match self {
            AttributeKind::Html => "html",
            AttributeKind::Body => "body",
            AttributeKind::Title => "title",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    Text(String),
    Bool(bool),
}

impl AttrValue {
    /// String value used for identity and matching. Booleans have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Bool(_) => None,
        }
    }

    /// `false` means the attribute is not written at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, AttrValue::Bool(false))
    }

    /// `true` and the empty string render as a bare attribute name.
    pub fn is_bare(&self) -> bool {
        match self {
            AttrValue::Text(text) => text.is_empty(),
            AttrValue::Bool(flag) => *flag,
        }
    }

    /// Value as written onto a live element.
    pub fn dom_value(&self) -> &str {
        match self {
            AttrValue::Text(text) => text,
            AttrValue::Bool(_) => "",
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Insertion-ordered attribute map. Re-inserting a key overwrites the value
/// and keeps the key's original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, AttrValue)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Shallow merge: keys in `other` overwrite, keys only here survive.
    pub fn merge_from(&mut self, other: &AttributeMap) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One declared tag: attributes plus optional inline content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TagRecord {
    pub attributes: AttributeMap,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub content: Option<String>,
}

impl TagRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A title is either one string or fragments that concatenate without a separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Title {
    Text(String),
    Fragments(Vec<String>),
}

impl Title {
    pub fn flatten(&self) -> String {
        match self {
            Title::Text(text) => text.clone(),
            Title::Fragments(parts) => parts.concat(),
        }
    }
}

impl From<&str> for Title {
    fn from(value: &str) -> Self {
        Title::Text(value.to_string())
    }
}

impl From<String> for Title {
    fn from(value: String) -> Self {
        Title::Text(value)
    }
}

/// One value per tag kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerTag<T> {
    slots: [T; 6],
}

impl<T> PerTag<T> {
    pub fn get(&self, kind: TagKind) -> &T {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: TagKind) -> &mut T {
        &mut self.slots[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagKind, &T)> {
        TagKind::ALL.into_iter().zip(self.slots.iter())
    }
}

/// One value per attribute-bearing element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerAttribute<T> {
    slots: [T; 3],
}

impl<T> PerAttribute<T> {
    pub fn get(&self, kind: AttributeKind) -> &T {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> &mut T {
        &mut self.slots[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &T)> {
        AttributeKind::ALL.into_iter().zip(self.slots.iter())
    }
}
