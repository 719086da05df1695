//! Owned description of one engine-managed head element.
//!
//! Invariants:
//! - Attribute names are HTML names (see `attr_names::html_attributes`).
//! - Every element built from a tag record carries `MARKER_ATTRIBUTE="true"`.
//! - Equivalence ignores attribute order; name, attribute set and content must match.

use crate::attr_names::html_attributes;
use crate::types::{TagKind, TagRecord};
use std::collections::BTreeMap;

/// Attribute written onto every element this engine owns.
pub const MARKER_ATTRIBUTE: &str = "data-headmerge";
pub const MARKER_VALUE: &str = "true";

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeadElement {
    pub kind: TagKind,
    pub attributes: Vec<(String, String)>,
    pub content: Option<String>,
}

impl HeadElement {
    pub fn from_record(kind: TagKind, record: &TagRecord) -> Self {
        let mut attributes = Vec::with_capacity(record.attributes.len() + 1);
        for (name, value) in html_attributes(&record.attributes) {
            attributes.push((name.into_owned(), value.dom_value().to_string()));
        }
        attributes.push((MARKER_ATTRIBUTE.to_string(), MARKER_VALUE.to_string()));
        let content = if kind.carries_content() {
            record.content.clone()
        } else {
            None
        };
        Self {
            kind,
            attributes,
            content,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_managed(&self) -> bool {
        self.attribute(MARKER_ATTRIBUTE).is_some()
    }

    /// Structural equality: same kind, same attribute set, same content.
    pub fn is_equivalent(&self, other: &HeadElement) -> bool {
        if self.kind != other.kind || self.content != other.content {
            return false;
        }
        if self.attributes.len() != other.attributes.len() {
            return false;
        }
        let mut a: Vec<_> = self.attributes.iter().collect();
        let mut b: Vec<_> = other.attributes.iter().collect();
        a.sort();
        b.sort();
        a == b
    }
}

/// Elements added or removed by one commit, grouped by kind. Kinds without
/// elements are never present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagChanges {
    by_kind: BTreeMap<TagKind, Vec<HeadElement>>,
}

impl TagChanges {
    pub fn push(&mut self, element: HeadElement) {
        self.by_kind.entry(element.kind).or_default().push(element);
    }

    pub fn get(&self, kind: TagKind) -> Option<&[HeadElement]> {
        self.by_kind.get(&kind).map(Vec::as_slice)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TagKind> + '_ {
        self.by_kind.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagKind, &[HeadElement])> {
        self.by_kind.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}
