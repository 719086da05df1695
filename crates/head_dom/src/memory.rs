//! In-memory `HeadDocument`.
//!
//! Holds `<html>`, `<head>` (optional `<title>` first, then ordered children) and
//! `<body>`. Every write is counted so callers can assert that a commit touched
//! nothing. `to_markup` is deterministic: same tree, same bytes.

use crate::document::{ElementKey, HeadDocument};
use head::escape::escape_html;
use head::{AttributeKind, HeadElement, TagKind};
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Clone, Debug, Default)]
struct TitleNode {
    attributes: Vec<(String, String)>,
    text: String,
}

#[derive(Clone, Debug)]
pub struct MemoryDocument {
    html: Vec<(String, String)>,
    body: Vec<(String, String)>,
    title: Option<TitleNode>,
    head: Vec<ElementKey>,
    nodes: HashMap<ElementKey, HeadElement>,
    next_key: u32,
    mutations: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            html: Vec::new(),
            body: Vec::new(),
            title: None,
            head: Vec::new(),
            nodes: HashMap::new(),
            next_key: 0,
            mutations: 0,
        }
    }

    /// Document that already has an (empty) `<title>` element.
    pub fn with_title_element() -> Self {
        let mut doc = Self::new();
        doc.title = Some(TitleNode::default());
        doc
    }

    /// Add an element authored outside the engine. Not counted as a mutation.
    pub fn insert_external(&mut self, element: HeadElement) -> ElementKey {
        let key = self.allocate(element);
        self.head.push(key);
        key
    }

    pub fn element(&self, key: ElementKey) -> Option<&HeadElement> {
        self.nodes.get(&key)
    }

    /// All head children in document order, managed or not.
    pub fn head_elements(&self) -> impl Iterator<Item = (ElementKey, &HeadElement)> {
        self.head
            .iter()
            .filter_map(|key| self.nodes.get(key).map(|element| (*key, element)))
    }

    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn reset_mutations(&mut self) {
        self.mutations = 0;
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str("<html");
        write_attrs(&mut out, &self.html);
        out.push_str("><head>");
        if let Some(title) = &self.title {
            out.push_str("<title");
            write_attrs(&mut out, &title.attributes);
            let _ = write!(&mut out, ">{}</title>", escape_html(&title.text));
        }
        for (_, element) in self.head_elements() {
            let name = element.kind.name();
            let _ = write!(&mut out, "<{name}");
            write_attrs(&mut out, &element.attributes);
            if element.kind.carries_content() {
                let _ = write!(
                    &mut out,
                    ">{}</{name}>",
                    element.content.as_deref().unwrap_or("")
                );
            } else {
                out.push('>');
            }
        }
        out.push_str("</head><body");
        write_attrs(&mut out, &self.body);
        out.push_str("></body></html>");
        out
    }

    fn allocate(&mut self, element: HeadElement) -> ElementKey {
        self.next_key += 1;
        let key = ElementKey(self.next_key);
        self.nodes.insert(key, element);
        key
    }

    fn attrs(&self, target: AttributeKind) -> Option<&Vec<(String, String)>> {
        match target {
            AttributeKind::Html => Some(&self.html),
            AttributeKind::Body => Some(&self.body),
            AttributeKind::Title => self.title.as_ref().map(|t| &t.attributes),
        }
    }

    fn attrs_mut(&mut self, target: AttributeKind) -> Option<&mut Vec<(String, String)>> {
        match target {
            AttributeKind::Html => Some(&mut self.html),
            AttributeKind::Body => Some(&mut self.body),
            AttributeKind::Title => self.title.as_mut().map(|t| &mut t.attributes),
        }
    }
}

fn write_attrs(out: &mut String, attributes: &[(String, String)]) {
    for (name, value) in attributes {
        let _ = write!(out, " {name}=\"{}\"", escape_html(value));
    }
}

impl HeadDocument for MemoryDocument {
    fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|t| t.text.as_str())
    }

    fn set_title(&mut self, title: &str) {
        self.mutations += 1;
        self.title.get_or_insert_with(TitleNode::default).text = title.to_string();
    }

    fn has_element(&self, target: AttributeKind) -> bool {
        self.attrs(target).is_some()
    }

    fn attribute(&self, target: AttributeKind, name: &str) -> Option<&str> {
        self.attrs(target)?
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, target: AttributeKind, name: &str, value: &str) {
        let Some(attrs) = self.attrs_mut(target) else {
            return;
        };
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
        self.mutations += 1;
    }

    fn remove_attribute(&mut self, target: AttributeKind, name: &str) {
        let Some(attrs) = self.attrs_mut(target) else {
            return;
        };
        let before = attrs.len();
        attrs.retain(|(k, _)| k != name);
        if attrs.len() != before {
            self.mutations += 1;
        }
    }

    fn managed_tags(&self, kind: TagKind) -> Vec<(ElementKey, HeadElement)> {
        self.head_elements()
            .filter(|(_, element)| element.kind == kind && element.is_managed())
            .map(|(key, element)| (key, element.clone()))
            .collect()
    }

    fn append_tag(&mut self, element: &HeadElement) -> ElementKey {
        let key = self.allocate(element.clone());
        self.head.push(key);
        self.mutations += 1;
        key
    }

    fn remove_tag(&mut self, key: ElementKey) -> Option<HeadElement> {
        let element = self.nodes.remove(&key)?;
        self.head.retain(|k| *k != key);
        self.mutations += 1;
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use head::{MARKER_ATTRIBUTE, TagRecord};

    #[test]
    fn serializes_deterministically() {
        let mut doc = MemoryDocument::new();
        doc.set_attribute(AttributeKind::Html, "lang", "en");
        doc.set_title("A & B");
        doc.append_tag(&HeadElement::from_record(
            TagKind::Meta,
            &TagRecord::new().attr("charset", "utf-8"),
        ));
        assert_eq!(
            doc.to_markup(),
            concat!(
                r#"<html lang="en"><head><title>A &amp; B</title>"#,
                r#"<meta charset="utf-8" data-headmerge="true"></head><body></body></html>"#
            )
        );
        assert_eq!(doc.mutations(), 3);
    }

    #[test]
    fn managed_tags_skip_external_elements() {
        let mut doc = MemoryDocument::new();
        doc.insert_external(HeadElement {
            kind: TagKind::Meta,
            attributes: vec![("name".into(), "viewport".into())],
            content: None,
        });
        let key = doc.append_tag(&HeadElement::from_record(
            TagKind::Meta,
            &TagRecord::new().attr("name", "robots"),
        ));
        let managed = doc.managed_tags(TagKind::Meta);
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].0, key);
        assert!(managed[0].1.attribute(MARKER_ATTRIBUTE).is_some());
    }

    #[test]
    fn title_attributes_need_title_element() {
        let mut doc = MemoryDocument::new();
        assert!(!doc.has_element(AttributeKind::Title));
        doc.set_attribute(AttributeKind::Title, "itemprop", "name");
        assert_eq!(doc.mutations(), 0);
        let mut doc = MemoryDocument::with_title_element();
        doc.set_attribute(AttributeKind::Title, "itemprop", "name");
        assert_eq!(doc.attribute(AttributeKind::Title, "itemprop"), Some("name"));
    }

    #[test]
    fn removing_missing_attribute_is_not_a_write() {
        let mut doc = MemoryDocument::new();
        doc.remove_attribute(AttributeKind::Body, "class");
        assert_eq!(doc.mutations(), 0);
        assert_eq!(doc.remove_tag(ElementKey(42)), None);
    }
}
