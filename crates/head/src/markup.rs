//! Server-side materialization of a canonical state.
//!
//! Every field is an accessor computed on demand: `Display` (so `to_string()`)
//! yields markup, `to_elements()`/`to_props()` yield structured descriptors for
//! a further component render. Both are idempotent.
//!
//! Escaping:
//! - Attribute values are escaped unless `encode_special_characters` is off.
//! - Title text is always escaped.
//! - Inline content of script/style/noscript is written raw.

use crate::attr_names::{html_attributes, prop_name};
use crate::element::{MARKER_ATTRIBUTE, MARKER_VALUE};
use crate::escape::{escape_html, escape_if};
use crate::reduce::CanonicalState;
use crate::seo::SeoMatchers;
use crate::types::{AttrValue, AttributeKind, AttributeMap, TagKind, TagRecord};
use std::fmt::{self, Write};

/// Renderer-neutral element description.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementDescriptor {
    pub element: &'static str,
    pub key: String,
    pub props: AttributeMap,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub inner_html: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub text: Option<String>,
}

fn component_props(attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .filter(|(_, value)| value.is_present())
        .map(|(name, value)| (prop_name(name).into_owned(), value.clone()))
        .collect()
}

fn write_attributes(out: &mut impl Write, attributes: &AttributeMap, encode: bool) -> fmt::Result {
    for (i, (name, value)) in html_attributes(attributes).into_iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        match value {
            AttrValue::Text(text) if !text.is_empty() => {
                write!(out, "{name}=\"{}\"", escape_if(text, encode))?
            }
            _ => out.write_str(&name)?,
        }
    }
    Ok(())
}

fn has_present(attributes: &AttributeMap) -> bool {
    !html_attributes(attributes).is_empty()
}

/// Attributes of `<html>` or `<body>`.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeMarkup {
    attributes: AttributeMap,
    encode: bool,
}

impl AttributeMarkup {
    pub fn new(attributes: AttributeMap, encode: bool) -> Self {
        Self { attributes, encode }
    }

    pub fn to_props(&self) -> AttributeMap {
        component_props(&self.attributes)
    }
}

impl fmt::Display for AttributeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_attributes(f, &self.attributes, self.encode)
    }
}

/// The `<title>` element with its attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleMarkup {
    title: String,
    attributes: AttributeMap,
    encode: bool,
}

impl TitleMarkup {
    pub fn new(title: Option<&str>, attributes: AttributeMap, encode: bool) -> Self {
        Self {
            title: title.unwrap_or_default().to_string(),
            attributes,
            encode,
        }
    }

    pub fn to_elements(&self) -> Vec<ElementDescriptor> {
        let mut props = AttributeMap::new().with(MARKER_ATTRIBUTE, true);
        props.merge_from(&component_props(&self.attributes));
        vec![ElementDescriptor {
            element: "title",
            key: self.title.clone(),
            props,
            inner_html: None,
            text: Some(self.title.clone()),
        }]
    }
}

impl fmt::Display for TitleMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<title {MARKER_ATTRIBUTE}=\"{MARKER_VALUE}\"")?;
        if has_present(&self.attributes) {
            f.write_char(' ')?;
            write_attributes(f, &self.attributes, self.encode)?;
        }
        write!(f, ">{}</title>", escape_html(&self.title))
    }
}

/// All records of one tag kind.
#[derive(Clone, Debug, PartialEq)]
pub struct TagMarkup {
    kind: TagKind,
    records: Vec<TagRecord>,
    encode: bool,
}

impl TagMarkup {
    pub fn new(kind: TagKind, records: Vec<TagRecord>, encode: bool) -> Self {
        Self {
            kind,
            records,
            encode,
        }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    pub fn to_elements(&self) -> Vec<ElementDescriptor> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut props = AttributeMap::new().with(MARKER_ATTRIBUTE, true);
                props.merge_from(&component_props(&record.attributes));
                let inner_html = if self.kind.carries_content() {
                    record.content.clone()
                } else {
                    None
                };
                ElementDescriptor {
                    element: self.kind.name(),
                    key: i.to_string(),
                    props,
                    inner_html,
                    text: None,
                }
            })
            .collect()
    }
}

impl fmt::Display for TagMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind.name();
        for record in &self.records {
            write!(f, "<{name} {MARKER_ATTRIBUTE}=\"{MARKER_VALUE}\"")?;
            if has_present(&record.attributes) {
                f.write_char(' ')?;
                write_attributes(f, &record.attributes, self.encode)?;
            }
            if self.kind.carries_content() {
                write!(f, ">{}</{name}>", record.content.as_deref().unwrap_or(""))?;
            } else {
                f.write_str("/>")?;
            }
        }
        Ok(())
    }
}

/// Priority buckets in meta, link, script order.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityMarkup {
    groups: [TagMarkup; 3],
}

impl PriorityMarkup {
    pub fn to_elements(&self) -> Vec<ElementDescriptor> {
        self.groups.iter().flat_map(TagMarkup::to_elements).collect()
    }

    pub fn groups(&self) -> &[TagMarkup] {
        &self.groups
    }
}

impl fmt::Display for PriorityMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

/// Accessor bag for a full server render.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadMarkup {
    pub base: TagMarkup,
    pub link: TagMarkup,
    pub meta: TagMarkup,
    pub noscript: TagMarkup,
    pub script: TagMarkup,
    pub style: TagMarkup,
    pub html_attributes: AttributeMarkup,
    pub body_attributes: AttributeMarkup,
    pub title: TitleMarkup,
    /// Present only when `prioritize_seo_tags` is on.
    pub priority: Option<PriorityMarkup>,
}

impl HeadMarkup {
    pub fn from_state(state: &CanonicalState) -> Self {
        Self::with_matchers(state, &SeoMatchers::default())
    }

    pub fn with_matchers(state: &CanonicalState, matchers: &SeoMatchers) -> Self {
        let encode = state.options.encode_special_characters;
        let tags = |kind: TagKind| TagMarkup::new(kind, state.tags(kind).to_vec(), encode);
        let attributes = |kind: AttributeKind| AttributeMarkup::new(state.attributes(kind).clone(), encode);

        let mut markup = HeadMarkup {
            base: tags(TagKind::Base),
            link: tags(TagKind::Link),
            meta: tags(TagKind::Meta),
            noscript: tags(TagKind::Noscript),
            script: tags(TagKind::Script),
            style: tags(TagKind::Style),
            html_attributes: attributes(AttributeKind::Html),
            body_attributes: attributes(AttributeKind::Body),
            title: TitleMarkup::new(
                state.title.as_deref(),
                state.attributes(AttributeKind::Title).clone(),
                encode,
            ),
            priority: None,
        };

        if state.options.prioritize_seo_tags {
            let split = matchers.prioritize(state);
            markup.meta = TagMarkup::new(TagKind::Meta, split.meta.default, encode);
            markup.link = TagMarkup::new(TagKind::Link, split.link.default, encode);
            markup.script = TagMarkup::new(TagKind::Script, split.script.default, encode);
            markup.priority = Some(PriorityMarkup {
                groups: [
                    TagMarkup::new(TagKind::Meta, split.meta.priority, encode),
                    TagMarkup::new(TagKind::Link, split.link.priority, encode),
                    TagMarkup::new(TagKind::Script, split.script.priority, encode),
                ],
            });
        }

        markup
    }

    pub fn tags(&self, kind: TagKind) -> &TagMarkup {
        match kind {
            TagKind::Base => &self.base,
            TagKind::Link => &self.link,
            TagKind::Meta => &self.meta,
            TagKind::Noscript => &self.noscript,
            TagKind::Script => &self.script,
            TagKind::Style => &self.style,
        }
    }
}
