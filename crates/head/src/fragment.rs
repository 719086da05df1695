use crate::element::TagChanges;
use crate::error::DeclarationError;
use crate::reduce::CanonicalState;
use crate::types::{
    AttrValue, AttributeKind, AttributeMap, PerAttribute, PerTag, TagKind, TagRecord, Title,
};
use core_types::{InstanceId, Sequence};
use std::fmt;
use std::rc::Rc;

/// Callback run after each commit with the committed state, then the added and
/// removed elements.
#[derive(Clone)]
pub struct ChangeObserver(Rc<dyn Fn(&CanonicalState, &TagChanges, &TagChanges)>);

impl ChangeObserver {
    pub fn new(f: impl Fn(&CanonicalState, &TagChanges, &TagChanges) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn notify(&self, state: &CanonicalState, added: &TagChanges, removed: &TagChanges) {
        (self.0)(state, added, removed)
    }
}

impl PartialEq for ChangeObserver {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ChangeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeObserver(..)")
    }
}

/// Per-fragment options. `None` means "not declared here".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentOptions {
    pub defer: Option<bool>,
    pub encode_special_characters: Option<bool>,
    pub prioritize_seo_tags: Option<bool>,
    pub on_change_client_state: Option<ChangeObserver>,
}

/// The head state one component asks for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadFragment {
    pub tags: PerTag<Vec<TagRecord>>,
    pub attributes: PerAttribute<AttributeMap>,
    pub title: Option<Title>,
    pub title_template: Option<String>,
    pub default_title: Option<String>,
    pub options: FragmentOptions,
}

impl HeadFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<Title>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = Some(template.into());
        self
    }

    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    pub fn tag(mut self, kind: TagKind, record: TagRecord) -> Self {
        self.tags.get_mut(kind).push(record);
        self
    }

    pub fn attribute(
        mut self,
        kind: AttributeKind,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        self.attributes.get_mut(kind).insert(name, value);
        self
    }

    pub fn defer(mut self, defer: bool) -> Self {
        self.options.defer = Some(defer);
        self
    }

    pub fn encode_special_characters(mut self, encode: bool) -> Self {
        self.options.encode_special_characters = Some(encode);
        self
    }

    pub fn prioritize_seo_tags(mut self, prioritize: bool) -> Self {
        self.options.prioritize_seo_tags = Some(prioritize);
        self
    }

    pub fn on_change(mut self, observer: ChangeObserver) -> Self {
        self.options.on_change_client_state = Some(observer);
        self
    }

    /// Build a fragment from declared head elements.
    ///
    /// Contract:
    /// - `title` takes text children only; one child is a plain title, several
    ///   are fragments. Its attributes become title attributes.
    /// - `html` and `body` take attributes only.
    /// - `base`, `link`, `meta` are self-closing and take no children.
    /// - `script`, `style`, `noscript` take text children, concatenated into the
    ///   record's content.
    /// - Anything else, and bare top-level text, is an error.
    pub fn from_children(
        children: impl IntoIterator<Item = HeadChild>,
    ) -> Result<Self, DeclarationError> {
        let mut fragment = HeadFragment::new();
        for child in children {
            let (name, attributes, children) = match child {
                HeadChild::Element {
                    name,
                    attributes,
                    children,
                } => (name, attributes, children),
                HeadChild::Text(_) => return Err(DeclarationError::TopLevelText),
            };
            let lower = name.to_ascii_lowercase();
            match lower.as_str() {
                "title" => {
                    let parts = text_children(&lower, children)?;
                    fragment.title = match parts.len() {
                        0 => None,
                        1 => parts.into_iter().next().map(Title::Text),
                        _ => Some(Title::Fragments(parts)),
                    };
                    merge_pairs(fragment.attributes.get_mut(AttributeKind::Title), attributes);
                }
                "html" | "body" => {
                    if !children.is_empty() {
                        return Err(DeclarationError::AttributesOnly(lower));
                    }
                    let kind = if lower == "html" {
                        AttributeKind::Html
                    } else {
                        AttributeKind::Body
                    };
                    merge_pairs(fragment.attributes.get_mut(kind), attributes);
                }
                _ => {
                    let Some(kind) = TagKind::from_name(&lower) else {
                        return Err(DeclarationError::UnsupportedElement(name));
                    };
                    let mut record = TagRecord::new();
                    merge_pairs(&mut record.attributes, attributes);
                    if kind.carries_content() {
                        let parts = text_children(&lower, children)?;
                        if !parts.is_empty() {
                            record.content = Some(parts.concat());
                        }
                    } else if !children.is_empty() {
                        return Err(DeclarationError::SelfClosingWithChildren(lower));
                    }
                    fragment.tags.get_mut(kind).push(record);
                }
            }
        }
        Ok(fragment)
    }
}

fn text_children(element: &str, children: Vec<HeadChild>) -> Result<Vec<String>, DeclarationError> {
    children
        .into_iter()
        .map(|child| match child {
            HeadChild::Text(text) => Ok(text),
            HeadChild::Element { name, .. } => Err(DeclarationError::NonTextContent {
                element: element.to_string(),
                child: name,
            }),
        })
        .collect()
}

fn merge_pairs(target: &mut AttributeMap, pairs: Vec<(String, AttrValue)>) {
    for (name, value) in pairs {
        target.insert(name, value);
    }
}

/// Declared child of a head component, as handed over by the front-end layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadChild {
    Element {
        name: String,
        attributes: Vec<(String, AttrValue)>,
        children: Vec<HeadChild>,
    },
    Text(String),
}

impl HeadChild {
    pub fn element(name: impl Into<String>) -> Self {
        HeadChild::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        HeadChild::Text(text.into())
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        if let HeadChild::Element { attributes, .. } = &mut self {
            attributes.push((key.into(), value.into()));
        }
        self
    }

    pub fn child(mut self, child: HeadChild) -> Self {
        if let HeadChild::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }
}

/// One registered fragment with its owner and registration position.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub instance: InstanceId,
    pub sequence: Sequence,
    pub fragment: HeadFragment,
}
