//! Mapping between component-style (camelCase) attribute names and HTML names.
//!
//! Records keep whatever names they were declared with. The string form, the
//! live-document adapter and identity resolution see HTML names; the structured
//! form sees component names.

use crate::types::{AttrValue, AttributeMap};
use std::borrow::Cow;

/// (html name, component name)
const NAME_PAIRS: &[(&str, &str)] = &[
    ("accesskey", "accessKey"),
    ("charset", "charSet"),
    ("class", "className"),
    ("contenteditable", "contentEditable"),
    ("contextmenu", "contextMenu"),
    ("http-equiv", "httpEquiv"),
    ("itemprop", "itemProp"),
    ("tabindex", "tabIndex"),
];

/// Name as written into markup or onto a live element.
pub fn html_name(name: &str) -> Cow<'_, str> {
    match NAME_PAIRS.iter().find(|(_, prop)| *prop == name) {
        Some((html, _)) => Cow::Borrowed(*html),
        None => Cow::Borrowed(name),
    }
}

/// Name as exposed to a component renderer.
pub fn prop_name(name: &str) -> Cow<'_, str> {
    match NAME_PAIRS
        .iter()
        .find(|(html, _)| html.eq_ignore_ascii_case(name))
    {
        Some((_, prop)) => Cow::Borrowed(*prop),
        None => Cow::Borrowed(name),
    }
}

/// Case-folded HTML name used for identity and matcher lookups.
pub fn canonical_name(name: &str) -> Cow<'_, str> {
    let html = html_name(name);
    if html.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(html.to_ascii_lowercase())
    } else {
        html
    }
}

/// Present attributes keyed by HTML name. Names that fold together (`class`
/// and `className`) collapse into one entry at the first position, carrying the
/// later value; a later `Bool(false)` removes the entry.
pub fn html_attributes(attributes: &AttributeMap) -> Vec<(Cow<'_, str>, &AttrValue)> {
    let mut folded: Vec<(Cow<'_, str>, &AttrValue)> = Vec::with_capacity(attributes.len());
    for (name, value) in attributes.iter() {
        let name = html_name(name);
        match folded.iter_mut().find(|(seen, _)| *seen == name) {
            Some(slot) => slot.1 = value,
            None => folded.push((name, value)),
        }
    }
    folded.retain(|(_, value)| value.is_present());
    folded
}
