//! Plan the patches that bring a document in line with a canonical state.
//!
//! Contract:
//! - Title is written only when it differs; an undefined title is left alone.
//! - On html/body/title the marker attribute lists the attribute names this
//!   engine owns, comma-joined. Owned names missing from the new state are
//!   removed; names never owned are never touched. An empty owned set removes
//!   the marker itself.
//! - Per tag kind, an existing managed element survives when some new element is
//!   equivalent to it (each existing element matches at most one new element).
//!   Unmatched existing elements are removed, unmatched new ones appended.
//! - Patch order: title, attributes (html, body, title), then per kind removals
//!   followed by appends.
//! - A document already matching the state yields no patches.

use crate::document::HeadDocument;
use crate::patch::HeadPatch;
use head::attr_names::html_attributes;
use head::{
    AttributeKind, AttributeMap, CanonicalState, HeadElement, MARKER_ATTRIBUTE, TagKind, TagRecord,
};

pub fn plan_commit<D: HeadDocument + ?Sized>(document: &D, state: &CanonicalState) -> Vec<HeadPatch> {
    let mut patches = Vec::new();

    let mut title_exists = document.has_element(AttributeKind::Title);
    if let Some(title) = &state.title {
        if document.title().unwrap_or("") != title {
            patches.push(HeadPatch::SetTitle {
                text: title.clone(),
            });
            title_exists = true;
        }
    }

    for kind in AttributeKind::ALL {
        let exists = match kind {
            AttributeKind::Title => title_exists,
            AttributeKind::Html | AttributeKind::Body => document.has_element(kind),
        };
        if exists {
            plan_attributes(document, kind, state.attributes(kind), &mut patches);
        }
    }

    for kind in TagKind::ALL {
        plan_tags(document, kind, state.tags(kind), &mut patches);
    }

    patches
}

fn plan_attributes<D: HeadDocument + ?Sized>(
    document: &D,
    target: AttributeKind,
    attributes: &AttributeMap,
    patches: &mut Vec<HeadPatch>,
) {
    let marker = document.attribute(target, MARKER_ATTRIBUTE);
    let mut stale: Vec<&str> = marker
        .map(|owned| owned.split(',').filter(|name| !name.is_empty()).collect())
        .unwrap_or_default();
    let mut owned: Vec<String> = Vec::new();

    for (name, value) in html_attributes(attributes) {
        let value = value.dom_value();
        if document.attribute(target, &name) != Some(value) {
            patches.push(HeadPatch::SetAttribute {
                target,
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        stale.retain(|previous| *previous != name);
        owned.push(name.into_owned());
    }

    for name in stale {
        if document.attribute(target, name).is_some() {
            patches.push(HeadPatch::RemoveAttribute {
                target,
                name: name.to_string(),
            });
        }
    }

    if owned.is_empty() {
        if marker.is_some() {
            patches.push(HeadPatch::RemoveAttribute {
                target,
                name: MARKER_ATTRIBUTE.to_string(),
            });
        }
    } else {
        let joined = owned.join(",");
        if marker != Some(joined.as_str()) {
            patches.push(HeadPatch::SetAttribute {
                target,
                name: MARKER_ATTRIBUTE.to_string(),
                value: joined,
            });
        }
    }
}

fn plan_tags<D: HeadDocument + ?Sized>(
    document: &D,
    kind: TagKind,
    records: &[TagRecord],
    patches: &mut Vec<HeadPatch>,
) {
    let mut existing = document.managed_tags(kind);
    let mut appends = Vec::new();

    for record in records {
        let element = HeadElement::from_record(kind, record);
        match existing
            .iter()
            .position(|(_, current)| current.is_equivalent(&element))
        {
            Some(pos) => {
                existing.remove(pos);
            }
            None => appends.push(element),
        }
    }

    for (key, element) in existing {
        patches.push(HeadPatch::RemoveTag { key, element });
    }
    for element in appends {
        patches.push(HeadPatch::AppendTag { element });
    }
}
