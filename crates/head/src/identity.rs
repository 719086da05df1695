//! Tag identity: which attribute makes two tag records "the same tag".
//!
//! Rules:
//! - Attribute names are scanned in record order, compared after HTML-name
//!   folding. Inline content counts as a final pseudo-attribute.
//! - The last name present in the kind's primary list wins, except:
//!   - once `rel=canonical` is chosen it is kept (all canonical links share one identity);
//!   - `rel=stylesheet` is never chosen (stylesheets are identified by `href`).
//! - The chosen value must be a non-empty string, otherwise the record is invalid.
//! - Values are lowercased, except content and `itemprop` values.

use crate::attr_names::canonical_name;
use crate::types::{PrimaryAttribute, TagKind, TagRecord};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Attribute(String),
    Content,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagIdentity {
    pub key: IdentityKey,
    pub value: String,
}

pub fn resolve_identity(kind: TagKind, record: &TagRecord) -> Option<TagIdentity> {
    let primaries = kind.primary_attributes();
    let mut chosen: Option<(IdentityKey, &str)> = None;

    for (name, value) in record.attributes.iter() {
        let name = canonical_name(name);
        let is_primary = primaries
            .iter()
            .any(|p| matches!(p, PrimaryAttribute::Named(n) if *n == name));
        if !is_primary {
            continue;
        }
        let text = value.as_text().unwrap_or("");
        if pins_identity(chosen.as_ref()) {
            continue;
        }
        if name == "rel" && text.eq_ignore_ascii_case("stylesheet") {
            continue;
        }
        chosen = Some((IdentityKey::Attribute(name.into_owned()), text));
    }

    if let Some(content) = record.content.as_deref() {
        if primaries.contains(&PrimaryAttribute::Content) && !pins_identity(chosen.as_ref()) {
            chosen = Some((IdentityKey::Content, content));
        }
    }

    let (key, raw) = chosen?;
    if raw.is_empty() {
        return None;
    }
    let value = match &key {
        IdentityKey::Content => raw.to_string(),
        IdentityKey::Attribute(name) if name == "itemprop" => raw.to_string(),
        IdentityKey::Attribute(_) => raw.to_lowercase(),
    };
    Some(TagIdentity { key, value })
}

fn pins_identity(chosen: Option<&(IdentityKey, &str)>) -> bool {
    matches!(
        chosen,
        Some((IdentityKey::Attribute(name), value))
            if name == "rel" && value.eq_ignore_ascii_case("canonical")
    )
}
