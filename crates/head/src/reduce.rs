//! Fold an ordered declaration list into one canonical head state.
//!
//! Contract:
//! - Input is oldest first. The function is pure; equal input gives equal output.
//! - Scalars (title, template, default title, each option) come from the newest
//!   declaration that sets them.
//! - Attribute maps merge oldest to newest; later keys overwrite.
//! - `base` keeps a single record: the last valid one of the newest declaration
//!   that has any.
//! - Other kinds dedupe by identity across declarations. A newer declaration
//!   shadows same-identity tags of older ones; duplicates inside one declaration
//!   are kept. Output is newest declaration first, each in declared order.
//! - Records without a valid identity are dropped.

use crate::fragment::{ChangeObserver, Declaration, HeadFragment};
use crate::identity::{TagIdentity, resolve_identity};
use crate::types::{AttributeKind, AttributeMap, PerAttribute, PerTag, TagKind, TagRecord};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub defer: bool,
    pub encode_special_characters: bool,
    pub prioritize_seo_tags: bool,
    pub on_change_client_state: Option<ChangeObserver>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            defer: true,
            encode_special_characters: true,
            prioritize_seo_tags: false,
            on_change_client_state: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalState {
    pub tags: PerTag<Vec<TagRecord>>,
    pub attributes: PerAttribute<AttributeMap>,
    pub title: Option<String>,
    pub options: ResolvedOptions,
}

impl CanonicalState {
    pub fn tags(&self, kind: TagKind) -> &[TagRecord] {
        self.tags.get(kind)
    }

    pub fn attributes(&self, kind: AttributeKind) -> &AttributeMap {
        self.attributes.get(kind)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CanonicalState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("title", &self.title)?;
        for (kind, attributes) in self.attributes.iter() {
            map.serialize_entry(&format!("{}Attributes", kind.element_name()), attributes)?;
        }
        for (kind, tags) in self.tags.iter() {
            map.serialize_entry(kind.name(), tags)?;
        }
        map.serialize_entry("defer", &self.options.defer)?;
        map.serialize_entry(
            "encodeSpecialCharacters",
            &self.options.encode_special_characters,
        )?;
        map.serialize_entry("prioritizeSeoTags", &self.options.prioritize_seo_tags)?;
        map.end()
    }
}

pub fn reduce(declarations: &[Declaration]) -> CanonicalState {
    let fragments: Vec<&HeadFragment> = declarations.iter().map(|d| &d.fragment).collect();
    reduce_fragments(&fragments)
}

pub fn reduce_fragments(fragments: &[&HeadFragment]) -> CanonicalState {
    let mut state = CanonicalState {
        title: resolve_title(fragments),
        options: resolve_options(fragments),
        ..CanonicalState::default()
    };

    for kind in AttributeKind::ALL {
        let merged = state.attributes.get_mut(kind);
        for fragment in fragments {
            merged.merge_from(fragment.attributes.get(kind));
        }
    }

    for kind in TagKind::ALL {
        *state.tags.get_mut(kind) = match kind {
            TagKind::Base => base_tag(fragments),
            _ => dedupe_tags(kind, fragments),
        };
    }

    state
}

fn innermost<'a, T>(
    fragments: &[&'a HeadFragment],
    pick: impl Fn(&'a HeadFragment) -> Option<T>,
) -> Option<T> {
    fragments.iter().rev().find_map(|fragment| pick(*fragment))
}

fn resolve_title(fragments: &[&HeadFragment]) -> Option<String> {
    let title = innermost(fragments, |f| f.title.as_ref())
        .map(|t| t.flatten())
        .filter(|title| !title.is_empty());
    let template = innermost(fragments, |f| f.title_template.as_deref())
        .filter(|template| !template.is_empty());
    match (title, template) {
        (Some(title), Some(template)) => Some(template.replace("%s", &title)),
        (Some(title), None) => Some(title),
        (None, _) => innermost(fragments, |f| f.default_title.clone()),
    }
}

fn resolve_options(fragments: &[&HeadFragment]) -> ResolvedOptions {
    let defaults = ResolvedOptions::default();
    ResolvedOptions {
        defer: innermost(fragments, |f| f.options.defer).unwrap_or(defaults.defer),
        encode_special_characters: innermost(fragments, |f| f.options.encode_special_characters)
            .unwrap_or(defaults.encode_special_characters),
        prioritize_seo_tags: innermost(fragments, |f| f.options.prioritize_seo_tags)
            .unwrap_or(defaults.prioritize_seo_tags),
        on_change_client_state: innermost(fragments, |f| {
            f.options.on_change_client_state.clone()
        }),
    }
}

fn base_tag(fragments: &[&HeadFragment]) -> Vec<TagRecord> {
    fragments
        .iter()
        .rev()
        .find_map(|fragment| {
            fragment
                .tags
                .get(TagKind::Base)
                .iter()
                .rev()
                .find(|record| resolve_identity(TagKind::Base, record).is_some())
        })
        .map(|record| vec![record.clone()])
        .unwrap_or_default()
}

fn dedupe_tags(kind: TagKind, fragments: &[&HeadFragment]) -> Vec<TagRecord> {
    let mut approved: HashSet<TagIdentity> = HashSet::new();
    let mut out = Vec::new();

    for fragment in fragments.iter().rev() {
        let mut seen_here = Vec::new();
        for record in fragment.tags.get(kind) {
            let Some(identity) = resolve_identity(kind, record) else {
                log::debug!(target: "head.reduce", "dropping {kind} without identity: {record:?}");
                continue;
            };
            if approved.contains(&identity) {
                continue;
            }
            seen_here.push(identity);
            out.push(record.clone());
        }
        approved.extend(seen_here);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrValue, Title};

    fn tags(state: &CanonicalState, kind: TagKind) -> Vec<Vec<(String, String)>> {
        state
            .tags(kind)
            .iter()
            .map(|record| {
                record
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.as_text().unwrap_or("").to_string()))
                    .collect()
            })
            .collect()
    }

    fn link(rel: &str, href: &str) -> TagRecord {
        TagRecord::new().attr("rel", rel).attr("href", href)
    }

    #[test]
    fn empty_input_is_empty_state() {
        let state = reduce_fragments(&[]);
        assert_eq!(state.title, None);
        assert!(TagKind::ALL.iter().all(|k| state.tags(*k).is_empty()));
        assert!(state.attributes(AttributeKind::Html).is_empty());
        assert!(state.options.defer);
        assert!(state.options.encode_special_characters);
        assert!(!state.options.prioritize_seo_tags);
    }

    #[test]
    fn newest_title_wins() {
        let a = HeadFragment::new().title("A");
        let b = HeadFragment::new();
        let c = HeadFragment::new().title("C");
        let d = HeadFragment::new().defer(false);
        let state = reduce_fragments(&[&a, &b, &c, &d]);
        assert_eq!(state.title.as_deref(), Some("C"));
        assert!(!state.options.defer);
    }

    #[test]
    fn title_template_and_default() {
        let outer = HeadFragment::new()
            .title_template("%s | Site")
            .default_title("Site");
        let inner = HeadFragment::new().title(Title::Fragments(vec!["A".into(), "B".into()]));
        assert_eq!(
            reduce_fragments(&[&outer, &inner]).title.as_deref(),
            Some("AB | Site")
        );
        assert_eq!(reduce_fragments(&[&outer]).title.as_deref(), Some("Site"));
        let empty = HeadFragment::new().title("");
        let plain = HeadFragment::new().default_title("Fallback");
        assert_eq!(
            reduce_fragments(&[&plain, &empty]).title.as_deref(),
            Some("Fallback")
        );
    }

    #[test]
    fn empty_title_or_template_is_ignored() {
        let outer = HeadFragment::new()
            .title_template("%s | Site")
            .default_title("Site");
        let empty = HeadFragment::new().title("");
        assert_eq!(
            reduce_fragments(&[&outer, &empty]).title.as_deref(),
            Some("Site")
        );
        let no_parts = HeadFragment::new().title(Title::Fragments(Vec::new()));
        assert_eq!(
            reduce_fragments(&[&outer, &no_parts]).title.as_deref(),
            Some("Site")
        );

        let blank_template = HeadFragment::new().title_template("").title("Real");
        assert_eq!(
            reduce_fragments(&[&blank_template]).title.as_deref(),
            Some("Real")
        );
        assert_eq!(reduce_fragments(&[&HeadFragment::new().title("")]).title, None);
    }

    #[test]
    fn attributes_merge_oldest_to_newest() {
        let a = HeadFragment::new()
            .attribute(AttributeKind::Html, "lang", "en")
            .attribute(AttributeKind::Html, "dir", "ltr");
        let b = HeadFragment::new().attribute(AttributeKind::Html, "lang", "ga");
        let state = reduce_fragments(&[&a, &b]);
        let html = state.attributes(AttributeKind::Html);
        assert_eq!(html.get("lang"), Some(&AttrValue::from("ga")));
        assert_eq!(html.get("dir"), Some(&AttrValue::from("ltr")));
    }

    #[test]
    fn base_is_a_singleton_from_newest() {
        let fragments: Vec<HeadFragment> = ["http://x", "http://y", "http://z"]
            .into_iter()
            .map(|href| HeadFragment::new().tag(TagKind::Base, TagRecord::new().attr("href", href)))
            .collect();
        let refs: Vec<&HeadFragment> = fragments.iter().collect();
        let state = reduce_fragments(&refs);
        assert_eq!(
            tags(&state, TagKind::Base),
            vec![vec![("href".to_string(), "http://z".to_string())]]
        );
    }

    #[test]
    fn base_without_href_is_skipped() {
        let a = HeadFragment::new().tag(TagKind::Base, TagRecord::new().attr("href", "/a"));
        let b = HeadFragment::new()
            .tag(TagKind::Base, TagRecord::new().attr("href", "/b"))
            .tag(TagKind::Base, TagRecord::new().attr("target", "_blank"));
        let state = reduce_fragments(&[&a, &b]);
        assert_eq!(state.tags(TagKind::Base), &[TagRecord::new().attr("href", "/b")]);
    }

    #[test]
    fn canonical_links_collapse_to_newest() {
        let a = HeadFragment::new().tag(TagKind::Link, link("canonical", "/a"));
        let b = HeadFragment::new().tag(TagKind::Link, link("canonical", "/b"));
        let state = reduce_fragments(&[&a, &b]);
        assert_eq!(state.tags(TagKind::Link), &[link("canonical", "/b")]);
    }

    #[test]
    fn distinct_stylesheets_survive() {
        let a = HeadFragment::new().tag(TagKind::Link, link("stylesheet", "/a.css"));
        let b = HeadFragment::new().tag(TagKind::Link, link("stylesheet", "/b.css"));
        let state = reduce_fragments(&[&a, &b]);
        assert_eq!(
            state.tags(TagKind::Link),
            &[link("stylesheet", "/b.css"), link("stylesheet", "/a.css")]
        );
    }

    #[test]
    fn duplicates_within_one_declaration_are_kept() {
        let a = HeadFragment::new()
            .tag(TagKind::Meta, TagRecord::new().attr("name", "x").attr("content", "1"))
            .tag(TagKind::Meta, TagRecord::new().attr("name", "x").attr("content", "2"));
        let state = reduce_fragments(&[&a]);
        assert_eq!(state.tags(TagKind::Meta).len(), 2);
    }

    #[test]
    fn newer_declaration_shadows_and_orders_first() {
        let old = HeadFragment::new()
            .tag(TagKind::Meta, TagRecord::new().attr("name", "description").attr("content", "old"))
            .tag(TagKind::Meta, TagRecord::new().attr("name", "keywords").attr("content", "k"));
        let new = HeadFragment::new()
            .tag(TagKind::Meta, TagRecord::new().attr("charset", "utf-8"))
            .tag(TagKind::Meta, TagRecord::new().attr("name", "Description").attr("content", "new"));
        let state = reduce_fragments(&[&old, &new]);
        let contents: Vec<_> = state
            .tags(TagKind::Meta)
            .iter()
            .map(|r| {
                r.attributes
                    .get("content")
                    .or(r.attributes.get("charset"))
                    .and_then(AttrValue::as_text)
                    .unwrap_or("")
                    .to_string()
            })
            .collect();
        assert_eq!(contents, ["utf-8", "new", "k"]);
    }

    #[test]
    fn invalid_meta_does_not_disturb_siblings() {
        let a = HeadFragment::new()
            .tag(TagKind::Meta, TagRecord::new().attr("name", "a").attr("content", "1"))
            .tag(TagKind::Meta, TagRecord::new().attr("content", "orphan"))
            .tag(TagKind::Meta, TagRecord::new().attr("property", "og:title").attr("content", "t"));
        let state = reduce_fragments(&[&a]);
        assert_eq!(state.tags(TagKind::Meta).len(), 2);
    }

    #[test]
    fn reduction_is_deterministic() {
        let a = HeadFragment::new()
            .title("A")
            .tag(TagKind::Script, TagRecord::new().attr("src", "/a.js"))
            .tag(TagKind::Style, TagRecord::new().content("body{}"));
        let b = HeadFragment::new().tag(TagKind::Script, TagRecord::new().attr("src", "/A.JS"));
        assert_eq!(reduce_fragments(&[&a, &b]), reduce_fragments(&[&a, &b]));
        assert_eq!(reduce_fragments(&[&a, &b]).tags(TagKind::Script).len(), 1);
    }
}
