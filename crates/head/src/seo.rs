use crate::attr_names::canonical_name;
use crate::reduce::CanonicalState;
use crate::types::{TagKind, TagRecord};

/// Allowed values for one attribute. An empty value list matches on presence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatcher {
    pub attribute: String,
    pub values: Vec<String>,
}

impl AttributeMatcher {
    pub fn new(attribute: &str, values: &[&str]) -> Self {
        Self {
            attribute: attribute.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn matches(&self, record: &TagRecord) -> bool {
        record.attributes.iter().any(|(name, value)| {
            canonical_name(name) == self.attribute.as_str()
                && (self.values.is_empty()
                    || value
                        .as_text()
                        .is_some_and(|text| self.values.iter().any(|v| v == text)))
        })
    }
}

/// Priority matcher table for the three prioritizable kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeoMatchers {
    pub meta: Vec<AttributeMatcher>,
    pub link: Vec<AttributeMatcher>,
    pub script: Vec<AttributeMatcher>,
}

impl Default for SeoMatchers {
    fn default() -> Self {
        Self {
            meta: vec![
                AttributeMatcher::new("charset", &[]),
                AttributeMatcher::new("name", &["robots", "description"]),
                AttributeMatcher::new(
                    "property",
                    &[
                        "og:type",
                        "og:title",
                        "og:url",
                        "og:image",
                        "og:image:alt",
                        "og:description",
                        "twitter:url",
                        "twitter:title",
                        "twitter:description",
                        "twitter:image",
                        "twitter:image:alt",
                        "twitter:card",
                        "twitter:site",
                    ],
                ),
            ],
            link: vec![AttributeMatcher::new(
                "rel",
                &["amphtml", "canonical", "alternate"],
            )],
            script: vec![AttributeMatcher::new("type", &["application/ld+json"])],
        }
    }
}

impl SeoMatchers {
    /// Matchers for `kind`; kinds outside meta/link/script have none.
    pub fn for_kind(&self, kind: TagKind) -> &[AttributeMatcher] {
        match kind {
            TagKind::Meta => &self.meta,
            TagKind::Link => &self.link,
            TagKind::Script => &self.script,
            TagKind::Base | TagKind::Noscript | TagKind::Style => &[],
        }
    }

    pub fn is_priority(&self, kind: TagKind, record: &TagRecord) -> bool {
        self.for_kind(kind).iter().any(|m| m.matches(record))
    }

    /// Stable split of `records` into (priority, default).
    pub fn partition(&self, kind: TagKind, records: &[TagRecord]) -> Partition {
        let (priority, default): (Vec<_>, Vec<_>) = records
            .iter()
            .cloned()
            .partition(|record| self.is_priority(kind, record));
        Partition { priority, default }
    }

    pub fn prioritize(&self, state: &CanonicalState) -> PrioritizedTags {
        PrioritizedTags {
            meta: self.partition(TagKind::Meta, state.tags(TagKind::Meta)),
            link: self.partition(TagKind::Link, state.tags(TagKind::Link)),
            script: self.partition(TagKind::Script, state.tags(TagKind::Script)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub priority: Vec<TagRecord>,
    pub default: Vec<TagRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrioritizedTags {
    pub meta: Partition,
    pub link: Partition,
    pub script: Partition,
}

impl PrioritizedTags {
    pub fn get(&self, kind: TagKind) -> Option<&Partition> {
        match kind {
            TagKind::Meta => Some(&self.meta),
            TagKind::Link => Some(&self.link),
            TagKind::Script => Some(&self.script),
            TagKind::Base | TagKind::Noscript | TagKind::Style => None,
        }
    }
}
