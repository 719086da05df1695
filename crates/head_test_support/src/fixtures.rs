//! TOML fixtures describing declaration lists and the state they must reduce to.
//!
//! Format:
//! - `[[case]]` with `name`, any number of `[[case.declaration]]` tables (oldest
//!   first) and an optional `[case.expect]` table.
//! - Tag lists (`base`, `link`, `meta`, `noscript`, `script`, `style`) are arrays of
//!   inline tables; key order is kept. The reserved key `inner` is inline content.
//! - `expect.markup` maps accessor names (`title`, `meta`, `priority`, ...) to the
//!   exact string they must render.

use head::{AttrValue, AttributeKind, AttributeMap, HeadFragment, TagKind, TagRecord, Title};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

const INNER_KEY: &str = "inner";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid fixture toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported value for `{key}`: {value}")]
    UnsupportedValue { key: String, value: String },
    #[error("unknown tag kind `{0}`")]
    UnknownKind(String),
}

#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    #[serde(rename = "case", default)]
    pub cases: Vec<FixtureCase>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    #[serde(rename = "declaration", default)]
    pub declarations: Vec<DeclarationFixture>,
    #[serde(default)]
    pub expect: Expectation,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TitleFixture {
    Text(String),
    Fragments(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
pub struct DeclarationFixture {
    pub title: Option<TitleFixture>,
    pub title_template: Option<String>,
    pub default_title: Option<String>,
    pub defer: Option<bool>,
    pub encode_special_characters: Option<bool>,
    pub prioritize_seo_tags: Option<bool>,
    #[serde(default)]
    pub html_attributes: Table,
    #[serde(default)]
    pub body_attributes: Table,
    #[serde(default)]
    pub title_attributes: Table,
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<Table>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Expectation {
    pub title: Option<String>,
    #[serde(default)]
    pub markup: BTreeMap<String, String>,
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<Table>>,
}

impl FixtureCase {
    pub fn fragments(&self) -> Result<Vec<HeadFragment>, FixtureError> {
        self.declarations.iter().map(DeclarationFixture::to_fragment).collect()
    }
}

impl DeclarationFixture {
    pub fn to_fragment(&self) -> Result<HeadFragment, FixtureError> {
        let mut fragment = HeadFragment::new();
        fragment.title = self.title.as_ref().map(|title| match title {
            TitleFixture::Text(text) => Title::Text(text.clone()),
            TitleFixture::Fragments(parts) => Title::Fragments(parts.clone()),
        });
        fragment.title_template = self.title_template.clone();
        fragment.default_title = self.default_title.clone();
        fragment.options.defer = self.defer;
        fragment.options.encode_special_characters = self.encode_special_characters;
        fragment.options.prioritize_seo_tags = self.prioritize_seo_tags;

        for (kind, table) in [
            (AttributeKind::Html, &self.html_attributes),
            (AttributeKind::Body, &self.body_attributes),
            (AttributeKind::Title, &self.title_attributes),
        ] {
            *fragment.attributes.get_mut(kind) = attribute_map(table)?;
        }

        for (name, records) in &self.tags {
            let kind = parse_kind(name)?;
            for table in records {
                fragment.tags.get_mut(kind).push(tag_record(table)?);
            }
        }
        Ok(fragment)
    }
}

impl Expectation {
    /// Expected records per kind; kinds not listed are not checked.
    pub fn tags(&self) -> Result<Vec<(TagKind, Vec<TagRecord>)>, FixtureError> {
        self.tags
            .iter()
            .map(|(name, tables)| {
                let kind = parse_kind(name)?;
                let records: Vec<TagRecord> = tables.iter().map(tag_record).collect::<Result<_, _>>()?;
                Ok((kind, records))
            })
            .collect()
    }
}

pub fn parse_fixture(input: &str) -> Result<FixtureFile, FixtureError> {
    Ok(toml::from_str(input)?)
}

pub fn load_fixture(path: &Path) -> Result<FixtureFile, FixtureError> {
    let input = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_fixture(&input)
}

fn parse_kind(name: &str) -> Result<TagKind, FixtureError> {
    TagKind::from_name(name).ok_or_else(|| FixtureError::UnknownKind(name.to_string()))
}

fn attr_value(key: &str, value: &Value) -> Result<AttrValue, FixtureError> {
    match value {
        Value::String(text) => Ok(AttrValue::Text(text.clone())),
        Value::Boolean(flag) => Ok(AttrValue::Bool(*flag)),
        other => Err(FixtureError::UnsupportedValue {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

fn attribute_map(table: &Table) -> Result<AttributeMap, FixtureError> {
    let mut map = AttributeMap::new();
    for (key, value) in table {
        map.insert(key.clone(), attr_value(key, value)?);
    }
    Ok(map)
}

fn tag_record(table: &Table) -> Result<TagRecord, FixtureError> {
    let mut record = TagRecord::new();
    for (key, value) in table {
        if key == INNER_KEY {
            let Value::String(text) = value else {
                return Err(FixtureError::UnsupportedValue {
                    key: key.clone(),
                    value: value.to_string(),
                });
            };
            record.content = Some(text.clone());
        } else {
            record.attributes.insert(key.clone(), attr_value(key, value)?);
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[case]]
name = "sample"

[[case.declaration]]
title = ["Hello", " ", "World"]
html_attributes = { lang = "en", amp = true }
link = [{ rel = "canonical", href = "/a" }]
script = [{ src = "/s.js", inner = "boot()" }]

[case.expect]
title = "Hello World"
link = [{ rel = "canonical", href = "/a" }]
markup = { title = "<title>x</title>" }
"#;

    #[test]
    fn parses_sample() {
        let file = parse_fixture(SAMPLE).expect("valid fixture");
        let case = &file.cases[0];
        let fragments = case.fragments().expect("valid declarations");
        let fragment = &fragments[0];
        assert_eq!(fragment.title.as_ref().map(Title::flatten).as_deref(), Some("Hello World"));
        let names: Vec<_> = fragment.tags.get(TagKind::Link)[0]
            .attributes
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(names, ["rel", "href"]);
        assert_eq!(
            fragment.tags.get(TagKind::Script)[0].content.as_deref(),
            Some("boot()")
        );
        assert_eq!(
            fragment.attributes.get(AttributeKind::Html).get("amp"),
            Some(&AttrValue::Bool(true))
        );
        let expected = case.expect.tags().expect("valid expectation");
        assert_eq!(expected[0].0, TagKind::Link);
        assert_eq!(case.expect.markup["title"], "<title>x</title>");
    }

    #[test]
    fn rejects_unknown_kind() {
        let file = parse_fixture(
            r#"
[[case]]
name = "bad"
[[case.declaration]]
div = [{ id = "x" }]
"#,
        )
        .expect("valid toml");
        assert!(matches!(
            file.cases[0].fragments(),
            Err(FixtureError::UnknownKind(_))
        ));
    }
}
