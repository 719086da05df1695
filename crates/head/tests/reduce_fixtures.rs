use head::{HeadFragment, HeadMarkup, reduce_fragments};
use head_test_support::assert_markup_eq;
use head_test_support::fixtures::{FixtureCase, load_fixture};
use std::path::Path;

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn markup_field(markup: &HeadMarkup, field: &str) -> Option<String> {
    let rendered = match field {
        "title" => markup.title.to_string(),
        "html_attributes" => markup.html_attributes.to_string(),
        "body_attributes" => markup.body_attributes.to_string(),
        "priority" => markup.priority.as_ref()?.to_string(),
        other => {
            let kind = head::TagKind::from_name(other)?;
            markup.tags(kind).to_string()
        }
    };
    Some(rendered)
}

fn run_case(case: &FixtureCase) {
    let fragments = case
        .fragments()
        .unwrap_or_else(|err| panic!("{}: {err}", case.name));
    let refs: Vec<&HeadFragment> = fragments.iter().collect();
    let state = reduce_fragments(&refs);

    if let Some(title) = &case.expect.title {
        assert_eq!(state.title.as_deref(), Some(title.as_str()), "{}", case.name);
    }
    let expected_tags = case
        .expect
        .tags()
        .unwrap_or_else(|err| panic!("{}: {err}", case.name));
    for (kind, records) in expected_tags {
        assert_eq!(state.tags(kind), records.as_slice(), "{}: {kind}", case.name);
    }

    let markup = HeadMarkup::from_state(&state);
    for (field, expected) in &case.expect.markup {
        let actual = markup_field(&markup, field)
            .unwrap_or_else(|| panic!("{}: no markup field `{field}`", case.name));
        assert_markup_eq(expected, &actual);
    }
}

#[test]
fn reduce_fixture_cases() {
    let file = load_fixture(&fixture_path("reduce.toml")).expect("fixture loads");
    assert!(!file.cases.is_empty());
    for case in &file.cases {
        run_case(case);
    }
}

#[test]
fn reducing_twice_is_identical() {
    let file = load_fixture(&fixture_path("reduce.toml")).expect("fixture loads");
    for case in &file.cases {
        let fragments = case.fragments().expect("valid declarations");
        let refs: Vec<&HeadFragment> = fragments.iter().collect();
        let first = reduce_fragments(&refs);
        let second = reduce_fragments(&refs);
        assert_eq!(first, second, "{}", case.name);
        assert_eq!(
            HeadMarkup::from_state(&first),
            HeadMarkup::from_state(&second),
            "{}",
            case.name
        );
    }
}
