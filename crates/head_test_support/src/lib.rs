pub mod fixtures;

use std::fmt::Write;

/// Split markup so each element starts on its own line.
pub fn markup_lines(markup: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for (i, ch) in markup.char_indices() {
        if ch == '<' && i != 0 && !markup[i..].starts_with("</") && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn assert_markup_eq(expected: &str, actual: &str) {
    let expected_lines = markup_lines(expected);
    let actual_lines = markup_lines(actual);
    if expected_lines != actual_lines {
        panic!("markup mismatch\n{}", diff_lines(&expected_lines, &actual_lines));
    }
}

/// Element-by-element report of every position where the two renders differ.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let mut out = String::new();
    let mut differing = 0;
    for i in 0..expected.len().max(actual.len()) {
        let (left, right) = (expected.get(i), actual.get(i));
        if left == right {
            continue;
        }
        differing += 1;
        let _ = match (left, right) {
            (Some(left), Some(right)) => {
                writeln!(&mut out, "element {}:\n  - {left}\n  + {right}", i + 1)
            }
            (Some(left), None) => writeln!(&mut out, "element {} missing:\n  - {left}", i + 1),
            (None, Some(right)) => writeln!(&mut out, "element {} unexpected:\n  + {right}", i + 1),
            (None, None) => Ok(()),
        };
    }
    let _ = writeln!(
        &mut out,
        "{differing} differing of {} expected / {} actual elements",
        expected.len(),
        actual.len()
    );
    out
}
