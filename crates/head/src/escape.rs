use memchr::{memchr2, memchr3};
use std::borrow::Cow;

/// Escape text for use inside markup.
///
/// Contract:
/// - Replaces `&`, `<`, `>`, `"` and `'` with `&amp;`, `&lt;`, `&gt;`, `&quot;`
///   and `&#x27;`.
/// - Everything else passes through unchanged; input without any of the five
///   bytes is returned borrowed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if memchr3(b'&', b'<', b'>', bytes).is_none() && memchr2(b'"', b'\'', bytes).is_none() {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Escape only when `encode` is set.
pub fn escape_if(s: &str, encode: bool) -> Cow<'_, str> {
    if encode { escape_html(s) } else { Cow::Borrowed(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn clean_input_is_borrowed() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn disabled_passes_through() {
        assert_eq!(escape_if("a & b", false), "a & b");
        assert_eq!(escape_if("a & b", true), "a &amp; b");
    }
}
