//! XML text escaping

use std::borrow::Cow;

/// Escape the five XML special characters
///
/// Borrows the input when nothing needs escaping
pub fn escape_xml(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape(escaped: &str) -> String {
        escaped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(escape_xml("music"), Cow::Borrowed("music")));
    }

    #[test]
    fn test_escapes_all_specials() {
        assert_eq!(
            escape_xml(r#"a&b<c>d"e'f"#),
            "a&amp;b&lt;c&gt;d&quot;e&apos;f"
        );
    }

    #[test]
    fn test_ampersand_not_double_escaped() {
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_unescape_recovers_original() {
        for raw in [r#"Tom & Jerry's "<best>""#, "&&&", "<<>>", "plain"] {
            let escaped = escape_xml(raw);
            assert!(!escaped.contains('<') && !escaped.contains('"'));
            assert_eq!(unescape(&escaped), raw);
        }
    }
}
