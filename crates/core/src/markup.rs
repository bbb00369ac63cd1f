//! Safe composition of speech markup documents.
//!
//! Documents are authored as indented, multi-line templates. [`compose`]
//! interleaves trusted literal fragments with untrusted values, escaping only
//! the values, and then compacts the result for the wire.

/// Replaces the markup-reserved characters `&`, `<`, `>` and `"` with their
/// entity equivalents. Each input character is visited once, so entities
/// produced here are never escaped a second time.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Trims the text, collapses every whitespace run to a single space and drops
/// the spaces that would sit directly before `<` or directly after `>`.
pub fn normalize_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if ch != '<' && !normalized.ends_with('>') {
                normalized.push(' ');
            }
            pending_space = false;
        }
        normalized.push(ch);
    }

    normalized
}

/// Builds one document from literal `fragments` interleaved with dynamic
/// `values` (`fragments[0] values[0] fragments[1] ...`).
///
/// The expected shape is `fragments.len() == values.len() + 1`. Surplus
/// fragments are appended as literals and surplus values are appended
/// escaped, so short or empty inputs degrade to literal-only or empty output.
pub fn compose<V: AsRef<str>>(fragments: &[&str], values: &[V]) -> String {
    let mut raw = String::new();
    let longest = fragments.len().max(values.len());

    for index in 0..longest {
        if let Some(fragment) = fragments.get(index) {
            raw.push_str(fragment);
        }
        if let Some(value) = values.get(index) {
            raw.push_str(&escape(value.as_ref()));
        }
    }

    normalize_whitespace(&raw)
}

#[cfg(test)]
mod tests {
    use super::{compose, escape, normalize_whitespace};

    const NO_VALUES: [&str; 0] = [];

    #[test]
    fn escape_replaces_each_reserved_character_once() {
        assert_eq!(escape(r#"a & b < c > d "e""#), "a &amp; b &lt; c &gt; d &quot;e&quot;");
        assert_eq!(escape("&amp;"), "&amp;amp;", "pre-escaped input is treated as plain text");
    }

    #[test]
    fn escape_leaves_safe_text_untouched() {
        assert_eq!(escape("plain words, 123"), "plain words, 123");
    }

    #[test]
    fn compose_escapes_only_dynamic_values() {
        let document = compose(&["<speak>", "</speak>"], &[r#""1 + 1 > 1""#]);
        assert_eq!(document, "<speak>&quot;1 + 1 &gt; 1&quot;</speak>");
    }

    #[test]
    fn compose_passes_literal_markup_through() {
        let document = compose(&[r#"<speak><break time="1s"/></speak>"#], &NO_VALUES);
        assert_eq!(document, r#"<speak><break time="1s"/></speak>"#);
    }

    #[test]
    fn compose_collapses_indented_multiline_templates() {
        let template = r#"
            <speak>
                Hello


                <emphasis level="strong">
                    there
                </emphasis>
                friend
            </speak>
        "#;

        assert_eq!(
            compose(&[template], &NO_VALUES),
            r#"<speak>Hello<emphasis level="strong">there</emphasis>friend</speak>"#
        );
    }

    #[test]
    fn normalize_keeps_single_spaces_between_words() {
        assert_eq!(normalize_whitespace("  one \t two\n\nthree  "), "one two three");
    }

    #[test]
    fn normalize_is_stable_on_already_compact_text() {
        let compact = "<speak>Already compact text.</speak>";
        assert_eq!(normalize_whitespace(compact), compact);
        assert_eq!(normalize_whitespace(&normalize_whitespace(compact)), compact);
    }

    #[test]
    fn compose_degrades_gracefully_on_missing_inputs() {
        assert_eq!(compose(&[], &NO_VALUES), "");
        assert_eq!(compose(&["   \n  "], &NO_VALUES), "");
        assert_eq!(compose(&["<speak>"], &["a<b"]), "<speak>a&lt;b");
        assert_eq!(compose(&[], &["x & y"]), "x &amp; y");
    }

    #[test]
    fn compose_handles_multiple_values_in_order() {
        let document =
            compose(&["<speak>", " and ", "</speak>"], &["Tom & Jerry", "<Bugs>"]);
        assert_eq!(document, "<speak>Tom &amp; Jerry and &lt;Bugs&gt;</speak>");
    }
}
