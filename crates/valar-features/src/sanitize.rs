//! String normalization for categorical attribute values
//!
//! Dataset strings arrive with inconsistent casing, HTML-escaped or typeset
//! apostrophes, wiki citation markers, and stray quotation marks. Every
//! comparison and vocabulary lookup in the pipeline goes through
//! [`sanitize`] first so that `"Quentyn Martell[12]"` and
//! `"quentyn martell"` land on the same vocabulary entry.

/// Quote characters stripped (at most one each) from the ends of a value.
const EDGE_QUOTES: [char; 5] = ['"', '\'', '\u{2018}', '\u{201c}', '\u{201d}'];

/// Normalizes a raw attribute string.
///
/// Returns `None` for absent or empty input. Otherwise the result is
/// lower-cased, apostrophe variants (`&apos;`, U+2019) are folded to `'`,
/// bracketed numeric citation markers such as `[12]` are removed, and a
/// single leading and trailing quote (straight or curly) is stripped.
///
/// # Examples
///
/// ```
/// use valar_features::sanitize;
///
/// assert_eq!(sanitize(Some("Night&apos;s Watch")), Some("night's watch".to_string()));
/// assert_eq!(sanitize(Some("Braavos[3]")), Some("braavos".to_string()));
/// assert_eq!(sanitize(None), None);
/// ```
#[must_use]
pub fn sanitize(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let lowered = raw
        .to_lowercase()
        .replace("&apos;", "'")
        .replace('\u{2019}', "'");
    let mut stripped = strip_citation_markers(&lowered);

    if let Some(first) = stripped.chars().next()
        && EDGE_QUOTES.contains(&first)
    {
        stripped.drain(..first.len_utf8());
    }
    if let Some(last) = stripped.chars().next_back()
        && EDGE_QUOTES.contains(&last)
    {
        stripped.truncate(stripped.len() - last.len_utf8());
    }

    Some(stripped)
}

/// Sanitized equality: both sides are normalized first, and two absent
/// values compare equal.
#[must_use]
pub fn sanitized_eq(a: Option<&str>, b: Option<&str>) -> bool {
    sanitize(a) == sanitize(b)
}

/// Removes every `[<digits>]` citation marker; other bracketed text stays.
fn strip_citation_markers(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('[') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        if let Some(end) = tail.find(']') {
            let inner = &tail[1..end];
            if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
                rest = &tail[end + 1..];
                continue;
            }
        }
        out.push('[');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_input() {
        assert_eq!(sanitize(Some("Winterfell")), Some("winterfell".to_string()));
    }

    #[test]
    fn absent_and_empty_are_none() {
        assert_eq!(sanitize(None), None);
        assert_eq!(sanitize(Some("")), None);
    }

    #[test]
    fn folds_apostrophe_variants() {
        assert_eq!(
            sanitize(Some("Night&apos;s Watch")),
            Some("night's watch".to_string())
        );
        assert_eq!(
            sanitize(Some("Storm\u{2019}s End")),
            Some("storm's end".to_string())
        );
    }

    #[test]
    fn removes_numeric_citation_markers() {
        assert_eq!(sanitize(Some("Oldtown[12]")), Some("oldtown".to_string()));
        assert_eq!(
            sanitize(Some("a[1]b[23]c")),
            Some("abc".to_string())
        );
        // non-numeric bracket content is preserved
        assert_eq!(
            sanitize(Some("Aegon [the Conqueror]")),
            Some("aegon [the conqueror]".to_string())
        );
        assert_eq!(sanitize(Some("odd[bracket")), Some("odd[bracket".to_string()));
    }

    #[test]
    fn strips_at_most_one_quote_per_end() {
        assert_eq!(sanitize(Some("\"The Hound\"")), Some("the hound".to_string()));
        assert_eq!(
            sanitize(Some("\u{201c}Littlefinger\u{201d}")),
            Some("littlefinger".to_string())
        );
        // only one per end, and inner quotes survive
        assert_eq!(sanitize(Some("''x''")), Some("'x'".to_string()));
    }

    #[test]
    fn sanitized_eq_matches_after_normalization() {
        assert!(sanitized_eq(Some("STARK"), Some("stark")));
        assert!(sanitized_eq(None, None));
        assert!(!sanitized_eq(Some("stark"), None));
        assert!(!sanitized_eq(Some("stark"), Some("tully")));
    }
}
