//! Small string helpers shared by the pipeline stages.

/// Number of Unicode scalar values in `s`.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Trimmed text of at least four characters.
pub(crate) fn is_non_trivial(s: &str) -> bool {
    char_len(s.trim()) >= 4
}

/// Quote characters the model wraps utterances in.
pub(crate) fn is_quote(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '“' | '”' | '‘' | '’' | '「' | '」' | '『' | '』' | '《' | '》'
    )
}

/// Removes duplicates while keeping first occurrences in order.
pub(crate) fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
