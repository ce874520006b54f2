/// Reduces a raw question to the text the embedding model should see:
/// characters from the Arabic script block (U+0600..U+06FF, which covers
/// Persian letters, digits and punctuation) plus whitespace, then trimmed.
/// The raw question itself is kept elsewhere; this output only feeds
/// retrieval.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_whitespace() || ('\u{0600}'..='\u{06FF}').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
