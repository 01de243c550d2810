//! Filename normalization.

/// Derives the deduplication key from a raw filename: spaces become
/// underscores, the result is lowercased, and every character outside
/// `[a-z0-9._-]` is dropped.
///
/// Other whitespace (tabs, newlines) is removed by the final filter rather
/// than underscored. The result may be empty when sanitization strips the
/// whole name; callers must reject such records.
pub fn normalize_name(raw: &str) -> String {
    raw.replace(' ', "_")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        .collect()
}
