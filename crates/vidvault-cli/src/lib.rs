/// Truncate a string to max_len characters, appending "..." if truncated.
/// Counts characters, not bytes, so multibyte raw names stay intact.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Byte count as megabytes, for the `{:.2}` table columns.
pub fn megabytes(bytes: i64) -> f64 {
    (bytes as f64) / (1024.0 * 1024.0)
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short_and_exact() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 5), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_multibyte_is_not_split() {
        assert_eq!(truncate_string("ααααααααααα", 8), "ααααα...");
    }

    #[test]
    fn megabytes_conversion() {
        assert_eq!(megabytes(0), 0.0);
        assert_eq!(megabytes(1_048_576), 1.0);
        assert!((megabytes(200_000) - 0.19073486328125).abs() < 1e-12);
    }
}
