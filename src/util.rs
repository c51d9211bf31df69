//! Small shared helpers.

/// Take the first `max_chars` characters of a string, counted in chars,
/// never bytes. Slicing Japanese text by byte offset would panic at a
/// multibyte boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Convert an event id to a filesystem-safe file stem.
///
/// Example: "E-102" → "E-102", "案件/17" → "案件-17"
pub fn safe_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("内覧後のフォロー連絡", 4), "内覧後の");
        assert_eq!(truncate_chars("売出", 18), "売出");
    }

    #[test]
    fn test_truncate_chars_empty() {
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(safe_file_stem("E-102"), "E-102");
        assert_eq!(safe_file_stem("../etc/passwd"), "etc-passwd");
        assert_eq!(safe_file_stem("案件/17"), "案件-17");
    }
}
