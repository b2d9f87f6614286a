//! UTF-8-safe string helpers
//!
//! Scraped job pages routinely contain multi-byte characters (currency signs,
//! accented company names, emoji bullets), so every slice here respects char
//! boundaries and never panics.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use jobscrape::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("€€€", 2), "€€");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Find a safe byte index for truncation, preferring word boundaries.
///
/// Returns the byte index of the last whitespace (or one of `boundary_chars`)
/// within the first `max_chars` characters. Falls back to the `max_chars`-th
/// character when no boundary exists, and to `s.len()` for shorter strings.
///
/// # Examples
/// ```
/// # use jobscrape::utils::string_utils::safe_truncate_boundary;
/// let text = "Senior Rust Engineer, Berlin office";
/// let idx = safe_truncate_boundary(text, 21, ",");
/// assert_eq!(&text[..idx], "Senior Rust Engineer");
/// ```
pub fn safe_truncate_boundary(s: &str, max_chars: usize, boundary_chars: &str) -> usize {
    let Some((max_byte_idx, _)) = s.char_indices().nth(max_chars) else {
        return s.len();
    };

    s[..max_byte_idx]
        .rfind(|c: char| c.is_whitespace() || boundary_chars.contains(c))
        .unwrap_or(max_byte_idx)
}

/// Collapse runs of blank lines and trailing whitespace in rendered page text.
///
/// `innerText` keeps one line per block element, which leaves long stretches
/// of empty lines on layout-heavy job boards.
pub fn compact_page_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_boundary_falls_back_to_char_index() {
        let text = "abcdefghij";
        assert_eq!(safe_truncate_boundary(text, 4, " "), 4);
        assert_eq!(safe_truncate_boundary(text, 40, " "), text.len());
    }

    #[test]
    fn compact_page_text_squashes_blank_runs() {
        let raw = "Acme Corp\n\n\n\n  \nStaff Engineer   \nRemote\n\n";
        assert_eq!(compact_page_text(raw), "Acme Corp\n\nStaff Engineer\nRemote");
    }

    #[test]
    fn compact_page_text_of_whitespace_is_empty() {
        assert_eq!(compact_page_text(" \n\t\n "), "");
    }
}
