/// Default icon file extension, without the leading dot
pub const DEFAULT_EXTENSION: &str = "svg";

/// Normalize a requested icon name into its cache key.
///
/// Surrounding whitespace is trimmed and one trailing `.<extension>` is
/// removed, compared case-insensitively. `"  Home.SVG "` becomes `"Home"`.
pub fn normalize_icon_name(raw: &str, extension: &str) -> String {
    let trimmed = raw.trim();
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return trimmed.to_string();
    }

    let suffix_len = extension.len() + 1;
    if trimmed.len() >= suffix_len && trimmed.is_char_boundary(trimmed.len() - suffix_len) {
        let (stem, suffix) = trimmed.split_at(trimmed.len() - suffix_len);
        if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension) {
            return stem.trim_end().to_string();
        }
    }
    trimmed.to_string()
}

/// Escape a value for use inside a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
