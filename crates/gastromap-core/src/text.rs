// crates/gastromap-core/src/text.rs

/// Convert a string into a folded key suitable for ordering and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Bäckerei` -> `Backerei`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use gastromap_core::text::fold_key;
///
/// assert_eq!(fold_key("Bäckerei"), "backerei");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Escapes text for interpolation into HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
