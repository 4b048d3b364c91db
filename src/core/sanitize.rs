// src/core/sanitize.rs

/// Drop the layout whitespace the listing markup pads metadata with
/// (ASCII space, CR, LF, TAB). Other whitespace such as U+00A0 is kept.
pub fn strip_layout_ws(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '\r' | '\n' | '\t'))
        .collect()
}

/// Make a user-supplied file prefix safe to join onto a directory.
/// Non-ASCII letters (CJK prefixes) are kept.
pub fn sanitize_file_prefix(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            c if c.is_control() => {}
            c if c.is_whitespace() => out.push('_'),
            c => out.push(c),
        }
    }
    out
}
