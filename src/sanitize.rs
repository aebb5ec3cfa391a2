//! Escaping and file-name cleanup for anything built from transcript text.

const MAX_FILE_NAME: usize = 100;

/// Escape text for safe interpolation into HTML, quotes included.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a string usable as a single file name: no separators, no `..`,
/// at most 100 characters.
pub fn file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let replaced = replaced.replace("..", "_");
    replaced
        .chars()
        .take(MAX_FILE_NAME)
        .collect::<String>()
        .trim()
        .to_string()
}
