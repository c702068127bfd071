//! Text clean-up applied when projecting questions onto a display.

/// Decodes the HTML character references the trivia upstream embeds in its
/// strings, covering the full HTML5 named set plus numeric references.
/// Unknown references are left untouched.
pub fn decode_html_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Display label for a category. Upstream names like "Entertainment: Books"
/// are shown as just "Books".
pub fn category_label(name: &str) -> &str {
    match name.split(':').nth(1) {
        Some(tail) => tail.trim(),
        None => name,
    }
}
