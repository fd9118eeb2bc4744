use std::collections::HashSet;

use ammonia::Builder;
use once_cell::sync::Lazy;

/// Ammonia builder with every tag disallowed: output is plain text.
/// Script and style bodies are dropped entirely.
static STRIP_ALL: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(HashSet::new())
        .clean_content_tags(HashSet::from(["script", "style"]))
        .strip_comments(true);
    builder
});

/// Strips HTML and trims surrounding whitespace from a free-text field.
pub fn clean_text(input: &str) -> String {
    STRIP_ALL.clean(input).to_string().trim().to_string()
}

/// Lowercased, trimmed email.
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Trimmed value, or None when the field was left empty.
pub fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
