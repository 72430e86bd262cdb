/// Canonical slug used for category/banner identity.
///
/// Transform steps:
/// - trim and lowercase
/// - collapse every run of non-alphanumerics into a single hyphen
/// - no leading/trailing hyphens
///
/// The output is safe to embed in URLs and stable for equality checks, so it
/// doubles as the de-duplication key for banner sets.
pub fn to_game_slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut gap = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Whether a free-text label resolves to the given slug.
pub fn is_same_game_slug(value: &str, slug: &str) -> bool {
    to_game_slug(value) == slug
}
