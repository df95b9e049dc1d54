// ABOUTME: Tag sanitization strategies for backend-specific tag alphabets
// ABOUTME: Token strategy strips characters; lookup strategy slugs for queries

/// Sanitize a tag into a backend-native token: lowercase, every character
/// outside the accepted alphabet stripped. `allow_dashes` widens the alphabet
/// from letters/digits to letters/digits/dashes. Tags that sanitize to empty
/// are dropped by callers, never sent.
pub fn sanitize_token(tag: &str, allow_dashes: bool) -> String {
    tag.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || (allow_dashes && *c == '-'))
        .collect()
}

/// Slug form of a tag for lookup-style backends: lowercase, non-alphanumeric
/// runs collapsed to a single dash.
pub fn tag_slug(tag: &str) -> String {
    slug::slugify(tag)
}
