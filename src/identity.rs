// ABOUTME: Canonical identity resolver and URL normalization
// ABOUTME: Normalized URLs are for comparison only, never sent to backends

use crate::model::CanonicalIdentity;
use std::path::Path;

impl CanonicalIdentity {
    /// Derive the canonical identity for an article from its source path.
    /// The file's base name (extension stripped) is interpolated into
    /// `{base}/posts/{name}/`. Pure; malformed paths pass through as-is.
    pub fn resolve(source_path: &Path, site_base: &str, title: &str) -> Self {
        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        CanonicalIdentity {
            url: format!("{}/posts/{}/", site_base.trim_end_matches('/'), stem),
            title: title.to_string(),
        }
    }
}

/// Normalize a URL for identity comparison: strip a leading `http://` or
/// `https://`, strip one trailing `/`, lowercase the remainder. Backends echo
/// URLs back with differing scheme/case/trailing-slash conventions; without
/// this, idempotent matching fails and duplicate posts get created.
pub fn normalize_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.strip_suffix('/').unwrap_or(stripped).to_lowercase()
}

/// Whether two URLs name the same identity.
pub fn same_url(a: &str, b: &str) -> bool {
    normalize_url(a) == normalize_url(b)
}
