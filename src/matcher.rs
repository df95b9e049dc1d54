// ABOUTME: Existing-post matcher over paginated backend listings
// ABOUTME: URL match wins over title match; transport failure means exhausted

use crate::identity::same_url;
use crate::model::{CanonicalIdentity, RemotePost};
use crate::Result;

/// One page of a backend's post listing. `next_cursor` is `None` when the
/// backend reports no further pages (always `None` for single-call listings).
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub posts: Vec<RemotePost>,
    pub next_cursor: Option<String>,
}

/// Scan one page for the target identity. First post whose normalized URL
/// equals the target's canonical URL wins; only when no URL match exists is
/// the first exact-title match consulted. The two checks must stay ordered
/// and separate: title collisions across unrelated posts are plausible.
pub fn match_in_page(page: &[RemotePost], identity: &CanonicalIdentity) -> Option<RemotePost> {
    if let Some(post) = page.iter().find(|p| same_url(&p.url, &identity.url)) {
        return Some(post.clone());
    }
    page.iter().find(|p| p.title == identity.title).cloned()
}

/// Walk a paginated listing until a match is found or pages are exhausted.
/// `fetch` is called with `None` for the first page and with the prior page's
/// cursor afterwards. A transport failure on any fetch is logged and treated
/// as exhausted: "could not determine if a post exists" degrades to "no post
/// exists", which risks a duplicate create rather than a skipped publication.
pub fn find_match<F>(
    backend: &str,
    identity: &CanonicalIdentity,
    mut fetch: F,
) -> Option<RemotePost>
where
    F: FnMut(Option<&str>) -> Result<Page>,
{
    let mut cursor: Option<String> = None;

    loop {
        let page = match fetch(cursor.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                log::error!(
                    "{}: listing failed while searching for {}: {} (assuming no existing post)",
                    backend,
                    identity.url,
                    e
                );
                return None;
            }
        };

        if let Some(post) = match_in_page(&page.posts, identity) {
            return Some(post);
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return None,
        }
    }
}
