// ABOUTME: The uniform capability set every publishing backend implements
// ABOUTME: {skip, find_existing, resolve_tags, publish} with identical semantics

use crate::model::{Article, CanonicalIdentity, PublishOutcome, RemotePost, ResolvedTag};
use crate::Result;
use chrono::{DateTime, Utc};

/// One external publishing service. Concrete adapters own their protocol;
/// the orchestrator sees only these four operations.
pub trait Backend {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    /// True when required credentials are absent. The orchestrator treats a
    /// skipped backend as a no-op, never a failure. Implementations log why.
    fn skip(&self) -> bool;

    /// Search the backend's listing for a post matching the identity.
    /// Normalized canonical-URL equality wins; exact title equality is only
    /// consulted when no URL match exists. Listing failures degrade to `None`.
    fn find_existing(&self, identity: &CanonicalIdentity) -> Option<RemotePost>;

    /// Map local tags to the backend's accepted representation. Tags that do
    /// not resolve are dropped, not errored.
    fn resolve_tags(&self, tags: &[String]) -> Vec<ResolvedTag>;

    /// Create or update the remote post to match the article. Exactly one
    /// remote write per call; the choice of create vs update follows
    /// `find_existing`. Errors are returned, never panicked.
    fn publish(
        &self,
        article: &Article,
        identity: &CanonicalIdentity,
        publish_at: Option<DateTime<Utc>>,
    ) -> Result<PublishOutcome>;
}
