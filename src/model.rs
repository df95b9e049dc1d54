// ABOUTME: Core data types shared by the reconciliation engine
// ABOUTME: Articles are read-only inputs; remote state is transient per run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally authored article, already parsed from its source file.
/// Immutable input to a run; the engine never mutates it.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub draft: bool,
    pub date: Option<DateTime<Utc>>,
}

/// The normalized (URL, title) pair used to decide whether a remote post
/// corresponds to a given local article. Recomputed each run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalIdentity {
    pub url: String,
    pub title: String,
}

/// A post as a backend reports it in its listing. Fetched fresh each run.
/// `url` is the backend's stored canonical/original URL for the post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePost {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A local tag resolved to a backend's accepted representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTag {
    /// Sanitized string token sent verbatim.
    Token(String),
    /// Backend-assigned identifier from a lookup.
    Id(String),
}

impl ResolvedTag {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedTag::Token(s) | ResolvedTag::Id(s) => s,
        }
    }
}

/// Result of one backend write. Carries the backend-visible URL (or id when
/// the backend returns no URL) for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created(String),
    Updated(String),
}

impl PublishOutcome {
    pub fn location(&self) -> &str {
        match self {
            PublishOutcome::Created(loc) | PublishOutcome::Updated(loc) => loc,
        }
    }
}
