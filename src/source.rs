// ABOUTME: Loads local article files and parses YAML front matter
// ABOUTME: Tolerant of missing optional keys; title is required

use crate::model::Article;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    draft: bool,
}

/// Read and parse an article source file: a `---` fenced YAML front matter
/// block followed by the markdown body.
pub fn load_article(path: &Path) -> Result<Article> {
    let content = fs::read_to_string(path)?;
    parse_article(&content)
}

pub fn parse_article(content: &str) -> Result<Article> {
    let rest = content
        .strip_prefix("---\n")
        .ok_or_else(|| Error::Article("missing front matter block".into()))?;

    let end = rest
        .find("\n---\n")
        .ok_or_else(|| Error::Article("unterminated front matter block".into()))?;

    let fm: FrontMatter = serde_yaml::from_str(&rest[..end])?;
    let title = fm
        .title
        .ok_or_else(|| Error::Article("front matter has no title".into()))?;
    let body = rest[end + 5..].trim_start_matches('\n').to_string();

    Ok(Article {
        title,
        body,
        tags: fm.tags,
        description: fm.description,
        draft: fm.draft,
        date: fm.date,
    })
}
