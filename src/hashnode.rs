// ABOUTME: GraphQL-style backend adapter (Hashnode API shape)
// ABOUTME: Cursor-paginated listing, tag id lookups, passthrough scheduling

use crate::backend::Backend;
use crate::config::HashnodeConfig;
use crate::matcher::{find_match, Page};
use crate::model::{Article, CanonicalIdentity, PublishOutcome, RemotePost, ResolvedTag};
use crate::util::truncate_str;
use crate::{schedule, tags, Error, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::OnceCell;
use std::time::Duration;

const BACKEND: &str = "hashnode";

/// Posts fetched per listing page while walking the cursor sequence.
const PAGE_SIZE: u32 = 20;

const PUBLICATION_QUERY: &str = "\
query Me { me { publications(first: 1) { edges { node { id } } } } }";

const TAG_QUERY: &str = "\
query Tag($slug: String!) { tag(slug: $slug) { id } }";

const POSTS_QUERY: &str = "\
query Posts($publicationId: ObjectId!, $first: Int!, $after: String) {
  publication(id: $publicationId) {
    posts(first: $first, after: $after) {
      edges { node { id title originalArticleURL } }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

const PUBLISH_MUTATION: &str = "\
mutation Publish($input: PublishPostInput!) {
  publishPost(input: $input) { post { id url } }
}";

const UPDATE_MUTATION: &str = "\
mutation Update($input: UpdatePostInput!) {
  updatePost(input: $input) { post { id url } }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    id: String,
    title: String,
    #[serde(default, rename = "originalArticleURL")]
    original_article_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WrittenPost {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

pub struct HashnodeClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl HashnodeClient {
    pub fn new(config: &HashnodeConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(HashnodeClient {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    /// Issue one GraphQL operation and return its `data` object. A non-2xx
    /// status or a populated `errors` array both surface as an API error.
    fn query(&self, operation: &str, variables: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.token)
            .header("User-Agent", "crosspost/0.3 (Rust)")
            .json(&json!({ "query": operation, "variables": variables }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                backend: BACKEND,
                status: status.as_u16(),
                message: truncate_str(&message, 500),
            });
        }

        let body: Value = response.json()?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Api {
                    backend: BACKEND,
                    status: status.as_u16(),
                    message: truncate_str(&message, 500),
                });
            }
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

pub struct HashnodeBackend {
    inner: Option<Inner>,
}

struct Inner {
    client: HashnodeClient,
    publication_id: OnceCell<String>,
}

impl HashnodeBackend {
    pub fn from_config(config: Option<&HashnodeConfig>) -> Result<Self> {
        let inner = match config {
            Some(cfg) => {
                let publication_id = OnceCell::new();
                if let Some(id) = &cfg.publication_id {
                    let _ = publication_id.set(id.clone());
                }
                Some(Inner {
                    client: HashnodeClient::new(cfg)?,
                    publication_id,
                })
            }
            None => None,
        };
        Ok(HashnodeBackend { inner })
    }

    fn inner(&self) -> Result<&Inner> {
        self.inner
            .as_ref()
            .ok_or_else(|| Error::Config("hashnode: no token configured".into()))
    }

    /// The publication id, from config or discovered once per run via the
    /// account's first publication.
    fn publication_id(&self, inner: &Inner) -> Result<String> {
        if let Some(id) = inner.publication_id.get() {
            return Ok(id.clone());
        }

        let data = inner.client.query(PUBLICATION_QUERY, json!({}))?;
        let id = data
            .pointer("/me/publications/edges/0/node/id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Api {
                backend: BACKEND,
                status: 200,
                message: "account has no publication".into(),
            })?
            .to_string();

        log::info!("{}: discovered publication id {}", BACKEND, id);
        let _ = inner.publication_id.set(id.clone());
        Ok(id)
    }

    fn fetch_page(&self, inner: &Inner, publication_id: &str, after: Option<&str>) -> Result<Page> {
        let data = inner.client.query(
            POSTS_QUERY,
            json!({
                "publicationId": publication_id,
                "first": PAGE_SIZE,
                "after": after,
            }),
        )?;

        let edges = data
            .pointer("/publication/posts/edges")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut posts = Vec::with_capacity(edges.len());
        for edge in edges {
            let node: PostNode = serde_json::from_value(edge["node"].clone())?;
            posts.push(RemotePost {
                id: node.id,
                title: node.title,
                url: node.original_article_url.unwrap_or_default(),
            });
        }

        let page_info: PageInfo = data
            .pointer("/publication/posts/pageInfo")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or(PageInfo {
                has_next_page: false,
                end_cursor: None,
            });

        let next_cursor = if page_info.has_next_page {
            page_info.end_cursor
        } else {
            None
        };

        Ok(Page { posts, next_cursor })
    }

    fn lookup_tag(&self, inner: &Inner, slug: &str) -> Result<Option<String>> {
        let data = inner.client.query(TAG_QUERY, json!({ "slug": slug }))?;
        Ok(data
            .pointer("/tag/id")
            .and_then(Value::as_str)
            .map(String::from))
    }
}

fn tag_inputs(tags: &[ResolvedTag]) -> Vec<Value> {
    tags.iter().map(|t| json!({ "id": t.as_str() })).collect()
}

impl Backend for HashnodeBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn skip(&self) -> bool {
        if self.inner.is_none() {
            log::info!("{}: HASHNODE_TOKEN not set, skipping", BACKEND);
            return true;
        }
        false
    }

    fn find_existing(&self, identity: &CanonicalIdentity) -> Option<RemotePost> {
        let inner = self.inner.as_ref()?;
        let publication_id = match self.publication_id(inner) {
            Ok(id) => id,
            Err(e) => {
                log::error!("{}: cannot resolve publication id: {}", BACKEND, e);
                return None;
            }
        };

        find_match(BACKEND, identity, |cursor| {
            self.fetch_page(inner, &publication_id, cursor)
        })
    }

    fn resolve_tags(&self, tag_names: &[String]) -> Vec<ResolvedTag> {
        let inner = match self.inner.as_ref() {
            Some(inner) => inner,
            None => return Vec::new(),
        };

        tag_names
            .iter()
            .filter_map(|tag| {
                let slug = tags::tag_slug(tag);
                if slug.is_empty() {
                    log::warn!("{}: tag {:?} has no slug, dropping", BACKEND, tag);
                    return None;
                }
                match self.lookup_tag(inner, &slug) {
                    Ok(Some(id)) => Some(ResolvedTag::Id(id)),
                    Ok(None) => {
                        log::warn!("{}: no tag for slug {:?}, dropping", BACKEND, slug);
                        None
                    }
                    // One failed lookup drops that tag only
                    Err(e) => {
                        log::warn!("{}: tag lookup {:?} failed: {}, dropping", BACKEND, slug, e);
                        None
                    }
                }
            })
            .collect()
    }

    fn publish(
        &self,
        article: &Article,
        identity: &CanonicalIdentity,
        publish_at: Option<DateTime<Utc>>,
    ) -> Result<PublishOutcome> {
        let inner = self.inner()?;
        let publication_id = self.publication_id(inner)?;

        let existing = self.find_existing(identity);
        let tags = self.resolve_tags(&article.tags);
        let published_at = schedule::passthrough(publish_at);

        let mut input = json!({
            "title": article.title,
            "contentMarkdown": article.body,
            "tags": tag_inputs(&tags),
            "originalArticleURL": identity.url,
        });
        if let Some(subtitle) = &article.description {
            input["subtitle"] = json!(subtitle);
        }
        if let Some(at) = published_at {
            input["publishedAt"] = json!(at.to_rfc3339());
        }

        match existing {
            Some(post) => {
                input["id"] = json!(post.id);
                let data = inner
                    .client
                    .query(UPDATE_MUTATION, json!({ "input": input }))?;
                let written: WrittenPost =
                    serde_json::from_value(data.pointer("/updatePost/post").cloned().unwrap_or(
                        Value::Null,
                    ))?;
                let location = written.url.unwrap_or(written.id);
                log::info!("{}: updated {} -> {}", BACKEND, article.title, location);
                Ok(PublishOutcome::Updated(location))
            }
            None => {
                input["publicationId"] = json!(publication_id);
                let data = inner
                    .client
                    .query(PUBLISH_MUTATION, json!({ "input": input }))?;
                let written: WrittenPost =
                    serde_json::from_value(data.pointer("/publishPost/post").cloned().unwrap_or(
                        Value::Null,
                    ))?;
                let location = written.url.unwrap_or(written.id);
                log::info!("{}: created {} -> {}", BACKEND, article.title, location);
                Ok(PublishOutcome::Created(location))
            }
        }
    }
}
