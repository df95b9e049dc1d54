// ABOUTME: REST-style backend adapter (Dev.to API shape)
// ABOUTME: Single capped listing call, token tags, future-only scheduling

use crate::backend::Backend;
use crate::config::DevtoConfig;
use crate::matcher::{find_match, Page};
use crate::model::{Article, CanonicalIdentity, PublishOutcome, RemotePost, ResolvedTag};
use crate::util::truncate_str;
use crate::{schedule, tags, Error, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const BACKEND: &str = "devto";

/// Listing cap; the listing endpoint is called once per run with this page
/// size rather than walked.
const LIST_PER_PAGE: u32 = 1000;

#[derive(Debug, Deserialize)]
struct ListedArticle {
    id: u64,
    title: String,
    #[serde(default)]
    canonical_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WrittenArticle {
    id: u64,
    #[serde(default)]
    url: Option<String>,
}

pub struct DevtoClient {
    client: Client,
    api_base: String,
    api_key: String,
    throttle_min: u64,
    throttle_max: u64,
}

impl DevtoClient {
    pub fn new(config: &DevtoConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(DevtoClient {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            throttle_min: 100,
            throttle_max: 300,
        })
    }

    pub fn with_throttle(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.throttle_min = min_ms;
        self.throttle_max = max_ms;
        self
    }

    pub fn disable_throttle(mut self) -> Self {
        self.throttle_min = 0;
        self.throttle_max = 0;
        self
    }

    fn throttle(&self) {
        if self.throttle_max > 0 {
            let sleep_ms = rand::thread_rng().gen_range(self.throttle_min..=self.throttle_max);
            std::thread::sleep(Duration::from_millis(sleep_ms));
        }
    }

    fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        let response = request
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .header("User-Agent", "crosspost/0.3 (Rust)")
            .send()?;

        self.throttle();

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                backend: BACKEND,
                status: status.as_u16(),
                message: truncate_str(&message, 500),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "{}: failed to parse response from {}: {} (body: {})",
                BACKEND,
                endpoint,
                e,
                truncate_str(&body, 200)
            );
            Error::Parse(e)
        })
    }

    fn list_articles(&self) -> Result<Vec<ListedArticle>> {
        let url = format!(
            "{}/api/articles/me/all?per_page={}",
            self.api_base, LIST_PER_PAGE
        );
        self.send(self.client.get(&url), "/api/articles/me/all")
    }

    fn create_article(&self, payload: serde_json::Value) -> Result<WrittenArticle> {
        let url = format!("{}/api/articles", self.api_base);
        self.send(self.client.post(&url).json(&payload), "/api/articles")
    }

    fn update_article(&self, id: &str, payload: serde_json::Value) -> Result<WrittenArticle> {
        let url = format!("{}/api/articles/{}", self.api_base, id);
        self.send(self.client.put(&url).json(&payload), "/api/articles/{id}")
    }
}

pub struct DevtoBackend {
    client: Option<DevtoClient>,
}

impl DevtoBackend {
    pub fn from_config(config: Option<&DevtoConfig>) -> Result<Self> {
        let client = match config {
            Some(cfg) => Some(DevtoClient::new(cfg)?),
            None => None,
        };
        Ok(DevtoBackend { client })
    }

    pub fn with_client(client: DevtoClient) -> Self {
        DevtoBackend {
            client: Some(client),
        }
    }

    fn client(&self) -> Result<&DevtoClient> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::Config("devto: no API key configured".into()))
    }
}

fn build_payload(
    article: &Article,
    identity: &CanonicalIdentity,
    tags: &[ResolvedTag],
    published_at: Option<DateTime<Utc>>,
) -> serde_json::Value {
    let tag_list: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();

    let mut body = json!({
        "title": article.title,
        "body_markdown": article.body,
        "published": true,
        "tags": tag_list,
        "canonical_url": identity.url,
        "description": article.description.clone().unwrap_or_default(),
    });

    if let Some(at) = published_at {
        body["published_at"] = json!(at.to_rfc3339());
    }

    json!({ "article": body })
}

impl Backend for DevtoBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn skip(&self) -> bool {
        if self.client.is_none() {
            log::info!("{}: DEVTO_API_KEY not set, skipping", BACKEND);
            return true;
        }
        false
    }

    fn find_existing(&self, identity: &CanonicalIdentity) -> Option<RemotePost> {
        let client = self.client.as_ref()?;

        // Single capped listing call; no cursor to follow.
        find_match(BACKEND, identity, |_cursor| {
            let posts = client
                .list_articles()?
                .into_iter()
                .map(|a| RemotePost {
                    id: a.id.to_string(),
                    title: a.title,
                    url: a.canonical_url.unwrap_or_default(),
                })
                .collect();
            Ok(Page {
                posts,
                next_cursor: None,
            })
        })
    }

    fn resolve_tags(&self, tags: &[String]) -> Vec<ResolvedTag> {
        tags.iter()
            .filter_map(|tag| {
                let token = tags::sanitize_token(tag, false);
                if token.is_empty() {
                    log::warn!("{}: tag {:?} sanitized to empty, dropping", BACKEND, tag);
                    None
                } else {
                    Some(ResolvedTag::Token(token))
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
        let client = self.client()?;

        let existing = self.find_existing(identity);
        let tags = self.resolve_tags(&article.tags);
        let published_at = schedule::future_only(publish_at, Utc::now());
        let payload = build_payload(article, identity, &tags, published_at);

        match existing {
            Some(post) => {
                let written = client.update_article(&post.id, payload)?;
                let location = written.url.unwrap_or_else(|| written.id.to_string());
                log::info!("{}: updated {} -> {}", BACKEND, article.title, location);
                Ok(PublishOutcome::Updated(location))
            }
            None => {
                let written = client.create_article(payload)?;
                let location = written.url.unwrap_or_else(|| written.id.to_string());
                log::info!("{}: created {} -> {}", BACKEND, article.title, location);
                Ok(PublishOutcome::Created(location))
            }
        }
    }
}
