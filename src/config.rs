// ABOUTME: Immutable run configuration assembled once at startup
// ABOUTME: Backends read only this record, never ambient process state

use std::env;

pub const DEVTO_API_BASE: &str = "https://dev.to";
pub const HASHNODE_ENDPOINT: &str = "https://gql.hashnode.com";

/// Everything a run needs, read from the environment exactly once. A backend
/// whose section is `None` is skipped cleanly, not treated as an error.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the canonical site, e.g. `https://example.com`.
    pub site_base: String,
    pub devto: Option<DevtoConfig>,
    pub hashnode: Option<HashnodeConfig>,
}

#[derive(Debug, Clone)]
pub struct DevtoConfig {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct HashnodeConfig {
    pub token: String,
    pub endpoint: String,
    /// Known publication id; discovered via the API when absent.
    pub publication_id: Option<String>,
}

impl Config {
    pub fn from_env(site_base: String) -> Self {
        let devto = env::var("DEVTO_API_KEY").ok().map(|api_key| DevtoConfig {
            api_key,
            api_base: DEVTO_API_BASE.into(),
        });

        let hashnode = env::var("HASHNODE_TOKEN").ok().map(|token| HashnodeConfig {
            token,
            endpoint: HASHNODE_ENDPOINT.into(),
            publication_id: env::var("HASHNODE_PUBLICATION_ID").ok(),
        });

        Config {
            site_base,
            devto,
            hashnode,
        }
    }
}
