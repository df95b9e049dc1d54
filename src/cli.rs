// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Files as positional args, endpoint overrides as global flags

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crosspost")]
#[command(about = "Publish local markdown articles to external blogging backends", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Article source files to publish
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Base URL of the canonical site
    #[arg(long, default_value = "https://example.com")]
    pub site_base: String,

    /// Override the REST backend's API base URL
    #[arg(long)]
    pub devto_api_base: Option<String>,

    /// Override the GraphQL backend's endpoint URL
    #[arg(long)]
    pub hashnode_endpoint: Option<String>,

    /// Disable request throttling (not recommended)
    #[arg(long)]
    pub no_throttle: bool,
}
