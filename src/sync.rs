// ABOUTME: Orchestrates one run over all article files and backends
// ABOUTME: Failures stay contained to their (article, backend) unit

use crate::backend::Backend;
use crate::config::Config;
use crate::model::CanonicalIdentity;
use crate::source::load_article;
use std::path::{Path, PathBuf};

const ARTICLE_EXTENSION: &str = "md";

/// Counters for the end-of-run summary line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub published: usize,
    pub failed: usize,
    pub skipped_files: usize,
    pub skipped_drafts: usize,
}

fn is_article(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == ARTICLE_EXTENSION)
}

/// Process every file against every backend. One unit's failure never stops
/// siblings; everything is logged and tallied, nothing propagates out.
pub fn sync_all(files: &[PathBuf], config: &Config, backends: &[Box<dyn Backend>]) -> RunSummary {
    let mut summary = RunSummary::default();

    for path in files {
        if !is_article(path) {
            log::warn!("{}: not an article file, skipping", path.display());
            summary.skipped_files += 1;
            continue;
        }
        if !path.exists() {
            log::warn!("{}: no such file, skipping", path.display());
            summary.skipped_files += 1;
            continue;
        }

        let article = match load_article(path) {
            Ok(article) => article,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                summary.skipped_files += 1;
                continue;
            }
        };

        if article.draft {
            log::info!("{}: draft, skipping", path.display());
            summary.skipped_drafts += 1;
            continue;
        }

        // Identity and publish date are computed once per article; each
        // backend applies its own scheduling rule to the same date.
        let identity = CanonicalIdentity::resolve(path, &config.site_base, &article.title);
        let publish_at = article.date;

        for backend in backends {
            if backend.skip() {
                continue;
            }

            match backend.publish(&article, &identity, publish_at) {
                Ok(outcome) => {
                    log::debug!("{}: {} -> {:?}", backend.name(), identity.url, outcome);
                    summary.published += 1;
                }
                Err(e) => {
                    log::error!("{}: publish failed for {}: {}", backend.name(), identity.url, e);
                    summary.failed += 1;
                }
            }
        }
    }

    log::info!(
        "done: {} published, {} failed, {} files skipped, {} drafts",
        summary.published,
        summary.failed,
        summary.skipped_files,
        summary.skipped_drafts
    );

    summary
}
