//! `build` command: run the inline pass over HTML pages.
//!
//! Pages are processed concurrently, each with its own copy of the hook
//! payload. A page whose pass fails is written back unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::task::JoinSet;

use super::common::{PageFile, collect_pages, paths_or, plural_count};
use crate::config::InlineConfig;
use crate::hook::{HtmlPluginData, InlineSvgPlugin, OPTIMIZER_KEY};
use crate::logger::ProgressLine;
use crate::{debug, log};

/// Outcome of a build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    /// Pages whose content changed.
    pub changed: usize,
}

/// Inline svg references in every page under `paths`.
pub async fn build_pages(config: &InlineConfig, paths: &[PathBuf]) -> Result<BuildReport> {
    let paths = paths_or(paths, config.build.root.as_deref());
    let pages = collect_pages(&paths)?;
    if pages.is_empty() {
        log!("build"; "no html pages found");
        return Ok(BuildReport::default());
    }

    let plugin = match &config.build.root {
        Some(root) => InlineSvgPlugin::with_root(root),
        None => InlineSvgPlugin::new(),
    };
    let mut options = serde_json::Map::new();
    options.insert(OPTIMIZER_KEY.to_owned(), Value::Object(config.optimizer.clone()));
    let options = Value::Object(options);
    let output = config.build.output.clone();

    let progress = Arc::new(ProgressLine::new("build", &[("pages", pages.len())]));
    let mut tasks = JoinSet::new();
    for page in pages {
        let plugin = plugin.clone();
        let options = options.clone();
        let output = output.clone();
        let progress = Arc::clone(&progress);
        tasks.spawn(async move {
            let changed = build_page(&plugin, options, &page, output.as_deref()).await;
            progress.inc("pages");
            changed
        });
    }

    let mut report = BuildReport::default();
    while let Some(joined) = tasks.join_next().await {
        report.pages += 1;
        if joined.context("page task panicked")?? {
            report.changed += 1;
        }
    }

    if let Ok(progress) = Arc::try_unwrap(progress) {
        progress.finish();
    }
    log!(
        "build";
        "{} processed, {} changed",
        plural_count(report.pages, "page"),
        report.changed
    );
    Ok(report)
}

/// Process one page; returns whether its content changed.
async fn build_page(
    plugin: &InlineSvgPlugin,
    options: Value,
    page: &PageFile,
    output: Option<&Path>,
) -> Result<bool> {
    let html = tokio::fs::read_to_string(&page.path)
        .await
        .with_context(|| format!("failed to read `{}`", page.path.display()))?;

    let mut data = HtmlPluginData::new(html.clone(), options);
    plugin.after_html_processing(&mut data).await;
    let changed = data.html != html;

    let dest = match output {
        Some(dir) => dir.join(&page.relative),
        // Unchanged pages are left untouched in place.
        None if !changed => return Ok(false),
        None => page.path.clone(),
    };

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    tokio::fs::write(&dest, &data.html)
        .await
        .with_context(|| format!("failed to write `{}`", dest.display()))?;

    debug!("build"; "{} -> {}", page.path.display(), dest.display());
    Ok(changed)
}
