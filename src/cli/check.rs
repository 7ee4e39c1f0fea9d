//! `check` command: report svg references without touching any page.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::common::{collect_pages, paths_or, plural_count, plural_s};
use crate::config::InlineConfig;
use crate::html::matcher::SRC_ATTR;
use crate::html::{Document, InlineImage, walker};
use crate::loader::ContentLoader;
use crate::log;

/// State of one `<image inline>` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStatus {
    Ok,
    /// The referenced file does not exist.
    Missing,
    /// The `src` attribute is absent, empty, or not an svg path.
    Malformed,
}

impl RefStatus {
    fn is_problem(self) -> bool {
        self != Self::Ok
    }
}

impl fmt::Display for RefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "{}", "ok".green()),
            Self::Missing => write!(f, "{}", "missing".red()),
            Self::Malformed => write!(f, "{}", "malformed".yellow()),
        }
    }
}

/// One reference found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub src: String,
    pub status: RefStatus,
}

/// References grouped by page.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub pages: BTreeMap<String, Vec<Reference>>,
}

impl CheckReport {
    pub fn reference_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn problem_count(&self) -> usize {
        self.pages
            .values()
            .flatten()
            .filter(|r| r.status.is_problem())
            .count()
    }

    pub fn has_problems(&self) -> bool {
        self.problem_count() > 0
    }

    /// Print every page with references to stdout.
    pub fn print(&self) {
        for (page, refs) in &self.pages {
            println!("{}{}{}", "[".dimmed(), page.cyan(), "]".dimmed());
            for r in refs {
                println!("{} {} {}", "→".dimmed(), r.src, r.status);
            }
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problems = self.problem_count();
        if problems == 0 {
            write!(
                f,
                "{}",
                format!("{} ok", plural_count(self.reference_count(), "reference")).green()
            )
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                problems.to_string().red().bold(),
                format!("problem{}", plural_s(problems)).dimmed()
            )
        }
    }
}

/// Inspect every page under `paths`.
pub fn check_pages(config: &InlineConfig, paths: &[PathBuf]) -> Result<CheckReport> {
    let paths = paths_or(paths, config.build.root.as_deref());
    let loader = match &config.build.root {
        Some(root) => ContentLoader::with_root(root),
        None => ContentLoader::new(),
    };

    let mut report = CheckReport::default();
    for page in collect_pages(&paths)? {
        let html = std::fs::read_to_string(&page.path)
            .with_context(|| format!("failed to read `{}`", page.path.display()))?;
        let refs = check_html(&html, &loader)
            .with_context(|| format!("failed to parse `{}`", page.path.display()))?;
        if !refs.is_empty() {
            report
                .pages
                .insert(page.path.display().to_string(), refs);
        }
    }

    report.print();
    log!("check"; "{}", report);
    Ok(report)
}

/// Classify the references in one document, in document order.
fn check_html(html: &str, loader: &ContentLoader) -> Result<Vec<Reference>> {
    let doc = Document::parse(html)?;
    let refs = walker::collect_eligible(&doc)
        .into_iter()
        .map(|node| match InlineImage::from_node(node) {
            Ok(image) => {
                let status = if loader.resolve(&image.src).is_file() {
                    RefStatus::Ok
                } else {
                    RefStatus::Missing
                };
                Reference {
                    src: image.src,
                    status,
                }
            }
            Err(_) => Reference {
                src: node
                    .as_element()
                    .and_then(|el| el.attr(SRC_ATTR))
                    .and_then(|attr| attr.value.clone())
                    .unwrap_or_else(|| "(no src)".to_owned()),
                status: RefStatus::Malformed,
            },
        })
        .collect();
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_html_classifies_references() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ok.svg"), "<svg/>").unwrap();
        let loader = ContentLoader::with_root(dir.path());

        let html = r#"<image inline src="ok.svg"><image inline src="gone.svg"><image inline><image inline src="a.png"><img inline src="ok.svg">"#;
        let refs = check_html(html, &loader).unwrap();

        let statuses: Vec<_> = refs.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            [
                RefStatus::Ok,
                RefStatus::Missing,
                RefStatus::Malformed,
                RefStatus::Malformed
            ]
        );
        assert_eq!(refs[2].src, "(no src)");
        assert_eq!(refs[3].src, "a.png");
    }

    #[test]
    fn test_check_pages_report() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ok.svg"), "<svg/>").unwrap();
        std::fs::write(dir.path().join("a.html"), r#"<image inline src="ok.svg">"#).unwrap();
        std::fs::write(dir.path().join("b.html"), "<p>none</p>").unwrap();

        let mut config = InlineConfig::default();
        config.build.root = Some(dir.path().to_path_buf());

        let report = check_pages(&config, &[]).unwrap();
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.reference_count(), 1);
        assert!(!report.has_problems());

        std::fs::write(dir.path().join("c.html"), r#"<image inline src="gone.svg">"#).unwrap();
        let report = check_pages(&config, &[]).unwrap();
        assert_eq!(report.problem_count(), 1);
    }
}
