//! Shared helpers for CLI commands.

use anyhow::{Result, bail};
use jwalk::WalkDir;
use std::path::{Path, PathBuf};

/// An HTML page selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    /// Path below the walked directory, or the file name for direct arguments.
    pub relative: PathBuf,
}

/// Expand `paths` into HTML pages, walking directories recursively.
///
/// Results are sorted so output order does not depend on walk scheduling.
pub fn collect_pages(paths: &[PathBuf]) -> Result<Vec<PageFile>> {
    let mut pages = Vec::new();
    for path in paths {
        if path.is_dir() {
            pages.extend(walk_html(path));
        } else if path.is_file() {
            let relative = path.file_name().map(PathBuf::from).unwrap_or_default();
            pages.push(PageFile {
                path: path.clone(),
                relative,
            });
        } else {
            bail!("`{}` does not exist", path.display());
        }
    }
    pages.sort_by(|a, b| a.path.cmp(&b.path));
    pages.dedup_by(|a, b| a.path == b.path);
    Ok(pages)
}

fn walk_html(dir: &Path) -> Vec<PageFile> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_html(p))
        .map(|path| {
            let relative = path.strip_prefix(dir).unwrap_or(&path).to_path_buf();
            PageFile { path, relative }
        })
        .collect()
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Paths from the command line, or the fallback when none were given.
pub fn paths_or(paths: &[PathBuf], fallback: Option<&Path>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![fallback.map_or_else(|| PathBuf::from("."), Path::to_path_buf)]
    } else {
        paths.to_vec()
    }
}

/// Returns "s" for plural counts, "" for singular
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_pages_walks_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("blog/post")).unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();
        std::fs::write(dir.path().join("blog/post/index.HTML"), "").unwrap();
        std::fs::write(dir.path().join("logo.svg"), "").unwrap();

        let pages = collect_pages(&[dir.path().to_path_buf()]).unwrap();
        let relative: Vec<_> = pages.iter().map(|p| p.relative.clone()).collect();
        assert_eq!(
            relative,
            [PathBuf::from("blog/post/index.HTML"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn test_collect_pages_direct_file_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("about.html");
        std::fs::write(&page, "").unwrap();

        let pages = collect_pages(&[page.clone(), page.clone()]).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].relative, PathBuf::from("about.html"));
    }

    #[test]
    fn test_collect_pages_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(collect_pages(&[dir.path().join("nope")]).is_err());
    }

    #[test]
    fn test_paths_or() {
        assert_eq!(paths_or(&[], None), [PathBuf::from(".")]);
        assert_eq!(
            paths_or(&[], Some(Path::new("public"))),
            [PathBuf::from("public")]
        );
        assert_eq!(
            paths_or(&[PathBuf::from("a.html")], Some(Path::new("public"))),
            [PathBuf::from("a.html")]
        );
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "page"), "0 pages");
        assert_eq!(plural_count(1, "page"), "1 page");
    }
}
