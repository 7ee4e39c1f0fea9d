//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/public/posts/   ← cwd
/// /home/user/site/inline-svg.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
fn find_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_upward_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let config = dir.path().join("inline-svg.toml");
        std::fs::write(&config, "").unwrap();

        assert_eq!(
            find_upward(&nested, Path::new("inline-svg.toml")),
            Some(config)
        );
    }

    #[test]
    fn test_find_upward_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("site");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("cfg.toml"), "").unwrap();
        std::fs::write(nested.join("cfg.toml"), "").unwrap();

        assert_eq!(
            find_upward(&nested, Path::new("cfg.toml")),
            Some(nested.join("cfg.toml"))
        );
    }

    #[test]
    fn test_absolute_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(&dir.path().join("none.toml")).is_none());
    }
}
