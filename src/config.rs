use std::path::Path;

use crate::error::Error;

/// Markdown files excluded from every run. Both are allowed to accumulate
/// references to symbols that no longer exist (historic entries).
const ALWAYS_EXCLUDED: &[&str] = &["TODO.md", "CHANGELOG.md"];

/// Directories never descended into when enumerating markdown files.
const ALWAYS_SKIPPED_DIRS: &[&str] = &["bin"];

/// Default directory scanned for source declarations.
const DEFAULT_SOURCE_DIR: &str = "modules";

/// Project configuration loaded from `.doccheck.toml`.
/// Controls which markdown files form the corpus and where source
/// declarations live. All fields have working defaults.
pub struct Config {
    exclude: Vec<String>,
    skip_dirs: Vec<String>,
    source_dir: String,
}

/// Raw TOML structure for `.doccheck.toml`.
#[derive(serde::Deserialize)]
struct DoccheckTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    skip_dirs: Vec<String>,
    #[serde(default)]
    source_dir: Option<String>,
}

impl Config {
    /// Load config from `.doccheck.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".doccheck.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DoccheckTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            exclude: raw.exclude,
            skip_dirs: raw.skip_dirs,
            source_dir: raw.source_dir.unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()),
        })
    }

    /// Built-in defaults: scan everything except the always-excluded files.
    fn defaults() -> Self {
        Self {
            exclude: Vec::new(),
            skip_dirs: Vec::new(),
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
        }
    }

    /// Whether a markdown file name is excluded from the corpus.
    pub fn is_excluded_file(&self, file_name: &str) -> bool {
        ALWAYS_EXCLUDED.contains(&file_name)
            || self.exclude.iter().any(|name| name == file_name)
    }

    /// Whether a directory name should be skipped during enumeration.
    pub fn is_skipped_dir(&self, dir_name: &str) -> bool {
        ALWAYS_SKIPPED_DIRS.contains(&dir_name)
            || self.skip_dirs.iter().any(|name| name == dir_name)
    }

    /// The directory scanned for source declarations, relative to root.
    pub fn source_dir(&self) -> &str {
        &self.source_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert!(config.is_excluded_file("TODO.md"));
        assert!(config.is_excluded_file("CHANGELOG.md"));
        assert!(!config.is_excluded_file("README.md"));
        assert!(config.is_skipped_dir("bin"));
        assert_eq!(config.source_dir(), "modules");
    }

    #[test]
    fn config_adds_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".doccheck.toml"),
            "exclude = [\"NOTES.md\"]\nskip_dirs = [\"target\"]\nsource_dir = \"src\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.is_excluded_file("NOTES.md"));
        assert!(config.is_excluded_file("TODO.md"));
        assert!(config.is_skipped_dir("target"));
        assert!(config.is_skipped_dir("bin"));
        assert_eq!(config.source_dir(), "src");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".doccheck.toml"), "exclude = 3\n").unwrap();

        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }
}
