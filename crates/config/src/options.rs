//! Load options: which file to read and how to merge

use crate::merge::MergeStrategy;
use std::path::{Path, PathBuf};

/// Options for a configuration load.
///
/// Built once, typically at startup, and reused for every load. An explicit
/// file always wins over discovery; the candidate directories and file names
/// are only searched when no explicit file is set.
///
/// ```
/// use layerconf::LoadOptions;
///
/// let options = LoadOptions::new()
///     .with_dirs(["~/.config/app", "/etc/app"])
///     .with_file_names(["config.yml", "config.yaml"]);
/// assert!(options.file().is_none());
/// assert_eq!(options.file_names().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    file: Option<PathBuf>,
    dirs: Vec<PathBuf>,
    file_names: Vec<String>,
    merge_strategy: MergeStrategy,
}

impl LoadOptions {
    /// Create empty options: no file, no search paths, zero-skipping merge
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of searching for one
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Replace the candidate directories, in search order
    pub fn with_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Append a candidate directory
    pub fn add_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Replace the candidate file names, in search order
    pub fn with_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append a candidate file name
    pub fn add_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_names.push(name.into());
        self
    }

    /// Set how environment values are merged
    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }
}

/// Document format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.json` and `.toml` select their format; anything else is YAML
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => DocumentFormat::Json,
            "toml" => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert!(options.file().is_none());
        assert!(options.dirs().is_empty());
        assert!(options.file_names().is_empty());
        assert_eq!(options.merge_strategy(), MergeStrategy::SkipZero);
    }

    #[test]
    fn test_builder_keeps_order() {
        let options = LoadOptions::new()
            .with_dirs(["/a", "/b"])
            .add_dir("/c")
            .with_file_names(["x.yml"])
            .add_file_name("y.yml")
            .with_file("/explicit.yml")
            .with_merge_strategy(MergeStrategy::PresenceWins);

        assert_eq!(options.dirs(), [PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]);
        assert_eq!(options.file_names(), ["x.yml", "y.yml"]);
        assert_eq!(options.file(), Some(Path::new("/explicit.yml")));
        assert_eq!(options.merge_strategy(), MergeStrategy::PresenceWins);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("app.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("app.YAML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("app.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("app.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new(".apprc")), DocumentFormat::Yaml);
    }
}
