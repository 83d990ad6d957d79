use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from fioclean.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FiocleanConfig {
    pub parse: ParseConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Job descriptors declared at the top of every input file.
    pub jobs_per_file: usize,
    /// Lines read after a `clat percentiles` header.
    pub percentile_rows: usize,
    /// Jobs whose name starts with this prefix are counted but not extracted.
    pub skip_prefix: String,
    /// Descriptor line fio prints for cloned jobs.
    pub continuation_marker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Latex,
    Summary,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
    /// Glob patterns appended after input files given on the command line.
    pub inputs: Vec<String>,
}

// --- Default implementations ---

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            jobs_per_file: 1,
            percentile_rows: 5,
            skip_prefix: "warmup".to_string(),
            continuation_marker: "...".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            file: None,
            inputs: Vec::new(),
        }
    }
}

/// Load configuration from `path`.
///
/// A missing file yields defaults unless `required` is set, which is the
/// case when the path was named explicitly on the command line.
pub fn load(path: &Path, required: bool) -> Result<FiocleanConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FiocleanConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expand the configured input globs, in pattern order.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|e| ConfigError::Pattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        let mut matched = readable_matches(pattern, paths);
        if matched.is_empty() {
            tracing::warn!(pattern = %pattern, "input pattern matched no files");
        }
        files.append(&mut matched);
    }
    Ok(files)
}

/// Keep the paths a glob produced, logging entries it could not read.
fn readable_matches<E: std::fmt::Display>(
    pattern: &str,
    paths: impl Iterator<Item = Result<PathBuf, E>>,
) -> Vec<PathBuf> {
    paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "skipping unreadable glob entry");
                None
            }
        })
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            ConfigError::Pattern { pattern, source } => {
                write!(f, "invalid input pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Pattern { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = FiocleanConfig::default();
        assert_eq!(config.parse.jobs_per_file, 1);
        assert_eq!(config.parse.percentile_rows, 5);
        assert_eq!(config.parse.skip_prefix, "warmup");
        assert_eq!(config.parse.continuation_marker, "...");
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(config.output.file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fioclean.toml");
        std::fs::write(
            &path,
            "[parse]\njobs_per_file = 3\n\n[output]\nformat = \"latex\"\n",
        )
        .unwrap();
        let config = load(&path, true).unwrap();
        assert_eq!(config.parse.jobs_per_file, 3);
        assert_eq!(config.parse.percentile_rows, 5);
        assert_eq!(config.output.format, OutputFormat::Latex);
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config.parse.jobs_per_file, 1);
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[parse]\njobs_per_file = \"many\"\n").unwrap();
        let err = load(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_expand_inputs_sorted_within_pattern() {
        let dir = tempdir().unwrap();
        for name in ["b.txt", "a.txt", "skip.log"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/*.txt", dir.path().display());
        let files = expand_inputs(&[pattern]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_unreadable_glob_entries_are_skipped() {
        let entries = vec![
            Ok(PathBuf::from("a.txt")),
            Err("permission denied"),
            Ok(PathBuf::from("b.txt")),
        ];
        let kept = readable_matches("runs/*.txt", entries.into_iter());
        assert_eq!(kept, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let err = expand_inputs(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }
}
