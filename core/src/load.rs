//! Loading tool configurations from YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! name: "my-tool"
//! version: "1.0.0"
//! root:
//!   use: "my-tool"
//!   short: "My CLI tool"
//! commands:
//!   add:
//!     use: "add <name>"
//!     short: "Add an item"
//!     args:
//!       type: exact
//!       count: 1
//!     run_func: "runAdd"
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{ToolConfig, ValidationReport};

/// Errors that can occur while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML for the model.
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A configuration file is not valid YAML for the model.
    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but violates the schema.
    #[error("{0}")]
    Invalid(#[from] ValidationReport),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ToolConfig {
    /// Parses a YAML document without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed YAML.
    pub fn parse_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses and validates a YAML document.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{ConfigError, ToolConfig};
    ///
    /// let err = ToolConfig::from_yaml("root:\n  use: t\n  short: s\n").unwrap_err();
    /// assert!(matches!(err, ConfigError::Invalid(_)));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed YAML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config = Self::parse_yaml(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be opened,
    /// [`ConfigError::ParseFile`] on malformed YAML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ToolConfig =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| {
                ConfigError::ParseFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        config.validate()?;
        debug!(
            path = %path.display(),
            commands = config.commands.len(),
            "Loaded tool config"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const VALID: &str = r#"
name: test-tool
description: A test tool
root:
  use: test
  short: Test command
commands:
  add:
    use: add
    short: Add something
    run_func: runAdd
"#;

    #[test]
    fn test_from_yaml_accepts_valid_document() {
        let config = ToolConfig::from_yaml(VALID).unwrap();
        assert_eq!(config.name, "test-tool");
        assert_eq!(config.commands["add"].run_func, "runAdd");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ToolConfig::parse_yaml("name: test\n  invalid: indentation\n    broken: yaml\n")
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse YAML"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.root.name(), "test");
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = ToolConfig::load("/nonexistent/path/config.yaml").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("failed to read config file"));
        assert!(message.contains("/nonexistent/path/config.yaml"));
    }

    #[test]
    fn test_load_parse_error_mentions_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name: [unclosed\n").unwrap();

        let err = ToolConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFile { .. }));
        let message = err.to_string();
        assert!(message.starts_with("failed to parse config file"));
        assert!(message.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_reports_all_violations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"root:\n  use: t\n").unwrap();

        let err = ToolConfig::load(file.path()).unwrap_err();
        let ConfigError::Invalid(report) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(report.errors.len(), 2);
    }
}
