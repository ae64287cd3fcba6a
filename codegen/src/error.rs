use std::path::PathBuf;

use command_tree_core::{ArgsError, ConfigError, UnknownFlagKind};
use thiserror::Error;

/// Errors produced while generating source or documentation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No command declares a `run_func`, so there is nothing to generate.
    #[error("no run_func found in configuration")]
    NoFunctions,

    #[error("invalid module name {0:?}: must be a Rust identifier other than `main`")]
    InvalidModule(String),

    #[error("command \"{path}\": run_func {name:?} is not a valid Rust function name")]
    InvalidFunctionName { path: String, name: String },

    #[error("function {function}: flag {flag}: {source}")]
    UnsupportedFlagType {
        function: String,
        flag: String,
        #[source]
        source: UnknownFlagKind,
    },

    #[error("function {function}: {source}")]
    InvalidArgs {
        function: String,
        #[source]
        source: ArgsError,
    },

    /// A bundled sample configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;
