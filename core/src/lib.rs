//! Configuration model and validation for declarative command trees.
//!
//! This crate defines the data model that describes a CLI tool as a YAML
//! document:
//!
//! - [`ToolConfig`]: the tool itself (name, version, root command and the
//!   top-level command map).
//! - [`CommandConfig`]: one command node with flags, an argument-count
//!   rule and nested subcommands.
//! - [`FlagConfig`]: a flag with a typed, string-encoded default.
//! - [`ArgsConfig`]: an argument-count rule, resolved into an
//!   [`ArgsPolicy`] when a command runs.
//!
//! Validation ([`validate_config`], [`ToolConfig::validate`]) reports every
//! structural problem at once. Loading ([`ToolConfig::load`]) reads, parses
//! and validates in one step. The [`schema`] module carries the static
//! field metadata that reference documentation is generated from.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let config = ToolConfig::from_yaml(
//!     r#"
//! name: my-tool
//! root:
//!   use: my-tool
//!   short: My CLI tool
//! commands:
//!   add:
//!     use: add <name>
//!     short: Add an item
//!     args:
//!       type: exact
//!       count: 1
//!     run_func: runAdd
//! "#,
//! )
//! .unwrap();
//!
//! let add = &config.commands["add"];
//! assert_eq!(add.args_policy().unwrap(), ArgsPolicy::Exact(1));
//! assert!(validate_config(&config).is_empty());
//! ```

mod load;
pub mod schema;
mod types;
mod validate;

pub use load::ConfigError;
pub use types::*;
pub use validate::{FlagRef, ROOT_PATH, ValidationError, ValidationReport, validate_config};
