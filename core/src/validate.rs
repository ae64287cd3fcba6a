//! Configuration validation.
//!
//! Walks a [`ToolConfig`] and collects every structural problem in one
//! pass, so a user sees the complete list instead of fixing errors one at a
//! time. Commands are identified by the slash-joined chain of their map
//! keys; the root command is `root`.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let mut config = ToolConfig::default();
//! config.root = CommandConfig::new("tool", "A tool");
//! let errors = validate_config(&config);
//! assert_eq!(errors, vec![ValidationError::MissingToolName]);
//!
//! config.name = "tool".into();
//! assert!(validate_config(&config).is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::types::spellings;
use crate::{ArgsConfig, ArgsKind, CommandConfig, FlagConfig, FlagKind, ToolConfig};

/// Path used for the root command in messages.
pub const ROOT_PATH: &str = "root";

/// Identifies a flag inside a command: by name, or by position when the
/// name is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagRef {
    Named(String),
    Index(usize),
}

impl FlagRef {
    fn of(flag: &FlagConfig, index: usize) -> Self {
        if flag.name.is_empty() {
            FlagRef::Index(index)
        } else {
            FlagRef::Named(flag.name.clone())
        }
    }
}

impl fmt::Display for FlagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagRef::Named(name) => write!(f, "\"{name}\""),
            FlagRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tool config: name is required")]
    MissingToolName,
    #[error("command \"{path}\": use is required")]
    MissingUse { path: String },
    #[error("command \"{path}\": short description is required")]
    MissingShort { path: String },
    #[error("command \"{path}\": nested commands belong in the top-level commands map")]
    RootSubcommands { path: String },
    #[error(
        "command \"{path}\": invalid args type \"{found}\" (must be one of: {})",
        spellings(&ArgsKind::ALL)
    )]
    InvalidArgsType { path: String, found: String },
    #[error("command \"{path}\": args type 'exact' requires count >= 1")]
    ExactCountTooSmall { path: String },
    #[error("command \"{path}\": args type '{kind}' requires min >= 0")]
    NegativeMin { path: String, kind: ArgsKind },
    #[error("command \"{path}\": args type '{kind}' requires max >= 1")]
    MaxTooSmall { path: String, kind: ArgsKind },
    #[error("command \"{path}\": args type 'range' requires min <= max (got min={min}, max={max})")]
    InvertedRange { path: String, min: i64, max: i64 },
    #[error("command \"{path}\", flag {flag}: name is required")]
    MissingFlagName { path: String, flag: FlagRef },
    #[error("command \"{path}\", flag {flag}: type is required")]
    MissingFlagType { path: String, flag: FlagRef },
    #[error("command \"{path}\", flag {flag}: usage is required")]
    MissingFlagUsage { path: String, flag: FlagRef },
    #[error(
        "command \"{path}\", flag {flag}: invalid type \"{found}\" (must be one of: {})",
        spellings(&FlagKind::ALL)
    )]
    InvalidFlagType {
        path: String,
        flag: FlagRef,
        found: String,
    },
    #[error("command \"{path}\", flag {flag}: shorthand \"{shorthand}\" must be a single character")]
    InvalidShorthand {
        path: String,
        flag: FlagRef,
        shorthand: String,
    },
    #[error("command \"{path}\": duplicate flag name \"{name}\"")]
    DuplicateFlagName { path: String, name: String },
    #[error("command \"{path}\": duplicate flag shorthand \"{shorthand}\"")]
    DuplicateShorthand { path: String, shorthand: String },
    #[error("duplicate command name \"{name}\" at root level")]
    DuplicateRootCommand { name: String },
    #[error("command \"{path}\": duplicate subcommand name \"{name}\"")]
    DuplicateSubcommand { path: String, name: String },
}

/// Every violation found in one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "validation failed with {} error(s):",
            self.errors.len()
        )?;
        for error in &self.errors {
            writeln!(f, "  - {error}")?;
        }
        Ok(())
    }
}

impl ToolConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationReport`] listing every violation when the
    /// configuration is not valid.
    pub fn validate(&self) -> Result<(), ValidationReport> {
        let errors = validate_config(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors })
        }
    }
}

/// Validates a tool configuration, returning all violations.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let mut config = ToolConfig {
///     name: "t".into(),
///     root: CommandConfig::new("t", "root"),
///     ..Default::default()
/// };
/// config.commands.insert("a".into(), CommandConfig::new("add", "Add"));
/// config.commands.insert("b".into(), CommandConfig::new("add <x>", "Add again"));
///
/// let errors = validate_config(&config);
/// assert_eq!(
///     errors,
///     vec![ValidationError::DuplicateRootCommand { name: "add".into() }]
/// );
/// ```
pub fn validate_config(config: &ToolConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.name.is_empty() {
        errors.push(ValidationError::MissingToolName);
    }

    validate_command_fields(&config.root, ROOT_PATH, &mut errors);
    validate_flags(&config.root.flags, ROOT_PATH, &mut errors);
    validate_flag_duplicates(&config.root.flags, ROOT_PATH, &mut errors);
    if !config.root.commands.is_empty() {
        errors.push(ValidationError::RootSubcommands {
            path: ROOT_PATH.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (key, command) in &config.commands {
        let name = command.name_or(key);
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateRootCommand {
                name: name.to_string(),
            });
        }
        validate_command(command, key, &mut errors);
    }

    errors
}

fn validate_command(command: &CommandConfig, path: &str, errors: &mut Vec<ValidationError>) {
    validate_command_fields(command, path, errors);
    validate_flags(&command.flags, path, errors);
    validate_flag_duplicates(&command.flags, path, errors);
    validate_subcommands(&command.commands, path, errors);
}

fn validate_subcommands(
    commands: &BTreeMap<String, CommandConfig>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for (key, sub) in commands {
        let name = sub.name_or(key);
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateSubcommand {
                path: path.to_string(),
                name: name.to_string(),
            });
        }
        validate_command(sub, &format!("{path}/{key}"), errors);
    }
}

fn validate_command_fields(command: &CommandConfig, path: &str, errors: &mut Vec<ValidationError>) {
    if command.use_line.is_empty() {
        errors.push(ValidationError::MissingUse {
            path: path.to_string(),
        });
    }
    if command.short.is_empty() {
        errors.push(ValidationError::MissingShort {
            path: path.to_string(),
        });
    }
    if let Some(args) = &command.args {
        validate_args(args, path, errors);
    }
}

fn validate_args(args: &ArgsConfig, path: &str, errors: &mut Vec<ValidationError>) {
    let kind = match args.args_kind() {
        Ok(Some(kind)) => kind,
        Ok(None) => return,
        Err(_) => {
            errors.push(ValidationError::InvalidArgsType {
                path: path.to_string(),
                found: args.kind.clone(),
            });
            return;
        }
    };

    match kind {
        ArgsKind::Exact if args.count < 1 => {
            errors.push(ValidationError::ExactCountTooSmall {
                path: path.to_string(),
            });
        }
        ArgsKind::Min if args.min < 0 => {
            errors.push(ValidationError::NegativeMin {
                path: path.to_string(),
                kind,
            });
        }
        ArgsKind::Max if args.max < 1 => {
            errors.push(ValidationError::MaxTooSmall {
                path: path.to_string(),
                kind,
            });
        }
        ArgsKind::Range => {
            if args.min < 0 {
                errors.push(ValidationError::NegativeMin {
                    path: path.to_string(),
                    kind,
                });
            }
            if args.max < 1 {
                errors.push(ValidationError::MaxTooSmall {
                    path: path.to_string(),
                    kind,
                });
            }
            if args.min > args.max {
                errors.push(ValidationError::InvertedRange {
                    path: path.to_string(),
                    min: args.min,
                    max: args.max,
                });
            }
        }
        _ => {}
    }
}

fn validate_flags(flags: &[FlagConfig], path: &str, errors: &mut Vec<ValidationError>) {
    for (index, flag) in flags.iter().enumerate() {
        let flag_ref = FlagRef::of(flag, index);

        if flag.name.is_empty() {
            errors.push(ValidationError::MissingFlagName {
                path: path.to_string(),
                flag: flag_ref.clone(),
            });
        }
        if flag.kind.is_empty() {
            errors.push(ValidationError::MissingFlagType {
                path: path.to_string(),
                flag: flag_ref.clone(),
            });
        } else if flag.flag_kind().is_err() {
            errors.push(ValidationError::InvalidFlagType {
                path: path.to_string(),
                flag: flag_ref.clone(),
                found: flag.kind.clone(),
            });
        }
        if flag.usage.is_empty() {
            errors.push(ValidationError::MissingFlagUsage {
                path: path.to_string(),
                flag: flag_ref.clone(),
            });
        }
        if !flag.shorthand.is_empty() && flag.short_char().is_none() {
            errors.push(ValidationError::InvalidShorthand {
                path: path.to_string(),
                flag: flag_ref,
                shorthand: flag.shorthand.clone(),
            });
        }
    }
}

fn validate_flag_duplicates(flags: &[FlagConfig], path: &str, errors: &mut Vec<ValidationError>) {
    let mut names = HashSet::new();
    let mut shorthands = HashSet::new();

    for flag in flags {
        if !flag.name.is_empty() && !names.insert(flag.name.as_str()) {
            errors.push(ValidationError::DuplicateFlagName {
                path: path.to_string(),
                name: flag.name.clone(),
            });
        }
        if !flag.shorthand.is_empty() && !shorthands.insert(flag.shorthand.as_str()) {
            errors.push(ValidationError::DuplicateShorthand {
                path: path.to_string(),
                shorthand: flag.shorthand.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ToolConfig {
        ToolConfig {
            name: "t".into(),
            root: CommandConfig::new("t", "s"),
            ..Default::default()
        }
    }

    fn flag(name: &str) -> FlagConfig {
        FlagConfig::new(name, FlagKind::Bool, "usage")
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        let mut config = base();
        config.commands.insert(
            "add".into(),
            CommandConfig::new("add <n>", "Add")
                .with_run_func("runAdd")
                .with_args(ArgsConfig::exact(1))
                .with_flag(flag("force")),
        );
        assert!(validate_config(&config).is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_name_is_reported_alongside_other_errors() {
        let mut config = base();
        config.name.clear();
        config.root.short.clear();

        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingToolName,
                ValidationError::MissingShort {
                    path: "root".into()
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_flag_name_reported_once_per_pair() {
        let mut config = base();
        config.root.flags = vec![flag("force"), flag("force"), flag("other")];

        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateFlagName {
                path: "root".into(),
                name: "force".into()
            }]
        );
    }

    #[test]
    fn test_duplicate_shorthand_ignores_empty() {
        let mut config = base();
        config.root.flags = vec![
            flag("a"),
            flag("b"),
            flag("c").with_shorthand("x"),
            flag("d").with_shorthand("x"),
        ];

        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateShorthand {
                path: "root".into(),
                shorthand: "x".into()
            }]
        );
    }

    #[test]
    fn test_args_constraints() {
        let mut config = base();
        config.commands.insert(
            "exact".into(),
            CommandConfig::new("exact", "e").with_args(ArgsConfig::exact(0)),
        );
        config.commands.insert(
            "range".into(),
            CommandConfig::new("range", "r").with_args(ArgsConfig::range(5, 3)),
        );
        config.commands.insert(
            "max".into(),
            CommandConfig::new("max", "m").with_args(ArgsConfig::max(0)),
        );
        config.commands.insert(
            "min".into(),
            CommandConfig::new("min", "m").with_args(ArgsConfig::min(-2)),
        );

        let messages: Vec<String> = validate_config(&config)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "command \"exact\": args type 'exact' requires count >= 1",
                "command \"max\": args type 'max' requires max >= 1",
                "command \"min\": args type 'min' requires min >= 0",
                "command \"range\": args type 'range' requires min <= max (got min=5, max=3)",
            ]
        );
    }

    #[test]
    fn test_invalid_args_type() {
        let mut config = base();
        config.root.args = Some(ArgsConfig {
            kind: "some".into(),
            ..Default::default()
        });

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "command \"root\": invalid args type \"some\" (must be one of: none, any, exact, min, max, range)"
        );
    }

    #[test]
    fn test_empty_args_type_is_accepted() {
        let mut config = base();
        config.root.args = Some(ArgsConfig::default());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_flag_required_fields_use_index_for_unnamed_flags() {
        let mut config = base();
        config.root.flags = vec![FlagConfig::default()];

        let messages: Vec<String> = validate_config(&config)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "command \"root\", flag #0: name is required",
                "command \"root\", flag #0: type is required",
                "command \"root\", flag #0: usage is required",
            ]
        );
    }

    #[test]
    fn test_flag_type_and_shorthand_form() {
        let mut config = base();
        config.root.flags = vec![
            FlagConfig {
                kind: "float".into(),
                ..flag("ratio")
            },
            flag("verbose").with_shorthand("vv"),
        ];

        let messages: Vec<String> = validate_config(&config)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "command \"root\", flag \"ratio\": invalid type \"float\" (must be one of: string, bool, int, stringSlice)",
                "command \"root\", flag \"verbose\": shorthand \"vv\" must be a single character",
            ]
        );
    }

    #[test]
    fn test_duplicate_use_names_with_different_keys() {
        let mut config = base();
        config
            .commands
            .insert("add1".into(), CommandConfig::new("add", "Add"));
        config
            .commands
            .insert("add2".into(), CommandConfig::new("add <x>", "Add"));

        assert_eq!(
            validate_config(&config),
            vec![ValidationError::DuplicateRootCommand { name: "add".into() }]
        );
    }

    #[test]
    fn test_empty_use_falls_back_to_key_for_duplicates() {
        let mut config = base();
        // key "list" with empty use collides with another command named "list"
        config
            .commands
            .insert("list".into(), CommandConfig::new("", "List"));
        config
            .commands
            .insert("show".into(), CommandConfig::new("list", "Show"));

        let errors = validate_config(&config);
        assert!(errors.contains(&ValidationError::DuplicateRootCommand {
            name: "list".into()
        }));
        assert!(errors.contains(&ValidationError::MissingUse {
            path: "list".into()
        }));
    }

    #[test]
    fn test_nested_paths_and_duplicates() {
        let mut config = base();
        config.commands.insert(
            "remote".into(),
            CommandConfig::new("remote", "Remotes")
                .with_subcommand("a", CommandConfig::new("add", "Add"))
                .with_subcommand("b", CommandConfig::new("add", "Add again"))
                .with_subcommand("c", CommandConfig::new("rm", "")),
        );

        let messages: Vec<String> = validate_config(&config)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "command \"remote\": duplicate subcommand name \"add\"",
                "command \"remote/c\": short description is required",
            ]
        );
    }

    #[test]
    fn test_root_subcommands_are_rejected() {
        let mut config = base();
        config.root = config
            .root
            .with_subcommand("x", CommandConfig::new("x", "x"));

        assert_eq!(
            validate_config(&config),
            vec![ValidationError::RootSubcommands {
                path: "root".into()
            }]
        );
    }

    #[test]
    fn test_report_format() {
        let mut config = base();
        config.name.clear();
        config.root.use_line.clear();

        let report = config.validate().unwrap_err();
        assert_eq!(
            report.to_string(),
            "validation failed with 2 error(s):\n  - tool config: name is required\n  - command \"root\": use is required\n"
        );
    }
}
