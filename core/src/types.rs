//! Configuration model for declarative command trees.
//!
//! This module defines the data model parsed from a `commands.yaml`
//! document. The types mirror the document layout field for field, so they
//! serialize back to the same YAML keys. Type names that the document
//! stores as free-form strings (`type` on flags and args) are kept as raw
//! strings so the validator can report unknown values instead of failing
//! the parse; [`FlagKind`] and [`ArgsKind`] are the typed views.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root descriptor of a tool.
///
/// # Examples
///
/// ```
/// use command_tree_core::ToolConfig;
///
/// let config = ToolConfig::parse_yaml(
///     r#"
/// name: todo
/// root:
///   use: todo
///   short: Manage a todo list
/// commands:
///   add:
///     use: add <item>
///     short: Add an item
/// "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.name, "todo");
/// assert_eq!(config.commands["add"].name(), "add");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name (required).
    #[serde(default)]
    pub name: String,
    /// One-paragraph description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Free-form version string, shown by `--version`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Root command.
    #[serde(default)]
    pub root: CommandConfig,
    /// Top-level subcommands keyed by an arbitrary map key.
    ///
    /// A `BTreeMap` keeps enumeration sorted by key, which every consumer
    /// relies on for deterministic output.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, CommandConfig>,
}

impl ToolConfig {
    /// Returns the root command's use-derived name, falling back to the
    /// tool name when the root `use` is empty.
    pub fn root_name(&self) -> &str {
        self.root.name_or(&self.name)
    }
}

/// One node in the command tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Command name followed by a display-only argument hint
    /// (e.g. `"add <name>"`).
    #[serde(rename = "use", default)]
    pub use_line: String,
    /// Alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// One-line help (required).
    #[serde(default)]
    pub short: String,
    /// Multi-line help.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long: String,
    /// Argument-count policy; `None` accepts any number of arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgsConfig>,
    /// Name of the registered handler to bind.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run_func: String,
    /// Flags declared on this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagConfig>,
    /// Nested subcommands.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, CommandConfig>,
    /// Hide from help output and generated docs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl CommandConfig {
    /// Creates a command with the given `use` line and short help.
    pub fn new(use_line: &str, short: &str) -> Self {
        Self {
            use_line: use_line.to_string(),
            short: short.to_string(),
            ..Default::default()
        }
    }

    /// Returns the canonical name: the first token of `use`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::CommandConfig;
    ///
    /// let cmd = CommandConfig::new("add <name> <value>", "Add a pair");
    /// assert_eq!(cmd.name(), "add");
    /// assert_eq!(cmd.usage_hint(), "<name> <value>");
    /// ```
    pub fn name(&self) -> &str {
        command_name(&self.use_line)
    }

    /// Returns the use-derived name, or `key` when `use` yields nothing.
    pub fn name_or<'a>(&'a self, key: &'a str) -> &'a str {
        let name = self.name();
        if name.is_empty() { key } else { name }
    }

    /// Returns the display-only argument hint that follows the name.
    pub fn usage_hint(&self) -> &str {
        let trimmed = self.use_line.trim_start();
        match trimmed.find(char::is_whitespace) {
            Some(idx) => trimmed[idx..].trim(),
            None => "",
        }
    }

    /// Resolves the argument-count policy for this node.
    ///
    /// A missing `args` block, or one with an empty `type`, imposes no
    /// restriction.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError`] when the args block names an unknown type or
    /// carries a negative bound.
    pub fn args_policy(&self) -> Result<ArgsPolicy, ArgsError> {
        match &self.args {
            Some(args) => args.policy(),
            None => Ok(ArgsPolicy::Any),
        }
    }

    /// Adds a flag.
    pub fn with_flag(mut self, flag: FlagConfig) -> Self {
        self.flags.push(flag);
        self
    }

    /// Sets the args block.
    pub fn with_args(mut self, args: ArgsConfig) -> Self {
        self.args = Some(args);
        self
    }

    /// Sets the handler name.
    pub fn with_run_func(mut self, run_func: &str) -> Self {
        self.run_func = run_func.to_string();
        self
    }

    /// Adds a nested subcommand under `key`.
    pub fn with_subcommand(mut self, key: &str, sub: CommandConfig) -> Self {
        self.commands.insert(key.to_string(), sub);
        self
    }
}

/// Returns the first whitespace-delimited token of a `use` line.
pub fn command_name(use_line: &str) -> &str {
    use_line.split_whitespace().next().unwrap_or("")
}

/// Argument-count configuration as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgsConfig {
    /// One of `none`, `any`, `exact`, `min`, `max`, `range`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Required count for `exact`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: i64,
    /// Lower bound for `min` and `range`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub min: i64,
    /// Upper bound for `max` and `range`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl ArgsConfig {
    /// `type: none`.
    pub fn none() -> Self {
        Self::of(ArgsKind::None)
    }

    /// `type: any`.
    pub fn any() -> Self {
        Self::of(ArgsKind::Any)
    }

    /// `type: exact` with `count`.
    pub fn exact(count: i64) -> Self {
        Self {
            count,
            ..Self::of(ArgsKind::Exact)
        }
    }

    /// `type: min` with `min`.
    pub fn min(min: i64) -> Self {
        Self {
            min,
            ..Self::of(ArgsKind::Min)
        }
    }

    /// `type: max` with `max`.
    pub fn max(max: i64) -> Self {
        Self {
            max,
            ..Self::of(ArgsKind::Max)
        }
    }

    /// `type: range` with `min` and `max`.
    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            ..Self::of(ArgsKind::Range)
        }
    }

    fn of(kind: ArgsKind) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Parses the `type` field. An empty type yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::UnknownType`] for unrecognised values.
    pub fn args_kind(&self) -> Result<Option<ArgsKind>, ArgsError> {
        if self.kind.is_empty() {
            return Ok(None);
        }
        self.kind.parse().map(Some)
    }

    /// Resolves the bounds into an [`ArgsPolicy`].
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{ArgsConfig, ArgsPolicy};
    ///
    /// assert_eq!(ArgsConfig::range(1, 3).policy().unwrap(), ArgsPolicy::Range(1, 3));
    /// assert!(ArgsConfig::exact(-1).policy().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError`] for unknown types or negative bounds.
    pub fn policy(&self) -> Result<ArgsPolicy, ArgsError> {
        let Some(kind) = self.args_kind()? else {
            return Ok(ArgsPolicy::Any);
        };
        let policy = match kind {
            ArgsKind::None => ArgsPolicy::None,
            ArgsKind::Any => ArgsPolicy::Any,
            ArgsKind::Exact => ArgsPolicy::Exact(bound("count", self.count)?),
            ArgsKind::Min => ArgsPolicy::Min(bound("min", self.min)?),
            ArgsKind::Max => ArgsPolicy::Max(bound("max", self.max)?),
            ArgsKind::Range => {
                ArgsPolicy::Range(bound("min", self.min)?, bound("max", self.max)?)
            }
        };
        Ok(policy)
    }
}

fn bound(field: &'static str, value: i64) -> Result<usize, ArgsError> {
    usize::try_from(value).map_err(|_| ArgsError::NegativeBound { field, value })
}

/// Errors resolving an [`ArgsConfig`] into a policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// The `type` field is not one of the supported values.
    #[error("unknown args type {0:?}")]
    UnknownType(String),
    /// A bound is negative.
    #[error("args {field} must not be negative (got {value})")]
    NegativeBound { field: &'static str, value: i64 },
}

/// Supported argument-count rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgsKind {
    None,
    Any,
    Exact,
    Min,
    Max,
    Range,
}

impl ArgsKind {
    /// All kinds in documentation order.
    pub const ALL: [ArgsKind; 6] = [
        ArgsKind::None,
        ArgsKind::Any,
        ArgsKind::Exact,
        ArgsKind::Min,
        ArgsKind::Max,
        ArgsKind::Range,
    ];

    /// Returns the document spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ArgsKind::None => "none",
            ArgsKind::Any => "any",
            ArgsKind::Exact => "exact",
            ArgsKind::Min => "min",
            ArgsKind::Max => "max",
            ArgsKind::Range => "range",
        }
    }
}

impl fmt::Display for ArgsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgsKind {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgsKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ArgsError::UnknownType(s.to_string()))
    }
}

/// Resolved argument-count rule enforced when a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsPolicy {
    /// No positional arguments.
    None,
    /// Any number, including zero.
    Any,
    /// Exactly `n`.
    Exact(usize),
    /// At least `n`.
    Min(usize),
    /// At most `n`.
    Max(usize),
    /// Between `min` and `max`, inclusive.
    Range(usize, usize),
}

impl ArgsPolicy {
    /// Checks a positional argument count against the policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::ArgsPolicy;
    ///
    /// assert!(ArgsPolicy::Range(1, 2).check(2).is_ok());
    /// assert!(ArgsPolicy::Range(1, 2).check(3).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ArityError`] describing the violated bound.
    pub fn check(&self, received: usize) -> Result<(), ArityError> {
        match *self {
            ArgsPolicy::None if received > 0 => Err(ArityError::NoArgs { received }),
            ArgsPolicy::Exact(expected) if received != expected => {
                Err(ArityError::Exact { expected, received })
            }
            ArgsPolicy::Min(min) if received < min => Err(ArityError::TooFew { min, received }),
            ArgsPolicy::Max(max) if received > max => Err(ArityError::TooMany { max, received }),
            ArgsPolicy::Range(min, max) if received < min || received > max => {
                Err(ArityError::OutOfRange { min, max, received })
            }
            _ => Ok(()),
        }
    }

    /// Number of leading positional slots that are always present.
    pub fn fixed_slots(&self) -> usize {
        match *self {
            ArgsPolicy::Exact(n) | ArgsPolicy::Min(n) | ArgsPolicy::Range(n, _) => n,
            ArgsPolicy::None | ArgsPolicy::Any | ArgsPolicy::Max(_) => 0,
        }
    }

    /// Human-readable description used in generated documentation.
    pub fn describe(&self) -> String {
        match *self {
            ArgsPolicy::None => "No arguments allowed".to_string(),
            ArgsPolicy::Any => "Any number of arguments".to_string(),
            ArgsPolicy::Exact(n) => format!("Exactly {n} argument(s) required"),
            ArgsPolicy::Min(n) => format!("At least {n} argument(s) required"),
            ArgsPolicy::Max(n) => format!("At most {n} argument(s) allowed"),
            ArgsPolicy::Range(min, max) => format!("{min} to {max} argument(s)"),
        }
    }
}

/// Wrong number of positional arguments at invocation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("accepts no arguments, received {received}")]
    NoArgs { received: usize },
    #[error("accepts {expected} arg(s), received {received}")]
    Exact { expected: usize, received: usize },
    #[error("requires at least {min} arg(s), only received {received}")]
    TooFew { min: usize, received: usize },
    #[error("accepts at most {max} arg(s), received {received}")]
    TooMany { max: usize, received: usize },
    #[error("accepts between {min} and {max} arg(s), received {received}")]
    OutOfRange {
        min: usize,
        max: usize,
        received: usize,
    },
}

/// One flag as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagConfig {
    /// Long name (`namespace` for `--namespace`).
    #[serde(default)]
    pub name: String,
    /// Single-character short alias (`n` for `-n`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shorthand: String,
    /// One of `string`, `bool`, `int`, `stringSlice`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// String-encoded default value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    /// Help text.
    #[serde(default)]
    pub usage: String,
    /// Must be given on the command line.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Inherited by every descendant command.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub persistent: bool,
    /// Hidden from help and generated docs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl FlagConfig {
    /// Creates a flag of the given kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{FlagConfig, FlagKind};
    ///
    /// let flag = FlagConfig::new("force", FlagKind::Bool, "Force the operation")
    ///     .with_shorthand("f");
    /// assert_eq!(flag.flag_kind().unwrap(), FlagKind::Bool);
    /// assert_eq!(flag.short_char(), Some('f'));
    /// ```
    pub fn new(name: &str, kind: FlagKind, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            usage: usage.to_string(),
            ..Default::default()
        }
    }

    /// Sets the shorthand.
    pub fn with_shorthand(mut self, shorthand: &str) -> Self {
        self.shorthand = shorthand.to_string();
        self
    }

    /// Sets the string-encoded default.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    /// Marks the flag as persistent.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the flag as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Parses the `type` field.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFlagKind`] for unsupported types.
    pub fn flag_kind(&self) -> Result<FlagKind, UnknownFlagKind> {
        self.kind.parse()
    }

    /// Returns the shorthand as a character when it is exactly one.
    pub fn short_char(&self) -> Option<char> {
        let mut chars = self.shorthand.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Supported flag value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    String,
    Bool,
    Int,
    StringSlice,
}

impl FlagKind {
    /// All kinds in documentation order.
    pub const ALL: [FlagKind; 4] = [
        FlagKind::String,
        FlagKind::Bool,
        FlagKind::Int,
        FlagKind::StringSlice,
    ];

    /// Returns the document spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::String => "string",
            FlagKind::Bool => "bool",
            FlagKind::Int => "int",
            FlagKind::StringSlice => "stringSlice",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagKind {
    type Err = UnknownFlagKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlagKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownFlagKind(s.to_string()))
    }
}

/// A flag `type` outside [`FlagKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported flag type: {0}")]
pub struct UnknownFlagKind(pub String);

/// Joins the document spellings of a kind list for messages.
pub(crate) fn spellings<T: fmt::Display>(kinds: &[T]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
