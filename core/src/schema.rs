//! Static metadata about the configuration model itself.
//!
//! Reference documentation is generated from these tables rather than from
//! a sample document. They are maintained by hand next to the model; the
//! tests below fail when a serialized key has no entry.

use crate::{ArgsKind, FlagKind};

/// One documented field of a model structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    /// Structure name (`ToolConfig`, `CommandConfig`, ...).
    pub structure: &'static str,
    /// YAML key.
    pub key: &'static str,
    /// Rust type shown in the reference.
    pub type_label: &'static str,
    /// Whether the validator requires a non-empty value.
    pub required: bool,
    /// Free-text description.
    pub description: &'static str,
}

const fn entry(
    structure: &'static str,
    key: &'static str,
    type_label: &'static str,
    required: bool,
    description: &'static str,
) -> SchemaField {
    SchemaField {
        structure,
        key,
        type_label,
        required,
        description,
    }
}

/// Documented structures, in reference order.
pub const STRUCTURES: [&str; 4] = ["ToolConfig", "CommandConfig", "ArgsConfig", "FlagConfig"];

/// Every documented field, grouped by structure in declaration order.
pub const FIELDS: &[SchemaField] = &[
    entry("ToolConfig", "name", "String", true, "Tool name"),
    entry("ToolConfig", "description", "String", false, "Tool description"),
    entry(
        "ToolConfig",
        "version",
        "String",
        false,
        "Tool version (shown with --version)",
    ),
    entry(
        "ToolConfig",
        "root",
        "CommandConfig",
        true,
        "Root command configuration",
    ),
    entry(
        "ToolConfig",
        "commands",
        "BTreeMap<String, CommandConfig>",
        false,
        "Top-level subcommands",
    ),
    entry(
        "CommandConfig",
        "use",
        "String",
        true,
        "Command name and argument pattern (e.g., `add <name>`)",
    ),
    entry(
        "CommandConfig",
        "aliases",
        "Vec<String>",
        false,
        "Alternative command names",
    ),
    entry(
        "CommandConfig",
        "short",
        "String",
        true,
        "Brief description shown in help",
    ),
    entry("CommandConfig", "long", "String", false, "Detailed description"),
    entry(
        "CommandConfig",
        "args",
        "Option<ArgsConfig>",
        false,
        "Argument validation configuration",
    ),
    entry(
        "CommandConfig",
        "run_func",
        "String",
        false,
        "Name of the handler function",
    ),
    entry(
        "CommandConfig",
        "flags",
        "Vec<FlagConfig>",
        false,
        "List of flag definitions",
    ),
    entry(
        "CommandConfig",
        "commands",
        "BTreeMap<String, CommandConfig>",
        false,
        "Nested subcommands",
    ),
    entry(
        "CommandConfig",
        "hidden",
        "bool",
        false,
        "Hide command from help output",
    ),
    entry(
        "ArgsConfig",
        "type",
        "String",
        true,
        "Validation type (none, any, exact, min, max, range)",
    ),
    entry("ArgsConfig", "count", "i64", false, "Required count for `exact`"),
    entry(
        "ArgsConfig",
        "min",
        "i64",
        false,
        "Minimum count for `min` and `range`",
    ),
    entry(
        "ArgsConfig",
        "max",
        "i64",
        false,
        "Maximum count for `max` and `range`",
    ),
    entry(
        "FlagConfig",
        "name",
        "String",
        true,
        "Flag name (e.g., `namespace` for --namespace)",
    ),
    entry(
        "FlagConfig",
        "shorthand",
        "String",
        false,
        "Short flag (e.g., `n` for -n)",
    ),
    entry(
        "FlagConfig",
        "type",
        "String",
        true,
        "Flag type (string, bool, int, stringSlice)",
    ),
    entry("FlagConfig", "default", "String", false, "Default value"),
    entry(
        "FlagConfig",
        "usage",
        "String",
        true,
        "Description shown in help",
    ),
    entry("FlagConfig", "required", "bool", false, "Mark flag as required"),
    entry(
        "FlagConfig",
        "persistent",
        "bool",
        false,
        "Inherit flag to all subcommands",
    ),
    entry(
        "FlagConfig",
        "hidden",
        "bool",
        false,
        "Hide flag from help output",
    ),
];

/// Returns the fields of one structure in declaration order.
///
/// # Examples
///
/// ```
/// use command_tree_core::schema::fields_of;
///
/// let keys: Vec<&str> = fields_of("ArgsConfig").map(|f| f.key).collect();
/// assert_eq!(keys, ["type", "count", "min", "max"]);
/// ```
pub fn fields_of(structure: &str) -> impl Iterator<Item = &'static SchemaField> + '_ {
    FIELDS.iter().filter(move |f| f.structure == structure)
}

/// Looks up one field by structure and key.
pub fn field(structure: &str, key: &str) -> Option<&'static SchemaField> {
    FIELDS
        .iter()
        .find(|f| f.structure == structure && f.key == key)
}

/// Rust type and command-line example for a flag kind.
pub fn flag_kind_doc(kind: FlagKind) -> (&'static str, &'static str) {
    match kind {
        FlagKind::String => ("String", "--name foo"),
        FlagKind::Bool => ("bool", "--debug"),
        FlagKind::Int => ("i64", "--count 10"),
        FlagKind::StringSlice => ("Vec<String>", "--tags a,b,c"),
    }
}

/// Description and configuration snippet for an args kind.
pub fn args_kind_doc(kind: ArgsKind) -> (&'static str, &'static str) {
    match kind {
        ArgsKind::None => ("No arguments allowed", "`type: none`"),
        ArgsKind::Any => ("Any number of arguments", "`type: any`"),
        ArgsKind::Exact => ("Exact number required", "`type: exact`, `count: N`"),
        ArgsKind::Min => ("Minimum number", "`type: min`, `min: N`"),
        ArgsKind::Max => ("Maximum number", "`type: max`, `max: N`"),
        ArgsKind::Range => ("Range of arguments", "`type: range`, `min: N`, `max: N`"),
    }
}
