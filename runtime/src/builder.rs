//! Turns a [`ToolConfig`] into a runnable [`CommandTree`].
//!
//! Each configured command becomes a [`clap::Command`]. Positional
//! arguments are collected by a single catch-all argument so that arity is
//! enforced by the command's [`ArgsPolicy`] at dispatch time, with the same
//! messages for every policy. Persistent flags become clap global
//! arguments; because clap rejects required globals, required persistent
//! flags are checked at dispatch as well.

use std::collections::{BTreeMap, BTreeSet};

use clap::{Arg, ArgAction, Command, value_parser};
use command_tree_core::{
    ArgsError, ArgsPolicy, CommandConfig, FlagConfig, FlagKind, ToolConfig, UnknownFlagKind,
    ValidationReport,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::dispatch::{CommandTree, Node};
use crate::{Binding, HandlerRegistry};

/// Id of the catch-all positional argument.
pub(crate) const ARGS_ID: &str = "__args";

const HELP_ID: &str = "help";
const VERSION_ID: &str = "version";

/// Errors that abort building a command tree.
///
/// Paths are space-separated command paths starting with the root name.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationReport),

    #[error("command \"{path}\": function {name} not registered")]
    FunctionNotRegistered { path: String, name: String },

    /// An action was bound to a command that accepts positional arguments.
    #[error(
        "command \"{path}\": function {name} is registered as an action and takes no arguments ({})",
        .policy.describe()
    )]
    SignatureMismatch {
        path: String,
        name: String,
        policy: ArgsPolicy,
    },

    #[error("command \"{path}\": invalid {kind} default value {value:?} for flag {flag}")]
    InvalidDefault {
        path: String,
        flag: String,
        kind: FlagKind,
        value: String,
    },

    #[error("command \"{path}\": flag {flag}: {source}")]
    UnsupportedFlagType {
        path: String,
        flag: String,
        #[source]
        source: UnknownFlagKind,
    },

    #[error("command \"{path}\": {source}")]
    InvalidArgs {
        path: String,
        #[source]
        source: ArgsError,
    },

    #[error("command \"{path}\": flag {flag}: shorthand {shorthand:?} must be a single character")]
    InvalidShorthand {
        path: String,
        flag: String,
        shorthand: String,
    },

    /// A flag reuses the name or shorthand of a flag already visible on
    /// the command, inherited persistent flags included.
    #[error("command \"{path}\": flag {flag} conflicts with {existing}")]
    FlagConflict {
        path: String,
        flag: String,
        existing: String,
    },

    #[error("command \"{path}\": cannot mark unknown flag {flag}")]
    FlagNotFound { path: String, flag: String },

    #[error("command \"{path}\": alias {alias:?} is already used by a sibling command")]
    DuplicateAlias { path: String, alias: String },
}

/// Builds the command tree for `config`, binding handlers from `registry`.
///
/// The configuration is validated first. Any error aborts the build; no
/// partial tree is returned.
///
/// # Examples
///
/// ```
/// use command_tree::{HandlerRegistry, ToolConfig, build};
///
/// let config = ToolConfig::from_yaml(
///     r#"
/// name: greet
/// root:
///   use: greet
///   short: Say hello
///   run_func: runGreet
///   args:
///     type: exact
///     count: 1
/// "#,
/// )
/// .unwrap();
///
/// let mut registry = HandlerRegistry::new();
/// registry.register("runGreet", |_ctx, args| {
///     assert_eq!(args, ["world"]);
///     Ok(())
/// });
///
/// let tree = build(&config, &registry).unwrap();
/// tree.run_from(["greet", "world"]).unwrap();
/// ```
///
/// # Errors
///
/// See [`BuildError`].
pub fn build(config: &ToolConfig, registry: &HandlerRegistry) -> Result<CommandTree, BuildError> {
    config.validate()?;

    let root_name = config.root_name().to_string();
    let builder = TreeBuilder { registry };
    let version = Some(config.version.as_str()).filter(|v| !v.is_empty());
    let (command, root) = builder.build_node(
        &config.root,
        &root_name,
        root_name.clone(),
        &Scope::default(),
        &config.commands,
        version,
    )?;

    info!(
        tool = %config.name,
        commands = root.count(),
        "Built command tree"
    );
    Ok(CommandTree::new(command, root))
}

/// Flags visible on a command.
#[derive(Debug, Clone, Default)]
struct Scope {
    longs: BTreeMap<String, FlagKind>,
    shorts: BTreeMap<char, String>,
    required: Vec<String>,
}

impl Scope {
    fn conflict(&self, name: &str, short: Option<char>) -> Option<String> {
        if name == ARGS_ID || self.longs.contains_key(name) {
            return Some(format!("--{name}"));
        }
        let short = short?;
        self.shorts
            .get(&short)
            .map(|owner| format!("-{short} (--{owner})"))
    }

    fn claim(&mut self, name: &str, kind: FlagKind, short: Option<char>) {
        self.longs.insert(name.to_string(), kind);
        if let Some(short) = short {
            self.shorts.insert(short, name.to_string());
        }
    }
}

struct TreeBuilder<'r> {
    registry: &'r HandlerRegistry,
}

impl TreeBuilder<'_> {
    fn build_node(
        &self,
        config: &CommandConfig,
        name: &str,
        path: String,
        inherited: &Scope,
        children: &BTreeMap<String, CommandConfig>,
        version: Option<&str>,
    ) -> Result<(Command, Node), BuildError> {
        let policy = config
            .args_policy()
            .map_err(|source| BuildError::InvalidArgs {
                path: path.clone(),
                source,
            })?;

        let mut command = Command::new(name.to_string())
            .about(config.short.clone())
            .visible_aliases(config.aliases.clone())
            .hide(config.hidden)
            .disable_help_flag(true)
            .disable_version_flag(true);
        if !config.long.is_empty() {
            command = command.long_about(config.long.clone());
        }
        if let Some(version) = version {
            command = command.version(version.to_string());
        }

        // `local` is what this command sees; `inheritable` is what its
        // children see.
        let mut local = inherited.clone();
        let mut inheritable = inherited.clone();
        for flag in &config.flags {
            let kind = flag
                .flag_kind()
                .map_err(|source| BuildError::UnsupportedFlagType {
                    path: path.clone(),
                    flag: flag.name.clone(),
                    source,
                })?;
            let short = shorthand(flag, &path)?;
            if let Some(existing) = local.conflict(&flag.name, short) {
                return Err(BuildError::FlagConflict {
                    path,
                    flag: flag.name.clone(),
                    existing,
                });
            }

            command = command.arg(flag_arg(flag, kind, short, &path)?);
            if flag.required && !flag.persistent {
                command = mark_flag(command, &path, &flag.name, |arg| arg.required(true))?;
            }
            if flag.hidden {
                command = mark_flag(command, &path, &flag.name, |arg| arg.hide(true))?;
            }

            local.claim(&flag.name, kind, short);
            if flag.persistent {
                inheritable.claim(&flag.name, kind, short);
                if flag.required {
                    inheritable.required.push(flag.name.clone());
                }
            }
        }
        command = add_builtin_flags(command, &local, version.is_some());
        command = command.arg(positional_arg(config, policy));
        if !config.usage_hint().is_empty() {
            command = command.override_usage(format!("{path} [OPTIONS] {}", config.usage_hint()));
        }

        let binding = self.bind(config, &path, policy)?;
        let mut node = Node {
            path: path.clone(),
            policy,
            binding,
            flags: local.longs,
            required_persistent: inheritable.required.clone(),
            children: BTreeMap::new(),
        };

        let mut sibling_names = BTreeSet::new();
        for (key, child) in children {
            sibling_names.insert(child.name_or(key).to_string());
        }
        for child in children.values() {
            for alias in &child.aliases {
                if !sibling_names.insert(alias.clone()) {
                    return Err(BuildError::DuplicateAlias {
                        path,
                        alias: alias.clone(),
                    });
                }
            }
        }
        if sibling_names.contains(HELP_ID) {
            command = command.disable_help_subcommand(true);
        }

        for (key, child) in children {
            let child_name = child.name_or(key).to_string();
            let child_path = format!("{path} {child_name}");
            let (child_command, child_node) = self.build_node(
                child,
                &child_name,
                child_path,
                &inheritable,
                &child.commands,
                None,
            )?;
            command = command.subcommand(child_command);
            node.children.insert(child_name, child_node);
        }

        debug!(
            path = %node.path,
            flags = config.flags.len(),
            runnable = node.binding.is_some(),
            "Built command"
        );
        Ok((command, node))
    }

    fn bind(
        &self,
        config: &CommandConfig,
        path: &str,
        policy: ArgsPolicy,
    ) -> Result<Option<Binding>, BuildError> {
        if config.run_func.is_empty() {
            return Ok(None);
        }
        let binding = self.registry.get(&config.run_func).ok_or_else(|| {
            BuildError::FunctionNotRegistered {
                path: path.to_string(),
                name: config.run_func.clone(),
            }
        })?;
        if matches!(binding, Binding::Action(_)) && policy != ArgsPolicy::None {
            return Err(BuildError::SignatureMismatch {
                path: path.to_string(),
                name: config.run_func.clone(),
                policy,
            });
        }
        debug!(path, run_func = %config.run_func, shape = binding.shape(), "Bound handler");
        Ok(Some(binding.clone()))
    }
}

fn shorthand(flag: &FlagConfig, path: &str) -> Result<Option<char>, BuildError> {
    if flag.shorthand.is_empty() {
        return Ok(None);
    }
    flag.short_char()
        .map(Some)
        .ok_or_else(|| BuildError::InvalidShorthand {
            path: path.to_string(),
            flag: flag.name.clone(),
            shorthand: flag.shorthand.clone(),
        })
}

/// Creates the clap argument for one flag, applying its typed default.
fn flag_arg(
    flag: &FlagConfig,
    kind: FlagKind,
    short: Option<char>,
    path: &str,
) -> Result<Arg, BuildError> {
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .help(flag.usage.clone())
        .global(flag.persistent);
    if let Some(short) = short {
        arg = arg.short(short);
    }

    let arg = match kind {
        // Value-taking flags accept the next argument even when it starts
        // with `-`.
        FlagKind::String => {
            let arg = arg
                .action(ArgAction::Set)
                .value_parser(value_parser!(String))
                .allow_hyphen_values(true);
            if flag.default.is_empty() {
                arg
            } else {
                arg.default_value(flag.default.clone())
            }
        }
        // `--force` alone means true; an explicit value needs `=`.
        FlagKind::Bool => {
            let default = if flag.default == "true" { "true" } else { "false" };
            arg.action(ArgAction::Set)
                .value_parser(value_parser!(bool))
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .default_value(default)
        }
        FlagKind::Int => {
            let arg = arg
                .action(ArgAction::Set)
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true);
            if flag.default.is_empty() {
                arg
            } else {
                let value: i64 =
                    flag.default
                        .parse()
                        .map_err(|_| BuildError::InvalidDefault {
                            path: path.to_string(),
                            flag: flag.name.clone(),
                            kind,
                            value: flag.default.clone(),
                        })?;
                arg.default_value(value.to_string())
            }
        }
        // Slices start empty; the configured default is documentation only.
        FlagKind::StringSlice => arg
            .action(ArgAction::Append)
            .value_parser(value_parser!(String))
            .value_delimiter(',')
            .allow_hyphen_values(true),
    };
    Ok(arg)
}

/// Applies `f` to an already registered flag.
fn mark_flag(
    command: Command,
    path: &str,
    flag: &str,
    f: impl FnOnce(Arg) -> Arg,
) -> Result<Command, BuildError> {
    if !command.get_arguments().any(|arg| arg.get_id() == flag) {
        return Err(BuildError::FlagNotFound {
            path: path.to_string(),
            flag: flag.to_string(),
        });
    }
    Ok(command.mut_arg(flag, f))
}

/// Adds `--help` and, on the root of a versioned tool, `--version`. Each
/// gets its conventional short form unless a configured flag claims it.
fn add_builtin_flags(mut command: Command, scope: &Scope, versioned: bool) -> Command {
    if !scope.longs.contains_key(HELP_ID) {
        let mut help = Arg::new(HELP_ID)
            .long(HELP_ID)
            .action(ArgAction::Help)
            .help("Print help");
        if !scope.shorts.contains_key(&'h') {
            help = help.short('h');
        }
        command = command.arg(help);
    }
    if versioned && !scope.longs.contains_key(VERSION_ID) {
        let mut version = Arg::new(VERSION_ID)
            .long(VERSION_ID)
            .action(ArgAction::Version)
            .help("Print version");
        if !scope.shorts.contains_key(&'V') {
            version = version.short('V');
        }
        command = command.arg(version);
    }
    command
}

fn positional_arg(config: &CommandConfig, policy: ArgsPolicy) -> Arg {
    Arg::new(ARGS_ID)
        .value_name("ARGS")
        .action(ArgAction::Append)
        .num_args(0..)
        .hide(policy == ArgsPolicy::None)
        .help(if config.usage_hint().is_empty() {
            policy.describe()
        } else {
            format!("{} ({})", config.usage_hint(), policy.describe())
        })
}

#[cfg(test)]
mod tests {
    use command_tree_core::{ArgsConfig, FlagKind};

    use super::*;

    fn tool(root: CommandConfig) -> ToolConfig {
        ToolConfig {
            name: "tool".into(),
            root,
            ..Default::default()
        }
    }

    fn with_command(mut config: ToolConfig, key: &str, cmd: CommandConfig) -> ToolConfig {
        config.commands.insert(key.into(), cmd);
        config
    }

    fn noop_registry(names: &[&str]) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for name in names {
            registry.register(*name, |_, _| Ok(()));
        }
        registry
    }

    #[test]
    fn test_build_creates_subcommands_with_aliases() {
        let mut delete = CommandConfig::new("delete <name>", "Delete").with_run_func("runDelete");
        delete.aliases = vec!["rm".into()];
        let config = with_command(
            tool(CommandConfig::new("tool", "Root")),
            "delete",
            delete,
        );

        let tree = build(&config, &noop_registry(&["runDelete"])).unwrap();
        let sub = tree.command().find_subcommand("rm").unwrap();
        assert_eq!(sub.get_name(), "delete");
    }

    #[test]
    fn test_unregistered_function_is_an_error() {
        let config = with_command(
            tool(CommandConfig::new("tool", "Root")),
            "list",
            CommandConfig::new("list", "List").with_run_func("runList"),
        );

        let err = build(&config, &HandlerRegistry::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "command \"tool list\": function runList not registered"
        );
    }

    #[test]
    fn test_action_requires_no_args_policy() {
        let list = CommandConfig::new("list", "List").with_run_func("runList");
        let mut registry = HandlerRegistry::new();
        registry.register_action("runList", |_| Ok(()));

        let config = with_command(tool(CommandConfig::new("tool", "Root")), "list", list.clone());
        assert!(matches!(
            build(&config, &registry),
            Err(BuildError::SignatureMismatch { .. })
        ));

        let config = with_command(
            tool(CommandConfig::new("tool", "Root")),
            "list",
            list.with_args(ArgsConfig::none()),
        );
        assert!(build(&config, &registry).is_ok());
    }

    #[test]
    fn test_invalid_int_default_is_an_error() {
        let root = CommandConfig::new("tool", "Root")
            .with_flag(FlagConfig::new("count", FlagKind::Int, "Count").with_default("ten"));

        let err = build(&tool(root), &HandlerRegistry::new()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDefault { ref value, .. } if value == "ten"));
    }

    #[test]
    fn test_local_flag_cannot_shadow_persistent_flag() {
        let root = CommandConfig::new("tool", "Root").with_flag(
            FlagConfig::new("config", FlagKind::String, "Config")
                .with_shorthand("c")
                .persistent(),
        );
        let sub = CommandConfig::new("sub", "Sub")
            .with_flag(FlagConfig::new("color", FlagKind::Bool, "Color").with_shorthand("c"));
        let config = with_command(tool(root), "sub", sub);

        let err = build(&config, &HandlerRegistry::new()).unwrap_err();
        assert!(matches!(err, BuildError::FlagConflict { ref flag, .. } if flag == "color"));
    }

    #[test]
    fn test_alias_clash_between_siblings() {
        let mut add = CommandConfig::new("add", "Add");
        add.aliases = vec!["list".into()];
        let config = with_command(
            with_command(tool(CommandConfig::new("tool", "Root")), "add", add),
            "list",
            CommandConfig::new("list", "List"),
        );

        let err = build(&config, &HandlerRegistry::new()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateAlias { ref alias, .. } if alias == "list"));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_building() {
        let config = tool(CommandConfig::new("", ""));
        let err = build(&config, &HandlerRegistry::new()).unwrap_err();
        let BuildError::Invalid(report) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_user_flag_keeps_its_short_form() {
        let root = CommandConfig::new("tool", "Root")
            .with_flag(FlagConfig::new("host", FlagKind::String, "Host").with_shorthand("h"));
        let tree = build(&tool(root), &HandlerRegistry::new()).unwrap();

        let host = tree
            .command()
            .get_arguments()
            .find(|arg| arg.get_id() == "host")
            .unwrap();
        assert_eq!(host.get_short(), Some('h'));
        let help = tree
            .command()
            .get_arguments()
            .find(|arg| arg.get_id() == HELP_ID)
            .unwrap();
        assert_eq!(help.get_short(), None);
    }

    #[test]
    fn test_mark_flag_checks_existence() {
        let command = Command::new("tool");
        let err = mark_flag(command, "tool", "missing", |arg| arg.hide(true)).unwrap_err();
        assert!(matches!(err, BuildError::FlagNotFound { .. }));
    }
}
