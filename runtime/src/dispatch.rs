//! Running a built command tree.

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::error::ErrorKind;
use clap::{ArgMatches, Command};
use command_tree_core::{ArgsPolicy, ArityError, FlagKind};
use thiserror::Error;
use tracing::debug;

use crate::builder::ARGS_ID;
use crate::{Binding, HandlerError, Invocation};

/// Errors from parsing a command line or running its handler.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// clap rejected the command line, or help/version was requested.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("{path}: {source}")]
    Arity {
        path: String,
        #[source]
        source: ArityError,
    },

    #[error("{path}: required flag(s) {} not set", quoted(.flags))]
    MissingRequiredFlags { path: String, flags: Vec<String> },

    #[error("{path}: {source}")]
    Handler {
        path: String,
        #[source]
        source: HandlerError,
    },
}

fn quoted(flags: &[String]) -> String {
    flags
        .iter()
        .map(|flag| format!("\"{flag}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExecuteError {
    /// Process exit code for this error.
    ///
    /// Help and version requests report success.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecuteError::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }

    /// Prints the error and exits the process.
    pub fn exit(&self) -> ! {
        match self {
            ExecuteError::Usage(err) => err.exit(),
            _ => {
                eprintln!("{}", self.report());
                std::process::exit(self.exit_code())
            }
        }
    }

    /// The line [`ExecuteError::exit`] prints for non-usage errors.
    fn report(&self) -> String {
        format!("error: {self}")
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The matched command's handler ran.
    Ran,
    /// The matched command has no handler; this is its help text.
    Help(String),
}

/// One command in the dispatch table.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) path: String,
    pub(crate) policy: ArgsPolicy,
    pub(crate) binding: Option<Binding>,
    /// Flags visible on the command, inherited ones included.
    pub(crate) flags: BTreeMap<String, FlagKind>,
    /// Required persistent flags, own and inherited.
    pub(crate) required_persistent: Vec<String>,
    /// Children keyed by canonical name.
    pub(crate) children: BTreeMap<String, Node>,
}

impl Node {
    /// Number of commands in this subtree, this one included.
    pub(crate) fn count(&self) -> usize {
        1 + self.children.values().map(Node::count).sum::<usize>()
    }
}

/// A runnable command tree produced by [`build`](crate::build).
///
/// The tree owns its handlers and does not borrow the registry it was
/// built from.
#[derive(Debug, Clone)]
pub struct CommandTree {
    command: Command,
    root: Node,
}

impl CommandTree {
    pub(crate) fn new(command: Command, root: Node) -> Self {
        Self { command, root }
    }

    /// The underlying clap command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Consumes the tree, returning the clap command.
    pub fn into_command(self) -> Command {
        self.command
    }

    /// Space-separated paths of every command, root first.
    pub fn paths(&self) -> Vec<&str> {
        fn walk<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
            out.push(&node.path);
            for child in node.children.values() {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Parses `args` (program name first) and runs the matched command.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Usage`] for parse failures and help/version
    /// requests, [`ExecuteError::Arity`] and
    /// [`ExecuteError::MissingRequiredFlags`] for invalid invocations, and
    /// [`ExecuteError::Handler`] when the handler fails.
    pub fn run_from<I, T>(&self, args: I) -> Result<Dispatched, ExecuteError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = self.command.clone();
        let matches = command.try_get_matches_from_mut(args)?;

        let mut node = &self.root;
        let mut leaf = &matches;
        let mut names = Vec::new();
        while let Some((name, sub_matches)) = leaf.subcommand() {
            let Some(child) = node.children.get(name) else {
                break;
            };
            names.push(name.to_string());
            node = child;
            leaf = sub_matches;
        }

        let positional: Vec<String> = leaf
            .get_many::<String>(ARGS_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let Some(binding) = &node.binding else {
            let Some(matched) = names
                .iter()
                .try_fold(&mut command, |cmd, name| cmd.find_subcommand_mut(name))
            else {
                return Ok(Dispatched::Help(String::new()));
            };
            // A group without a handler only takes subcommands, so a stray
            // word is a mistyped one.
            if let Some(unknown) = positional.first().filter(|_| !node.children.is_empty()) {
                let message = format!("unknown command \"{unknown}\" for \"{}\"\n", node.path);
                return Err(clap::Error::raw(ErrorKind::InvalidSubcommand, message)
                    .format(matched)
                    .into());
            }
            return Ok(Dispatched::Help(matched.render_help().to_string()));
        };

        node.policy
            .check(positional.len())
            .map_err(|source| ExecuteError::Arity {
                path: node.path.clone(),
                source,
            })?;

        let missing: Vec<String> = node
            .required_persistent
            .iter()
            .filter(|flag| leaf.value_source(flag) != Some(ValueSource::CommandLine))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ExecuteError::MissingRequiredFlags {
                path: node.path.clone(),
                flags: missing,
            });
        }

        debug!(path = %node.path, args = positional.len(), "Dispatching");
        run_binding(binding, node, leaf, &positional).map_err(|source| ExecuteError::Handler {
            path: node.path.clone(),
            source,
        })?;
        Ok(Dispatched::Ran)
    }

    /// Runs the tree against the process arguments, printing help for
    /// commands without a handler.
    ///
    /// # Errors
    ///
    /// See [`CommandTree::run_from`]. Callers usually finish with
    /// [`ExecuteError::exit`].
    pub fn execute(&self) -> Result<(), ExecuteError> {
        if let Dispatched::Help(text) = self.run_from(std::env::args_os())? {
            print!("{text}");
        }
        Ok(())
    }
}

fn run_binding(
    binding: &Binding,
    node: &Node,
    matches: &ArgMatches,
    positional: &[String],
) -> Result<(), HandlerError> {
    let invocation = Invocation::new(&node.path, &node.flags, matches);
    match binding {
        Binding::Handler(handler) => handler(&invocation, positional),
        Binding::Action(action) => action(&invocation),
    }
}
