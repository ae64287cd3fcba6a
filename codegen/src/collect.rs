use std::collections::BTreeSet;

use command_tree_core::{ArgsConfig, CommandConfig, FlagConfig, ToolConfig};
use tracing::warn;

/// A handler to generate: one per distinct `run_func` name.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncInfo {
    /// The `run_func` name.
    pub name: String,
    /// Space-separated command path, starting with the root name.
    pub command_path: String,
    /// The command's `use` line.
    pub use_line: String,
    pub short: String,
    pub flags: Vec<FlagConfig>,
    pub args: Option<ArgsConfig>,
}

/// Collects handler descriptors: root first, then depth-first over the
/// command maps in key order.
///
/// A name bound on several commands yields one descriptor, taken from the
/// first command that declares it.
pub fn collect_functions(config: &ToolConfig) -> Vec<FuncInfo> {
    let mut funcs = Vec::new();
    let mut seen = BTreeSet::new();
    let root_name = config.root_name().to_string();

    visit(&config.root, root_name.clone(), &mut seen, &mut funcs);
    for (key, cmd) in &config.commands {
        let path = format!("{root_name} {}", cmd.name_or(key));
        walk(cmd, path, &mut seen, &mut funcs);
    }
    funcs
}

fn walk(
    cmd: &CommandConfig,
    path: String,
    seen: &mut BTreeSet<String>,
    funcs: &mut Vec<FuncInfo>,
) {
    visit(cmd, path.clone(), seen, funcs);
    for (key, sub) in &cmd.commands {
        walk(sub, format!("{path} {}", sub.name_or(key)), seen, funcs);
    }
}

fn visit(
    cmd: &CommandConfig,
    path: String,
    seen: &mut BTreeSet<String>,
    funcs: &mut Vec<FuncInfo>,
) {
    if cmd.run_func.is_empty() {
        return;
    }
    if !seen.insert(cmd.run_func.clone()) {
        warn!(run_func = %cmd.run_func, path = %path, "Handler already collected, skipping");
        return;
    }
    funcs.push(FuncInfo {
        name: cmd.run_func.clone(),
        command_path: path,
        use_line: cmd.use_line.clone(),
        short: cmd.short.clone(),
        flags: cmd.flags.clone(),
        args: cmd.args.clone(),
    });
}
