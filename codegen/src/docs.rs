//! README-style Markdown for a configured tool.
//!
//! Hidden commands (with everything below them) and hidden flags are left
//! out entirely.

use command_tree_core::{CommandConfig, FlagConfig, ToolConfig};
use tracing::info;

/// Heading level of top-level commands.
const COMMAND_HEADING_LEVEL: usize = 3;

/// Generates Markdown documentation for `config`.
///
/// # Examples
///
/// ```
/// use command_tree_codegen::generate_docs;
/// use command_tree_core::ToolConfig;
///
/// let config = ToolConfig::from_yaml(
///     r#"
/// name: my-tool
/// root:
///   use: my-tool
///   short: My CLI tool
/// commands:
///   add:
///     use: add <name>
///     short: Add an item
///     args:
///       type: exact
///       count: 1
/// "#,
/// )
/// .unwrap();
///
/// let docs = generate_docs(&config);
/// assert!(docs.starts_with("# my-tool\n"));
/// assert!(docs.contains("### add\n"));
/// assert!(docs.contains("my-tool add <name>"));
/// assert!(docs.contains("**Arguments:** Exactly 1 argument(s) required"));
/// ```
pub fn generate_docs(config: &ToolConfig) -> String {
    let root = &config.root;
    let root_name = config.root_name();
    let visible: Vec<(&String, &CommandConfig)> =
        config.commands.iter().filter(|(_, c)| !c.hidden).collect();

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", config.name));
    if !config.description.is_empty() {
        out.push_str(&format!("{}\n\n", config.description));
    }
    if !config.version.is_empty() {
        out.push_str(&format!("**Version:** {}\n\n", config.version));
    }

    out.push_str("## Installation\n\n");
    out.push_str("```bash\n");
    out.push_str(&format!("cargo install {}\n", config.name));
    out.push_str("```\n\n");

    out.push_str("## Usage\n\n");
    out.push_str("```bash\n");
    out.push_str(&root.use_line);
    if !visible.is_empty() {
        out.push_str(" [command]");
    }
    out.push_str("\n```\n\n");
    if !root.long.is_empty() {
        out.push_str(&format!("{}\n\n", root.long));
    }

    let root_flags = visible_flags(&root.flags);
    if !root_flags.is_empty() {
        out.push_str("### Global Flags\n\n");
        push_flag_table(&mut out, &root_flags);
        out.push('\n');
    }

    out.push_str("## Commands\n\n");
    for (key, cmd) in &visible {
        push_command(&mut out, key, cmd, root_name, 0);
    }

    let docs = collapse_blank_lines(&out);
    info!(tool = %config.name, bytes = docs.len(), "Generated docs");
    docs
}

fn push_command(out: &mut String, key: &str, cmd: &CommandConfig, parent: &str, depth: usize) {
    let name = cmd.name_or(key);
    let heading = "#".repeat(COMMAND_HEADING_LEVEL + depth);
    out.push_str(&format!("{heading} {name}\n\n"));
    if !cmd.short.is_empty() {
        out.push_str(&format!("{}\n\n", cmd.short));
    }

    let use_line = if cmd.use_line.is_empty() {
        name
    } else {
        cmd.use_line.as_str()
    };
    out.push_str("```bash\n");
    out.push_str(&format!("{parent} {use_line}\n"));
    out.push_str("```\n\n");

    if !cmd.long.is_empty() {
        out.push_str(&format!("{}\n\n", cmd.long));
    }
    if !cmd.aliases.is_empty() {
        out.push_str(&format!("**Aliases:** {}\n\n", cmd.aliases.join(", ")));
    }
    if cmd.args.is_some() {
        if let Ok(policy) = cmd.args_policy() {
            out.push_str(&format!("**Arguments:** {}\n\n", policy.describe()));
        }
    }

    let flags = visible_flags(&cmd.flags);
    if !flags.is_empty() {
        out.push_str("**Flags:**\n\n");
        push_flag_table(out, &flags);
        out.push('\n');
    }

    let path = format!("{parent} {name}");
    for (sub_key, sub) in cmd.commands.iter().filter(|(_, c)| !c.hidden) {
        push_command(out, sub_key, sub, &path, depth + 1);
    }
}

fn visible_flags(flags: &[FlagConfig]) -> Vec<&FlagConfig> {
    flags.iter().filter(|f| !f.hidden).collect()
}

fn push_flag_table(out: &mut String, flags: &[&FlagConfig]) {
    out.push_str("| Flag | Shorthand | Type | Default | Description |\n");
    out.push_str("|------|-----------|------|---------|-------------|\n");
    for flag in flags {
        let shorthand = if flag.shorthand.is_empty() {
            String::new()
        } else {
            format!("`-{}`", flag.shorthand)
        };
        let default = if flag.default.is_empty() {
            String::new()
        } else {
            format!("`{}`", cell(&flag.default))
        };
        let required = if flag.required { " **(required)**" } else { "" };
        out.push_str(&format!(
            "| `--{}` | {shorthand} | {} | {default} | {}{required} |\n",
            flag.name,
            flag.kind,
            cell(&flag.usage)
        ));
    }
}

/// Escapes text for use inside a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Collapses runs of blank lines into one and ends the text with a single
/// newline.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
