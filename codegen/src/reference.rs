//! Reference documentation for the configuration format itself.
//!
//! Unlike [`generate_docs`](crate::generate_docs), nothing here depends on
//! a user's configuration: field tables come from
//! [`command_tree_core::schema`] and the examples are bundled.

use command_tree_core::schema::{self, STRUCTURES};
use command_tree_core::{ArgsKind, FlagKind, ToolConfig};

use crate::error::Result;
use crate::generate_handlers;

/// Example configuration used in the quick start.
pub const EXAMPLE_COMMANDS_YAML: &str = r#"name: "my-tool"
version: "1.0.0"
root:
  use: "my-tool"
  short: "My CLI tool"
  flags:
    - name: "config"
      shorthand: "c"
      type: "string"
      usage: "Config file path"
      persistent: true

commands:
  list:
    use: "list"
    short: "List items"
    args:
      type: none
    run_func: "runList"

  add:
    use: "add <name>"
    short: "Add an item"
    args:
      type: exact
      count: 1
    run_func: "runAdd"

  delete:
    use: "delete <name>"
    short: "Delete an item"
    aliases:
      - rm
    args:
      type: exact
      count: 1
    run_func: "runDelete"
"#;

/// Example `main.rs` matching [`EXAMPLE_COMMANDS_YAML`].
pub const EXAMPLE_MAIN_RS: &str = r#"use command_tree::{HandlerRegistry, ToolConfig, build};

const COMMANDS_YAML: &str = include_str!("commands.yaml");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ToolConfig::from_yaml(COMMANDS_YAML)?;

    let mut registry = HandlerRegistry::new();
    registry
        .register_action("runList", |_ctx| {
            println!("Listing items...");
            Ok(())
        })
        .register("runAdd", |_ctx, args| {
            println!("Adding: {}", args[0]);
            Ok(())
        })
        .register("runDelete", |_ctx, args| {
            println!("Deleting: {}", args[0]);
            Ok(())
        });

    let tree = build(&config, &registry)?;
    if let Err(err) = tree.execute() {
        err.exit();
    }
    Ok(())
}
"#;

/// Configuration whose generated handler is shown in the code generation
/// section.
const CODEGEN_SAMPLE_YAML: &str = r#"name: "example"
root:
  use: "example"
  short: "Example CLI tool"
commands:
  add:
    use: "add <name>"
    short: "Add an item"
    run_func: "runAdd"
    flags:
      - name: "force"
        shorthand: "f"
        type: bool
        usage: "Force the operation"
    args:
      type: exact
      count: 1"#;

/// Generates the configuration reference: flag types, argument rules and
/// one field table per model structure.
pub fn generate_yaml_reference() -> String {
    let mut out = String::new();

    out.push_str("### Flag Types\n\n");
    out.push_str("| Type | Rust Type | Example |\n");
    out.push_str("|------|-----------|---------|\n");
    for kind in FlagKind::ALL {
        let (rust_type, example) = schema::flag_kind_doc(kind);
        out.push_str(&format!("| `{kind}` | `{rust_type}` | `{example}` |\n"));
    }
    out.push('\n');

    out.push_str("### Args Validation\n\n");
    out.push_str("| Type | Description | Config |\n");
    out.push_str("|------|-------------|--------|\n");
    for kind in ArgsKind::ALL {
        let (description, snippet) = schema::args_kind_doc(kind);
        out.push_str(&format!("| `{kind}` | {description} | {snippet} |\n"));
    }
    out.push('\n');

    for structure in STRUCTURES {
        let with_required = structure == "FlagConfig";
        let title = if structure == "ToolConfig" {
            "ToolConfig (Root)"
        } else {
            structure
        };
        out.push_str(&format!("### {title}\n\n"));
        if with_required {
            out.push_str("| YAML Key | Type | Required | Description |\n");
            out.push_str("|----------|------|----------|-------------|\n");
        } else {
            out.push_str("| YAML Key | Type | Description |\n");
            out.push_str("|----------|------|-------------|\n");
        }
        for field in schema::fields_of(structure) {
            if with_required {
                let required = if field.required { "Yes" } else { "" };
                out.push_str(&format!(
                    "| `{}` | `{}` | {required} | {} |\n",
                    field.key, field.type_label, field.description
                ));
            } else {
                out.push_str(&format!(
                    "| `{}` | `{}` | {} |\n",
                    field.key, field.type_label, field.description
                ));
            }
        }
        out.push('\n');
    }

    out.push_str("### Validation\n\n");
    out.push_str("Configurations are validated when loaded, before any command is built. ");
    out.push_str("Every problem is reported at once. Beyond the required fields above:\n\n");
    out.push_str("- `root` must not declare `commands`; top-level commands go in the ");
    out.push_str("top-level `commands` map.\n");
    out.push_str("- Flag `type` must be one of the flag types listed above.\n");
    out.push_str("- Flag `shorthand` must be a single character.\n");
    out.push_str("- Command names (the first word of `use`, or the map key) and flag names ");
    out.push_str("and shorthands must be unique among siblings.\n\n");

    out.push_str("### Hidden Commands/Flags\n\n");
    out.push_str("```yaml\n");
    out.push_str("commands:\n");
    out.push_str("  internal:\n");
    out.push_str("    use: internal\n");
    out.push_str("    short: Internal command\n");
    out.push_str("    hidden: true\n");
    out.push('\n');
    out.push_str("root:\n");
    out.push_str("  flags:\n");
    out.push_str("    - name: debug\n");
    out.push_str("      type: bool\n");
    out.push_str("      usage: Enable debug output\n");
    out.push_str("      hidden: true\n");
    out.push_str("```\n");
    out
}

/// Generates the quick start: example configuration, example `main.rs`
/// and the commands to try it.
pub fn generate_quick_start() -> String {
    let mut out = String::new();
    out.push_str("1. Create `src/commands.yaml`:\n\n");
    out.push_str("```yaml\n");
    out.push_str(EXAMPLE_COMMANDS_YAML);
    out.push_str("```\n\n");
    out.push_str("1. Create `src/main.rs`:\n\n");
    out.push_str("```rust\n");
    out.push_str(EXAMPLE_MAIN_RS);
    out.push_str("```\n\n");
    out.push_str("1. Run:\n\n");
    out.push_str("```bash\n");
    out.push_str("cargo run -- --help\n");
    out.push_str("cargo run -- list\n");
    out.push_str("cargo run -- add myitem\n");
    out.push_str("cargo run -- --version\n");
    out.push_str("```\n");
    out
}

/// Generates the code generation section, embedding the handler generated
/// for a bundled sample configuration.
///
/// # Errors
///
/// Fails only if the bundled sample stops loading or generating.
pub fn generate_codegen_section() -> Result<String> {
    let config = ToolConfig::from_yaml(CODEGEN_SAMPLE_YAML)?;
    let code = generate_handlers(&config, "handlers")?;
    let handler: Vec<&str> = code
        .lines()
        .skip_while(|line| !line.starts_with("///"))
        .collect();

    let mut out = String::new();
    out.push_str("Generate handler stubs from your YAML configuration:\n\n");
    out.push_str("```bash\n");
    out.push_str("# Create a new commands.yaml template\n");
    out.push_str("cmdtree init my-app\n");
    out.push('\n');
    out.push_str("# Generate src/handlers.rs and src/main.rs\n");
    out.push_str("cmdtree gen src/commands.yaml\n");
    out.push('\n');
    out.push_str("# Choose the module name and output paths\n");
    out.push_str("cmdtree gen src/commands.yaml -p commands -o src/commands.rs -m src/main.rs\n");
    out.push_str("```\n\n");
    out.push_str("### Generated Code Example\n\n");
    out.push_str("From this YAML:\n\n");
    out.push_str("```yaml\n");
    out.push_str(CODEGEN_SAMPLE_YAML);
    out.push_str("\n```\n\n");
    out.push_str("Generates:\n\n");
    out.push_str("```rust\n");
    out.push_str(&handler.join("\n"));
    out.push_str("\n```\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_covers_every_kind_and_field() {
        let reference = generate_yaml_reference();

        for kind in FlagKind::ALL {
            assert!(reference.contains(&format!("| `{kind}` |")));
        }
        for kind in ArgsKind::ALL {
            assert!(reference.contains(&format!("| `{kind}` |")));
        }
        for field in schema::FIELDS {
            assert!(reference.contains(&format!("| `{}` |", field.key)));
        }
        assert!(reference.contains("| `stringSlice` | `Vec<String>` | `--tags a,b,c` |"));
        assert!(reference.contains("| `usage` | `String` | Yes | Description shown in help |"));
        assert!(reference.contains("### ToolConfig (Root)"));
        assert!(reference.contains("### ArgsConfig"));
    }

    #[test]
    fn test_reference_lists_load_time_checks() {
        let reference = generate_yaml_reference();
        assert!(reference.contains("### Validation"));
        assert!(reference.contains("`root` must not declare `commands`"));
        assert!(reference.contains("`shorthand` must be a single character"));
        assert!(reference.find("### Validation").unwrap() < reference.find("### Hidden").unwrap());
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = ToolConfig::from_yaml(EXAMPLE_COMMANDS_YAML).unwrap();
        assert_eq!(config.commands.len(), 3);
        assert!(generate_quick_start().contains("cargo run -- add myitem"));
    }

    #[test]
    fn test_codegen_section_embeds_generated_handler() {
        let section = generate_codegen_section().unwrap();
        assert!(section.contains("```rust\n/// `add <name>`: Add an item\npub fn runAdd("));
        assert!(section.contains(r#"ctx.get_bool("force")?"#));
        assert!(!section.contains("#![allow"));
    }
}
