use command_tree_core::ToolConfig;
use tracing::info;

use crate::collect::collect_functions;
use crate::error::{GenerateError, Result};
use crate::handlers::{check_module, function_name};

/// Generates a `main.rs` that embeds the configuration file, registers
/// every generated handler, builds the command tree and runs it.
///
/// `config_file` is the configuration path relative to the generated
/// `main.rs`; it is embedded with `include_str!`.
///
/// # Errors
///
/// Same conditions as [`generate_handlers`](crate::generate_handlers).
pub fn generate_main(config: &ToolConfig, module: &str, config_file: &str) -> Result<String> {
    check_module(module)?;
    let funcs = collect_functions(config);
    if funcs.is_empty() {
        return Err(GenerateError::NoFunctions);
    }

    let mut out = String::new();
    out.push_str(&format!("//! Entry point for `{}`.\n", config.root_name()));
    out.push_str("//!\n");
    out.push_str(&format!(
        "//! Generated by cmdtree. Commands are defined in `{config_file}`.\n"
    ));
    out.push('\n');
    out.push_str(&format!("mod {module};\n"));
    out.push('\n');
    out.push_str("use command_tree::{HandlerRegistry, ToolConfig, build};\n");
    out.push('\n');
    out.push_str(&format!(
        "const COMMANDS_YAML: &str = include_str!({config_file:?});\n"
    ));
    out.push('\n');
    out.push_str("fn main() {\n");
    out.push_str("    let config = match ToolConfig::from_yaml(COMMANDS_YAML) {\n");
    out.push_str("        Ok(config) => config,\n");
    out.push_str("        Err(err) => {\n");
    out.push_str("            eprintln!(\"error: {err}\");\n");
    out.push_str("            std::process::exit(1);\n");
    out.push_str("        }\n");
    out.push_str("    };\n");
    out.push('\n');
    out.push_str("    let mut registry = HandlerRegistry::new();\n");
    for func in &funcs {
        let name = function_name(func)?;
        out.push_str(&format!(
            "    registry.register({:?}, {module}::{name});\n",
            func.name
        ));
    }
    out.push('\n');
    out.push_str("    let tree = match build(&config, &registry) {\n");
    out.push_str("        Ok(tree) => tree,\n");
    out.push_str("        Err(err) => {\n");
    out.push_str("            eprintln!(\"error: {err}\");\n");
    out.push_str("            std::process::exit(1);\n");
    out.push_str("        }\n");
    out.push_str("    };\n");
    out.push('\n');
    out.push_str("    if let Err(err) = tree.execute() {\n");
    out.push_str("        err.exit();\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    info!(module, config_file, handlers = funcs.len(), "Generated main");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: my-tool
root:
  use: my-tool
  short: My CLI tool
commands:
  add:
    use: add <name>
    short: Add an item
    run_func: runAdd
  list:
    use: list
    short: List items
    run_func: runList
  kind:
    use: kind
    short: Keyword handler
    run_func: type
"#;

    #[test]
    fn test_main_registers_every_handler() {
        let config = ToolConfig::from_yaml(YAML).unwrap();
        let code = generate_main(&config, "handlers", "commands.yaml").unwrap();

        assert!(code.contains("mod handlers;"));
        assert!(code.contains(r#"include_str!("commands.yaml")"#));
        assert!(code.contains(r#"registry.register("runAdd", handlers::runAdd);"#));
        assert!(code.contains(r#"registry.register("runList", handlers::runList);"#));
        assert!(code.contains(r#"registry.register("type", handlers::r#type);"#));
        assert!(code.contains("build(&config, &registry)"));
        assert!(code.contains("tree.execute()"));
    }

    #[test]
    fn test_main_requires_handlers() {
        let config = ToolConfig::from_yaml("name: t\nroot:\n  use: t\n  short: s\n").unwrap();
        let err = generate_main(&config, "handlers", "commands.yaml").unwrap_err();
        assert!(matches!(err, GenerateError::NoFunctions));
    }
}
