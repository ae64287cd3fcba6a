/// Generates a starter `commands.yaml` for a tool called `name`.
///
/// The template is a valid configuration with one flag, a handler-backed
/// command and a nested command group, annotated with the available
/// options.
///
/// # Examples
///
/// ```
/// use command_tree_codegen::generate_init_template;
/// use command_tree_core::ToolConfig;
///
/// let template = generate_init_template("my-tool");
/// assert!(template.contains("name: my-tool"));
/// assert!(ToolConfig::from_yaml(&template).is_ok());
/// ```
pub fn generate_init_template(name: &str) -> String {
    let summary = yaml_scalar(&format!("{name} command-line tool"));
    let name = yaml_scalar(name);
    let mut out = String::new();
    out.push_str("# Command tree configuration.\n");
    out.push_str("# Generate handlers with: cmdtree gen commands.yaml\n");
    out.push_str("# Check it with: cmdtree validate commands.yaml\n");
    out.push('\n');
    out.push_str(&format!("name: {name}\n"));
    out.push_str(&format!("description: {summary}\n"));
    out.push_str("version: 0.1.0\n");
    out.push('\n');
    out.push_str("root:\n");
    out.push_str(&format!("  use: {name}\n"));
    out.push_str(&format!("  short: {summary}\n"));
    out.push_str("  # Root takes flags only; its subcommands go in the top-level commands map\n");
    out.push_str("  flags:\n");
    out.push_str("    # Flag types: string, bool, int, stringSlice\n");
    out.push_str("    # Shorthands are a single character\n");
    out.push_str("    - name: verbose\n");
    out.push_str("      shorthand: v\n");
    out.push_str("      type: bool\n");
    out.push_str("      usage: Enable verbose output\n");
    out.push_str("      # Persistent flags are inherited by every subcommand\n");
    out.push_str("      persistent: true\n");
    out.push('\n');
    out.push_str("commands:\n");
    out.push_str("  hello:\n");
    out.push_str("    use: hello <name>\n");
    out.push_str("    short: Say hello\n");
    out.push_str("    long: |\n");
    out.push_str("      Print a greeting for the given name.\n");
    out.push_str("    # Args types: none, any, exact (count), min (min), max (max), range (min, max)\n");
    out.push_str("    args:\n");
    out.push_str("      type: exact\n");
    out.push_str("      count: 1\n");
    out.push_str("    run_func: runHello\n");
    out.push_str("    flags:\n");
    out.push_str("      - name: greeting\n");
    out.push_str("        shorthand: g\n");
    out.push_str("        type: string\n");
    out.push_str("        default: Hello\n");
    out.push_str("        usage: Greeting to use\n");
    out.push('\n');
    out.push_str("  config:\n");
    out.push_str("    use: config\n");
    out.push_str("    short: Manage configuration\n");
    out.push_str("    commands:\n");
    out.push_str("      show:\n");
    out.push_str("        use: show\n");
    out.push_str("        short: Show the current configuration\n");
    out.push_str("        aliases: [get]\n");
    out.push_str("        args:\n");
    out.push_str("          type: none\n");
    out.push_str("        run_func: runConfigShow\n");
    out
}

/// Writes `value` as a plain scalar when that is unambiguous, otherwise
/// double-quoted.
fn yaml_scalar(value: &str) -> String {
    let plain = !value.is_empty()
        && value.starts_with(|c: char| c.is_ascii_alphabetic())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if plain {
        value.to_string()
    } else {
        format!("{value:?}")
    }
}
