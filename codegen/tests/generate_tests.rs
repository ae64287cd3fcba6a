use std::sync::{Arc, Mutex};

use command_tree::{Dispatched, ExecuteError, HandlerRegistry, ValidationError, build};
use command_tree_codegen::{
    EXAMPLE_COMMANDS_YAML, collect_functions, generate_docs, generate_handlers, generate_main,
    write_output,
};
use command_tree_core::{ToolConfig, validate_config};

const TINY_YAML: &str = r#"
name: t
root:
  use: t
  short: s
commands:
  add:
    use: add <n>
    short: Add
    run_func: runAdd
    args:
      type: exact
      count: 1
    flags:
      - name: force
        type: bool
        usage: Force
"#;

#[test]
fn tiny_config_validates_builds_and_generates() {
    let config = ToolConfig::from_yaml(TINY_YAML).unwrap();
    assert!(validate_config(&config).is_empty());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut registry = HandlerRegistry::new();
    registry.register("runAdd", move |ctx, args| {
        sink.lock().unwrap().push((args.to_vec(), ctx.get_bool("force")?));
        Ok(())
    });

    let tree = build(&config, &registry).unwrap();
    assert_eq!(tree.paths(), ["t", "t add"]);
    assert!(matches!(
        tree.run_from(["t", "add"]),
        Err(ExecuteError::Arity { .. })
    ));
    assert!(matches!(
        tree.run_from(["t", "add", "a", "b"]),
        Err(ExecuteError::Arity { .. })
    ));
    assert_eq!(tree.run_from(["t", "add", "a"]).unwrap(), Dispatched::Ran);
    assert_eq!(*seen.lock().unwrap(), [(vec!["a".to_string()], false)]);

    let code = generate_handlers(&config, "handlers").unwrap();
    assert!(code.contains(r#"ctx.get_bool("force")?"#));
    assert_eq!(code.matches("let arg0 = args[0].as_str();").count(), 1);
    assert!(!code.contains("arg1"));
}

#[test]
fn use_names_clash_even_when_keys_differ() {
    let yaml = r#"
name: t
root:
  use: t
  short: s
commands:
  add:
    use: add <n>
    short: Add
  plus:
    use: add
    short: Also add
"#;
    let config = ToolConfig::parse_yaml(yaml).unwrap();
    let errors = validate_config(&config);
    assert_eq!(
        errors,
        [ValidationError::DuplicateRootCommand {
            name: "add".to_string()
        }]
    );
    assert!(build(&config, &HandlerRegistry::new()).is_err());
    assert!(ToolConfig::from_yaml(yaml).is_err());
}

#[test]
fn generated_registration_matches_collected_functions() {
    let config = ToolConfig::from_yaml(EXAMPLE_COMMANDS_YAML).unwrap();
    let funcs = collect_functions(&config);
    let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["runAdd", "runDelete", "runList"]);

    let main = generate_main(&config, "handlers", "commands.yaml").unwrap();
    let handlers = generate_handlers(&config, "handlers").unwrap();
    for name in names {
        assert!(main.contains(&format!("registry.register({name:?}, handlers::{name});")));
        assert!(handlers.contains(&format!("pub fn {name}(")));
    }

    // runList is declared with `args: none`, so its stub ignores `args`.
    assert!(handlers.contains("// accepts no arguments"));
}

#[test]
fn example_config_builds_with_plain_handlers() {
    let config = ToolConfig::from_yaml(EXAMPLE_COMMANDS_YAML).unwrap();
    let mut registry = HandlerRegistry::new();
    for func in collect_functions(&config) {
        registry.register(func.name, |_ctx, _args| Ok(()));
    }

    let tree = build(&config, &registry).unwrap();
    assert_eq!(tree.run_from(["my-tool", "rm", "x"]).unwrap(), Dispatched::Ran);
    assert_eq!(
        tree.run_from(["my-tool", "-c", "alt.yaml", "add", "x"]).unwrap(),
        Dispatched::Ran
    );
}

#[test]
fn docs_written_to_disk() {
    let config = ToolConfig::from_yaml(EXAMPLE_COMMANDS_YAML).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs").join("README.md");

    write_output(&path, &generate_docs(&config)).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# my-tool\n"));
    assert!(written.contains("**Aliases:** rm"));
    assert!(written.contains("my-tool delete <name>"));
}
