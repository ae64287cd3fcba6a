//! Handler stub generation.
//!
//! Every collected [`FuncInfo`] becomes a `pub fn` with the registry's
//! handler signature. The body reads each declared flag through the typed
//! accessor for its kind, binds the fixed positional slots of its argument
//! rule, and returns `Ok(())`, so the file compiles before any logic is
//! filled in.

use command_tree_core::{ArgsPolicy, FlagKind, ToolConfig};
use tracing::{debug, info};

use crate::collect::{FuncInfo, collect_functions};
use crate::error::{GenerateError, Result};
use crate::ident::{Locals, function_ident, is_identifier, to_camel_case};

/// Parameter names of every generated handler.
const CTX: &str = "ctx";
const ARGS: &str = "args";

/// Accessor method and value type for each flag kind.
pub(crate) fn accessor(kind: FlagKind) -> (&'static str, &'static str) {
    match kind {
        FlagKind::String => ("get_string", "String"),
        FlagKind::Bool => ("get_bool", "bool"),
        FlagKind::Int => ("get_int", "i64"),
        FlagKind::StringSlice => ("get_string_slice", "Vec<String>"),
    }
}

/// Comment describing what a handler receives for an argument rule.
pub(crate) fn arity_comment(policy: ArgsPolicy) -> String {
    match policy {
        ArgsPolicy::None => "accepts no arguments".to_string(),
        ArgsPolicy::Any => "accepts any number of arguments".to_string(),
        ArgsPolicy::Exact(n) => format!("accepts exactly {n} argument(s)"),
        ArgsPolicy::Min(n) => format!("accepts at least {n} argument(s)"),
        ArgsPolicy::Max(n) => format!("accepts at most {n} argument(s)"),
        ArgsPolicy::Range(min, max) => format!("accepts {min} to {max} argument(s)"),
    }
}

/// Checks that `module` can be declared with `mod <module>;` from `main.rs`.
pub(crate) fn check_module(module: &str) -> Result<()> {
    if is_identifier(module) && module != "main" {
        Ok(())
    } else {
        Err(GenerateError::InvalidModule(module.to_string()))
    }
}

/// Resolves a descriptor's function name as written in source.
pub(crate) fn function_name(func: &FuncInfo) -> Result<String> {
    function_ident(&func.name).ok_or_else(|| GenerateError::InvalidFunctionName {
        path: func.command_path.clone(),
        name: func.name.clone(),
    })
}

/// Generates the handler module for `config`.
///
/// `module` is the name `main.rs` declares the file under; it must be a
/// Rust identifier other than `main`.
///
/// # Examples
///
/// ```
/// use command_tree_codegen::generate_handlers;
/// use command_tree_core::ToolConfig;
///
/// let config = ToolConfig::from_yaml(
///     r#"
/// name: t
/// root:
///   use: t
///   short: Tool
/// commands:
///   add:
///     use: add <n>
///     short: Add
///     run_func: runAdd
///     args:
///       type: exact
///       count: 1
///     flags:
///       - name: force
///         type: bool
///         usage: Force
/// "#,
/// )
/// .unwrap();
///
/// let code = generate_handlers(&config, "handlers").unwrap();
/// assert!(code.contains(r#"let force: bool = ctx.get_bool("force")?;"#));
/// assert!(code.contains("let arg0 = args[0].as_str();"));
/// ```
///
/// # Errors
///
/// Returns [`GenerateError::NoFunctions`] when no command declares a
/// `run_func`, and the naming and type errors of [`GenerateError`].
pub fn generate_handlers(config: &ToolConfig, module: &str) -> Result<String> {
    check_module(module)?;
    let funcs = collect_functions(config);
    if funcs.is_empty() {
        return Err(GenerateError::NoFunctions);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "//! Command handlers for `{}`.\n",
        config.root_name()
    ));
    out.push_str("//!\n");
    out.push_str("//! Generated by cmdtree from the `run_func` entries of the command\n");
    out.push_str("//! configuration. Signatures must match the registry; bodies are yours.\n");
    out.push('\n');
    out.push_str("#![allow(non_snake_case)]\n");
    out.push('\n');
    out.push_str("use command_tree::{HandlerResult, Invocation};\n");

    for func in &funcs {
        out.push('\n');
        out.push_str(&render_handler(func)?);
        debug!(function = %func.name, path = %func.command_path, "Generated handler");
    }

    info!(module, handlers = funcs.len(), "Generated handler module");
    Ok(out)
}

fn render_handler(func: &FuncInfo) -> Result<String> {
    let name = function_name(func)?;
    let policy = match &func.args {
        Some(args) => args.policy(),
        None => Ok(ArgsPolicy::Any),
    }
    .map_err(|source| GenerateError::InvalidArgs {
        function: func.name.clone(),
        source,
    })?;

    let slots = policy.fixed_slots();
    let mut locals = Locals::new(&[CTX, ARGS]);
    let arg_names: Vec<String> = (0..slots).map(|i| format!("arg{i}")).collect();
    for arg in &arg_names {
        locals.reserve(arg);
    }

    let mut body = String::new();
    let mut declared = Vec::new();
    for flag in &func.flags {
        let kind = flag
            .flag_kind()
            .map_err(|source| GenerateError::UnsupportedFlagType {
                function: func.name.clone(),
                flag: flag.name.clone(),
                source,
            })?;
        let (method, ty) = accessor(kind);
        let local = locals.fresh(&to_camel_case(&flag.name));
        body.push_str(&format!(
            "    let {local}: {ty} = {CTX}.{method}({:?})?;\n",
            flag.name
        ));
        declared.push(local);
    }
    if !func.flags.is_empty() {
        body.push('\n');
    }

    body.push_str(&format!("    // {}\n", arity_comment(policy)));
    for (i, arg) in arg_names.iter().enumerate() {
        body.push_str(&format!("    let {arg} = {ARGS}[{i}].as_str();\n"));
    }
    declared.extend(arg_names);
    body.push('\n');

    body.push_str(&format!("    // TODO: implement `{}`\n", func.command_path));
    if func.flags.is_empty() {
        body.push_str(&format!("    let _ = {CTX};\n"));
    }
    if slots == 0 {
        body.push_str(&format!("    let _ = {ARGS};\n"));
    }
    for local in &declared {
        body.push_str(&format!("    let _ = {local};\n"));
    }
    body.push_str("    Ok(())\n");

    let mut out = String::new();
    let summary = if func.short.is_empty() {
        format!("`{}`", func.use_line)
    } else {
        format!("`{}`: {}", func.use_line, func.short)
    };
    out.push_str(&format!("/// {summary}\n"));
    out.push_str(&format!(
        "pub fn {name}({CTX}: &Invocation<'_>, {ARGS}: &[String]) -> HandlerResult {{\n"
    ));
    out.push_str(&body);
    out.push_str("}\n");
    Ok(out)
}
