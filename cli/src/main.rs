use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_tree_codegen::{
    generate_codegen_section, generate_docs, generate_handlers, generate_init_template,
    generate_main, generate_quick_start, generate_yaml_reference, write_output,
};
use command_tree_core::{CommandConfig, ToolConfig};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE_NAME: &str = "commands.yaml";

#[derive(Debug, Parser)]
#[command(name = "cmdtree", version)]
#[command(about = "Validate, generate and document declarative command trees")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a starter commands.yaml in the current directory.
    Init(InitArgs),
    /// Load a configuration and report every validation error.
    Validate(ValidateArgs),
    /// Generate handler stubs and a main.rs from a configuration.
    Gen(GenArgs),
    /// Generate Markdown documentation for a configured tool.
    Docs(DocsArgs),
    /// Print the configuration format reference.
    Reference,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Name of the tool.
    #[arg(default_value = "my-cli")]
    name: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Path to the YAML configuration.
    config: PathBuf,
}

#[derive(Debug, Args)]
struct GenArgs {
    /// Path to the YAML configuration.
    config: PathBuf,
    /// Module name of the generated handlers.
    #[arg(short = 'p', long, default_value = "handlers")]
    module: String,
    /// Handler output file (default: <module>.rs next to the config).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// main.rs output file (default: main.rs next to the config).
    #[arg(short, long)]
    main: Option<PathBuf>,
    /// Overwrite existing files.
    #[arg(short, long)]
    force: bool,
}

#[derive(Debug, Args)]
struct DocsArgs {
    /// Path to the YAML configuration.
    config: PathBuf,
    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Init(args) => run_init(args),
        Command::Validate(args) => run_validate(args),
        Command::Gen(args) => run_gen(args),
        Command::Docs(args) => run_docs(args),
        Command::Reference => run_reference(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<ToolConfig, String> {
    ToolConfig::load(path).map_err(|err| err.to_string())
}

fn run_init(args: InitArgs) -> Result<(), String> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(format!("{CONFIG_FILE_NAME} already exists"));
    }

    write_output(&path, &generate_init_template(&args.name)).map_err(|e| e.to_string())?;

    println!("Created {CONFIG_FILE_NAME}");
    println!();
    println!("Next steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to define your commands");
    println!("  2. Move it into src/ and run: cmdtree gen src/{CONFIG_FILE_NAME}");
    println!("  3. Implement the generated handlers");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let config = load(&args.config)?;
    let commands: usize = config.commands.values().map(count_commands).sum();
    let handlers = command_tree_codegen::collect_functions(&config).len();
    println!(
        "Validated '{}': {commands} command(s), {handlers} handler(s).",
        config.name
    );
    Ok(())
}

fn count_commands(cmd: &CommandConfig) -> usize {
    1 + cmd.commands.values().map(count_commands).sum::<usize>()
}

fn run_gen(args: GenArgs) -> Result<(), String> {
    let config = load(&args.config)?;
    let dir = args
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let handlers_path = args
        .output
        .unwrap_or_else(|| dir.join(format!("{}.rs", args.module)));
    let main_path = args.main.unwrap_or_else(|| dir.join("main.rs"));
    let embedded = embed_path(&args.config, &main_path)?;
    debug!(
        handlers = %handlers_path.display(),
        main = %main_path.display(),
        embedded = %embedded,
        "Resolved output paths"
    );

    let handlers = generate_handlers(&config, &args.module).map_err(|e| e.to_string())?;
    let main = generate_main(&config, &args.module, &embedded).map_err(|e| e.to_string())?;

    let existing: Vec<&PathBuf> = [&handlers_path, &main_path]
        .into_iter()
        .filter(|p| p.exists())
        .collect();
    if !existing.is_empty() && !args.force {
        for path in &existing {
            warn!(path = %path.display(), "Output exists, not overwriting");
            eprintln!("{} already exists; use --force to overwrite", path.display());
        }
        println!("// ===== {} =====", handlers_path.display());
        println!("{handlers}");
        println!("// ===== {} =====", main_path.display());
        println!("{main}");
        return Ok(());
    }

    write_output(&handlers_path, &handlers).map_err(|e| e.to_string())?;
    write_output(&main_path, &main).map_err(|e| e.to_string())?;
    println!("Generated {}", handlers_path.display());
    println!("Generated {}", main_path.display());
    Ok(())
}

/// Path of the config as `include_str!` sees it from the generated main.rs.
fn embed_path(config: &Path, main: &Path) -> Result<String, String> {
    if dir_of(config) == dir_of(main) {
        if let Some(name) = config.file_name() {
            return Ok(name.to_string_lossy().into_owned());
        }
    }
    let absolute = fs::canonicalize(config)
        .map_err(|err| format!("Failed to resolve '{}': {err}", config.display()))?;
    Ok(absolute.to_string_lossy().into_owned())
}

fn dir_of(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

fn run_docs(args: DocsArgs) -> Result<(), String> {
    let config = load(&args.config)?;
    let docs = generate_docs(&config);
    match args.output {
        Some(path) => {
            write_output(&path, &docs).map_err(|e| e.to_string())?;
            println!("Wrote {}", path.display());
        }
        None => print!("{docs}"),
    }
    Ok(())
}

fn run_reference() -> Result<(), String> {
    let codegen = generate_codegen_section().map_err(|e| e.to_string())?;
    println!("## Quick Start\n");
    println!("{}", generate_quick_start());
    println!("## Code Generation\n");
    println!("{codegen}");
    println!("## YAML Configuration Reference\n");
    print!("{}", generate_yaml_reference());
    Ok(())
}
