//! Source and documentation generation for declarative command trees.
//!
//! Given a [`ToolConfig`](command_tree_core::ToolConfig), this crate
//! produces:
//!
//! - a handler module with one stub per `run_func` ([`generate_handlers`]),
//! - a `main.rs` that registers those stubs and runs the tree
//!   ([`generate_main`]),
//! - README-style Markdown for the tool ([`generate_docs`]).
//!
//! It also renders reference material about the configuration format
//! itself ([`generate_yaml_reference`], [`generate_quick_start`],
//! [`generate_codegen_section`]) and a starter configuration
//! ([`generate_init_template`]).
//!
//! All generators return text; [`write_output`] puts it on disk.

mod bootstrap;
mod collect;
mod docs;
mod error;
mod handlers;
mod ident;
mod init;
mod output;
mod reference;

pub use bootstrap::generate_main;
pub use collect::{FuncInfo, collect_functions};
pub use docs::generate_docs;
pub use error::{GenerateError, Result};
pub use handlers::generate_handlers;
pub use ident::{is_identifier, is_keyword, to_camel_case};
pub use init::generate_init_template;
pub use output::write_output;
pub use reference::{
    EXAMPLE_COMMANDS_YAML, EXAMPLE_MAIN_RS, generate_codegen_section, generate_quick_start,
    generate_yaml_reference,
};
