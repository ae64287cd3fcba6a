//! Build and run clap command trees from declarative configuration.
//!
//! A [`ToolConfig`] (usually loaded from `commands.yaml`) describes the
//! commands, flags and argument-count rules of a CLI. [`build`] turns it
//! into a [`CommandTree`] backed by [`clap`], binding each command's
//! `run_func` to a closure from a [`HandlerRegistry`]. The tree is then run
//! with [`CommandTree::execute`] or, in tests, [`CommandTree::run_from`].
//!
//! The configuration types are re-exported from `command-tree-core`.
//!
//! # Example
//!
//! ```
//! use command_tree::{Dispatched, HandlerRegistry, ToolConfig, build};
//!
//! let config = ToolConfig::from_yaml(
//!     r#"
//! name: todo
//! root:
//!   use: todo
//!   short: Manage a todo list
//! commands:
//!   add:
//!     use: add <item>
//!     short: Add an item
//!     run_func: runAdd
//!     args:
//!       type: exact
//!       count: 1
//!     flags:
//!       - name: force
//!         shorthand: f
//!         type: bool
//!         usage: Overwrite an existing item
//! "#,
//! )
//! .unwrap();
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("runAdd", |ctx, args| {
//!     assert_eq!(args, ["milk"]);
//!     assert!(ctx.get_bool("force")?);
//!     Ok(())
//! });
//!
//! let tree = build(&config, &registry).unwrap();
//! assert_eq!(tree.run_from(["todo", "add", "-f", "milk"]).unwrap(), Dispatched::Ran);
//! assert!(tree.run_from(["todo", "add"]).is_err());
//! assert!(matches!(tree.run_from(["todo"]).unwrap(), Dispatched::Help(_)));
//! ```

mod builder;
mod dispatch;
mod invocation;
mod registry;

pub use builder::{BuildError, build};
pub use command_tree_core::*;
pub use dispatch::{CommandTree, Dispatched, ExecuteError};
pub use invocation::{FlagError, Invocation};
pub use registry::{ActionFn, Binding, HandlerError, HandlerFn, HandlerRegistry, HandlerResult};
