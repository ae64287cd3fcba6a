//! Named handler bindings.
//!
//! Configuration documents refer to handlers by name (`run_func`). The
//! registry maps those names to typed closures. Two shapes are supported:
//! [`Binding::Handler`] receives the positional arguments and fits any
//! command, while [`Binding::Action`] takes none and only fits commands
//! declared with `args: {type: none}`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::Invocation;

/// Error type returned by handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Handler receiving the invocation context and positional arguments.
pub type HandlerFn = dyn Fn(&Invocation<'_>, &[String]) -> HandlerResult + Send + Sync;

/// Handler receiving only the invocation context.
pub type ActionFn = dyn Fn(&Invocation<'_>) -> HandlerResult + Send + Sync;

/// A registered function together with its call shape.
#[derive(Clone)]
pub enum Binding {
    /// `fn(&Invocation, &[String])`.
    Handler(Arc<HandlerFn>),
    /// `fn(&Invocation)`, for commands that accept no arguments.
    Action(Arc<ActionFn>),
}

impl Binding {
    /// Short name of the call shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Binding::Handler(_) => "handler",
            Binding::Action(_) => "action",
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding::{}", self.shape())
    }
}

/// Maps `run_func` names to bindings.
///
/// # Examples
///
/// ```
/// use command_tree::{Binding, HandlerRegistry};
///
/// let mut registry = HandlerRegistry::new();
/// registry
///     .register("runAdd", |_ctx, args| {
///         println!("adding {}", args[0]);
///         Ok(())
///     })
///     .register_action("runList", |_ctx| Ok(()));
///
/// assert!(matches!(registry.get("runAdd"), Some(Binding::Handler(_))));
/// assert!(matches!(registry.get("runList"), Some(Binding::Action(_))));
/// assert!(registry.get("runDelete").is_none());
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    bindings: BTreeMap<String, Binding>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler that receives positional arguments.
    ///
    /// Registering the same name twice replaces the earlier binding.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>, &[String]) -> HandlerResult + Send + Sync + 'static,
    {
        self.bindings
            .insert(name.into(), Binding::Handler(Arc::new(handler)));
        self
    }

    /// Registers an action that takes no positional arguments.
    pub fn register_action<F>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.bindings
            .insert(name.into(), Binding::Action(Arc::new(action)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.bindings.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_replaces_existing_binding() {
        let mut registry = HandlerRegistry::new();
        registry.register("run", |_, _| Ok(()));
        registry.register_action("run", |_| Ok(()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("run").unwrap().shape(), "action");
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = HandlerRegistry::new();
        registry
            .register("runB", |_, _| Ok(()))
            .register("runA", |_, _| Ok(()));

        assert_eq!(registry.names().collect::<Vec<_>>(), ["runA", "runB"]);
        assert!(registry.contains("runA"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_debug_lists_shapes() {
        let mut registry = HandlerRegistry::new();
        registry.register_action("runList", |_| Ok(()));
        assert_eq!(format!("{registry:?}"), r#"{"runList": Binding::action}"#);
    }
}
