//! Chained variable environment shared by reduction and evaluation

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Expr;

#[derive(Debug, Clone)]
enum Binding {
    Value(Expr),
    /// Name is free in this scope even if an ancestor binds it
    Hidden,
}

/// Symbol bindings with a borrowed link to an enclosing scope.
///
/// Lookups fall back to the parent when a name is not bound locally.
/// Binding or hiding a name only ever shadows the parent.
///
/// # Example
/// ```ignore
/// let mut globals = Context::new();
/// globals.bind("a", Expr::integer(2));
///
/// let mut sample = Context::with_parent(&globals);
/// sample.bind("x", Expr::float(0.5));
/// assert!(sample.lookup("a").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context<'p> {
    bindings: FxHashMap<Arc<str>, Binding>,
    parent: Option<&'p Context<'p>>,
}

impl Context<'static> {
    /// Root context with no bindings
    pub fn new() -> Self {
        Context {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }
}

impl<'p> Context<'p> {
    pub fn with_parent(parent: &'p Context<'p>) -> Self {
        Context {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&'p Context<'p>> {
        self.parent
    }

    /// Bind `name` locally, returning the previous local value
    pub fn bind(&mut self, name: &str, value: Expr) -> Option<Expr> {
        match self.bindings.insert(Arc::from(name), Binding::Value(value)) {
            Some(Binding::Value(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Make `name` free in this scope
    pub fn hide(&mut self, name: &str) {
        self.bindings.insert(Arc::from(name), Binding::Hidden);
    }

    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.defining_scope(name).map(|(value, _)| value)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Bound value of `name` together with the context that binds it
    pub fn defining_scope<'s>(&'s self, name: &str) -> Option<(&'s Expr, &'s Context<'s>)> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Some((value, self)),
            Some(Binding::Hidden) => None,
            None => self.parent?.defining_scope(name),
        }
    }

    /// Bound value of `name` and the scope to interpret it in: this context
    /// with `name` hidden. Every nested resolution hides one more name, so
    /// recursive and mutually recursive definitions end.
    pub fn resolve<'s>(&'s self, name: &str) -> Option<(&'s Expr, Context<'s>)> {
        let value = self.lookup(name)?;
        let mut scope = Context::with_parent(self);
        scope.hide(name);
        Some((value, scope))
    }

    /// Number of scopes in the chain, this one included
    pub fn depth(&self) -> usize {
        1 + self.parent.map_or(0, |p| p.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_parent() {
        let mut root = Context::new();
        root.bind("a", Expr::integer(1));
        let child = Context::with_parent(&root);
        assert_eq!(child.lookup("a"), Some(&Expr::integer(1)));
        assert_eq!(child.lookup("b"), None);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_binding_shadows_without_mutating_parent() {
        let mut root = Context::new();
        root.bind("x", Expr::integer(1));
        {
            let mut child = Context::with_parent(&root);
            assert_eq!(child.bind("x", Expr::integer(2)), None);
            assert_eq!(child.lookup("x"), Some(&Expr::integer(2)));
        }
        assert_eq!(root.lookup("x"), Some(&Expr::integer(1)));
    }

    #[test]
    fn test_hide_makes_name_free() {
        let mut root = Context::new();
        root.bind("x", Expr::integer(1));
        let mut child = Context::with_parent(&root);
        child.hide("x");
        assert!(!child.is_defined("x"));
        assert!(root.is_defined("x"));
    }

    #[test]
    fn test_resolve_hides_resolved_name() {
        let mut root = Context::new();
        root.bind("a", Expr::symbol("a"));
        let (value, scope) = root.resolve("a").unwrap();
        assert_eq!(value, &Expr::symbol("a"));
        assert!(scope.lookup("a").is_none());
    }

    #[test]
    fn test_mutual_definitions_resolve_to_free_symbol() {
        let mut root = Context::new();
        root.bind("a", Expr::symbol("b"));
        root.bind("b", Expr::symbol("a"));
        let (_, scope_a) = root.resolve("a").unwrap();
        let (value, scope_b) = scope_a.resolve("b").unwrap();
        assert_eq!(value, &Expr::symbol("a"));
        assert!(scope_b.resolve("a").is_none());
    }

    #[test]
    fn test_rebinding_returns_previous() {
        let mut ctx = Context::new();
        ctx.bind("k", Expr::integer(1));
        assert_eq!(ctx.bind("k", Expr::integer(3)), Some(Expr::integer(1)));
    }
}
