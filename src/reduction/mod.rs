//! Symbolic reduction - rewrites trees into canonical simplified form
//!
//! Reduction is bottom-up: children are reduced before their parent, then
//! the parent goes through a default pass (Undefined and unit propagation)
//! followed by the first matching rule of its type. Whole-tree passes
//! repeat until the tree stops changing.
pub(crate) mod engine;
pub(crate) mod helpers;
pub(crate) mod rules;
pub(crate) mod trig_table;

use tracing::{debug, trace, warn};

use crate::Expr;
use crate::context::Context;
use crate::error::ExprError;
use crate::preferences::{AngleUnit, Preferences};
use rules::RuleContext;

/// Default number of whole-tree passes before giving up on a fixpoint
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

/// What reduction does with symbols bound in the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymbolicComputation {
    /// Bound symbols are replaced by their definition
    #[default]
    ReplaceDefinedSymbols,
    /// Symbols stay as they are
    KeepSymbols,
}

/// Builder for reduction runs
///
/// # Example
/// ```ignore
/// use symb_calc::{Context, Expr, Reducer};
///
/// let e = Expr::square_root(Expr::integer(16));
/// let r = Reducer::new().max_depth(50).reduce(e, &Context::new())?;
/// assert_eq!(r, Expr::integer(4));
/// ```
#[derive(Debug, Clone)]
pub struct Reducer {
    preferences: Preferences,
    symbolic_computation: SymbolicComputation,
    max_iterations: usize,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
}

impl Default for Reducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer {
    pub fn new() -> Self {
        Self {
            preferences: Preferences::new(),
            symbolic_computation: SymbolicComputation::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_depth: None,
            max_nodes: None,
        }
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Unit in which trigonometric arguments are read
    pub fn angle_unit(mut self, unit: AngleUnit) -> Self {
        self.preferences = self.preferences.angle_unit(unit);
        self
    }

    pub fn symbolic_computation(mut self, mode: SymbolicComputation) -> Self {
        self.symbolic_computation = mode;
        self
    }

    /// Bound the number of whole-tree passes (at least one)
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    /// Set maximum input tree depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum input node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Reduce `expr`, rejecting trees over the configured size limits
    pub fn reduce(&self, expr: Expr, context: &Context) -> Result<Expr, ExprError> {
        if let Some(limit) = self.max_depth
            && expr.max_depth() > limit
        {
            return Err(ExprError::MaxDepthExceeded { limit });
        }
        if let Some(limit) = self.max_nodes
            && expr.node_count() > limit
        {
            return Err(ExprError::MaxNodesExceeded { limit });
        }
        Ok(self.run(expr, context))
    }

    fn run(&self, mut expr: Expr, context: &Context) -> Expr {
        // Substitution happens once; a self-referential definition would
        // otherwise keep growing on every pass.
        if self.symbolic_computation == SymbolicComputation::ReplaceDefinedSymbols {
            engine::substitute_defined_symbols(&mut expr, context);
        }

        let rule_context = RuleContext::new(context, &self.preferences);
        let mut seen: Vec<Expr> = Vec::new();

        for iteration in 0..self.max_iterations {
            let previous = expr.clone();
            engine::deep_reduce(&mut expr, &rule_context);
            trace!(target: "reduction", iteration, "{} -> {}", previous, expr);

            if expr == previous {
                return expr;
            }
            if seen.contains(&expr) {
                debug!(target: "reduction", iteration, "cycle detected, stopping");
                return expr;
            }
            seen.push(previous);
        }

        warn!(
            target: "reduction",
            max_iterations = self.max_iterations,
            "reduction did not reach a fixpoint"
        );
        expr
    }
}

/// Reduce `expr` with default options.
///
/// Never fails: an expression proven to have no value comes back as
/// `Undefined`.
pub fn reduce(expr: Expr, context: &Context, preferences: &Preferences) -> Expr {
    Reducer::new().preferences(*preferences).run(expr, context)
}

/// Reduce a node in place, leaving the reduced tree where `expr` was
pub fn reduce_in_place(expr: &mut Expr, context: &Context, preferences: &Preferences) {
    let original = expr.replace_with_undefined_in_place();
    expr.replace_in_place(reduce(original, context, preferences));
}
