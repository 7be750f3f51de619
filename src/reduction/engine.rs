//! Bottom-up reduction driver
//!
//! `deep_reduce` walks children first and then calls `shallow_reduce` on the
//! node, which runs the default pass and the type's rules until none fires.

use std::sync::{Arc, OnceLock};
use tracing::{trace, warn};

use super::rules::{RuleContext, RuleRegistry};
use crate::Expr;
use crate::ast::{DERIVATIVE_VARIABLE, ExprKind};
use crate::context::Context;

/// Rewrites tried on a single node before the pass moves on
const MAX_REWRITES_PER_NODE: usize = 64;

/// Global rule registry - built once, shared by every reduction
pub(crate) fn global_registry() -> &'static RuleRegistry {
    static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = RuleRegistry::new();
        registry.load_all_rules();
        registry.build_type_index();
        registry
    })
}

/// Reduce every child, then the node itself
pub(crate) fn deep_reduce(expr: &mut Expr, context: &RuleContext) {
    if let ExprKind::Derivative { function, point } = &mut expr.kind {
        // `x` is the bound variable of the differentiated function
        let mut scope = Context::with_parent(context.context);
        scope.hide(DERIVATIVE_VARIABLE);
        deep_reduce(Arc::make_mut(function), &context.with_context(&scope));
        deep_reduce(Arc::make_mut(point), context);
    } else {
        for child in expr.children_mut() {
            deep_reduce(child, context);
        }
    }
    shallow_reduce(expr, context);
}

/// Reduce a node whose children are already reduced
pub(crate) fn shallow_reduce(expr: &mut Expr, context: &RuleContext) {
    for _ in 0..MAX_REWRITES_PER_NODE {
        let Some(replacement) = default_reduction(expr).or_else(|| apply_first_rule(expr, context))
        else {
            return;
        };
        expr.replace_in_place(replacement);
    }
    warn!(target: "reduction", node = %expr, "rewrite budget exhausted");
}

/// Reduction shared by every node type: Undefined propagates upward, units
/// are rejected by operators that do not accept them, NaN literals are
/// Undefined.
fn default_reduction(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Undefined => return None,
        ExprKind::Float(v) if v.is_nan() => return Some(Expr::undefined()),
        ExprKind::Complex { re, im } if re.is_nan() || im.is_nan() => {
            return Some(Expr::undefined());
        }
        _ => {}
    }
    let children = expr.children();
    if children.iter().any(|c| c.is_undefined()) {
        return Some(Expr::undefined());
    }
    if !expr.expr_type().supports_units() && children.iter().any(|c| c.has_unit()) {
        return Some(Expr::undefined());
    }
    None
}

fn apply_first_rule(expr: &Expr, context: &RuleContext) -> Option<Expr> {
    for rule in global_registry().rules_for(expr.expr_type()) {
        if let Some(result) = rule.apply(expr, context)
            && result != *expr
        {
            trace!(target: "reduction", rule = rule.name(), "{} => {}", expr, result);
            return Some(result);
        }
    }
    None
}

/// Replace every symbol bound in `context` by its definition.
///
/// Definitions are substituted recursively, each in a scope that hides the
/// names already being expanded. Inside a derivative `x` stays free.
pub(crate) fn substitute_defined_symbols(expr: &mut Expr, context: &Context) {
    match &mut expr.kind {
        ExprKind::Symbol(name) => {
            let name = Arc::clone(name);
            if let Some((value, scope)) = context.resolve(&name) {
                let mut value = value.clone();
                substitute_defined_symbols(&mut value, &scope);
                expr.replace_in_place(value);
            }
        }
        ExprKind::Derivative { function, point } => {
            let mut scope = Context::with_parent(context);
            scope.hide(DERIVATIVE_VARIABLE);
            substitute_defined_symbols(Arc::make_mut(function), &scope);
            substitute_defined_symbols(Arc::make_mut(point), context);
        }
        _ => {
            for child in expr.children_mut() {
                substitute_defined_symbols(child, context);
            }
        }
    }
}
