use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Expr;
use crate::ast::ExprType;
use crate::context::Context;
use crate::preferences::Preferences;

/// Declare a unit struct implementing [`Rule`]
///
/// ```ignore
/// rule!(AddZeroRule, "add_zero", 95, Numeric, &[ExprType::Addition],
///     |expr: &Expr, _context: &RuleContext| { None });
/// ```
macro_rules! rule {
    (
        $name:ident,
        $rule_name:expr,
        $priority:expr,
        $category:ident,
        $types:expr,
        |$expr:ident: &Expr, $context:ident: &RuleContext| $body:block
    ) => {
        pub(crate) struct $name;

        impl $crate::reduction::rules::Rule for $name {
            fn name(&self) -> &'static str {
                $rule_name
            }

            fn priority(&self) -> i32 {
                $priority
            }

            fn category(&self) -> $crate::reduction::rules::RuleCategory {
                $crate::reduction::rules::RuleCategory::$category
            }

            fn applies_to(&self) -> &'static [$crate::ast::ExprType] {
                $types
            }

            #[allow(unused_variables)]
            fn apply(
                &self,
                $expr: &$crate::Expr,
                $context: &$crate::reduction::rules::RuleContext<'_>,
            ) -> Option<$crate::Expr> {
                $body
            }
        }
    };
}

/// Exact and approximate arithmetic, identities, canonical sums and products
pub(crate) mod arithmetic;

/// Matrix literal arithmetic and shape checks
pub(crate) mod matrix;

/// Powers, square roots and exact roots
pub(crate) mod power;

/// Special angles, parity, inverse composition, tangent detection
pub(crate) mod trigonometric;

/// Rewrite rule for one or more node types
///
/// Priority ranges:
/// - 100-199: domain checks and literal folding
/// - 50-99: identities and special values
/// - 1-49: canonical rewrites (reordering, desugaring)
pub(crate) trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn category(&self) -> RuleCategory;

    /// Rules are only tried on nodes of these types
    fn applies_to(&self) -> &'static [ExprType];

    /// Replacement for `expr`, or `None` when the rule does not fire
    fn apply(&self, expr: &Expr, context: &RuleContext) -> Option<Expr>;
}

/// Categories of reduction rules
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum RuleCategory {
    Numeric,   // Literal folding
    Matrix,    // Matrix shape checks and entrywise arithmetic
    Algebraic, // Identities and canonical forms
    Power,
    Trigonometric,
}

/// Scope and preferences a rule runs with
pub(crate) struct RuleContext<'a> {
    pub context: &'a Context<'a>,
    pub preferences: &'a Preferences,
}

impl<'a> RuleContext<'a> {
    pub fn new(context: &'a Context<'a>, preferences: &'a Preferences) -> Self {
        Self {
            context,
            preferences,
        }
    }

    /// Same preferences, different scope
    pub fn with_context<'b>(&'b self, context: &'b Context<'b>) -> RuleContext<'b> {
        RuleContext {
            context,
            preferences: self.preferences,
        }
    }

    /// One bottom-up pass over a freshly built subtree
    pub fn reduce(&self, expr: Expr) -> Expr {
        let mut expr = expr;
        super::engine::deep_reduce(&mut expr, self);
        expr
    }

    pub fn is_matrix(&self, expr: &Expr) -> bool {
        expr.deep_is_matrix(self.context)
    }
}

/// Rules sorted by priority and indexed by node type
pub(crate) struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    rules_by_type: FxHashMap<ExprType, Vec<Arc<dyn Rule>>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            rules_by_type: FxHashMap::default(),
        }
    }

    pub fn load_all_rules(&mut self) {
        self.rules.extend(matrix::get_matrix_rules());
        self.rules.extend(arithmetic::get_arithmetic_rules());
        self.rules.extend(power::get_power_rules());
        self.rules.extend(trigonometric::get_trigonometric_rules());

        // Higher priority first; category breaks ties so order is stable
        self.rules.sort_by_key(|r| {
            (
                std::cmp::Reverse(r.priority()),
                match r.category() {
                    RuleCategory::Matrix => 0,
                    RuleCategory::Numeric => 1,
                    RuleCategory::Algebraic => 2,
                    RuleCategory::Power => 3,
                    RuleCategory::Trigonometric => 4,
                },
            )
        });
    }

    /// Build the index of rules by node type, after ordering
    pub fn build_type_index(&mut self) {
        self.rules_by_type.clear();
        for expr_type in ExprType::ALL {
            self.rules_by_type.insert(expr_type, Vec::new());
        }
        for rule in &self.rules {
            for expr_type in rule.applies_to() {
                if let Some(rules) = self.rules_by_type.get_mut(expr_type) {
                    rules.push(Arc::clone(rule));
                }
            }
        }
    }

    #[inline]
    pub fn rules_for(&self, expr_type: ExprType) -> &[Arc<dyn Rule>] {
        self.rules_by_type
            .get(&expr_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
