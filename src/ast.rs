//! Expression tree for symbolic reduction and numeric evaluation

use num_rational::Rational64;
use num_traits::{One, Zero};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::Context;
use crate::error::ExprError;
use crate::evaluator::Evaluation;
use crate::preferences::Preferences;
use crate::traits::MathScalar;

/// Name of the variable a `Derivative` node differentiates with respect to
pub const DERIVATIVE_VARIABLE: &str = "x";

/// Global counter for expression IDs
static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID for debugging (not used in equality comparisons)
    pub id: u64,
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Equality is structural, based on KIND only
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Mathematical constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    /// The imaginary unit `i`
    I,
}

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
            Constant::I => "i",
        }
    }
}

/// Trigonometric functions, direct and inverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigFunction {
    Sine,
    Cosine,
    Tangent,
    ArcSine,
    ArcCosine,
    ArcTangent,
}

impl TrigFunction {
    pub fn name(self) -> &'static str {
        match self {
            TrigFunction::Sine => "sin",
            TrigFunction::Cosine => "cos",
            TrigFunction::Tangent => "tan",
            TrigFunction::ArcSine => "asin",
            TrigFunction::ArcCosine => "acos",
            TrigFunction::ArcTangent => "atan",
        }
    }

    /// Direct functions take an angle, inverse functions return one
    pub fn is_direct(self) -> bool {
        matches!(
            self,
            TrigFunction::Sine | TrigFunction::Cosine | TrigFunction::Tangent
        )
    }

    pub fn inverse(self) -> TrigFunction {
        match self {
            TrigFunction::Sine => TrigFunction::ArcSine,
            TrigFunction::Cosine => TrigFunction::ArcCosine,
            TrigFunction::Tangent => TrigFunction::ArcTangent,
            TrigFunction::ArcSine => TrigFunction::Sine,
            TrigFunction::ArcCosine => TrigFunction::Cosine,
            TrigFunction::ArcTangent => TrigFunction::Tangent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Result of a reduction that proved the expression has no value
    Undefined,

    /// Exact rational literal (e.g., 3, -1/2)
    Rational(Rational64),

    /// Decimal approximation literal (e.g., 2.5)
    Float(f64),

    /// Complex literal `re + im*i`
    Complex { re: f64, im: f64 },

    /// π, e, i
    Constant(Constant),

    /// Free variable, resolved through a `Context`
    Symbol(Arc<str>),

    /// Physical unit (e.g., `_m`)
    Unit(Arc<str>),

    /// Row-major rectangular matrix, `entries.len() == rows * cols`
    Matrix {
        rows: usize,
        cols: usize,
        entries: Vec<Arc<Expr>>,
    },

    // Binary operations
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),

    /// Unary minus
    Opposite(Arc<Expr>),

    SquareRoot(Arc<Expr>),

    Trig(TrigFunction, Arc<Expr>),

    /// Numeric derivative of `function` with respect to `x`, taken at `point`
    Derivative {
        function: Arc<Expr>,
        point: Arc<Expr>,
    },
}

/// Type tag of a node, used to index reduction rules
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ExprType {
    Undefined,
    Rational,
    Float,
    ComplexLiteral,
    Constant,
    Symbol,
    Unit,
    Matrix,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    Opposite,
    SquareRoot,
    Trigonometric,
    Derivative,
}

impl ExprType {
    pub const ALL: [ExprType; 17] = [
        ExprType::Undefined,
        ExprType::Rational,
        ExprType::Float,
        ExprType::ComplexLiteral,
        ExprType::Constant,
        ExprType::Symbol,
        ExprType::Unit,
        ExprType::Matrix,
        ExprType::Addition,
        ExprType::Subtraction,
        ExprType::Multiplication,
        ExprType::Division,
        ExprType::Power,
        ExprType::Opposite,
        ExprType::SquareRoot,
        ExprType::Trigonometric,
        ExprType::Derivative,
    ];

    #[inline]
    pub fn of(kind: &ExprKind) -> Self {
        match kind {
            ExprKind::Undefined => ExprType::Undefined,
            ExprKind::Rational(_) => ExprType::Rational,
            ExprKind::Float(_) => ExprType::Float,
            ExprKind::Complex { .. } => ExprType::ComplexLiteral,
            ExprKind::Constant(_) => ExprType::Constant,
            ExprKind::Symbol(_) => ExprType::Symbol,
            ExprKind::Unit(_) => ExprType::Unit,
            ExprKind::Matrix { .. } => ExprType::Matrix,
            ExprKind::Add(..) => ExprType::Addition,
            ExprKind::Sub(..) => ExprType::Subtraction,
            ExprKind::Mul(..) => ExprType::Multiplication,
            ExprKind::Div(..) => ExprType::Division,
            ExprKind::Pow(..) => ExprType::Power,
            ExprKind::Opposite(_) => ExprType::Opposite,
            ExprKind::SquareRoot(_) => ExprType::SquareRoot,
            ExprKind::Trig(..) => ExprType::Trigonometric,
            ExprKind::Derivative { .. } => ExprType::Derivative,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExprType::Undefined => "undefined",
            ExprType::Rational => "rational",
            ExprType::Float => "float",
            ExprType::ComplexLiteral => "complex",
            ExprType::Constant => "constant",
            ExprType::Symbol => "symbol",
            ExprType::Unit => "unit",
            ExprType::Matrix => "matrix",
            ExprType::Addition => "addition",
            ExprType::Subtraction => "subtraction",
            ExprType::Multiplication => "multiplication",
            ExprType::Division => "division",
            ExprType::Power => "power",
            ExprType::Opposite => "opposite",
            ExprType::SquareRoot => "square root",
            ExprType::Trigonometric => "trigonometric function",
            ExprType::Derivative => "derivative",
        }
    }

    /// Operators that accept physical-unit operands
    pub fn supports_units(self) -> bool {
        matches!(
            self,
            ExprType::Multiplication | ExprType::Division | ExprType::Power | ExprType::Unit
        )
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: next_id(),
            kind,
        }
    }

    // ===== Constructors =====

    pub fn undefined() -> Self {
        Expr::new(ExprKind::Undefined)
    }

    /// Rational literal `numerator/denominator`; a zero denominator is Undefined
    pub fn rational(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Expr::undefined();
        }
        Expr::new(ExprKind::Rational(Rational64::new(numerator, denominator)))
    }

    pub fn integer(n: i64) -> Self {
        Expr::new(ExprKind::Rational(Rational64::from_integer(n)))
    }

    pub fn from_rational(r: Rational64) -> Self {
        Expr::new(ExprKind::Rational(r))
    }

    pub fn float(value: f64) -> Self {
        Expr::new(ExprKind::Float(value))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Expr::new(ExprKind::Complex { re, im })
    }

    pub fn constant(c: Constant) -> Self {
        Expr::new(ExprKind::Constant(c))
    }

    pub fn pi() -> Self {
        Expr::constant(Constant::Pi)
    }

    pub fn symbol(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Symbol(Arc::from(name.as_ref())))
    }

    pub fn unit(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Unit(Arc::from(name.as_ref())))
    }

    /// Build a row-major matrix, validating its shape
    ///
    /// # Example
    /// ```ignore
    /// let m = Expr::matrix(1, 2, vec![Expr::integer(1), Expr::integer(2)])?;
    /// assert!(Expr::matrix(2, 2, vec![Expr::integer(1)]).is_err());
    /// ```
    pub fn matrix(rows: usize, cols: usize, entries: Vec<Expr>) -> Result<Self, ExprError> {
        let expected = rows * cols;
        if rows == 0 || cols == 0 || entries.len() != expected {
            return Err(ExprError::MatrixShape {
                rows,
                cols,
                expected,
                got: entries.len(),
            });
        }
        Ok(Expr::matrix_from_arcs(
            rows,
            cols,
            entries.into_iter().map(Arc::new).collect(),
        ))
    }

    /// Internal constructor; callers guarantee `entries.len() == rows * cols`
    pub(crate) fn matrix_from_arcs(rows: usize, cols: usize, entries: Vec<Arc<Expr>>) -> Self {
        debug_assert_eq!(entries.len(), rows * cols);
        Expr::new(ExprKind::Matrix {
            rows,
            cols,
            entries,
        })
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    pub fn opposite(operand: Expr) -> Self {
        Expr::new(ExprKind::Opposite(Arc::new(operand)))
    }

    pub fn square_root(operand: Expr) -> Self {
        Expr::new(ExprKind::SquareRoot(Arc::new(operand)))
    }

    pub fn trig(function: TrigFunction, argument: Expr) -> Self {
        Expr::new(ExprKind::Trig(function, Arc::new(argument)))
    }

    /// `diff(function, point)`: derivative of `function` in `x`, at `point`
    pub fn derivative(function: Expr, point: Expr) -> Self {
        Expr::new(ExprKind::Derivative {
            function: Arc::new(function),
            point: Arc::new(point),
        })
    }

    // ===== Accessors =====

    pub fn expr_type(&self) -> ExprType {
        ExprType::of(&self.kind)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.kind, ExprKind::Undefined)
    }

    pub fn as_rational(&self) -> Option<Rational64> {
        match &self.kind {
            ExprKind::Rational(r) => Some(*r),
            _ => None,
        }
    }

    #[inline]
    pub fn is_rational_zero(&self) -> bool {
        self.as_rational().is_some_and(|r| r.is_zero())
    }

    #[inline]
    pub fn is_rational_one(&self) -> bool {
        self.as_rational().is_some_and(|r| r.is_one())
    }

    /// Check for an integer rational literal and return it
    pub fn as_integer(&self) -> Option<i64> {
        self.as_rational()
            .filter(|r| r.is_integer())
            .map(|r| r.to_integer())
    }

    /// Rational, float or complex literal
    pub fn is_numeric_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Rational(_) | ExprKind::Float(_) | ExprKind::Complex { .. }
        )
    }

    /// Float or complex literal, i.e. a literal that is already approximate
    pub fn is_approximate_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Float(_) | ExprKind::Complex { .. })
    }

    /// Literal value as `(re, im)` in double precision
    pub fn as_complex_parts(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ExprKind::Rational(r) => Some((*r.numer() as f64 / *r.denom() as f64, 0.0)),
            ExprKind::Float(v) => Some((*v, 0.0)),
            ExprKind::Complex { re, im } => Some((*re, *im)),
            _ => None,
        }
    }

    pub fn matrix_shape(&self) -> Option<(usize, usize)> {
        match &self.kind {
            ExprKind::Matrix { rows, cols, .. } => Some((*rows, *cols)),
            _ => None,
        }
    }

    // ===== Child access and structural mutation =====

    /// Number of children this node carries
    pub fn arity(&self) -> usize {
        match &self.kind {
            ExprKind::Undefined
            | ExprKind::Rational(_)
            | ExprKind::Float(_)
            | ExprKind::Complex { .. }
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Unit(_) => 0,
            ExprKind::Matrix { entries, .. } => entries.len(),
            ExprKind::Opposite(_) | ExprKind::SquareRoot(_) | ExprKind::Trig(..) => 1,
            ExprKind::Add(..)
            | ExprKind::Sub(..)
            | ExprKind::Mul(..)
            | ExprKind::Div(..)
            | ExprKind::Pow(..)
            | ExprKind::Derivative { .. } => 2,
        }
    }

    /// Ordered children of this node
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Undefined
            | ExprKind::Rational(_)
            | ExprKind::Float(_)
            | ExprKind::Complex { .. }
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Unit(_) => Vec::new(),
            ExprKind::Matrix { entries, .. } => entries.iter().map(|e| e.as_ref()).collect(),
            ExprKind::Add(a, b)
            | ExprKind::Sub(a, b)
            | ExprKind::Mul(a, b)
            | ExprKind::Div(a, b)
            | ExprKind::Pow(a, b) => vec![a.as_ref(), b.as_ref()],
            ExprKind::Opposite(a) | ExprKind::SquareRoot(a) | ExprKind::Trig(_, a) => {
                vec![a.as_ref()]
            }
            ExprKind::Derivative { function, point } => vec![function.as_ref(), point.as_ref()],
        }
    }

    /// Mutable children; shared subtrees are detached first (copy-on-write)
    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.kind {
            ExprKind::Undefined
            | ExprKind::Rational(_)
            | ExprKind::Float(_)
            | ExprKind::Complex { .. }
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Unit(_) => Vec::new(),
            ExprKind::Matrix { entries, .. } => entries.iter_mut().map(Arc::make_mut).collect(),
            ExprKind::Add(a, b)
            | ExprKind::Sub(a, b)
            | ExprKind::Mul(a, b)
            | ExprKind::Div(a, b)
            | ExprKind::Pow(a, b) => vec![Arc::make_mut(a), Arc::make_mut(b)],
            ExprKind::Opposite(a) | ExprKind::SquareRoot(a) | ExprKind::Trig(_, a) => {
                vec![Arc::make_mut(a)]
            }
            ExprKind::Derivative { function, point } => {
                vec![Arc::make_mut(function), Arc::make_mut(point)]
            }
        }
    }

    /// A node of the same type with its children substituted.
    ///
    /// Fails when the number of supplied children differs from the
    /// type's arity.
    pub fn with_replaced_children(&self, children: Vec<Expr>) -> Result<Expr, ExprError> {
        let kind_name = self.expr_type().name();
        let kind = match &self.kind {
            ExprKind::Undefined
            | ExprKind::Rational(_)
            | ExprKind::Float(_)
            | ExprKind::Complex { .. }
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Unit(_) => {
                let [] = exact_children::<0>(children, kind_name)?;
                self.kind.clone()
            }
            ExprKind::Matrix { rows, cols, entries } => {
                if children.len() != entries.len() {
                    return Err(ExprError::arity(kind_name, entries.len(), children.len()));
                }
                ExprKind::Matrix {
                    rows: *rows,
                    cols: *cols,
                    entries: children.into_iter().map(Arc::new).collect(),
                }
            }
            ExprKind::Add(..) => {
                let [a, b] = exact_children(children, kind_name)?;
                ExprKind::Add(Arc::new(a), Arc::new(b))
            }
            ExprKind::Sub(..) => {
                let [a, b] = exact_children(children, kind_name)?;
                ExprKind::Sub(Arc::new(a), Arc::new(b))
            }
            ExprKind::Mul(..) => {
                let [a, b] = exact_children(children, kind_name)?;
                ExprKind::Mul(Arc::new(a), Arc::new(b))
            }
            ExprKind::Div(..) => {
                let [a, b] = exact_children(children, kind_name)?;
                ExprKind::Div(Arc::new(a), Arc::new(b))
            }
            ExprKind::Pow(..) => {
                let [a, b] = exact_children(children, kind_name)?;
                ExprKind::Pow(Arc::new(a), Arc::new(b))
            }
            ExprKind::Opposite(_) => {
                let [a] = exact_children(children, kind_name)?;
                ExprKind::Opposite(Arc::new(a))
            }
            ExprKind::SquareRoot(_) => {
                let [a] = exact_children(children, kind_name)?;
                ExprKind::SquareRoot(Arc::new(a))
            }
            ExprKind::Trig(function, _) => {
                let [a] = exact_children(children, kind_name)?;
                ExprKind::Trig(*function, Arc::new(a))
            }
            ExprKind::Derivative { .. } => {
                let [function, point] = exact_children(children, kind_name)?;
                ExprKind::Derivative {
                    function: Arc::new(function),
                    point: Arc::new(point),
                }
            }
        };
        Ok(Expr::new(kind))
    }

    /// Put `replacement` where `self` was and hand back the detached node
    pub fn replace_in_place(&mut self, replacement: Expr) -> Expr {
        std::mem::replace(self, replacement)
    }

    pub fn replace_with_undefined_in_place(&mut self) -> Expr {
        self.replace_in_place(Expr::undefined())
    }

    // ===== Structural analyses =====

    /// Count the total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Get the maximum nesting depth of the tree
    pub fn max_depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.max_depth())
            .max()
            .unwrap_or(0)
    }

    /// Check whether a physical unit appears anywhere in the subtree
    pub fn has_unit(&self) -> bool {
        matches!(self.kind, ExprKind::Unit(_)) || self.children().iter().any(|c| c.has_unit())
    }

    /// Check whether `name` occurs free in the subtree
    pub fn contains_symbol(&self, name: &str) -> bool {
        match &self.kind {
            ExprKind::Symbol(s) => &**s == name,
            // `x` is bound inside the differentiated function
            ExprKind::Derivative { function, point } => {
                (name != DERIVATIVE_VARIABLE && function.contains_symbol(name))
                    || point.contains_symbol(name)
            }
            _ => self.children().iter().any(|c| c.contains_symbol(name)),
        }
    }

    /// Whether this expression denotes a matrix: a matrix literal, a symbol
    /// bound to one, or arithmetic carried over a matrix operand.
    pub fn deep_is_matrix(&self, context: &Context) -> bool {
        match &self.kind {
            ExprKind::Matrix { .. } => true,
            ExprKind::Symbol(name) => context
                .resolve(name)
                .is_some_and(|(value, scope)| value.deep_is_matrix(&scope)),
            ExprKind::Add(a, b) | ExprKind::Sub(a, b) | ExprKind::Mul(a, b) => {
                a.deep_is_matrix(context) || b.deep_is_matrix(context)
            }
            ExprKind::Div(a, _) | ExprKind::Pow(a, _) | ExprKind::Opposite(a) => {
                a.deep_is_matrix(context)
            }
            _ => false,
        }
    }

    /// Degree of the expression as a polynomial in `variable`, `None` when
    /// it is not a polynomial in it.
    pub fn polynomial_degree(&self, variable: &str) -> Option<u32> {
        if !self.contains_symbol(variable) {
            return match &self.kind {
                ExprKind::Undefined | ExprKind::Matrix { .. } => None,
                _ => Some(0),
            };
        }
        match &self.kind {
            ExprKind::Symbol(_) => Some(1),
            ExprKind::Add(a, b) | ExprKind::Sub(a, b) => {
                Some(a.polynomial_degree(variable)?.max(b.polynomial_degree(variable)?))
            }
            ExprKind::Mul(a, b) => {
                a.polynomial_degree(variable)?
                    .checked_add(b.polynomial_degree(variable)?)
            }
            ExprKind::Div(a, b) if b.polynomial_degree(variable) == Some(0) => {
                a.polynomial_degree(variable)
            }
            ExprKind::Pow(base, exponent) => {
                let n = exponent.as_integer().filter(|n| !n.is_negative())?;
                base.polynomial_degree(variable)?
                    .checked_mul(u32::try_from(n).ok()?)
            }
            ExprKind::Opposite(a) => a.polynomial_degree(variable),
            _ => None,
        }
    }

    // ===== Convenience entry points =====

    /// Reduce a copy of this expression
    ///
    /// # Example
    /// ```ignore
    /// let r = Expr::square_root(Expr::integer(4)).reduced(&Context::new(), &Preferences::new());
    /// assert_eq!(r, Expr::integer(2));
    /// ```
    pub fn reduced(&self, context: &Context, preferences: &Preferences) -> Expr {
        crate::reduction::reduce(self.clone(), context, preferences)
    }

    /// Approximate this expression in precision `T`
    pub fn approximate<T: MathScalar>(
        &self,
        context: &Context,
        preferences: &Preferences,
    ) -> Evaluation<T> {
        crate::evaluator::approximate(self, context, preferences)
    }
}

fn exact_children<const N: usize>(
    children: Vec<Expr>,
    kind: &'static str,
) -> Result<[Expr; N], ExprError> {
    let got = children.len();
    children
        .try_into()
        .map_err(|_| ExprError::arity(kind, N, got))
}

// ===== Literal conversions =====

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::integer(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::integer(i64::from(n))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::float(v)
    }
}

impl From<Rational64> for Expr {
    fn from(r: Rational64) -> Self {
        Expr::from_rational(r)
    }
}
