//! Serialization and layout of expressions and evaluations
//!
//! `Display` renders with the default float mode and significant digits;
//! [`Expr::serialize`] and [`Expr::create_layout`] take them explicitly.

use num_rational::Rational64;
use num_traits::Signed;
use std::fmt;

use crate::Expr;
use crate::ast::ExprKind;
use crate::evaluator::Evaluation;
use crate::preferences::{ComplexFormat, DEFAULT_SIGNIFICANT_DIGITS, PrintFloatMode};
use crate::traits::{MathScalar, to_f64};

/// Marker rendered for Undefined expressions and NaN evaluations
pub const UNDEFINED_TEXT: &str = "undef";

/// Marker rendered for non-real values in [`ComplexFormat::Real`]
pub const NONREAL_TEXT: &str = "nonreal";

/// f64 carries at most 17 significant decimal digits
const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Format a float with `significant_digits` significant digits
///
/// Decimal mode switches to scientific notation when the exponent does not
/// fit in the requested digits.
pub fn format_float(value: f64, mode: PrintFloatMode, significant_digits: usize) -> String {
    if value.is_nan() {
        return UNDEFINED_TEXT.to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
    let exponent = value.abs().log10().floor() as i32;
    let fits_decimal = exponent < digits as i32 && exponent > -(digits as i32);
    match mode {
        PrintFloatMode::Decimal if fits_decimal => {
            let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
            trim_fraction(format!("{:.*}", decimals, value))
        }
        _ => {
            let formatted = format!("{:.*e}", digits - 1, value);
            match formatted.split_once('e') {
                Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa.to_string()), exp),
                None => formatted,
            }
        }
    }
}

/// Drop trailing zeros of a fractional part, and a dangling point
fn trim_fraction(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `a+b*i` with the usual shortcuts (`i`, `-i`, pure real, pure imaginary)
fn format_cartesian(re: f64, im: f64, mode: PrintFloatMode, digits: usize) -> String {
    if im == 0.0 {
        return format_float(re, mode, digits);
    }
    let imaginary = if im == 1.0 {
        "i".to_string()
    } else if im == -1.0 {
        "-i".to_string()
    } else {
        format!("{}*i", format_float(im, mode, digits))
    };
    if re == 0.0 {
        return imaginary;
    }
    let real = format_float(re, mode, digits);
    if imaginary.starts_with('-') {
        format!("{real}{imaginary}")
    } else {
        format!("{real}+{imaginary}")
    }
}

/// `r*e^(θ*i)`; real non-negative values are shown as `r`
fn format_polar(re: f64, im: f64, mode: PrintFloatMode, digits: usize) -> String {
    let modulus = re.hypot(im);
    let argument = im.atan2(re);
    if modulus == 0.0 || argument == 0.0 {
        return format_float(modulus, mode, digits);
    }
    let exponential = format!("e^({}*i)", format_float(argument, mode, digits));
    if modulus == 1.0 {
        exponential
    } else {
        format!("{}*{}", format_float(modulus, mode, digits), exponential)
    }
}

fn format_complex(
    re: f64,
    im: f64,
    format: ComplexFormat,
    mode: PrintFloatMode,
    digits: usize,
) -> String {
    if re.is_nan() || im.is_nan() {
        return UNDEFINED_TEXT.to_string();
    }
    match format {
        ComplexFormat::Real if im != 0.0 => NONREAL_TEXT.to_string(),
        ComplexFormat::Real => format_float(re, mode, digits),
        ComplexFormat::Cartesian => format_cartesian(re, im, mode, digits),
        ComplexFormat::Polar => format_polar(re, im, mode, digits),
    }
}

/// `[[a,b][c,d]]`
fn format_rows(rows: usize, cols: usize, cells: &[String]) -> String {
    let mut out = String::from("[");
    for row in 0..rows {
        out.push('[');
        out.push_str(&cells[row * cols..(row + 1) * cols].join(","));
        out.push(']');
    }
    out.push(']');
    out
}

impl Expr {
    /// Linear text form of this expression
    pub fn serialize(&self, mode: PrintFloatMode, significant_digits: usize) -> String {
        let s = |e: &Expr| e.serialize(mode, significant_digits);
        match &self.kind {
            ExprKind::Undefined => UNDEFINED_TEXT.to_string(),
            ExprKind::Rational(r) => {
                if r.is_integer() {
                    r.numer().to_string()
                } else {
                    format!("{}/{}", r.numer(), r.denom())
                }
            }
            ExprKind::Float(v) => format_float(*v, mode, significant_digits),
            ExprKind::Complex { re, im } => format_cartesian(*re, *im, mode, significant_digits),
            ExprKind::Constant(c) => c.name().to_string(),
            ExprKind::Symbol(name) | ExprKind::Unit(name) => name.to_string(),
            ExprKind::Matrix {
                rows,
                cols,
                entries,
            } => {
                let cells: Vec<String> = entries.iter().map(|e| s(e)).collect();
                format_rows(*rows, *cols, &cells)
            }

            ExprKind::Add(u, v) => {
                // Negative terms display as subtraction: x + (-2)*y is x - 2 * y
                if let Some(r) = v.as_rational()
                    && r.is_negative()
                    && let Some(positive) = r.numer().checked_neg()
                {
                    let magnitude = Expr::from_rational(Rational64::new(positive, *r.denom()));
                    return format!("{} - {}", s(u), s(&magnitude));
                }
                if let ExprKind::Mul(coefficient, term) = &v.kind
                    && coefficient.as_integer() == Some(-1)
                {
                    return format!("{} - {}", s(u), mul_operand(term, mode, significant_digits));
                }
                format!("{} + {}", s(u), s(v))
            }

            ExprKind::Sub(u, v) => {
                // a - (b + c), not a - b + c
                let right = match &v.kind {
                    ExprKind::Add(..) | ExprKind::Sub(..) | ExprKind::Opposite(_) => {
                        format!("({})", s(v))
                    }
                    _ => s(v),
                };
                format!("{} - {}", s(u), right)
            }

            ExprKind::Mul(u, v) => {
                if u.as_integer() == Some(-1) {
                    format!("-{}", mul_operand(v, mode, significant_digits))
                } else {
                    format!(
                        "{} * {}",
                        mul_operand(u, mode, significant_digits),
                        mul_operand(v, mode, significant_digits)
                    )
                }
            }

            ExprKind::Div(u, v) => {
                let numerator = match &u.kind {
                    ExprKind::Add(..) | ExprKind::Sub(..) => format!("({})", s(u)),
                    _ => s(u),
                };
                let denominator = if is_atomic(v) || matches!(v.kind, ExprKind::Pow(..) | ExprKind::Trig(..)) {
                    s(v)
                } else {
                    format!("({})", s(v))
                };
                format!("{} / {}", numerator, denominator)
            }

            ExprKind::Pow(u, v) => {
                let base = if is_atomic(u) && !is_signed_or_fraction(u) {
                    s(u)
                } else {
                    format!("({})", s(u))
                };
                let exponent = if is_atomic(v) && !is_signed_or_fraction(v) {
                    s(v)
                } else {
                    format!("({})", s(v))
                };
                format!("{}^{}", base, exponent)
            }

            ExprKind::Opposite(u) => format!("-{}", mul_operand(u, mode, significant_digits)),
            ExprKind::SquareRoot(u) => format!("sqrt({})", s(u)),
            ExprKind::Trig(function, u) => format!("{}({})", function.name(), s(u)),
            ExprKind::Derivative { function, point } => {
                format!("diff({}, x, {})", s(function), s(point))
            }
        }
    }

    /// Two-dimensional layout description of this expression
    pub fn create_layout(&self, mode: PrintFloatMode, significant_digits: usize) -> Layout {
        let l = |e: &Expr| e.create_layout(mode, significant_digits);
        let grouped = |e: &Expr| {
            if matches!(e.kind, ExprKind::Add(..) | ExprKind::Sub(..)) {
                Layout::Parenthesis(Box::new(l(e)))
            } else {
                l(e)
            }
        };
        match &self.kind {
            ExprKind::Matrix {
                rows,
                cols,
                entries,
            } => Layout::Grid {
                rows: *rows,
                cols: *cols,
                cells: entries.iter().map(|e| l(e)).collect(),
            },
            ExprKind::Add(u, v) => Layout::Horizontal(vec![l(u), Layout::text("+"), l(v)]),
            ExprKind::Sub(u, v) => {
                let right = if matches!(v.kind, ExprKind::Opposite(_)) {
                    Layout::Parenthesis(Box::new(l(v)))
                } else {
                    grouped(v)
                };
                Layout::Horizontal(vec![l(u), Layout::text("-"), right])
            }
            ExprKind::Mul(u, v) => Layout::Horizontal(vec![grouped(u), Layout::text("×"), grouped(v)]),
            ExprKind::Div(u, v) => Layout::Fraction {
                numerator: Box::new(l(u)),
                denominator: Box::new(l(v)),
            },
            ExprKind::Pow(u, v) => {
                let base = if is_atomic(u) && !is_signed_or_fraction(u) {
                    l(u)
                } else {
                    Layout::Parenthesis(Box::new(l(u)))
                };
                Layout::Superscript {
                    base: Box::new(base),
                    exponent: Box::new(l(v)),
                }
            }
            ExprKind::Opposite(u) => Layout::Horizontal(vec![Layout::text("-"), grouped(u)]),
            ExprKind::SquareRoot(u) => Layout::NthRoot {
                radicand: Box::new(l(u)),
                index: None,
            },
            ExprKind::Trig(function, u) => Layout::Horizontal(vec![
                Layout::text(function.name()),
                Layout::Parenthesis(Box::new(l(u))),
            ]),
            ExprKind::Derivative { function, point } => Layout::Horizontal(vec![
                Layout::text("diff"),
                Layout::Parenthesis(Box::new(Layout::Horizontal(vec![
                    l(function),
                    Layout::text(","),
                    Layout::text("x"),
                    Layout::text(","),
                    l(point),
                ]))),
            ]),
            _ => Layout::text(self.serialize(mode, significant_digits)),
        }
    }
}

/// Leaves print without parentheses
fn is_atomic(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Undefined
            | ExprKind::Rational(_)
            | ExprKind::Float(_)
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Unit(_)
            | ExprKind::Matrix { .. }
    )
}

/// Leaves whose text contains a sign or a slash
fn is_signed_or_fraction(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Rational(r) => !r.is_integer() || *r.numer() < 0,
        ExprKind::Float(v) => *v < 0.0,
        _ => false,
    }
}

/// Format operand for multiplication to minimize parentheses
fn mul_operand(expr: &Expr, mode: PrintFloatMode, digits: usize) -> String {
    match &expr.kind {
        ExprKind::Add(..) | ExprKind::Sub(..) | ExprKind::Complex { .. } => {
            format!("({})", expr.serialize(mode, digits))
        }
        _ => expr.serialize(mode, digits),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(PrintFloatMode::Decimal, DEFAULT_SIGNIFICANT_DIGITS))
    }
}

/// Layout description handed to a rendering engine
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Text(String),
    Horizontal(Vec<Layout>),
    Parenthesis(Box<Layout>),
    Fraction {
        numerator: Box<Layout>,
        denominator: Box<Layout>,
    },
    Superscript {
        base: Box<Layout>,
        exponent: Box<Layout>,
    },
    /// `index` is `None` for a square root
    NthRoot {
        radicand: Box<Layout>,
        index: Option<Box<Layout>>,
    },
    /// Row-major cells
    Grid {
        rows: usize,
        cols: usize,
        cells: Vec<Layout>,
    },
}

impl Layout {
    pub fn text(s: impl Into<String>) -> Self {
        Layout::Text(s.into())
    }
}

/// Linearized form, mostly useful in tests and logs
impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Text(s) => f.write_str(s),
            Layout::Horizontal(items) => items.iter().try_for_each(|item| write!(f, "{item}")),
            Layout::Parenthesis(inner) => write!(f, "({inner})"),
            Layout::Fraction {
                numerator,
                denominator,
            } => write!(f, "({numerator})/({denominator})"),
            Layout::Superscript { base, exponent } => write!(f, "{base}^({exponent})"),
            Layout::NthRoot {
                radicand,
                index: None,
            } => write!(f, "√({radicand})"),
            Layout::NthRoot {
                radicand,
                index: Some(index),
            } => write!(f, "root({radicand},{index})"),
            Layout::Grid { rows, cols, cells } => {
                let cells: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                f.write_str(&format_rows(*rows, *cols, &cells))
            }
        }
    }
}

impl<T: MathScalar> Evaluation<T> {
    /// Text of this value in the requested complex format
    pub fn serialize(
        &self,
        format: ComplexFormat,
        mode: PrintFloatMode,
        significant_digits: usize,
    ) -> String {
        if self.is_nan() {
            return UNDEFINED_TEXT.to_string();
        }
        match self {
            Evaluation::Complex(c) => {
                format_complex(to_f64(c.re), to_f64(c.im), format, mode, significant_digits)
            }
            Evaluation::Matrix(m) => {
                let cells: Vec<String> = m
                    .entries()
                    .iter()
                    .map(|c| format_complex(to_f64(c.re), to_f64(c.im), format, mode, significant_digits))
                    .collect();
                format_rows(m.rows(), m.cols(), &cells)
            }
        }
    }
}

impl<T: MathScalar> fmt::Display for Evaluation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(
            ComplexFormat::Cartesian,
            PrintFloatMode::Decimal,
            DEFAULT_SIGNIFICANT_DIGITS,
        ))
    }
}
