use thiserror::Error;

/// Contract violations raised at construction boundaries.
///
/// Undefined results and NaN approximations are ordinary values
/// (`ExprKind::Undefined`, `Evaluation::nan`) and never travel through this
/// type. Only structural mistakes made by the caller do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A node was rebuilt with the wrong number of children
    #[error("{kind} expects {expected} children, got {got}")]
    ArityMismatch {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    /// A matrix was built from an entry list that does not fill its shape
    #[error("a {rows}x{cols} matrix needs {expected} entries, got {got}")]
    MatrixShape {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },

    /// Two matrices were combined with incompatible dimensions
    #[error("incompatible matrix dimensions: {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    IncompatibleMatrices {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Input tree is nested deeper than the configured limit
    #[error("expression nesting depth exceeds maximum limit of {limit}")]
    MaxDepthExceeded { limit: usize },

    /// Input tree has more nodes than the configured limit
    #[error("expression size exceeds maximum node count of {limit}")]
    MaxNodesExceeded { limit: usize },
}

impl ExprError {
    /// Convenience constructor for arity mismatches
    pub fn arity(kind: &'static str, expected: usize, got: usize) -> Self {
        ExprError::ArityMismatch {
            kind,
            expected,
            got,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExprError::arity("subtraction", 2, 3).to_string(),
            "subtraction expects 2 children, got 3"
        );
        let shape = ExprError::MatrixShape {
            rows: 2,
            cols: 2,
            expected: 4,
            got: 3,
        };
        assert_eq!(shape.to_string(), "a 2x2 matrix needs 4 entries, got 3");
        assert!(
            ExprError::MaxDepthExceeded { limit: 100 }
                .to_string()
                .contains("100")
        );
    }
}
