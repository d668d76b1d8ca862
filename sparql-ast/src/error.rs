//! Hard construction errors.
//!
//! Recoverable semantic problems are reported as
//! [`Diagnostic`](crate::diag::Diagnostic)s on the query. The errors here
//! are returned when a factory call receives input it cannot build a node
//! from, or when strict mode escalates the first diagnostic.

use crate::ast::pattern::ExpId;
use crate::diag::Diagnostic;
use thiserror::Error;

/// Error that aborts the current factory or compilation call.
#[derive(Debug, Error)]
pub enum AstError {
    /// Path repetition bound that is not a non-negative integer
    #[error("Invalid property path bound '{value}': expected a non-negative integer")]
    InvalidPathBound { value: String },

    /// Path repetition with min greater than max
    #[error("Invalid property path bounds {{{min},{max}}}: min is greater than max")]
    InvertedPathBound { min: u32, max: u32 },

    /// Numeric literal whose lexical form is not a number
    #[error("Invalid numeric literal '{value}'")]
    InvalidNumericLiteral { value: String },

    /// Operator symbol that is not a property path operator
    #[error("Unknown property path operator '{symbol}'")]
    UnknownPathOperator { symbol: String },

    /// Graph pattern id not allocated by this query
    #[error("Unknown graph pattern id {0}")]
    UnknownExp(ExpId),

    /// Graph pattern id that does not denote the expected node kind
    #[error("Graph pattern {id} is not a {expected}")]
    NotAPattern { id: ExpId, expected: &'static str },

    /// First correctness error, escalated because strict mode is on
    #[error("{0}")]
    Strict(Diagnostic),
}

impl AstError {
    /// Create an invalid path bound error.
    pub fn invalid_path_bound(value: impl Into<String>) -> Self {
        Self::InvalidPathBound {
            value: value.into(),
        }
    }

    /// Create an invalid numeric literal error.
    pub fn invalid_numeric(value: impl Into<String>) -> Self {
        Self::InvalidNumericLiteral {
            value: value.into(),
        }
    }

    /// Create an unknown path operator error.
    pub fn unknown_path_operator(symbol: impl Into<String>) -> Self {
        Self::UnknownPathOperator {
            symbol: symbol.into(),
        }
    }

    /// The escalated diagnostic, if this is a strict-mode failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Strict(diag) => Some(diag),
            _ => None,
        }
    }
}

/// Result type for AST construction and compilation.
pub type Result<T> = std::result::Result<T, AstError>;
