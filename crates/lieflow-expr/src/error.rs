//! Error types for the expression crate.

use thiserror::Error;

use crate::symbol::Symbol;

/// Errors that can occur while building, parsing or evaluating expressions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExprError {
    /// A symbol had no value during numeric evaluation.
    #[error("Symbol '{0}' is unbound")]
    UnboundSymbol(Symbol),

    /// Numeric evaluation produced NaN or an infinity.
    #[error("Expression '{expr}' evaluated to a non-finite value")]
    NonFinite {
        /// Rendered sub-expression that produced the value.
        expr: String,
    },

    /// The integrand is outside the polynomial class handled by `integrate`.
    #[error("Cannot integrate '{integrand}' with respect to {var}")]
    UnsupportedIntegrand {
        /// Rendered integrand.
        integrand: String,
        /// Integration variable.
        var: Symbol,
    },

    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    Lexer {
        /// Byte offset of the offending input.
        position: usize,
        /// Human-readable description.
        message: String,
    },

    /// Unexpected token.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Byte offset of the token.
        position: usize,
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Call of a function the engine does not know.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

/// Result type for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;
