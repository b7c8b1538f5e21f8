//! Error types for the operator crate.

use lieflow_expr::{ExprError, Symbol};
use thiserror::Error;

/// Errors produced while building, composing or applying Lie operators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    /// The Hamiltonian mixes position and momentum variables, or uses neither.
    #[error("Hamiltonian '{hamiltonian}' is not a function of only positions or only momenta")]
    Separability {
        /// Rendered Hamiltonian.
        hamiltonian: String,
    },

    /// Order-raising needs an even base order and a positive even increase.
    #[error("Specified order has to be an even number (base order {base}, increase {increase})")]
    OddOrder {
        /// Order of the integrator being raised.
        base: u32,
        /// Requested order increase.
        increase: u32,
    },

    /// An operator was raised to a negative power.
    #[error("Operator raised to the negative power {0}")]
    NegativePower(i64),

    /// An operator was raised to a non-integer power.
    #[error("Operator raised to the non-integer power {0}")]
    NonIntegerPower(f64),

    /// A value without operator semantics was placed left of an operator or value.
    #[error("Cannot compose {lhs} with {rhs}")]
    InvalidComposition {
        /// Kind of the left operand.
        lhs: &'static str,
        /// Kind of the right operand.
        rhs: &'static str,
    },

    /// Position and momentum lists differ in length.
    #[error("Phase space needs one momentum per position, got {positions} positions and {momenta} momenta")]
    PhaseSpaceMismatch {
        /// Number of positions supplied.
        positions: usize,
        /// Number of momenta supplied.
        momenta: usize,
    },

    /// No variables were supplied.
    #[error("Phase space has no variables")]
    EmptyPhaseSpace,

    /// A symbol is used twice across the position and momentum lists.
    #[error("Variable '{0}' appears more than once in the phase space")]
    OverlappingVariables(Symbol),

    /// Gauge component index outside the vector potential.
    #[error("Gauge component {index} out of range for a {len}-component potential")]
    GaugeIndex {
        /// Requested component.
        index: usize,
        /// Number of components.
        len: usize,
    },

    /// A numeric state does not match the phase-space dimension.
    #[error("State has {got} entries but the phase space has dimension {expected}")]
    StateDimension {
        /// Required number of entries (positions plus momenta).
        expected: usize,
        /// Number supplied.
        got: usize,
    },

    /// Integration steps must be ≥ 1.
    #[error("steps must be at least 1, got {0}")]
    InvalidSteps(u32),

    /// Order raising would leave every step of the base integrator unscaled.
    #[error("No step of the base integrator contains the step symbol '{0}'")]
    StepNotInChain(Symbol),

    /// `base + increase` does not fit the order type.
    #[error("Order {base} + {increase} is out of range")]
    OrderOverflow {
        /// Order of the integrator being raised.
        base: u32,
        /// Requested order increase.
        increase: u32,
    },

    /// A power or composition would produce more members than a chain may hold.
    #[error("Chain of {members} members repeated {repeat} times exceeds {max} members")]
    ChainTooLong {
        /// Members of the chain being repeated.
        members: usize,
        /// Number of repetitions.
        repeat: usize,
        /// Largest allowed chain.
        max: usize,
    },

    /// Expression engine error.
    #[error("Expression error: {0}")]
    Expr(#[from] ExprError),
}

/// Result type for operator operations.
pub type OpsResult<T> = Result<T, OpsError>;
