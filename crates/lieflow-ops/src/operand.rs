//! The closed set of values that take part in operator products.
//!
//! Multiplication in operator notation mixes operators, chains and the
//! expressions they act on. [`Operand::compose`] resolves every pairing by
//! pattern matching:
//!
//! | left \ right       | Identity | Operator / Chain | Scalar / Vector   |
//! |--------------------|----------|------------------|-------------------|
//! | Identity           | Identity | right            | right             |
//! | Operator / Chain   | left     | flat chain       | applied value     |
//! | Scalar / Vector    | left     | error            | error             |

use std::fmt;

use lieflow_expr::Expr;

use crate::chain::OpChain;
use crate::error::{OpsError, OpsResult};
use crate::lie_op::LieOp;
use crate::phase_space::PhaseSpace;

/// Power argument for operator exponentiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exponent {
    /// An integer power.
    Integer(i64),
    /// A real power; accepted only if integral.
    Real(f64),
}

impl Exponent {
    /// The repetition count, validating that the power is a non-negative integer.
    pub fn count(self) -> OpsResult<usize> {
        let n = match self {
            Exponent::Integer(n) => n,
            Exponent::Real(v) => {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(OpsError::NonIntegerPower(v));
                }
                #[allow(clippy::cast_possible_truncation)]
                let n = v as i64;
                n
            }
        };
        usize::try_from(n).map_err(|_| OpsError::NegativePower(n))
    }
}

impl From<i64> for Exponent {
    fn from(n: i64) -> Self {
        Exponent::Integer(n)
    }
}

impl From<i32> for Exponent {
    fn from(n: i32) -> Self {
        Exponent::Integer(i64::from(n))
    }
}

impl From<u32> for Exponent {
    fn from(n: u32) -> Self {
        Exponent::Integer(i64::from(n))
    }
}

impl From<f64> for Exponent {
    fn from(v: f64) -> Self {
        Exponent::Real(v)
    }
}

/// A value in an operator product.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// The identity operator, e.g. `op ** 0`.
    Identity,
    /// A single Lie operator.
    Operator(LieOp),
    /// A product of Lie operators.
    Chain(OpChain),
    /// A vector of expressions, e.g. the phase-space state.
    Vector(Vec<Expr>),
    /// A scalar expression.
    Scalar(Expr),
}

impl Operand {
    /// `exp(t:H:)` as an operand; the identity if `H` has no phase-space symbols.
    pub fn lie(variable: Expr, hamiltonian: Expr, space: &PhaseSpace) -> OpsResult<Self> {
        if !hamiltonian.free_symbols().iter().any(|s| space.contains(s)) {
            return Ok(Operand::Identity);
        }
        Ok(Operand::Operator(LieOp::new(variable, hamiltonian, space)?))
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Identity => "identity",
            Operand::Operator(_) => "operator",
            Operand::Chain(_) => "chain",
            Operand::Vector(_) => "vector",
            Operand::Scalar(_) => "scalar",
        }
    }

    /// `self · rhs`.
    pub fn compose(self, rhs: Operand) -> OpsResult<Operand> {
        use Operand::{Chain, Identity, Operator, Scalar, Vector};

        Ok(match (self, rhs) {
            (Identity, rhs) => rhs,
            (lhs, Identity) => lhs,

            (Operator(a), Operator(b)) => Chain(a * b),
            (Operator(a), Chain(c)) => Chain(a * c),
            (Chain(c), Operator(b)) => Chain(c * b),
            (Chain(a), Chain(b)) => Chain(a * b),

            (Operator(op), Scalar(e)) => Scalar(op.apply(&e)),
            (Operator(op), Vector(v)) => Vector(op.apply_all(&v)),
            (Chain(c), Scalar(e)) => Scalar(c.apply(&e)),
            (Chain(c), Vector(v)) => Vector(c.apply_all(&v)),

            (lhs @ (Scalar(_) | Vector(_)), rhs) => {
                return Err(OpsError::InvalidComposition {
                    lhs: lhs.kind(),
                    rhs: rhs.kind(),
                });
            }
        })
    }

    /// `self ** n`.
    pub fn pow(&self, exponent: impl Into<Exponent>) -> OpsResult<Operand> {
        let exponent = exponent.into();
        match self {
            Operand::Identity => {
                exponent.count()?;
                Ok(Operand::Identity)
            }
            Operand::Operator(op) => op.pow(exponent),
            Operand::Chain(chain) => chain.pow(exponent),
            Operand::Scalar(e) => {
                let n = exponent.count()?;
                #[allow(clippy::cast_precision_loss)]
                Ok(Operand::Scalar(Expr::pow(e.clone(), Expr::number(n as f64))))
            }
            Operand::Vector(_) => Err(OpsError::InvalidComposition {
                lhs: "vector",
                rhs: "exponent",
            }),
        }
    }

    /// The chain form of an operator-like operand; identity becomes the empty chain.
    pub fn into_chain(self) -> Option<OpChain> {
        match self {
            Operand::Identity => Some(OpChain::default()),
            Operand::Operator(op) => Some(OpChain::from_op(op)),
            Operand::Chain(chain) => Some(chain),
            Operand::Vector(_) | Operand::Scalar(_) => None,
        }
    }

    /// LaTeX rendering.
    pub fn to_latex(&self) -> String {
        match self {
            Operand::Identity => "1".to_string(),
            Operand::Operator(op) => op.to_latex(),
            Operand::Chain(chain) => chain.to_latex(),
            Operand::Scalar(e) => e.to_latex(),
            Operand::Vector(v) => {
                let rows: Vec<String> = v.iter().map(Expr::to_latex).collect();
                format!("\\left[\\begin{{matrix}}{}\\end{{matrix}}\\right]", rows.join("\\\\"))
            }
        }
    }
}

impl From<LieOp> for Operand {
    fn from(op: LieOp) -> Self {
        Operand::Operator(op)
    }
}

impl From<OpChain> for Operand {
    fn from(chain: OpChain) -> Self {
        Operand::Chain(chain)
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Scalar(e)
    }
}

impl From<Vec<Expr>> for Operand {
    fn from(v: Vec<Expr>) -> Self {
        Operand::Vector(v)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Identity => write!(f, "1"),
            Operand::Operator(op) => write!(f, "{op}"),
            Operand::Chain(chain) => write!(f, "{chain}"),
            Operand::Scalar(e) => write!(f, "{e}"),
            Operand::Vector(v) => {
                let items: Vec<String> = v.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}
