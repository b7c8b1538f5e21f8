//! Ordered products of Lie operators.
//!
//! An [`OpChain`] `[A, B, C]` stands for the product `A · B · C`. Operators
//! only combine formally; nothing is evaluated until the chain is applied to
//! an expression, at which point the rightmost member acts first.

use std::fmt;
use std::ops::Mul;

use lieflow_expr::{Expr, Symbol};
use tracing::debug;

use crate::error::{OpsError, OpsResult};
use crate::lie_op::LieOp;
use crate::operand::{Exponent, Operand};

/// Largest number of members a chain built by [`OpChain::pow`] or order
/// raising may hold.
pub const MAX_CHAIN_LEN: usize = 1 << 24;

/// Length of `members` repeated `repeat` times, if it stays within [`MAX_CHAIN_LEN`].
pub(crate) fn repeated_len(members: usize, repeat: usize) -> OpsResult<usize> {
    members
        .checked_mul(repeat)
        .filter(|&len| len <= MAX_CHAIN_LEN)
        .ok_or(OpsError::ChainTooLong {
            members,
            repeat,
            max: MAX_CHAIN_LEN,
        })
}

/// A flat, ordered product of [`LieOp`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpChain {
    members: Vec<LieOp>,
}

impl OpChain {
    /// Create a chain; `members[0]` is the leftmost factor.
    pub fn new(members: Vec<LieOp>) -> Self {
        Self { members }
    }

    /// A one-member chain.
    pub fn from_op(op: LieOp) -> Self {
        Self { members: vec![op] }
    }

    /// The factors, leftmost first.
    pub fn members(&self) -> &[LieOp] {
        &self.members
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True for the empty product (the identity).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `self · op`.
    #[must_use]
    pub fn then_op(mut self, op: LieOp) -> Self {
        self.members.push(op);
        self
    }

    /// `op · self`.
    #[must_use]
    pub fn prepend_op(mut self, op: LieOp) -> Self {
        self.members.insert(0, op);
        self
    }

    /// `self · other`, flattened.
    #[must_use]
    pub fn concat(mut self, other: OpChain) -> Self {
        self.members.extend(other.members);
        debug!(members = self.members.len(), "composed operator chain");
        self
    }

    /// Apply the product to a scalar expression, rightmost factor first.
    pub fn apply(&self, target: &Expr) -> Expr {
        self.members
            .iter()
            .rev()
            .fold(target.clone(), |acc, op| op.apply(&acc))
    }

    /// Apply the product element-wise to a vector of expressions.
    pub fn apply_all(&self, targets: &[Expr]) -> Vec<Expr> {
        self.members
            .iter()
            .rev()
            .fold(targets.to_vec(), |acc, op| op.apply_all(&acc))
    }

    /// `self ** n`: the identity for `n = 0`, otherwise the members repeated `n` times.
    pub fn pow(&self, exponent: impl Into<Exponent>) -> OpsResult<Operand> {
        let n = exponent.into().count()?;
        if n == 0 {
            return Ok(Operand::Identity);
        }
        if self.members.is_empty() {
            return Ok(Operand::Chain(Self::default()));
        }
        let mut members = Vec::with_capacity(repeated_len(self.members.len(), n)?);
        for _ in 0..n {
            members.extend(self.members.iter().cloned());
        }
        Ok(Operand::Chain(Self { members }))
    }

    /// A copy in which every member's step expression is `variable`.
    #[must_use]
    pub fn replace_variable(&self, variable: &Expr) -> Self {
        Self {
            members: self
                .members
                .iter()
                .map(|op| op.with_variable(variable.clone()))
                .collect(),
        }
    }

    /// A copy in which `step` is replaced by `value` inside every member's
    /// step expression. Members whose step does not involve `step` are kept.
    #[must_use]
    pub fn rescale_step(&self, step: &Symbol, value: &Expr) -> Self {
        Self {
            members: self
                .members
                .iter()
                .map(|op| op.substitute_step(step, value))
                .collect(),
        }
    }

    /// Step expressions of the members, leftmost first.
    pub fn step_variables(&self) -> impl Iterator<Item = &Expr> {
        self.members.iter().map(LieOp::variable)
    }

    /// LaTeX rendering: the members' renderings juxtaposed.
    pub fn to_latex(&self) -> String {
        self.members.iter().map(LieOp::to_latex).collect()
    }
}

impl From<LieOp> for OpChain {
    fn from(op: LieOp) -> Self {
        Self::from_op(op)
    }
}

impl fmt::Display for OpChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" * "))
    }
}

impl Mul for LieOp {
    type Output = OpChain;

    fn mul(self, rhs: LieOp) -> OpChain {
        OpChain::new(vec![self, rhs])
    }
}

impl Mul<OpChain> for LieOp {
    type Output = OpChain;

    fn mul(self, rhs: OpChain) -> OpChain {
        rhs.prepend_op(self)
    }
}

impl Mul<LieOp> for OpChain {
    type Output = OpChain;

    fn mul(self, rhs: LieOp) -> OpChain {
        self.then_op(rhs)
    }
}

impl Mul for OpChain {
    type Output = OpChain;

    fn mul(self, rhs: OpChain) -> OpChain {
        self.concat(rhs)
    }
}
