//! The truncated Lie-transform operator `exp(t:H:)`.
//!
//! For a Hamiltonian `H` that depends only on momenta (or only on
//! positions) the Lie series of `exp(t:H:)` acting on a phase-space
//! function `F` is truncated after the linear term:
//!
//!   exp(t:H:) F = F + t Σ_i g_i ∂F/∂v_i
//!
//! | `H` depends on | `g_i`        | `v_i` |
//! |----------------|--------------|-------|
//! | momenta only   | `−∂H/∂p_i`   | `q_i` |
//! | positions only | `+∂H/∂q_i`   | `p_i` |
//!
//! The result is exact when `F` is linear in the `v_i`, and first order in
//! `t` otherwise. Only the `v_i` whose conjugate actually occurs in `H`
//! (the dependence set) are differentiated; if `F` involves none of them
//! the operator is the identity.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use lieflow_expr::{Expr, Symbol};
use tracing::{debug, trace};

use crate::chain::OpChain;
use crate::error::{OpsError, OpsResult};
use crate::operand::{Exponent, Operand};
use crate::phase_space::{Family, PhaseSpace};

/// `exp(t:H:)` for one separable Hamiltonian `H` and step expression `t`.
///
/// The gradient and dependence set are computed once, at construction, and
/// shared between every copy produced by [`LieOp::with_variable`].
#[derive(Debug, Clone, PartialEq)]
pub struct LieOp {
    variable: Expr,
    hamiltonian: Arc<Expr>,
    space: PhaseSpace,
    family: Family,
    gradient: Arc<Vec<Expr>>,
    dependence: Arc<BTreeSet<Symbol>>,
}

impl LieOp {
    /// Build `exp(variable :hamiltonian:)` over `space`.
    ///
    /// Symbols of `hamiltonian` outside the phase space (e.g. `beta_0`) are
    /// treated as parameters. Fails with [`OpsError::Separability`] if the
    /// phase-space symbols of `hamiltonian` span both families or are absent.
    ///
    /// ```rust
    /// use lieflow_expr::{parse, Expr};
    /// use lieflow_ops::{LieOp, PhaseSpace};
    ///
    /// let space = PhaseSpace::from_names("x s", "p_x p_s").unwrap();
    /// let drift = LieOp::new(Expr::symbol("L"), parse("p_x^2/2").unwrap(), &space).unwrap();
    /// assert_eq!(drift.apply(&Expr::symbol("x")), parse("x - L*p_x").unwrap());
    /// ```
    pub fn new(variable: Expr, hamiltonian: Expr, space: &PhaseSpace) -> OpsResult<Self> {
        let family = Self::classify(&hamiltonian, space)?;
        let conjugate = family.conjugate();

        let gradient: Vec<Expr> = match family {
            Family::Momentum => space.momenta().iter().map(|p| -hamiltonian.diff(p)).collect(),
            Family::Position => space.positions().iter().map(|q| hamiltonian.diff(q)).collect(),
        };
        let dependence = dependent_conjugates(&hamiltonian, space, family);

        debug!(
            %hamiltonian,
            depends_on = %family,
            corrects = %conjugate,
            n_dependent = dependence.len(),
            "built Lie operator"
        );

        Ok(Self {
            variable,
            hamiltonian: Arc::new(hamiltonian),
            space: space.clone(),
            family,
            gradient: Arc::new(gradient),
            dependence: Arc::new(dependence),
        })
    }

    /// Decide which family the phase-space symbols of `hamiltonian` belong to.
    fn classify(hamiltonian: &Expr, space: &PhaseSpace) -> OpsResult<Family> {
        let mut family = None;
        for symbol in hamiltonian.free_symbols() {
            let Some((f, _)) = space.locate(&symbol) else {
                continue;
            };
            match family {
                None => family = Some(f),
                Some(seen) if seen != f => {
                    return Err(OpsError::Separability {
                        hamiltonian: hamiltonian.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        family.ok_or_else(|| OpsError::Separability {
            hamiltonian: hamiltonian.to_string(),
        })
    }

    /// The step-size expression `t`.
    pub fn variable(&self) -> &Expr {
        &self.variable
    }

    /// The Hamiltonian `H`, shared with every copy of this operator.
    pub fn hamiltonian(&self) -> &Arc<Expr> {
        &self.hamiltonian
    }

    /// The phase space the operator acts on.
    pub fn space(&self) -> &PhaseSpace {
        &self.space
    }

    /// The family `H` depends on.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The signed gradient `g_i`, indexed like the phase-space pairs.
    pub fn gradient(&self) -> &[Expr] {
        &self.gradient
    }

    /// Variables of the conjugate family that receive a correction.
    pub fn dependence(&self) -> &BTreeSet<Symbol> {
        &self.dependence
    }

    /// Apply the operator to a scalar expression.
    pub fn apply(&self, target: &Expr) -> Expr {
        let hit: BTreeSet<Symbol> = target
            .free_symbols()
            .intersection(&self.dependence)
            .cloned()
            .collect();
        if hit.is_empty() {
            trace!(%target, "operator acts as identity");
            return target.clone();
        }

        let targets = self.space.family(self.family.conjugate());
        let correction = Expr::add(
            targets
                .iter()
                .zip(self.gradient.iter())
                .filter(|(v, _)| hit.contains(*v))
                .map(|(v, g)| g.clone() * target.diff(v)),
        );
        target.clone() + self.variable.clone() * correction
    }

    /// Apply the operator element-wise to a vector of expressions.
    pub fn apply_all(&self, targets: &[Expr]) -> Vec<Expr> {
        targets.iter().map(|t| self.apply(t)).collect()
    }

    /// A copy with the step expression replaced; everything else is shared.
    #[must_use]
    pub fn with_variable(&self, variable: Expr) -> Self {
        Self {
            variable,
            ..self.clone()
        }
    }

    /// A copy whose step expression has `symbol` replaced by `value`.
    #[must_use]
    pub fn substitute_step(&self, symbol: &Symbol, value: &Expr) -> Self {
        self.with_variable(self.variable.subs(symbol, value))
    }

    /// `self ** n`: the identity for `n = 0`, otherwise a chain of `n` copies.
    pub fn pow(&self, exponent: impl Into<Exponent>) -> OpsResult<Operand> {
        OpChain::from_op(self.clone()).pow(exponent)
    }

    /// LaTeX rendering, `\operatorname{exp}{\left( t:H: \right)}`.
    pub fn to_latex(&self) -> String {
        format!(
            "\\operatorname{{exp}}{{\\left( {}:{}: \\right)}}",
            self.variable.to_latex(),
            self.hamiltonian.to_latex()
        )
    }
}

/// Conjugates of the phase-space symbols of family `family` that occur in `h`.
fn dependent_conjugates(h: &Expr, space: &PhaseSpace, family: Family) -> BTreeSet<Symbol> {
    let own = space.family(family);
    let other = space.family(family.conjugate());
    own.iter()
        .zip(other)
        .filter(|(v, _)| h.contains(v))
        .map(|(_, c)| c.clone())
        .collect()
}

impl fmt::Display for LieOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp({}:{}:)", self.variable, self.hamiltonian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lieflow_expr::parse;

    fn space() -> PhaseSpace {
        PhaseSpace::from_names("x s", "p_x p_s").unwrap()
    }

    fn e(src: &str) -> Expr {
        parse(src).unwrap()
    }

    #[test]
    fn test_momentum_hamiltonian_corrects_positions() {
        let op = LieOp::new(e("L"), e("p_x^2/2"), &space()).unwrap();
        assert_eq!(op.family(), Family::Momentum);
        let dep: Vec<&str> = op.dependence().iter().map(Symbol::name).collect();
        assert_eq!(dep, vec!["x"]);
        assert_eq!(op.gradient(), &[e("-p_x"), Expr::zero()]);
    }

    #[test]
    fn test_position_hamiltonian_corrects_momenta() {
        let op = LieOp::new(e("t"), e("k*x^2/2"), &space()).unwrap();
        assert_eq!(op.family(), Family::Position);
        assert_eq!(op.apply(&e("p_x")), e("p_x + t*k*x"));
        assert_eq!(op.apply(&e("x")), e("x"));
    }

    #[test]
    fn test_parameters_do_not_break_separability() {
        let op = LieOp::new(e("L"), e("p_x^2/(2*(1/beta_0 + delta_0))"), &space());
        assert!(op.is_ok());
    }

    #[test]
    fn test_mixed_hamiltonian_rejected() {
        let err = LieOp::new(e("L"), e("x*p_x"), &space()).unwrap_err();
        assert!(matches!(err, OpsError::Separability { .. }));
    }

    #[test]
    fn test_constant_hamiltonian_rejected() {
        assert!(matches!(
            LieOp::new(e("L"), e("beta_0"), &space()),
            Err(OpsError::Separability { .. })
        ));
    }

    #[test]
    fn test_with_variable_shares_hamiltonian() {
        let op = LieOp::new(e("ds"), e("p_s"), &space()).unwrap();
        let copy = op.with_variable(e("2*ds"));
        assert!(Arc::ptr_eq(op.hamiltonian(), copy.hamiltonian()));
        assert_eq!(op.variable(), &e("ds"));
        assert_eq!(copy.variable(), &e("2*ds"));
    }

    #[test]
    fn test_substitute_step() {
        let op = LieOp::new(e("-ds/4"), e("p_s"), &space()).unwrap();
        let scaled = op.substitute_step(&Symbol::new("ds"), &e("3*ds"));
        assert_eq!(scaled.variable(), &e("-0.75*ds"));
    }

    #[test]
    fn test_display() {
        let op = LieOp::new(e("L"), e("p_s"), &space()).unwrap();
        assert_eq!(op.to_string(), "exp(L:p_s:)");
        assert_eq!(
            op.to_latex(),
            "\\operatorname{exp}{\\left( L:p_{s}: \\right)}"
        );
    }
}
