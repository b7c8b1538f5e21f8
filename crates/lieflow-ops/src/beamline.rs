//! Accelerator beam-optics Hamiltonians and their second-order split map.
//!
//! Coordinates follow the usual accelerator convention: transverse
//! positions `x`, `y`, longitudinal `z` and the path length `s`, with
//! conjugate momenta `p_x`, `p_y`, the energy deviation `delta` and `p_s`.
//! The reference particle has velocity `beta_0` and Lorentz factor
//! `gamma_0`; `ds` is the integration step.
//!
//! With a vector potential `A = (a_x, a_y, a_s)` in the gauge `a_x = 0`,
//! the Hamiltonian splits into
//!
//! ```text
//! H1     = −(1/β₀ + δ) + (1/β₀ + δ)⁻¹ / (2β₀²γ₀²) + δ/β₀ + p_x² / (2(1/β₀ + δ)) + p_s
//! H2_bar = p_y² / (2(1/β₀ + δ))
//! H2_Iy  = ∫₀^y a_y dy
//! H3     = −a_s
//! ```
//!
//! each of which depends on positions only or on momenta only.

use lieflow_expr::{Expr, ExprResult, Symbol, parse};
use tracing::debug;

use crate::chain::OpChain;
use crate::error::{OpsError, OpsResult};
use crate::operand::Operand;
use crate::phase_space::PhaseSpace;
use crate::transfer::TransferMap;
use crate::yoshida::yoshida_integrator;

/// Order of [`BeamlineCoordinates::second_order_map`].
pub const BASE_ORDER: u32 = 2;

/// Vector potential components, as functions of `x`, `y` and `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPotential {
    /// Horizontal component.
    pub a_x: Expr,
    /// Vertical component.
    pub a_y: Expr,
    /// Longitudinal component.
    pub a_s: Expr,
}

impl VectorPotential {
    /// Create a potential from its components.
    pub fn new(a_x: Expr, a_y: Expr, a_s: Expr) -> Self {
        Self { a_x, a_y, a_s }
    }

    /// The field-free potential (a drift space).
    pub fn zero() -> Self {
        Self::new(Expr::zero(), Expr::zero(), Expr::zero())
    }

    /// Parse the three components from text.
    pub fn parse(a_x: &str, a_y: &str, a_s: &str) -> ExprResult<Self> {
        Ok(Self::new(parse(a_x)?, parse(a_y)?, parse(a_s)?))
    }

    /// `[a_x, a_y, a_s]`.
    pub fn components(&self) -> [Expr; 3] {
        [self.a_x.clone(), self.a_y.clone(), self.a_s.clone()]
    }
}

/// The standard beamline phase space with its step and reference constants.
#[derive(Debug, Clone)]
pub struct BeamlineCoordinates {
    space: PhaseSpace,
    step: Symbol,
    beta_0: Symbol,
    gamma_0: Symbol,
}

impl BeamlineCoordinates {
    /// Positions `x y z s`, momenta `p_x p_y delta p_s`, step `ds`.
    pub fn standard() -> Self {
        let positions = ["x", "y", "z", "s"].map(Symbol::new).to_vec();
        let momenta = ["p_x", "p_y", "delta", "p_s"].map(Symbol::new).to_vec();
        Self {
            space: PhaseSpace::from_valid(positions, momenta),
            step: Symbol::new("ds"),
            beta_0: Symbol::new("beta_0"),
            gamma_0: Symbol::new("gamma_0"),
        }
    }

    /// The phase space.
    pub fn space(&self) -> &PhaseSpace {
        &self.space
    }

    /// The integration step symbol.
    pub fn step(&self) -> &Symbol {
        &self.step
    }

    /// Reference velocity symbol.
    pub fn beta_0(&self) -> &Symbol {
        &self.beta_0
    }

    /// Reference Lorentz factor symbol.
    pub fn gamma_0(&self) -> &Symbol {
        &self.gamma_0
    }

    fn position(&self, i: usize) -> Expr {
        Expr::from(&self.space.positions()[i])
    }

    fn momentum(&self, i: usize) -> Expr {
        Expr::from(&self.space.momenta()[i])
    }

    /// The positions the vector potential depends on: `[x, y, s]`.
    pub fn potential_positions(&self) -> [Symbol; 3] {
        let q = self.space.positions();
        [q[0].clone(), q[1].clone(), q[3].clone()]
    }

    /// `1/β₀ + δ`.
    fn energy_factor(&self) -> Expr {
        Expr::one() / Expr::from(&self.beta_0) + self.momentum(2)
    }

    /// Drift and energy part `H1`.
    pub fn h1(&self) -> Expr {
        let b = self.energy_factor();
        let beta = Expr::from(&self.beta_0);
        let gamma = Expr::from(&self.gamma_0);
        let delta = self.momentum(2);
        let two = Expr::from(2);

        let rest_energy = Expr::one()
            / (two.clone() * Expr::pow(beta.clone(), two.clone()) * Expr::pow(gamma, two.clone()))
            * Expr::pow(b.clone(), Expr::from(-1));
        let kinetic = Expr::pow(self.momentum(0), two.clone()) / (two * b.clone());

        Expr::add([-b, rest_energy, delta / beta, kinetic, self.momentum(3)])
    }

    /// Vertical kinetic part `H2_bar = p_y² / (2(1/β₀ + δ))`.
    pub fn h2_bar(&self) -> Expr {
        let two = Expr::from(2);
        Expr::pow(self.momentum(1), two.clone()) / (two * self.energy_factor())
    }

    /// Gauge part `H2_Iy = ∫₀^y a_y dy`.
    pub fn h2_iy(&self, a_y: &Expr) -> OpsResult<Expr> {
        Ok(a_y.integrate_from_zero(&self.space.positions()[1])?)
    }

    /// Longitudinal potential part `H3 = −a_s`.
    pub fn h3(&self, a_s: &Expr) -> Expr {
        -a_s.clone()
    }

    /// The symmetric second-order map for one step `ds`:
    ///
    /// ```text
    /// e^{-ds/4:H1:} e^{-ds/2:H3:} e^{-ds/4:H1:} e^{:H2_Iy:} e^{-ds:H2_bar:}
    /// e^{-:H2_Iy:} e^{-ds/4:H1:} e^{-ds/2:H3:} e^{-ds/4:H1:}
    /// ```
    ///
    /// evaluated in the gauge `a_x = 0`. Factors with a constant
    /// Hamiltonian are identities and are left out.
    pub fn second_order_map(&self, potential: &VectorPotential) -> OpsResult<OpChain> {
        let gauged = gauge_transform(&potential.components(), &self.potential_positions(), 0)?;
        let ds = Expr::from(&self.step);
        let space = &self.space;

        let h1 = Operand::lie(Expr::number(-0.25) * ds.clone(), self.h1(), space)?;
        let h3 = Operand::lie(Expr::number(-0.5) * ds.clone(), self.h3(&gauged[2]), space)?;
        let shift = Operand::lie(Expr::one(), self.h2_iy(&gauged[1])?, space)?;
        let unshift = match &shift {
            Operand::Operator(op) => Operand::Operator(op.with_variable(Expr::number(-1.0))),
            other => other.clone(),
        };
        let h2_bar = Operand::lie(-ds, self.h2_bar(), space)?;

        let sequence = [&h1, &h3, &h1, &shift, &h2_bar, &unshift, &h1, &h3, &h1];
        let product = sequence
            .into_iter()
            .try_fold(Operand::Identity, |acc, factor| acc.compose(factor.clone()))?;
        let chain = product.into_chain().unwrap_or_default();

        debug!(members = chain.len(), "built second-order beamline map");
        Ok(chain)
    }

    /// The one-step chain for `steps` slices of `length`, optionally
    /// Yoshida-raised by `order_increase`, with `ds = length / steps`.
    pub fn step_chain(
        &self,
        potential: &VectorPotential,
        length: &Expr,
        steps: u32,
        order_increase: u32,
    ) -> OpsResult<OpChain> {
        if steps == 0 {
            return Err(OpsError::InvalidSteps(steps));
        }
        let mut chain = self.second_order_map(potential)?;
        if order_increase > 0 {
            chain = yoshida_integrator(&chain, BASE_ORDER, &self.step, order_increase)?;
        }
        let delta_sigma = length.clone() / Expr::number(f64::from(steps));
        Ok(chain.rescale_step(&self.step, &delta_sigma))
    }

    /// The transfer map of a beamline element of `length` in `potential`.
    pub fn transfer_map(
        &self,
        potential: &VectorPotential,
        length: &Expr,
        steps: u32,
        order_increase: u32,
    ) -> OpsResult<TransferMap> {
        let chain = self.step_chain(potential, length, steps, order_increase)?;
        let total = chain.pow(steps)?;
        debug!(steps, order = BASE_ORDER.saturating_add(order_increase), "applying beamline map");
        TransferMap::from_operand(&self.space, total)
    }
}

/// Change gauge so that component `to_zero` of the vector potential vanishes.
///
/// With `g = ∫₀^{q_k} A_k dq_k` for `k = to_zero`, every component becomes
/// `A_i − ∂g/∂q_i`; components beyond `positions` are kept.
pub fn gauge_transform(
    components: &[Expr],
    positions: &[Symbol],
    to_zero: usize,
) -> OpsResult<Vec<Expr>> {
    let (Some(a_k), Some(q_k)) = (components.get(to_zero), positions.get(to_zero)) else {
        return Err(OpsError::GaugeIndex {
            index: to_zero,
            len: components.len().min(positions.len()),
        });
    };
    let gauge = a_k.integrate_from_zero(q_k)?;

    Ok(components
        .iter()
        .enumerate()
        .map(|(i, a)| match positions.get(i) {
            _ if i == to_zero => Expr::zero(),
            Some(q) => a.clone() - gauge.diff(q),
            None => a.clone(),
        })
        .collect())
}

/// Lorentz factor `1/√(1 − β²)`.
pub fn beta_to_gamma(beta: f64) -> f64 {
    1.0 / (1.0 - beta * beta).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beta_to_gamma() {
        assert_eq!(beta_to_gamma(0.0), 1.0);
        assert!((beta_to_gamma(0.6) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_hamiltonians_are_separable() {
        let coords = BeamlineCoordinates::standard();
        let space = coords.space();
        let phase: Vec<String> = coords
            .h1()
            .free_symbols()
            .into_iter()
            .filter(|s| space.contains(s))
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(phase, vec!["delta", "p_s", "p_x"]);
        assert!(coords.h2_bar().contains(&Symbol::new("p_y")));
    }

    #[test]
    fn test_gauge_index_out_of_range() {
        let coords = BeamlineCoordinates::standard();
        let components = VectorPotential::zero().components();
        let err = gauge_transform(&components, &coords.potential_positions(), 3).unwrap_err();
        assert!(matches!(err, OpsError::GaugeIndex { index: 3, len: 3 }));
    }
}
