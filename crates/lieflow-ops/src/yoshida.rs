//! Yoshida order-raising composition.
//!
//! Given a symmetric integrator `S_n(τ)` accurate to even order `n`, the
//! triple product
//!
//! ```text
//! S_{n+2}(τ) = S_n(x₁ τ) · S_n(x₀ τ) · S_n(x₁ τ)
//!
//! x₀ = −2^(1/(n+1)) / (2 − 2^(1/(n+1)))
//! x₁ =            1 / (2 − 2^(1/(n+1)))
//! ```
//!
//! is accurate to order `n + 2`. Since `2x₁ + x₀ = 1` the total step is
//! unchanged; the middle stage runs backwards.
//!
//! Each stage triples the member count, so raising by `Δ` multiplies it by
//! `3^(Δ/2)`.

use lieflow_expr::{Expr, Symbol};
use tracing::debug;

use crate::chain::{OpChain, repeated_len};
use crate::error::{OpsError, OpsResult};

/// Raises the order of a base integrator by Yoshida composition.
#[derive(Debug, Clone)]
pub struct YoshidaComposer {
    base: OpChain,
    base_order: u32,
    step: Symbol,
}

impl YoshidaComposer {
    /// Create a composer for `base`, an integrator of order `base_order` in
    /// the step symbol `step`.
    pub fn new(base: OpChain, base_order: u32, step: Symbol) -> Self {
        Self {
            base,
            base_order,
            step,
        }
    }

    /// The integrator being raised.
    pub fn base(&self) -> &OpChain {
        &self.base
    }

    /// Order of the base integrator.
    pub fn base_order(&self) -> u32 {
        self.base_order
    }

    /// The `(x₀, x₁)` coefficients for the stage that raises order `n` to `n + 2`.
    pub fn coefficients(n: u32) -> (f64, f64) {
        let root = 2f64.powf(1.0 / (f64::from(n) + 1.0));
        let x0 = -root / (2.0 - root);
        let x1 = 1.0 / (2.0 - root);
        (x0, x1)
    }

    /// The integrator of order `base_order + order_increase`.
    pub fn raise(&self, order_increase: u32) -> OpsResult<OpChain> {
        let mut stages = self.stages(order_increase)?;
        // stages() always yields at least the base.
        Ok(stages.pop().unwrap_or_else(|| self.base.clone()))
    }

    /// The integrators of orders `base_order, base_order + 2, …, base_order + order_increase`.
    pub fn raise_all(&self, order_increase: u32) -> OpsResult<Vec<OpChain>> {
        self.stages(order_increase)
    }

    fn stages(&self, order_increase: u32) -> OpsResult<Vec<OpChain>> {
        if order_increase == 0 || order_increase % 2 != 0 || self.base_order % 2 != 0 {
            return Err(OpsError::OddOrder {
                base: self.base_order,
                increase: order_increase,
            });
        }

        let target = self
            .base_order
            .checked_add(order_increase)
            .ok_or(OpsError::OrderOverflow {
                base: self.base_order,
                increase: order_increase,
            })?;
        // Steps are rescaled by substitution, so at least one must contain the step symbol.
        if !self.base.step_variables().any(|v| v.contains(&self.step)) {
            return Err(OpsError::StepNotInChain(self.step.clone()));
        }

        let tau = Expr::from(&self.step);
        let mut stages = vec![self.base.clone()];
        let mut current = self.base.clone();
        for n in (self.base_order..target).step_by(2) {
            repeated_len(current.len(), 3)?;
            let (x0, x1) = Self::coefficients(n);
            let outer = current.rescale_step(&self.step, &(Expr::number(x1) * tau.clone()));
            let inner = current.rescale_step(&self.step, &(Expr::number(x0) * tau.clone()));
            current = outer.clone().concat(inner).concat(outer);
            debug!(
                order = n + 2,
                members = current.len(),
                x0,
                x1,
                "raised integrator order"
            );
            stages.push(current.clone());
        }
        Ok(stages)
    }
}

/// Raise `base`, an integrator of order `base_order` in `step`, by `order_increase`.
pub fn yoshida_integrator(
    base: &OpChain,
    base_order: u32,
    step: &Symbol,
    order_increase: u32,
) -> OpsResult<OpChain> {
    YoshidaComposer::new(base.clone(), base_order, step.clone()).raise(order_increase)
}
