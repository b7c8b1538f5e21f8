//! Declarative integrator configuration.
//!
//! An [`IntegratorConfig`] describes a phase space, a product of Lie
//! factors written in operator order (leftmost acts last), an optional
//! Yoshida order increase and the substitutions that make the resulting
//! map concrete.
//!
//! ```yaml
//! positions: [x]
//! momenta: [p]
//! step: h
//! order_increase: 2
//! factors:
//!   - { step: "h/2", hamiltonian: "p^2/2" }
//!   - { step: "h",   hamiltonian: "x^2/2" }
//!   - { step: "h/2", hamiltonian: "p^2/2" }
//! substitutions: { h: 0.1 }
//! evaluate:
//!   state: [1.0, 0.0]
//!   turns: 10
//! ```

use std::collections::BTreeMap;

use lieflow_expr::{Expr, Symbol, parse};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::OpChain;
use crate::error::{OpsError, OpsResult};
use crate::operand::Operand;
use crate::phase_space::PhaseSpace;
use crate::transfer::TransferMap;
use crate::yoshida::yoshida_integrator;

/// An expression written either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprSource {
    /// A numeric literal.
    Number(f64),
    /// Expression text, parsed with [`lieflow_expr::parse`].
    Text(String),
}

impl ExprSource {
    /// Parse into an expression.
    pub fn to_expr(&self) -> OpsResult<Expr> {
        match self {
            ExprSource::Number(v) => Ok(Expr::number(*v)),
            ExprSource::Text(s) => Ok(parse(s)?),
        }
    }
}

impl From<&str> for ExprSource {
    fn from(s: &str) -> Self {
        ExprSource::Text(s.to_string())
    }
}

/// One factor `exp(step :hamiltonian:)` of the base integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactorConfig {
    /// Step expression, usually a multiple of the step symbol.
    pub step: ExprSource,
    /// Separable Hamiltonian.
    pub hamiltonian: ExprSource,
}

/// Optional numeric tracking of one particle through the built map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateConfig {
    /// Initial state, positions then momenta.
    pub state: Vec<f64>,
    /// Values of the remaining parameters.
    #[serde(default)]
    pub params: BTreeMap<Symbol, f64>,
    /// Number of map applications.
    #[serde(default = "default_turns")]
    pub turns: usize,
}

/// Configuration for building an integrator and its transfer map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegratorConfig {
    /// Position symbols.
    pub positions: Vec<Symbol>,
    /// Momentum symbols, paired with `positions` by index.
    pub momenta: Vec<Symbol>,
    /// Step symbol scaled by the Yoshida composition.
    pub step: Symbol,
    /// Order of the integrator given by `factors`.
    #[serde(default = "default_base_order")]
    pub base_order: u32,
    /// Order increase; 0 keeps the base integrator.
    #[serde(default)]
    pub order_increase: u32,
    /// Factors of the base integrator, leftmost acts last.
    pub factors: Vec<FactorConfig>,
    /// Symbol values; the step symbol is substituted after composition.
    #[serde(default)]
    pub substitutions: BTreeMap<Symbol, ExprSource>,
    /// Number of map repetitions folded into the transfer map.
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Optional numeric tracking.
    #[serde(default)]
    pub evaluate: Option<EvaluateConfig>,
}

fn default_base_order() -> u32 {
    2
}

fn default_steps() -> u32 {
    1
}

fn default_turns() -> usize {
    1
}

/// Result of [`IntegratorConfig::build`].
#[derive(Debug, Clone)]
pub struct BuiltIntegrator {
    /// The (possibly raised) integrator, still in the step symbol.
    pub chain: OpChain,
    /// Order of `chain`.
    pub order: u32,
    /// The transfer map after substitutions and repetitions.
    pub map: TransferMap,
    /// States after every tracked turn, if tracking was configured.
    pub tracking: Option<Vec<Vec<f64>>>,
}

impl IntegratorConfig {
    /// Build the integrator, its transfer map and the optional tracking.
    pub fn build(&self) -> OpsResult<BuiltIntegrator> {
        if self.steps == 0 {
            return Err(OpsError::InvalidSteps(self.steps));
        }
        let space = PhaseSpace::new(self.positions.clone(), self.momenta.clone())?;

        let mut params = BTreeMap::new();
        let mut step_value = None;
        for (symbol, source) in &self.substitutions {
            let value = source.to_expr()?;
            if *symbol == self.step {
                step_value = Some(value);
            } else {
                params.insert(symbol.clone(), value);
            }
        }

        let mut product = Operand::Identity;
        for factor in &self.factors {
            let step = factor.step.to_expr()?.subs_all(&params);
            let hamiltonian = factor.hamiltonian.to_expr()?.subs_all(&params);
            product = product.compose(Operand::lie(step, hamiltonian, &space)?)?;
        }
        let mut chain = product.into_chain().unwrap_or_default();

        let order = self
            .base_order
            .checked_add(self.order_increase)
            .ok_or(OpsError::OrderOverflow {
                base: self.base_order,
                increase: self.order_increase,
            })?;
        if self.order_increase > 0 {
            chain = yoshida_integrator(&chain, self.base_order, &self.step, self.order_increase)?;
        }
        debug!(
            factors = self.factors.len(),
            members = chain.len(),
            order,
            "built integrator from config"
        );

        let stepped = match &step_value {
            Some(value) => chain.rescale_step(&self.step, value),
            None => chain.clone(),
        };
        let map = TransferMap::from_operand(&space, stepped.pow(self.steps)?)?;

        let tracking = match &self.evaluate {
            Some(eval) => {
                let params: FxHashMap<Symbol, f64> =
                    eval.params.iter().map(|(k, v)| (k.clone(), *v)).collect();
                Some(map.track(&eval.state, &params, eval.turns)?)
            }
            None => None,
        };

        Ok(BuiltIntegrator {
            chain,
            order,
            map,
            tracking,
        })
    }
}
