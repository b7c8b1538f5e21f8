//! Symbolic one-step transfer maps.

use std::collections::BTreeMap;
use std::fmt;

use lieflow_expr::{Expr, Symbol};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{OpsError, OpsResult};
use crate::operand::Operand;
use crate::phase_space::{Family, PhaseSpace};

/// The image of the phase-space state vector under an operator product.
///
/// `components()[i]` is the new value of the `i`-th state variable
/// (positions first, then momenta) in terms of the old ones.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferMap {
    space: PhaseSpace,
    components: Vec<Expr>,
}

impl TransferMap {
    /// The identity map on `space`.
    pub fn identity(space: &PhaseSpace) -> Self {
        Self {
            components: space.state_vector(),
            space: space.clone(),
        }
    }

    /// Apply an operator-like operand to the state vector of `space`, or
    /// take an already applied vector as the map.
    pub fn from_operand(space: &PhaseSpace, operand: Operand) -> OpsResult<Self> {
        let image = match operand {
            Operand::Vector(v) => v,
            other => match other.compose(Operand::Vector(space.state_vector()))? {
                Operand::Vector(v) => v,
                result => {
                    return Err(OpsError::InvalidComposition {
                        lhs: result.kind(),
                        rhs: "transfer map",
                    });
                }
            },
        };
        let expected = 2 * space.dim();
        if image.len() != expected {
            return Err(OpsError::StateDimension {
                expected,
                got: image.len(),
            });
        }
        Ok(Self {
            space: space.clone(),
            components: image,
        })
    }

    /// The phase space of the map.
    pub fn space(&self) -> &PhaseSpace {
        &self.space
    }

    /// Images of the state variables, positions first.
    pub fn components(&self) -> &[Expr] {
        &self.components
    }

    /// Image of one state variable.
    pub fn component(&self, symbol: &Symbol) -> Option<&Expr> {
        let (family, i) = self.space.locate(symbol)?;
        let index = match family {
            Family::Position => i,
            Family::Momentum => self.space.dim() + i,
        };
        self.components.get(index)
    }

    /// Substitute parameters (or step values) in every component.
    #[must_use]
    pub fn substitute(&self, map: &BTreeMap<Symbol, Expr>) -> Self {
        Self {
            space: self.space.clone(),
            components: self.components.iter().map(|c| c.subs_all(map)).collect(),
        }
    }

    /// Numeric image of one phase-space point.
    ///
    /// `state` lists positions then momenta; `params` binds every other symbol.
    pub fn evaluate(&self, state: &[f64], params: &FxHashMap<Symbol, f64>) -> OpsResult<Vec<f64>> {
        let expected = self.components.len();
        if state.len() != expected {
            return Err(OpsError::StateDimension {
                expected,
                got: state.len(),
            });
        }
        let mut bindings = params.clone();
        for (symbol, value) in self.space.variables().zip(state) {
            bindings.insert(symbol.clone(), *value);
        }
        self.components
            .iter()
            .map(|c| c.evaluate(&bindings).map_err(OpsError::from))
            .collect()
    }

    /// Apply the map `turns` times starting from `state`; returns the state after every turn.
    pub fn track(
        &self,
        state: &[f64],
        params: &FxHashMap<Symbol, f64>,
        turns: usize,
    ) -> OpsResult<Vec<Vec<f64>>> {
        let mut history = Vec::new();
        let mut current = state.to_vec();
        for _ in 0..turns {
            current = self.evaluate(&current, params)?;
            history.push(current.clone());
        }
        debug!(turns, dim = self.space.dim(), "tracked particle");
        Ok(history)
    }

    /// LaTeX column vector of the components.
    pub fn to_latex(&self) -> String {
        let rows: Vec<String> = self.components.iter().map(Expr::to_latex).collect();
        format!("\\left[\\begin{{matrix}}{}\\end{{matrix}}\\right]", rows.join("\\\\"))
    }
}

impl fmt::Display for TransferMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (symbol, image)) in self.space.variables().zip(&self.components).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{symbol} -> {image}")?;
        }
        Ok(())
    }
}
