//! Canonical position/momentum variable sets.
//!
//! A [`PhaseSpace`] pairs position `q_i` with momentum `p_i` by index. It is
//! cheap to clone: every operator built on the same phase space shares one
//! allocation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use lieflow_expr::{Expr, Symbol, symbols};

use crate::error::{OpsError, OpsResult};

/// Which half of phase space a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Generalised coordinates `q_i`.
    Position,
    /// Conjugate momenta `p_i`.
    Momentum,
}

impl Family {
    /// The other family.
    pub fn conjugate(self) -> Self {
        match self {
            Family::Position => Family::Momentum,
            Family::Momentum => Family::Position,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Position => write!(f, "position"),
            Family::Momentum => write!(f, "momentum"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Variables {
    positions: Vec<Symbol>,
    momenta: Vec<Symbol>,
}

/// Index-paired position and momentum symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSpace {
    vars: Arc<Variables>,
}

impl PhaseSpace {
    /// Create a phase space from paired position and momentum symbols.
    ///
    /// Fails if the lists differ in length, are empty, or share a symbol.
    pub fn new(positions: Vec<Symbol>, momenta: Vec<Symbol>) -> OpsResult<Self> {
        if positions.len() != momenta.len() {
            return Err(OpsError::PhaseSpaceMismatch {
                positions: positions.len(),
                momenta: momenta.len(),
            });
        }
        if positions.is_empty() {
            return Err(OpsError::EmptyPhaseSpace);
        }
        let mut seen = BTreeSet::new();
        for symbol in positions.iter().chain(&momenta) {
            if !seen.insert(symbol) {
                return Err(OpsError::OverlappingVariables(symbol.clone()));
            }
        }
        Ok(Self {
            vars: Arc::new(Variables { positions, momenta }),
        })
    }

    /// Phase space from lists known to be valid (fixed coordinate systems).
    pub(crate) fn from_valid(positions: Vec<Symbol>, momenta: Vec<Symbol>) -> Self {
        debug_assert_eq!(positions.len(), momenta.len());
        Self {
            vars: Arc::new(Variables { positions, momenta }),
        }
    }

    /// Create a phase space from whitespace- or comma-separated names.
    ///
    /// ```rust
    /// use lieflow_ops::PhaseSpace;
    ///
    /// let space = PhaseSpace::from_names("x s", "p_x p_s").unwrap();
    /// assert_eq!(space.dim(), 2);
    /// ```
    pub fn from_names(positions: &str, momenta: &str) -> OpsResult<Self> {
        Self::new(symbols(positions), symbols(momenta))
    }

    /// Position symbols, in pairing order.
    pub fn positions(&self) -> &[Symbol] {
        &self.vars.positions
    }

    /// Momentum symbols, in pairing order.
    pub fn momenta(&self) -> &[Symbol] {
        &self.vars.momenta
    }

    /// Number of degrees of freedom (position/momentum pairs).
    pub fn dim(&self) -> usize {
        self.vars.positions.len()
    }

    /// Symbols of one family.
    pub fn family(&self, family: Family) -> &[Symbol] {
        match family {
            Family::Position => self.positions(),
            Family::Momentum => self.momenta(),
        }
    }

    /// Family and pairing index of a phase-space symbol.
    pub fn locate(&self, symbol: &Symbol) -> Option<(Family, usize)> {
        if let Some(i) = self.positions().iter().position(|q| q == symbol) {
            return Some((Family::Position, i));
        }
        self.momenta()
            .iter()
            .position(|p| p == symbol)
            .map(|i| (Family::Momentum, i))
    }

    /// The variable paired with `symbol`, if `symbol` is in this phase space.
    pub fn conjugate_of(&self, symbol: &Symbol) -> Option<&Symbol> {
        let (family, i) = self.locate(symbol)?;
        self.family(family.conjugate()).get(i)
    }

    /// True if `symbol` is a position or a momentum.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.locate(symbol).is_some()
    }

    /// All variables, positions first.
    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.positions().iter().chain(self.momenta())
    }

    /// The state vector `[q_1, …, q_n, p_1, …, p_n]` as expressions.
    pub fn state_vector(&self) -> Vec<Expr> {
        self.variables().map(Expr::from).collect()
    }
}

impl fmt::Display for PhaseSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .positions()
            .iter()
            .zip(self.momenta())
            .map(|(q, p)| format!("({q}, {p})"))
            .collect();
        write!(f, "[{}]", pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths() {
        let err = PhaseSpace::from_names("x y", "p_x").unwrap_err();
        assert!(matches!(
            err,
            OpsError::PhaseSpaceMismatch {
                positions: 2,
                momenta: 1
            }
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            PhaseSpace::from_names("", ""),
            Err(OpsError::EmptyPhaseSpace)
        ));
    }

    #[test]
    fn test_overlap() {
        let err = PhaseSpace::from_names("x y", "p_x x").unwrap_err();
        assert!(matches!(err, OpsError::OverlappingVariables(s) if s.name() == "x"));
    }

    #[test]
    fn test_conjugates() {
        let space = PhaseSpace::from_names("x y z s", "p_x p_y delta p_s").unwrap();
        assert_eq!(space.conjugate_of(&Symbol::new("z")).unwrap().name(), "delta");
        assert_eq!(space.conjugate_of(&Symbol::new("p_s")).unwrap().name(), "s");
        assert!(space.conjugate_of(&Symbol::new("beta_0")).is_none());
        assert_eq!(
            space.locate(&Symbol::new("p_y")),
            Some((Family::Momentum, 1))
        );
    }

    #[test]
    fn test_state_vector_order() {
        let space = PhaseSpace::from_names("x s", "p_x p_s").unwrap();
        let names: Vec<String> = space.state_vector().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["x", "s", "p_x", "p_s"]);
        assert_eq!(space.to_string(), "[(x, p_x), (s, p_s)]");
    }

    #[test]
    fn test_clones_share_storage() {
        let a = PhaseSpace::from_names("x", "p").unwrap();
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.vars, &b.vars));
    }
}
