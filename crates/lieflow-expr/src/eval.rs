//! Substitution and numeric evaluation.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::error::{ExprError, ExprResult};
use crate::expr::Expr;
use crate::symbol::Symbol;

impl Expr {
    /// Replace every occurrence of `symbol` by `value`, returning a new expression.
    pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Expr {
        if !self.contains(symbol) {
            return self.clone();
        }
        match self {
            Expr::Symbol(s) if s == symbol => value.clone(),
            _ => self.map_children(|child| child.subs(symbol, value)),
        }
    }

    /// Simultaneous substitution of several symbols.
    ///
    /// Replacements are not re-substituted, so `{x: y, y: x}` swaps the two.
    pub fn subs_all(&self, map: &BTreeMap<Symbol, Expr>) -> Expr {
        match self {
            Expr::Number(_) => self.clone(),
            Expr::Symbol(s) => map.get(s).cloned().unwrap_or_else(|| self.clone()),
            _ => self.map_children(|child| child.subs_all(map)),
        }
    }

    /// Evaluate numerically with the given symbol values.
    pub fn evaluate(&self, bindings: &FxHashMap<Symbol, f64>) -> ExprResult<f64> {
        let value = match self {
            Expr::Number(v) => *v,
            Expr::Symbol(s) => *bindings
                .get(s)
                .ok_or_else(|| ExprError::UnboundSymbol(s.clone()))?,
            Expr::Add(terms) => {
                let mut sum = 0.0;
                for term in terms {
                    sum += term.evaluate(bindings)?;
                }
                sum
            }
            Expr::Mul(factors) => {
                let mut product = 1.0;
                for factor in factors {
                    product *= factor.evaluate(bindings)?;
                }
                product
            }
            Expr::Pow(base, exp) => {
                let b = base.evaluate(bindings)?;
                let e = exp.evaluate(bindings)?;
                if e.fract() == 0.0 && e.abs() <= f64::from(i32::MAX) {
                    #[allow(clippy::cast_possible_truncation)]
                    b.powi(e as i32)
                } else {
                    b.powf(e)
                }
            }
            Expr::Func(f, arg) => f.eval(arg.evaluate(bindings)?),
        };
        if !value.is_finite() {
            return Err(ExprError::NonFinite {
                expr: self.to_string(),
            });
        }
        Ok(value)
    }
}
