//! Differentiation, expansion and polynomial integration.

use crate::error::{ExprError, ExprResult};
use crate::expr::{Expr, Function};
use crate::symbol::Symbol;

impl Expr {
    /// Partial derivative with respect to `var`.
    pub fn diff(&self, var: &Symbol) -> Expr {
        if !self.contains(var) {
            return Expr::zero();
        }
        match self {
            Expr::Number(_) => Expr::zero(),
            Expr::Symbol(s) => {
                if s == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::add(terms.iter().map(|t| t.diff(var))),
            Expr::Mul(factors) => Expr::add(
                factors
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| f.contains(var))
                    .map(|(i, f)| {
                        let others = factors
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, g)| g.clone());
                        Expr::mul(others.chain(std::iter::once(f.diff(var))))
                    }),
            ),
            Expr::Pow(base, exp) => {
                let base = base.as_ref();
                let exp = exp.as_ref();
                if !exp.contains(var) {
                    // d(b^n) = n b^(n-1) b'
                    let lowered = Expr::pow(base.clone(), exp.clone() - Expr::one());
                    Expr::mul([exp.clone(), lowered, base.diff(var)])
                } else if !base.contains(var) {
                    // d(a^e) = a^e ln(a) e'
                    Expr::mul([self.clone(), Expr::ln(base.clone()), exp.diff(var)])
                } else {
                    let log_term = exp.diff(var) * Expr::ln(base.clone());
                    let ratio_term = exp.clone() * base.diff(var) / base.clone();
                    Expr::mul([self.clone(), log_term + ratio_term])
                }
            }
            Expr::Func(f, arg) => {
                let inner = arg.diff(var);
                let arg = arg.as_ref().clone();
                let outer = match f {
                    Function::Exp => Expr::exp(arg),
                    Function::Ln => Expr::pow(arg, Expr::number(-1.0)),
                    Function::Sin => Expr::cos(arg),
                    Function::Cos => -Expr::sin(arg),
                };
                Expr::mul([outer, inner])
            }
        }
    }

    /// Distribute products over sums and expand positive integer powers of sums.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Number(_) | Expr::Symbol(_) => self.clone(),
            Expr::Add(terms) => Expr::add(terms.iter().map(Expr::expand)),
            Expr::Mul(factors) => factors
                .iter()
                .map(Expr::expand)
                .fold(Expr::one(), |acc, f| distribute(&acc, &f)),
            Expr::Pow(base, exp) => {
                let base = base.expand();
                match (&base, exp.as_f64()) {
                    (Expr::Add(_), Some(n)) if n > 0.0 && n.fract() == 0.0 => {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let n = n as u32;
                        (0..n).fold(Expr::one(), |acc, _| distribute(&acc, &base))
                    }
                    _ => Expr::pow(base, exp.expand()),
                }
            }
            Expr::Func(f, arg) => Expr::func(*f, arg.expand()),
        }
    }

    /// Antiderivative with respect to `var` (integration constant zero).
    ///
    /// Handles expressions that expand into sums of `c · var^n` with `c`
    /// free of `var`; `n = -1` integrates to `c · ln(var)`.
    pub fn integrate(&self, var: &Symbol) -> ExprResult<Expr> {
        let expanded = self.expand();
        let terms = match expanded {
            Expr::Add(terms) => terms,
            other => vec![other],
        };

        let mut out = Vec::with_capacity(terms.len());
        for term in terms {
            if !term.contains(var) {
                out.push(term * Expr::Symbol(var.clone()));
                continue;
            }
            let factors = match term {
                Expr::Mul(factors) => factors,
                other => vec![other],
            };
            let mut coeff = Vec::with_capacity(factors.len());
            let mut power = None;
            for factor in factors {
                if !factor.contains(var) {
                    coeff.push(factor);
                    continue;
                }
                let n = match &factor {
                    Expr::Symbol(s) if s == var => 1.0,
                    Expr::Pow(base, exp) if base.as_symbol() == Some(var) => match exp.as_f64() {
                        Some(n) => n,
                        None => return Err(self.unsupported_integrand(var)),
                    },
                    _ => return Err(self.unsupported_integrand(var)),
                };
                if power.replace(n).is_some() {
                    return Err(self.unsupported_integrand(var));
                }
            }
            let n = power.ok_or_else(|| self.unsupported_integrand(var))?;
            let v = Expr::Symbol(var.clone());
            let antiderivative = if n == -1.0 {
                Expr::ln(v)
            } else {
                Expr::mul([Expr::pow(v, Expr::number(n + 1.0)), Expr::number(1.0 / (n + 1.0))])
            };
            coeff.push(antiderivative);
            out.push(Expr::mul(coeff));
        }
        Ok(Expr::add(out))
    }

    /// `∫₀^var self d(var)`, i.e. `F(var) − F(0)`.
    pub fn integrate_from_zero(&self, var: &Symbol) -> ExprResult<Expr> {
        let antiderivative = self.integrate(var)?;
        let at_zero = antiderivative.subs(var, &Expr::zero());
        Ok(antiderivative - at_zero)
    }

    fn unsupported_integrand(&self, var: &Symbol) -> ExprError {
        ExprError::UnsupportedIntegrand {
            integrand: self.to_string(),
            var: var.clone(),
        }
    }
}

/// Product of two expanded expressions, distributing over their terms.
fn distribute(lhs: &Expr, rhs: &Expr) -> Expr {
    let lhs_terms: &[Expr] = match lhs {
        Expr::Add(terms) => terms,
        other => std::slice::from_ref(other),
    };
    let rhs_terms: &[Expr] = match rhs {
        Expr::Add(terms) => terms,
        other => std::slice::from_ref(other),
    };
    Expr::add(
        lhs_terms
            .iter()
            .flat_map(|a| rhs_terms.iter().map(move |b| Expr::mul([a.clone(), b.clone()]))),
    )
}
