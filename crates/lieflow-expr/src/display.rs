//! Plain-text and LaTeX rendering of expressions.

use std::fmt;

use crate::expr::{Expr, Function};
use crate::symbol::Symbol;

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega",
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Latex,
}

struct Printer {
    style: Style,
}

impl Printer {
    fn expr(&self, e: &Expr) -> String {
        match e {
            Expr::Number(v) => format!("{v}"),
            Expr::Symbol(s) => self.symbol(s),
            Expr::Add(terms) => self.sum(terms),
            Expr::Mul(_) | Expr::Pow(..) => self.product(e),
            Expr::Func(f, arg) => self.func(*f, arg),
        }
    }

    fn symbol(&self, s: &Symbol) -> String {
        match self.style {
            Style::Plain => s.name().to_string(),
            Style::Latex => latex_symbol(s.name()),
        }
    }

    /// Constants are printed last; negative terms become subtractions.
    fn sum(&self, terms: &[Expr]) -> String {
        let ordered = terms
            .iter()
            .filter(|t| !t.is_number())
            .chain(terms.iter().filter(|t| t.is_number()));

        let mut out = String::new();
        for (i, term) in ordered.enumerate() {
            if i == 0 {
                out.push_str(&self.expr(term));
            } else if term.coefficient() < 0.0 {
                out.push_str(" - ");
                out.push_str(&self.expr(&-term.clone()));
            } else {
                out.push_str(" + ");
                out.push_str(&self.expr(term));
            }
        }
        out
    }

    /// Products and powers; factors with negative numeric exponents go to the denominator.
    fn product(&self, e: &Expr) -> String {
        let (coeff, factors): (f64, Vec<&Expr>) = match e {
            Expr::Mul(items) => match items.first() {
                Some(Expr::Number(c)) => (*c, items[1..].iter().collect()),
                _ => (1.0, items.iter().collect()),
            },
            other => (1.0, vec![other]),
        };

        let mut numer = Vec::new();
        let mut denom = Vec::new();
        for factor in factors {
            match factor {
                Expr::Pow(base, exp) if exp.as_f64().is_some_and(|v| v < 0.0) => {
                    let positive = -exp.as_ref().clone();
                    denom.push(Expr::pow(base.as_ref().clone(), positive));
                }
                other => numer.push(other.clone()),
            }
        }

        let magnitude = coeff.abs();
        let mut parts: Vec<String> = Vec::new();
        if magnitude != 1.0 {
            parts.push(format!("{magnitude}"));
        }
        parts.extend(numer.iter().map(|f| self.factor(f)));
        let sep = match self.style {
            Style::Plain => "*",
            Style::Latex => " ",
        };
        let numer_str = if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join(sep)
        };

        let body = if denom.is_empty() {
            numer_str
        } else {
            match self.style {
                Style::Latex => {
                    let denom_str: Vec<String> = denom.iter().map(|f| self.factor(f)).collect();
                    format!("\\frac{{{numer_str}}}{{{}}}", denom_str.join(sep))
                }
                Style::Plain => {
                    let denom_str: Vec<String> = denom.iter().map(|f| self.factor(f)).collect();
                    if denom_str.len() > 1 {
                        format!("{numer_str}/({})", denom_str.join(sep))
                    } else {
                        format!("{numer_str}/{}", denom_str[0])
                    }
                }
            }
        };

        if coeff < 0.0 { format!("-{body}") } else { body }
    }

    fn factor(&self, e: &Expr) -> String {
        match e {
            Expr::Add(_) | Expr::Mul(_) => self.paren(&self.expr(e)),
            Expr::Number(v) if *v < 0.0 => self.paren(&self.expr(e)),
            Expr::Pow(base, exp) => self.power(base, exp),
            _ => self.expr(e),
        }
    }

    fn power(&self, base: &Expr, exp: &Expr) -> String {
        let base_str = match base {
            Expr::Symbol(_) | Expr::Func(..) => self.expr(base),
            Expr::Number(v) if *v >= 0.0 => self.expr(base),
            _ => self.paren(&self.expr(base)),
        };
        match self.style {
            Style::Latex => format!("{base_str}^{{{}}}", self.expr(exp)),
            Style::Plain => match exp {
                Expr::Symbol(_) => format!("{base_str}^{}", self.expr(exp)),
                Expr::Number(v) if *v >= 0.0 => format!("{base_str}^{}", self.expr(exp)),
                _ => format!("{base_str}^{}", self.paren(&self.expr(exp))),
            },
        }
    }

    fn func(&self, f: Function, arg: &Expr) -> String {
        let inner = self.expr(arg);
        match self.style {
            Style::Plain => format!("{}({inner})", f.name()),
            Style::Latex => {
                let name = match f {
                    Function::Exp => "\\exp",
                    Function::Ln => "\\log",
                    Function::Sin => "\\sin",
                    Function::Cos => "\\cos",
                };
                format!("{name}{{\\left({inner} \\right)}}")
            }
        }
    }

    fn paren(&self, inner: &str) -> String {
        match self.style {
            Style::Plain => format!("({inner})"),
            Style::Latex => format!("\\left({inner}\\right)"),
        }
    }
}

/// Render a symbol name as LaTeX: greek names become commands and the
/// part after the first underscore becomes a subscript.
fn latex_symbol(name: &str) -> String {
    if name.starts_with('\\') {
        return name.to_string();
    }
    let (head, sub) = match name.split_once('_') {
        Some((h, s)) if !h.is_empty() && !s.is_empty() => (h, Some(s)),
        _ => (name, None),
    };
    let head = if GREEK.contains(&head) {
        format!("\\{head}")
    } else {
        head.to_string()
    };
    match sub {
        Some(s) => format!("{head}_{{{}}}", latex_symbol(s)),
        None => head,
    }
}

impl Expr {
    /// LaTeX rendering of the expression.
    pub fn to_latex(&self) -> String {
        Printer {
            style: Style::Latex,
        }
        .expr(self)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            &Printer {
                style: Style::Plain,
            }
            .expr(self),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_plain_subtraction() {
        let e = sym("x") - sym("L") * sym("p_x");
        assert_eq!(e.to_string(), "x - L*p_x");
    }

    #[test]
    fn test_plain_constant_last() {
        let e = Expr::from(1.0) + sym("x");
        assert_eq!(e.to_string(), "x + 1");
    }

    #[test]
    fn test_plain_division() {
        let e = sym("p_x") / (sym("delta") + sym("b"));
        assert_eq!(e.to_string(), "p_x/(b + delta)");
    }

    #[test]
    fn test_plain_power() {
        let e = Expr::pow(sym("x"), Expr::from(2.0));
        assert_eq!(e.to_string(), "x^2");
        assert_eq!(Expr::sqrt(sym("x")).to_string(), "x^0.5");
    }

    #[test]
    fn test_latex_symbols() {
        assert_eq!(latex_symbol("beta_0"), "\\beta_{0}");
        assert_eq!(latex_symbol("p_x"), "p_{x}");
        assert_eq!(latex_symbol("delta"), "\\delta");
    }

    #[test]
    fn test_latex_fraction() {
        let e = sym("p_x") / sym("delta");
        assert_eq!(e.to_latex(), "\\frac{p_{x}}{\\delta}");
    }
}
