//! Scalar symbolic expressions kept in a canonical form.
//!
//! Every constructor ([`Expr::add`], [`Expr::mul`], [`Expr::pow`],
//! [`Expr::func`] and the arithmetic operator impls) returns its result in
//! canonical form:
//!
//! - nested sums and products are flattened, numeric parts folded;
//! - like terms are collected (`2x + 3x → 5x`) and like bases merged
//!   (`x · x² → x³`);
//! - a lone numeric coefficient distributes over a sum (`2(a + b) → 2a + 2b`);
//! - integer powers distribute over products and compose with inner powers;
//! - operands are sorted by a total order.
//!
//! Two expressions that differ only by commutativity, associativity or
//! these identities are therefore structurally equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use crate::symbol::Symbol;

/// Elementary functions understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Function {
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
}

impl Function {
    /// Name used by the plain-text printer and the parser.
    pub fn name(self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Sin => "sin",
            Function::Cos => "cos",
        }
    }

    /// Numeric value of the function at `x`.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Function::Exp => x.exp(),
            Function::Ln => x.ln(),
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
        }
    }
}

/// A scalar symbolic expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// A numeric constant.
    Number(f64),
    /// A free variable.
    Symbol(Symbol),
    /// Sum of at least two terms.
    Add(Vec<Expr>),
    /// Product of at least two factors; a numeric coefficient, if any, comes first.
    Mul(Vec<Expr>),
    /// `base ^ exponent`.
    Pow(Box<Expr>, Box<Expr>),
    /// Elementary function application.
    Func(Function, Box<Expr>),
}

impl Expr {
    /// Create a numeric constant.
    pub fn number(value: f64) -> Self {
        // -0.0 and 0.0 must be the same expression.
        Expr::Number(if value == 0.0 { 0.0 } else { value })
    }

    /// The constant 0.
    pub fn zero() -> Self {
        Expr::Number(0.0)
    }

    /// The constant 1.
    pub fn one() -> Self {
        Expr::Number(1.0)
    }

    /// Create a symbol expression.
    pub fn symbol(name: impl Into<Symbol>) -> Self {
        Expr::Symbol(name.into())
    }

    /// Value of a numeric expression.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expr::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The symbol, if this expression is a bare symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// True for numeric constants.
    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Number(_))
    }

    /// True if this is exactly the constant 0.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(v) if *v == 0.0)
    }

    /// True if this is exactly the constant 1.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(v) if *v == 1.0)
    }

    fn as_integer(&self) -> Option<f64> {
        match self {
            Expr::Number(v) if v.fract() == 0.0 => Some(*v),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Canonicalising constructors
    // -----------------------------------------------------------------------

    /// Sum of `terms` in canonical form.
    pub fn add(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut constant = 0.0;
        let mut collected: BTreeMap<Expr, f64> = BTreeMap::new();

        let mut pending: Vec<Expr> = terms.into_iter().collect();
        while let Some(term) = pending.pop() {
            match term {
                Expr::Add(inner) => pending.extend(inner),
                Expr::Number(v) => constant += v,
                other => {
                    let (coeff, rest) = other.split_coefficient();
                    *collected.entry(rest).or_insert(0.0) += coeff;
                }
            }
        }

        let mut out = Vec::with_capacity(collected.len() + 1);
        if constant != 0.0 {
            out.push(Expr::number(constant));
        }
        out.extend(
            collected
                .into_iter()
                .filter(|(_, c)| *c != 0.0)
                .map(|(rest, c)| Expr::scaled(c, rest)),
        );
        out.sort();

        match out.len() {
            0 => Expr::zero(),
            1 => out.swap_remove(0),
            _ => Expr::Add(out),
        }
    }

    /// Product of `factors` in canonical form.
    pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut coeff = 1.0;
        let mut powers: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();

        let mut pending: Vec<Expr> = factors.into_iter().collect();
        while let Some(factor) = pending.pop() {
            match factor {
                Expr::Mul(inner) => pending.extend(inner),
                Expr::Number(v) => coeff *= v,
                Expr::Pow(base, exp) => powers.entry(*base).or_default().push(*exp),
                Expr::Add(terms) => {
                    let base = match sum_content(&terms) {
                        Some((content, unit)) => {
                            coeff *= content;
                            unit
                        }
                        None => Expr::Add(terms),
                    };
                    powers.entry(base).or_default().push(Expr::one());
                }
                other => powers.entry(other).or_default().push(Expr::one()),
            }
        }
        if coeff == 0.0 {
            return Expr::zero();
        }

        let mut out = Vec::with_capacity(powers.len() + 1);
        let mut reflatten = false;
        for (base, exps) in powers {
            match Expr::pow(base, Expr::add(exps)) {
                Expr::Number(v) => coeff *= v,
                merged @ Expr::Mul(_) => {
                    reflatten = true;
                    out.push(merged);
                }
                merged => out.push(merged),
            }
        }
        if reflatten {
            out.push(Expr::number(coeff));
            return Expr::mul(out);
        }
        if coeff == 0.0 {
            return Expr::zero();
        }
        out.sort();

        if out.is_empty() {
            return Expr::number(coeff);
        }
        if out.len() == 1 {
            if coeff == 1.0 {
                return out.swap_remove(0);
            }
            if let Expr::Add(terms) = &out[0] {
                return Expr::add(
                    terms
                        .iter()
                        .map(|t| Expr::mul([Expr::number(coeff), t.clone()])),
                );
            }
        }
        if coeff != 1.0 {
            out.insert(0, Expr::number(coeff));
        }
        Expr::Mul(out)
    }

    /// `base ^ exp` in canonical form.
    pub fn pow(base: Expr, exp: Expr) -> Expr {
        if exp.is_zero() || base.is_one() {
            return Expr::one();
        }
        if exp.is_one() {
            return base;
        }
        if let (Expr::Number(b), Expr::Number(e)) = (&base, &exp) {
            if let Some(v) = numeric_pow(*b, *e) {
                return Expr::number(v);
            }
        }
        if let Some(n) = exp.as_integer() {
            match base {
                Expr::Pow(inner, inner_exp) => {
                    return Expr::pow(*inner, Expr::mul([*inner_exp, exp]));
                }
                Expr::Mul(factors) => {
                    return Expr::mul(factors.into_iter().map(|f| Expr::pow(f, exp.clone())));
                }
                Expr::Add(terms) => {
                    // (c*u)^n = c^n * u^n keeps one base per sum up to scaling.
                    if let Some((content, unit)) = sum_content(&terms) {
                        let scale = content.powf(n);
                        if scale.is_finite() && scale != 0.0 {
                            return Expr::mul([Expr::number(scale), Expr::pow(unit, exp)]);
                        }
                    }
                    return Expr::Pow(Box::new(Expr::Add(terms)), Box::new(exp));
                }
                _ => {}
            }
        }
        if base.is_zero() && exp.as_f64().is_some_and(|e| e > 0.0) {
            return Expr::zero();
        }
        Expr::Pow(Box::new(base), Box::new(exp))
    }

    /// `f(arg)`, evaluated when the argument is numeric.
    pub fn func(f: Function, arg: Expr) -> Expr {
        if let Expr::Number(x) = arg {
            let v = f.eval(x);
            if v.is_finite() {
                return Expr::number(v);
            }
        }
        Expr::Func(f, Box::new(arg))
    }

    /// Square root, as `arg ^ 0.5`.
    pub fn sqrt(arg: Expr) -> Expr {
        Expr::pow(arg, Expr::number(0.5))
    }

    /// `exp(arg)`.
    pub fn exp(arg: Expr) -> Expr {
        Expr::func(Function::Exp, arg)
    }

    /// `ln(arg)`.
    pub fn ln(arg: Expr) -> Expr {
        Expr::func(Function::Ln, arg)
    }

    /// `sin(arg)`.
    pub fn sin(arg: Expr) -> Expr {
        Expr::func(Function::Sin, arg)
    }

    /// `cos(arg)`.
    pub fn cos(arg: Expr) -> Expr {
        Expr::func(Function::Cos, arg)
    }

    /// Split into numeric coefficient and the remaining (coefficient-free) part.
    pub(crate) fn split_coefficient(self) -> (f64, Expr) {
        match self {
            Expr::Number(v) => (v, Expr::one()),
            Expr::Mul(mut factors) => match factors.first() {
                Some(Expr::Number(c)) => {
                    let c = *c;
                    factors.remove(0);
                    let rest = if factors.len() == 1 {
                        factors.swap_remove(0)
                    } else {
                        Expr::Mul(factors)
                    };
                    (c, rest)
                }
                _ => (1.0, Expr::Mul(factors)),
            },
            other => (1.0, other),
        }
    }

    /// Numeric coefficient of a term (1 when there is none).
    pub fn coefficient(&self) -> f64 {
        match self {
            Expr::Number(v) => *v,
            Expr::Mul(factors) => factors.first().and_then(Expr::as_f64).unwrap_or(1.0),
            _ => 1.0,
        }
    }

    /// `coeff * rest` for a canonical, coefficient-free, non-sum `rest`.
    fn scaled(coeff: f64, rest: Expr) -> Expr {
        if coeff == 1.0 {
            return rest;
        }
        match rest {
            Expr::Mul(mut factors) => {
                factors.insert(0, Expr::number(coeff));
                Expr::Mul(factors)
            }
            other => Expr::Mul(vec![Expr::number(coeff), other]),
        }
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// All symbols appearing in the expression.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    fn collect_symbols(&self, set: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(s) => {
                set.insert(s.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                for item in items {
                    item.collect_symbols(set);
                }
            }
            Expr::Pow(base, exp) => {
                base.collect_symbols(set);
                exp.collect_symbols(set);
            }
            Expr::Func(_, arg) => arg.collect_symbols(set),
        }
    }

    /// True if `symbol` appears anywhere in the expression.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Symbol(s) => s == symbol,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(|i| i.contains(symbol)),
            Expr::Pow(base, exp) => base.contains(symbol) || exp.contains(symbol),
            Expr::Func(_, arg) => arg.contains(symbol),
        }
    }

    /// True if the expression has no free symbols.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Number(_) => true,
            Expr::Symbol(_) => false,
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_constant),
            Expr::Pow(base, exp) => base.is_constant() && exp.is_constant(),
            Expr::Func(_, arg) => arg.is_constant(),
        }
    }

    /// Rebuild the expression with `f` applied to every direct child.
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Number(_) | Expr::Symbol(_) => self.clone(),
            Expr::Add(items) => Expr::add(items.iter().map(&mut f)),
            Expr::Mul(items) => Expr::mul(items.iter().map(&mut f)),
            Expr::Pow(base, exp) => {
                let base = f(base);
                Expr::pow(base, f(exp))
            }
            Expr::Func(func, arg) => Expr::func(*func, f(arg)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Expr::Number(_) => 0,
            Expr::Symbol(_) => 1,
            Expr::Pow(..) => 2,
            Expr::Mul(_) => 3,
            Expr::Add(_) => 4,
            Expr::Func(..) => 5,
        }
    }
}

/// `b ^ e` for numeric operands, `None` if not a finite real.
fn numeric_pow(b: f64, e: f64) -> Option<f64> {
    if b < 0.0 && e.fract() != 0.0 {
        return None;
    }
    let v = if e.fract() == 0.0 && e.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        b.powi(e as i32)
    } else {
        b.powf(e)
    };
    v.is_finite().then_some(v)
}

/// Numeric content of a sum and the sum divided by it.
///
/// The content is the coefficient of the term whose coefficient-free part
/// sorts first, so `k*u` and `u` share the unit part. `None` when the
/// content is already 1.
fn sum_content(terms: &[Expr]) -> Option<(f64, Expr)> {
    let content = terms
        .iter()
        .map(|t| t.clone().split_coefficient())
        .min_by(|a, b| a.1.cmp(&b.1))
        .map(|(c, _)| c)?;
    if content == 1.0 || content == 0.0 || !content.is_finite() {
        return None;
    }
    let unit = Expr::add(terms.iter().map(|t| {
        let (c, rest) = t.clone().split_coefficient();
        Expr::mul([Expr::number(c / content), rest])
    }));
    Some((content, unit))
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Expr::Number(a), Expr::Number(b)) => a.total_cmp(b),
            (Expr::Symbol(a), Expr::Symbol(b)) => a.cmp(b),
            (Expr::Pow(b1, e1), Expr::Pow(b2, e2)) => b1.cmp(b2).then_with(|| e1.cmp(e2)),
            (Expr::Mul(a), Expr::Mul(b)) | (Expr::Add(a), Expr::Add(b)) => a.cmp(b),
            (Expr::Func(f, a), Expr::Func(g, b)) => f.cmp(g).then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Expr::Number(v) => v.to_bits().hash(state),
            Expr::Symbol(s) => s.hash(state),
            Expr::Add(items) | Expr::Mul(items) => items.hash(state),
            Expr::Pow(base, exp) => {
                base.hash(state);
                exp.hash(state);
            }
            Expr::Func(f, arg) => {
                f.hash(state);
                arg.hash(state);
            }
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::number(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::number(f64::from(value))
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::Symbol(symbol.clone())
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::add([self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::add([self, -rhs])
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::mul([self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::mul([self, Expr::pow(rhs, Expr::number(-1.0))])
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::mul([Expr::number(-1.0), self])
    }
}
