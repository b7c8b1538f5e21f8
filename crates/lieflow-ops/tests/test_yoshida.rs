//! Tests for Yoshida order raising.

use std::sync::Arc;

use lieflow_expr::{Expr, Symbol, parse};
use lieflow_ops::{LieOp, OpChain, OpsError, PhaseSpace, YoshidaComposer, yoshida_integrator};
use rustc_hash::FxHashMap;

fn e(src: &str) -> Expr {
    parse(src).unwrap()
}

fn space() -> PhaseSpace {
    PhaseSpace::from_names("q", "p").unwrap()
}

fn leapfrog() -> OpChain {
    let drift = LieOp::new(e("h/2"), e("p^2/2"), &space()).unwrap();
    let kick = LieOp::new(e("h"), e("q^2/2"), &space()).unwrap();
    drift.clone() * kick * drift
}

fn composer() -> YoshidaComposer {
    YoshidaComposer::new(leapfrog(), 2, Symbol::new("h"))
}

/// Local error of one step of `chain` with step `h` on the harmonic
/// oscillator, started at `(q, p) = (1, 0)`.
fn local_error(chain: &OpChain, h: f64) -> f64 {
    let image = chain.apply_all(&space().state_vector());
    let mut b = FxHashMap::default();
    b.insert(Symbol::new("q"), 1.0);
    b.insert(Symbol::new("p"), 0.0);
    b.insert(Symbol::new("h"), h);
    let q = image[0].evaluate(&b).unwrap();
    let p = image[1].evaluate(&b).unwrap();
    (q - h.cos()).abs() + (p - h.sin()).abs()
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[test]
fn one_stage_triples_member_count() {
    let raised = composer().raise(2).unwrap();
    assert_eq!(raised.len(), 3 * leapfrog().len());
}

#[test]
fn raise_all_returns_every_order() {
    let stages = composer().raise_all(4).unwrap();
    let lens: Vec<usize> = stages.iter().map(OpChain::len).collect();
    assert_eq!(lens, vec![3, 9, 27]);
    assert_eq!(stages[0], leapfrog());
}

#[test]
fn stages_are_symmetric_triples() {
    let (x0, x1) = YoshidaComposer::coefficients(2);
    let raised = composer().raise(2).unwrap();
    let steps: Vec<Expr> = raised.step_variables().cloned().collect();
    let h = Expr::symbol("h");
    let expected = vec![
        Expr::number(x1 * 0.5) * h.clone(),
        Expr::number(x1) * h.clone(),
        Expr::number(x1 * 0.5) * h.clone(),
        Expr::number(x0 * 0.5) * h.clone(),
        Expr::number(x0) * h.clone(),
        Expr::number(x0 * 0.5) * h.clone(),
        Expr::number(x1 * 0.5) * h.clone(),
        Expr::number(x1) * h.clone(),
        Expr::number(x1 * 0.5) * h,
    ];
    assert_eq!(steps, expected);
}

#[test]
fn raising_is_deterministic() {
    let a = composer().raise(4).unwrap();
    let b = composer().raise(4).unwrap();
    assert_eq!(a, b);
    for (x, y) in a.members().iter().zip(b.members()) {
        assert_eq!(x.variable(), y.variable());
        assert_eq!(x.hamiltonian(), y.hamiltonian());
    }
}

#[test]
fn members_share_base_hamiltonians() {
    let base = leapfrog();
    let raised = yoshida_integrator(&base, 2, &Symbol::new("h"), 2).unwrap();
    for (i, op) in raised.members().iter().enumerate() {
        assert!(Arc::ptr_eq(op.hamiltonian(), base.members()[i % 3].hamiltonian()));
    }
}

#[test]
fn free_function_matches_composer() {
    let via_fn = yoshida_integrator(&leapfrog(), 2, &Symbol::new("h"), 2).unwrap();
    assert_eq!(via_fn, composer().raise(2).unwrap());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn odd_increase_rejected() {
    assert!(matches!(
        composer().raise(3),
        Err(OpsError::OddOrder {
            base: 2,
            increase: 3
        })
    ));
}

#[test]
fn zero_increase_rejected() {
    assert!(matches!(
        composer().raise_all(0),
        Err(OpsError::OddOrder { increase: 0, .. })
    ));
}

#[test]
fn step_symbol_missing_from_every_member_rejected() {
    let base = OpChain::from_op(LieOp::new(e("L"), e("p^2/2"), &space()).unwrap());
    let composer = YoshidaComposer::new(base, 2, Symbol::new("tau"));
    let result = composer.raise(2);
    assert!(
        matches!(&result, Err(OpsError::StepNotInChain(s)) if s.name() == "tau"),
        "{result:?}"
    );
}

#[test]
fn step_symbol_in_some_members_is_enough() {
    let drift = LieOp::new(e("h/2"), e("p^2/2"), &space()).unwrap();
    let shift = LieOp::new(e("1"), e("q^2/2"), &space()).unwrap();
    let base = drift.clone() * shift * drift;
    let composer = YoshidaComposer::new(base, 2, Symbol::new("h"));
    let raised = composer.raise(2).unwrap();
    assert_eq!(raised.len(), 9);
    assert_eq!(raised.members()[4].variable(), &Expr::one());
}

#[test]
fn odd_base_order_rejected() {
    let composer = YoshidaComposer::new(leapfrog(), 3, Symbol::new("h"));
    assert!(matches!(
        composer.raise(2),
        Err(OpsError::OddOrder { base: 3, .. })
    ));
}

// ---------------------------------------------------------------------------
// Accuracy on the harmonic oscillator
// ---------------------------------------------------------------------------

#[test]
fn leapfrog_local_error_is_third_order() {
    let chain = leapfrog();
    let ratio = local_error(&chain, 0.1) / local_error(&chain, 0.05);
    assert!(ratio > 6.0 && ratio < 10.0, "ratio {ratio}");
}

#[test]
fn raised_local_error_is_fifth_order() {
    let chain = composer().raise(2).unwrap();
    let ratio = local_error(&chain, 0.1) / local_error(&chain, 0.05);
    assert!(ratio > 20.0 && ratio < 45.0, "ratio {ratio}");
}

#[test]
fn raised_integrator_is_more_accurate() {
    let base = local_error(&leapfrog(), 0.1);
    let raised = local_error(&composer().raise(2).unwrap(), 0.1);
    assert!(raised < base / 5.0, "{raised} vs {base}");
}
