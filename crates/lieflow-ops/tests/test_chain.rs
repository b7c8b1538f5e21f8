//! Tests for operator chains and operand composition.

use lieflow_expr::{Expr, Symbol, parse};
use lieflow_ops::{LieOp, MAX_CHAIN_LEN, OpChain, OpsError, Operand, PhaseSpace};

fn e(src: &str) -> Expr {
    parse(src).unwrap()
}

fn space() -> PhaseSpace {
    PhaseSpace::from_names("q", "p").unwrap()
}

fn drift(step: &str) -> LieOp {
    LieOp::new(e(step), e("p^2/2"), &space()).unwrap()
}

fn kick(step: &str) -> LieOp {
    LieOp::new(e(step), e("q^2/2"), &space()).unwrap()
}

fn leapfrog() -> OpChain {
    drift("h/2") * kick("h") * drift("h/2")
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn chain_times_chain_concatenates() {
    let a = leapfrog();
    let b = kick("c") * drift("d");
    let joined = a.clone() * b.clone();
    assert_eq!(joined.len(), 5);
    assert_eq!(&joined.members()[..3], a.members());
    assert_eq!(&joined.members()[3..], b.members());
}

#[test]
fn operator_on_either_side_of_chain() {
    let chain = leapfrog();
    let appended = chain.clone() * kick("c");
    let prepended = kick("c") * chain;
    assert_eq!(appended.members().last(), Some(&kick("c")));
    assert_eq!(prepended.members().first(), Some(&kick("c")));
}

#[test]
fn chain_applies_last_member_first() {
    let chain = leapfrog();
    let q = e("q");
    let manual = drift("h/2").apply(&kick("h").apply(&drift("h/2").apply(&q)));
    assert_eq!(chain.apply(&q), manual);
}

#[test]
fn leapfrog_map_of_oscillator() {
    let image = leapfrog().apply_all(&space().state_vector());
    assert_eq!(image[0].expand(), e("q - h*p - 0.5*h^2*q + 0.25*h^3*p"));
    assert_eq!(image[1], e("p + h*q - 0.5*h^2*p"));
}

// ---------------------------------------------------------------------------
// Powers
// ---------------------------------------------------------------------------

#[test]
fn square_equals_self_product() {
    let chain = leapfrog();
    let Operand::Chain(squared) = chain.pow(2).unwrap() else {
        panic!("expected a chain");
    };
    assert_eq!(squared, chain.clone() * chain);
}

#[test]
fn chain_zero_power_is_identity() {
    assert_eq!(leapfrog().pow(0).unwrap(), Operand::Identity);
}

#[test]
fn chain_power_past_length_limit_rejected() {
    assert!(matches!(
        leapfrog().pow(i64::MAX),
        Err(OpsError::ChainTooLong { members: 3, .. })
    ));
    let limit = i64::try_from(MAX_CHAIN_LEN / 3 + 1).unwrap();
    assert!(matches!(
        leapfrog().pow(limit),
        Err(OpsError::ChainTooLong { max: MAX_CHAIN_LEN, .. })
    ));
}

#[test]
fn chain_invalid_powers() {
    assert!(matches!(leapfrog().pow(-1), Err(OpsError::NegativePower(-1))));
    assert!(matches!(leapfrog().pow(2.5), Err(OpsError::NonIntegerPower(_))));
}

// ---------------------------------------------------------------------------
// Step rewriting
// ---------------------------------------------------------------------------

#[test]
fn replace_variable_is_per_call() {
    let chain = leapfrog();
    let a = chain.replace_variable(&e("2*h"));
    let b = chain.replace_variable(&e("-h"));
    assert!(a.step_variables().all(|v| *v == e("2*h")));
    assert!(b.step_variables().all(|v| *v == e("-h")));
    // The source chain is unchanged.
    let steps: Vec<Expr> = chain.step_variables().cloned().collect();
    assert_eq!(steps, vec![e("h/2"), e("h"), e("h/2")]);
}

#[test]
fn rescale_step_substitutes_inside_steps() {
    let chain = leapfrog().rescale_step(&Symbol::new("h"), &e("0.2"));
    let steps: Vec<f64> = chain.step_variables().filter_map(Expr::as_f64).collect();
    assert_eq!(steps, vec![0.1, 0.2, 0.1]);
}

// ---------------------------------------------------------------------------
// Operand dispatch
// ---------------------------------------------------------------------------

#[test]
fn operand_operator_times_operator_is_chain() {
    let product = Operand::Operator(drift("a"))
        .compose(Operand::Operator(kick("b")))
        .unwrap();
    assert_eq!(product, Operand::Chain(drift("a") * kick("b")));
}

#[test]
fn operand_chain_times_vector_applies() {
    let state = Operand::Vector(space().state_vector());
    let result = Operand::Chain(leapfrog()).compose(state).unwrap();
    let Operand::Vector(image) = result else {
        panic!("expected a vector");
    };
    assert_eq!(image, leapfrog().apply_all(&space().state_vector()));
}

#[test]
fn operand_operator_times_scalar_applies() {
    let result = Operand::Operator(drift("a"))
        .compose(Operand::Scalar(e("q")))
        .unwrap();
    assert_eq!(result, Operand::Scalar(e("q - a*p")));
}

#[test]
fn operand_vector_on_left_rejected() {
    let err = Operand::Vector(vec![e("q")])
        .compose(Operand::Chain(leapfrog()))
        .unwrap_err();
    assert!(matches!(
        err,
        OpsError::InvalidComposition {
            lhs: "vector",
            rhs: "chain"
        }
    ));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn chain_display_and_latex() {
    let chain = drift("h") * kick("h");
    assert_eq!(chain.to_string(), "exp(h:0.5*p^2:) * exp(h:0.5*q^2:)");
    assert_eq!(
        chain.to_latex(),
        "\\operatorname{exp}{\\left( h:0.5 p^{2}: \\right)}\\operatorname{exp}{\\left( h:0.5 q^{2}: \\right)}"
    );
}
