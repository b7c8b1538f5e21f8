//! Property-based tests for operator products.

use lieflow_expr::{Expr, Symbol};
use lieflow_ops::{LieOp, OpChain, Operand, PhaseSpace, YoshidaComposer};
use proptest::prelude::*;

fn space() -> PhaseSpace {
    PhaseSpace::from_names("q", "p").unwrap()
}

fn q() -> Expr {
    Expr::symbol("q")
}

fn p() -> Expr {
    Expr::symbol("p")
}

/// A small integer polynomial in one variable.
fn poly(var: Expr) -> impl Strategy<Value = Expr> {
    prop::collection::vec(-3i32..=3, 1..4).prop_map(move |coeffs| {
        Expr::add(
            coeffs
                .into_iter()
                .enumerate()
                .map(|(k, c)| Expr::from(c) * Expr::pow(var.clone(), Expr::from(k as i32 + 1))),
        )
    })
}

/// A separable Hamiltonian that is not constant.
fn hamiltonian() -> impl Strategy<Value = Expr> {
    prop_oneof![poly(q()), poly(p())].prop_filter("non-constant", |h| !h.is_constant())
}

fn op() -> impl Strategy<Value = LieOp> {
    (1i32..5, hamiltonian()).prop_map(|(k, h)| {
        let step = Expr::from(k) * Expr::symbol("t");
        LieOp::new(step, h, &space()).unwrap()
    })
}

fn chain() -> impl Strategy<Value = OpChain> {
    prop::collection::vec(op(), 1..4).prop_map(OpChain::new)
}

fn target() -> impl Strategy<Value = Expr> {
    (poly(q()), poly(p())).prop_map(|(a, b)| a + b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn product_acts_right_to_left(a in op(), b in op(), f in target()) {
        let product = a.clone() * b.clone();
        prop_assert_eq!(product.apply(&f), a.apply(&b.apply(&f)));
    }

    #[test]
    fn chain_product_is_associative(a in chain(), b in chain(), c in chain()) {
        let left = (a.clone() * b.clone()) * c.clone();
        let right = a * (b * c);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn square_is_self_product(c in chain()) {
        let squared = c.pow(2).unwrap().into_chain().unwrap();
        prop_assert_eq!(squared, c.clone() * c);
    }

    #[test]
    fn operand_and_chain_products_agree(a in chain(), b in chain()) {
        let via_operand = Operand::Chain(a.clone()).compose(Operand::Chain(b.clone())).unwrap();
        prop_assert_eq!(via_operand, Operand::Chain(a * b));
    }

    #[test]
    fn identity_on_independent_targets(
        h in poly(p()).prop_filter("non-constant", |h| !h.is_constant()),
        k in -3i32..=3,
    ) {
        // A momentum Hamiltonian only moves q.
        let op = LieOp::new(Expr::symbol("t"), h, &space()).unwrap();
        let f = Expr::from(k) * p() + Expr::symbol("c");
        prop_assert_eq!(op.apply(&f), f);
    }

    #[test]
    fn raising_triples_members(c in chain()) {
        let raised = YoshidaComposer::new(c.clone(), 2, Symbol::new("t")).raise(2).unwrap();
        prop_assert_eq!(raised.len(), 3 * c.len());
        let again = YoshidaComposer::new(c, 2, Symbol::new("t")).raise(2).unwrap();
        prop_assert_eq!(raised, again);
    }
}
