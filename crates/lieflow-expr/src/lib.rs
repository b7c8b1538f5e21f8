//! `lieflow-expr` — symbolic scalar expressions for Lie-transform maps.
//!
//! A small computer-algebra core: expressions over named symbols, kept in a
//! canonical form so that structural equality tracks algebraic equality for
//! the polynomial and rational expressions that appear in beam-optics
//! Hamiltonians.
//!
//! | Operation | Method |
//! |-----------|--------|
//! | Partial derivative | [`Expr::diff`] |
//! | Substitution | [`Expr::subs`], [`Expr::subs_all`] |
//! | Expansion | [`Expr::expand`] |
//! | Polynomial integration | [`Expr::integrate`], [`Expr::integrate_from_zero`] |
//! | Numeric evaluation | [`Expr::evaluate`] |
//! | Rendering | `Display`, [`Expr::to_latex`] |
//! | Parsing | [`parse`], `str::parse::<Expr>()` |
//!
//! # Example
//!
//! ```rust
//! use lieflow_expr::{parse, Symbol};
//!
//! let h = parse("p_x^2 / 2").unwrap();
//! let dh = h.diff(&Symbol::new("p_x"));
//! assert_eq!(dh.to_string(), "p_x");
//! ```

pub mod calculus;
pub mod display;
pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod symbol;

pub use error::{ExprError, ExprResult};
pub use expr::{Expr, Function};
pub use parser::parse;
pub use symbol::{Symbol, symbols};
