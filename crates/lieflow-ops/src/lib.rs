//! `lieflow-ops` — Lie-transform maps and Yoshida composition.
//!
//! Builds symplectic splitting integrators for separable Hamiltonians:
//!
//! - [`LieOp`]: the truncated operator `exp(t:H:)` for one Hamiltonian that
//!   depends only on positions or only on momenta
//! - [`OpChain`]: a formal, flat product of operators, applied right to left
//! - [`Operand`]: the closed set of values in operator products
//! - [`YoshidaComposer`]: raises an even-order integrator by symmetric
//!   triple composition
//! - [`beamline`]: accelerator Hamiltonians and their second-order map
//! - [`TransferMap`]: the resulting symbolic map of the phase-space state
//!
//! # Quick start
//!
//! ```rust
//! use lieflow_expr::{parse, Symbol};
//! use lieflow_ops::{LieOp, PhaseSpace, YoshidaComposer};
//!
//! let space = PhaseSpace::from_names("q", "p").unwrap();
//! let h = Symbol::new("h");
//! let drift = LieOp::new(parse("h/2").unwrap(), parse("p^2/2").unwrap(), &space).unwrap();
//! let kick = LieOp::new(parse("h").unwrap(), parse("q^2/2").unwrap(), &space).unwrap();
//!
//! // Second-order leapfrog, raised to fourth order.
//! let leapfrog = drift.clone() * kick * drift;
//! let fourth = YoshidaComposer::new(leapfrog, 2, h).raise(2).unwrap();
//! assert_eq!(fourth.len(), 9);
//! ```

pub mod beamline;
pub mod chain;
pub mod config;
pub mod error;
pub mod lie_op;
pub mod operand;
pub mod phase_space;
pub mod transfer;
pub mod yoshida;

pub use beamline::{BeamlineCoordinates, VectorPotential, beta_to_gamma, gauge_transform};
pub use chain::{MAX_CHAIN_LEN, OpChain};
pub use config::{BuiltIntegrator, IntegratorConfig};
pub use error::{OpsError, OpsResult};
pub use lie_op::LieOp;
pub use operand::{Exponent, Operand};
pub use phase_space::{Family, PhaseSpace};
pub use transfer::TransferMap;
pub use yoshida::{YoshidaComposer, yoshida_integrator};
