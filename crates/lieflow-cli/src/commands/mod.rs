//! CLI command implementations.

pub mod coefficients;
pub mod common;
pub mod drift;
pub mod map;
pub mod version;
