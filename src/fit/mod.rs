//! Exponential-response fitting.
//!
//! Responsibilities:
//!
//! - seed `(C_G, theta)` with a shrinking grid search (`grid`)
//! - polish the seed with a two-parameter Gauss-Newton pass (`refine`)
//! - validate inputs and compute quality metrics (`engine`)
//! - trim the series to a trailing window before fitting (`window`)
//! - derive percentile confidence intervals by resampling (`bootstrap`)

pub mod bootstrap;
pub mod engine;
pub mod grid;
pub mod refine;
pub mod window;

pub use bootstrap::*;
pub use engine::*;
pub use grid::*;
pub use refine::*;
pub use window::*;

/// Smallest allowed gap between `C_G` and `C_0`.
///
/// The forward model is only meaningful for `C_G > C_0`; both the grid
/// search bracket and the Gauss-Newton step clamp against this floor.
pub(crate) const CG_EPS: f64 = 1e-6;
