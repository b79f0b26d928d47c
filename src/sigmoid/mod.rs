//! Homomorphic sigmoid approximation.
//!
//! Two pieces: the [`CoefficientTable`] holding the batched Taylor
//! coefficients, and [`evaluate_sigmoid`], the staged evaluation of
//!
//! ```text
//! σ(x) ≈ 1/2 + x/4 - x³/48 + x⁵/480 - 17·x⁷/80640
//! ```
//!
//! over a single BFV ciphertext.

pub mod coeffs;
pub mod eval;

pub use coeffs::CoefficientTable;
pub use eval::evaluate_sigmoid;
