//! Mathematical primitives for the sigmoid pipeline.
//!
//! All coefficient arithmetic happens in Z/tZ where t is the prime
//! plaintext modulus of the BFV scheme. This module provides the modular
//! helpers and the Fermat inverse used to prepare Taylor coefficients.

pub mod modular;

pub use modular::{inverse, ModT};
