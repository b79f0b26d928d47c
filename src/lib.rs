//! Homomorphic evaluation of the logistic sigmoid over BFV-encrypted integers.
//!
//! One scalar is encrypted under a leveled BFV context, a degree-7 Taylor
//! approximation of sigmoid is evaluated on the ciphertext without any
//! intermediate decryption, and the result is decrypted and rendered as a
//! fixed-point rational.
//!
//! Key components:
//! - Parameter and key material provider around the `fhe` crate's BFV
//!   implementation (`params`)
//! - Fermat-inverse modular arithmetic over the plaintext ring Z_t (`math`)
//! - Batched Taylor coefficient table and the depth-4 evaluation schedule
//!   (`sigmoid`)
//! - Slot-replicating input codec and fixed-point renderers (`encoding`)

pub mod encoding;
pub mod error;
pub mod math;
pub mod params;
pub mod sigmoid;

pub use encoding::{decrypt_slot, encrypt_input, to_rational, to_signed_rational};
pub use error::{Result, SigmoidError};
pub use params::{FheContext, SigmoidParams};
pub use sigmoid::{evaluate_sigmoid, CoefficientTable};
