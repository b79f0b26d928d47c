//! Parameter sets and key material for homomorphic sigmoid evaluation.
//!
//! The defaults target a 128-bit-class ring dimension (N = 8192) with a
//! coefficient modulus large enough for the degree-7 evaluation schedule,
//! which needs multiplicative depth 4.

use std::sync::Arc;

use fhe::bfv::{BfvParameters, BfvParametersBuilder, PublicKey, RelinearizationKey, SecretKey};
use fhe_math::zq::primes::generate_prime;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SigmoidError};

/// Core cryptographic parameters for the sigmoid pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigmoidParams {
    /// Ring dimension N (power of two); doubles as the batch-slot count
    pub degree: usize,

    /// Bit size of the plaintext modulus t. The concrete t is a prime
    /// selected by the library so that t ≡ 1 (mod 2N), which batching needs.
    pub plaintext_bits: usize,

    /// Bit sizes of the CRT primes making up the coefficient modulus q
    pub moduli_sizes: Vec<usize>,

    /// Fixed-point input scale S (power of two). An input integer m stands
    /// for the rational x = m / S; with S = 4 the inputs are quarter steps
    /// and |m| <= S covers the useful radius |x| <= 1 of the Taylor series.
    pub input_scale: u64,
}

impl SigmoidParams {
    /// Demo parameters: N = 8192, 20-bit t, 218-bit q.
    ///
    /// The coefficient modulus profile matches the library defaults for a
    /// 128-bit-class ring dimension of 8192 and leaves comfortable noise
    /// margin for depth 4.
    pub fn demo_8192() -> Self {
        Self {
            degree: 8192,
            plaintext_bits: 20,
            moduli_sizes: vec![43, 43, 44, 44, 44],
            input_scale: 4,
        }
    }

    /// Check if parameters are valid
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if !self.degree.is_power_of_two() || self.degree < 16 {
            return Err("degree must be a power of two, at least 16");
        }

        if self.plaintext_bits < 12 || self.plaintext_bits > 40 {
            return Err("plaintext_bits must lie in [12, 40]");
        }

        // A batching prime satisfies t ≡ 1 (mod 2N), so t > 2N.
        if (1u64 << self.plaintext_bits) <= 2 * self.degree as u64 {
            return Err("plaintext_bits too small for a batching prime at this degree");
        }

        if self.moduli_sizes.is_empty() || self.moduli_sizes.iter().any(|&s| s < 10 || s > 62) {
            return Err("moduli_sizes must be non-empty with each size in [10, 62]");
        }

        // Rough depth check: each ciphertext multiplication consumes about
        // log2(2 N t) bits of noise budget and the schedule is depth 4.
        let total: usize = self.moduli_sizes.iter().sum();
        let per_mul = self.plaintext_bits + self.degree.ilog2() as usize + 2;
        if total < self.plaintext_bits + 4 * per_mul + 20 {
            return Err("coefficient modulus too small for multiplicative depth 4");
        }

        if !self.input_scale.is_power_of_two() {
            return Err("input_scale must be a power of two");
        }

        // The seventh power of the largest meaningful input must stay well
        // below t, or the power ladder wraps around the plaintext modulus.
        let septic_bound = 1u64 << (self.plaintext_bits - 1);
        if self.input_scale.checked_pow(7).map_or(true, |p| p >= septic_bound) {
            return Err("input_scale too large for the plaintext modulus");
        }

        Ok(())
    }
}

impl Default for SigmoidParams {
    fn default() -> Self {
        Self::demo_8192()
    }
}

/// Long-lived FHE context: encryption parameters plus key material.
///
/// Built once by [`FheContext::initialize`] and read-only afterwards. The
/// bundled `Arc<BfvParameters>` doubles as the batch encoder handle, since
/// the library encodes plaintexts directly against the parameter set.
pub struct FheContext {
    /// BFV encryption parameters (ring dimension, q, t)
    pub params: Arc<BfvParameters>,
    /// Secret key, used for decryption
    pub secret_key: SecretKey,
    /// Public key, used for encryption
    pub public_key: PublicKey,
    /// Relinearization keys, applied after every ciphertext multiplication
    pub relin_key: RelinearizationKey,
    /// Fixed-point input scale S shared with the caller
    pub input_scale: u64,
}

impl FheContext {
    /// Builds the FHE context and generates the keypair and
    /// relinearization keys.
    ///
    /// The plaintext modulus is a prime of `plaintext_bits` bits selected
    /// by the library to support batching at the configured degree.
    ///
    /// # Errors
    ///
    /// `SigmoidError::Parameter` if the parameter set is inconsistent, no
    /// batching prime of the requested size exists, or the library rejects
    /// the (N, q, t) triple. Fatal at startup; there is no recovery.
    pub fn initialize<R: RngCore + CryptoRng>(cfg: &SigmoidParams, rng: &mut R) -> Result<Self> {
        cfg.validate()
            .map_err(|e| SigmoidError::Parameter(e.to_string()))?;

        let plaintext_modulus = generate_prime(
            cfg.plaintext_bits,
            2 * cfg.degree as u64,
            u64::MAX >> (64 - cfg.plaintext_bits),
        )
        .ok_or_else(|| {
            SigmoidError::Parameter(format!(
                "no {}-bit batching prime for degree {}",
                cfg.plaintext_bits, cfg.degree
            ))
        })?;

        let params = BfvParametersBuilder::new()
            .set_degree(cfg.degree)
            .set_plaintext_modulus(plaintext_modulus)
            .set_moduli_sizes(&cfg.moduli_sizes)
            .build_arc()
            .map_err(|e| SigmoidError::Parameter(e.to_string()))?;

        let secret_key = SecretKey::random(&params, rng);
        let public_key = PublicKey::new(&secret_key, rng);
        let relin_key = RelinearizationKey::new(&secret_key, rng)
            .map_err(|e| SigmoidError::Parameter(e.to_string()))?;

        debug!(
            degree = cfg.degree,
            t = plaintext_modulus,
            "BFV context initialized"
        );

        Ok(Self {
            params,
            secret_key,
            public_key,
            relin_key,
            input_scale: cfg.input_scale,
        })
    }

    /// Plaintext modulus t of this context
    pub fn plaintext_modulus(&self) -> u64 {
        self.params.plaintext()
    }

    /// Ring dimension N (batch-slot count)
    pub fn degree(&self) -> usize {
        self.params.degree()
    }
}
