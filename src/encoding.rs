//! Input encoding, decryption and fixed-point rendering.
//!
//! The input scalar is replicated across all N batch slots so the SIMD
//! evaluation computes the same value in every lane. On the way out, slot 0
//! is returned after checking that all lanes still agree; a lane mismatch
//! is the observable signature of a ciphertext whose noise exceeded the
//! decryption margin, since the backend exposes no noise budget gauge.

use fhe::bfv::{Ciphertext, Encoding, Plaintext};
use fhe_traits::{FheDecoder, FheDecrypter, FheEncoder, FheEncrypter};
use rand::{CryptoRng, RngCore};
use tracing::warn;

use crate::error::{Result, SigmoidError};
use crate::math::ModT;
use crate::params::FheContext;

/// Encrypts one signed scalar, replicated in every batch slot.
///
/// Negative values are mapped to their residue t - |m|. Values outside
/// [-S, S] are accepted but lie outside the radius where the Taylor series
/// tracks sigmoid, so the decoded result will not be meaningful.
pub fn encrypt_input<R: RngCore + CryptoRng>(
    ctx: &FheContext,
    value: i64,
    rng: &mut R,
) -> Result<Ciphertext> {
    if value.unsigned_abs() > ctx.input_scale {
        warn!(
            value,
            scale = ctx.input_scale,
            "input lies outside the approximation radius |x| <= 1"
        );
    }

    let residue = ModT::from_signed(value, ctx.plaintext_modulus());
    let slots = vec![residue; ctx.degree()];
    let plaintext = Plaintext::try_encode(&slots, Encoding::simd(), &ctx.params)
        .map_err(|e| SigmoidError::Domain(e.to_string()))?;

    let ciphertext: Ciphertext = ctx
        .public_key
        .try_encrypt(&plaintext, rng)
        .map_err(|e| SigmoidError::Domain(e.to_string()))?;
    Ok(ciphertext)
}

/// Decrypts a ciphertext and returns the scalar carried in slot 0.
///
/// # Errors
///
/// * `SigmoidError::Decryption` if decryption or decoding fails or the
///   slot vector comes back empty.
/// * `SigmoidError::NoiseBudgetExhausted` if the slot lanes disagree. The
///   pipeline only ever encrypts slot-uniform values, so divergent lanes
///   mean the noise corrupted the payload.
pub fn decrypt_slot(ctx: &FheContext, ciphertext: &Ciphertext) -> Result<u64> {
    let plaintext = ctx
        .secret_key
        .try_decrypt(ciphertext)
        .map_err(|e| SigmoidError::Decryption(e.to_string()))?;
    let slots = Vec::<u64>::try_decode(&plaintext, Encoding::simd())
        .map_err(|e| SigmoidError::Decryption(e.to_string()))?;

    let first = *slots
        .first()
        .ok_or_else(|| SigmoidError::Decryption("decoded slot vector is empty".into()))?;

    if slots.iter().any(|&s| s != first) {
        return Err(SigmoidError::NoiseBudgetExhausted(
            "slot lanes disagree after evaluation".into(),
        ));
    }

    Ok(first)
}

/// Reads a modular integer in [0, t) as the fraction u/t.
///
/// Performs no wraparound, so residues close to t render near 1 rather
/// than as small negatives; callers wanting signed output should use
/// [`to_signed_rational`] instead.
pub fn to_rational(value: u64, t: u64) -> f64 {
    value as f64 / t as f64
}

/// Signed fixed-point reading: residues above t/2 map to (u - t)/t.
pub fn to_signed_rational(value: u64, t: u64) -> f64 {
    if value > t / 2 {
        -((t - value) as f64) / t as f64
    } else {
        value as f64 / t as f64
    }
}
