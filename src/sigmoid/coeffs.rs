//! Taylor coefficient table for the sigmoid approximation.
//!
//! Each coefficient is prepared once as a batched plaintext holding the same
//! residue in all N slots, ready for plaintext-ciphertext multiplication and
//! addition inside the evaluation schedule.
//!
//! # Fixed-point encoding
//!
//! The decrypted result u is read as the fraction u/t, so a coefficient
//! standing for the rational n/d must be the residue closest to n·t/d.
//! Because the input integer m stands for x = m/S, the coefficient of m^k
//! absorbs the scale: its denominator is d·S^k.
//!
//! When d·S^k divides t - 1 the residue is exact and comes out of the
//! Fermat inverse: for d | t - 1, `inverse(d)` equals t - (t-1)/d, the
//! encoding of -1/d, so its negation encodes +1/d with no rounding at all.
//! Otherwise the nearest multiple of 1/t is used; at t ≈ 2^20 and S = 4 the
//! combined rounding error stays below the Taylor truncation error budget.
//!
//! # Sign handling
//!
//! The schedule adds all five terms, so the signs of the series live here:
//! raw inverses already carry a minus sign under the fixed-point reading,
//! which means the entries for the positive series coefficients (x/4 and
//! x⁵/480) are negated while the entries for -x³/48 and -17·x⁷/80640 are
//! not. The constant 1/2 is its own additive inverse modulo one, so c½ is
//! the literal residue 2⁻¹ mod t and the x = 0 output equals it exactly.

use fhe::bfv::{Encoding, Plaintext};
use fhe_traits::FheEncoder;
use tracing::debug;

use crate::error::{Result, SigmoidError};
use crate::math::{inverse, ModT};
use crate::params::FheContext;

/// The five batched plaintext coefficients of the degree-7 series.
///
/// Built once at initialization, immutable afterwards, and valid for as
/// long as the context that encoded them.
pub struct CoefficientTable {
    /// Constant term 1/2, stored as 2⁻¹ mod t
    pub c_half: Plaintext,
    /// Coefficient of m: +1/(4·S)
    pub c_linear: Plaintext,
    /// Coefficient of m³: -1/(48·S³)
    pub c_cubic: Plaintext,
    /// Coefficient of m⁵: +1/(480·S⁵)
    pub c_quintic: Plaintext,
    /// Coefficient of m⁷: -17/(80640·S⁷)
    pub c_septic: Plaintext,
}

impl CoefficientTable {
    /// Computes the five coefficient residues for the context's plaintext
    /// modulus and input scale, and encodes each across all batch slots.
    pub fn build(ctx: &FheContext) -> Result<Self> {
        let t = ctx.plaintext_modulus();
        let s = ctx.input_scale;

        let half = inverse(2, t)?;
        let linear = fixed_coefficient(1, 4 * s, false, t)?;
        let cubic = fixed_coefficient(1, 48 * s.pow(3), true, t)?;
        let quintic = fixed_coefficient(1, 480 * s.pow(5), false, t)?;
        let septic = fixed_coefficient(17, 80640 * s.pow(7), true, t)?;

        debug!(half, linear, cubic, quintic, septic, "coefficient residues");

        Ok(Self {
            c_half: encode_constant(ctx, half)?,
            c_linear: encode_constant(ctx, linear)?,
            c_cubic: encode_constant(ctx, cubic)?,
            c_quintic: encode_constant(ctx, quintic)?,
            c_septic: encode_constant(ctx, septic)?,
        })
    }
}

/// Residue of the signed rational ±num/den in fixed-point form, i.e. the
/// element of [0, t) closest to (±num/den)·t modulo t.
fn fixed_coefficient(num: u64, den: u64, negative: bool, t: u64) -> Result<u64> {
    let magnitude = if (t - 1) % den == 0 {
        // Exact: inverse(den) encodes -1/den, so its negation is +1/den.
        let inv = inverse(den, t)?;
        ModT::mul(num % t, ModT::negate(inv, t), t)
    } else {
        // Nearest representable multiple of 1/t. Small high-order
        // coefficients may round to zero; their true value is below the
        // rendering resolution anyway.
        let rounded = (num as u128 * t as u128 + den as u128 / 2) / den as u128;
        (rounded % t as u128) as u64
    };

    Ok(if negative {
        ModT::negate(magnitude, t)
    } else {
        magnitude
    })
}

/// Replicates one residue across all N slots and encodes it for SIMD use.
fn encode_constant(ctx: &FheContext, value: u64) -> Result<Plaintext> {
    let slots = vec![value; ctx.degree()];
    Plaintext::try_encode(&slots, Encoding::simd(), &ctx.params)
        .map_err(|e| SigmoidError::Domain(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SigmoidParams;
    use fhe_traits::FheDecoder;

    const T: u64 = 1032193; // t - 1 = 2^14 · 63

    #[test]
    fn test_exact_positive_coefficient() {
        // 16 | t - 1, so +1/16 encodes exactly as (t-1)/16.
        assert_eq!(fixed_coefficient(1, 16, false, T).unwrap(), (T - 1) / 16);
    }

    #[test]
    fn test_exact_negative_coefficient() {
        // -1/3072 is the raw inverse residue t - (t-1)/3072.
        assert_eq!(
            fixed_coefficient(1, 3072, true, T).unwrap(),
            T - (T - 1) / 3072
        );
    }

    #[test]
    fn test_rounded_coefficient() {
        // 491520 does not divide t - 1; expect the nearest multiple of 1/t.
        let c = fixed_coefficient(1, 491520, false, T).unwrap();
        let ideal = T as f64 / 491520.0;
        assert!((c as f64 - ideal).abs() <= 0.5);
    }

    #[test]
    fn test_tiny_coefficient_rounds_to_zero() {
        // 17/(80640·4^7) · t < 1/2, below the rendering resolution.
        assert_eq!(fixed_coefficient(17, 80640 * 4u64.pow(7), true, T).unwrap(), 0);
    }

    #[test]
    fn test_residues_approximate_the_series() {
        // Every entry must sit within 1/t of the signed series coefficient
        // it stands for, up to the mod-1 wraparound.
        let s = 4u64;
        let cases = [
            (1u64, 4 * s, false),
            (1, 48 * s.pow(3), true),
            (1, 480 * s.pow(5), false),
            (17, 80640 * s.pow(7), true),
        ];
        for (num, den, negative) in cases {
            let c = fixed_coefficient(num, den, negative, T).unwrap();
            let signed = if c > T / 2 {
                c as f64 / T as f64 - 1.0
            } else {
                c as f64 / T as f64
            };
            let target = num as f64 / den as f64 * if negative { -1.0 } else { 1.0 };
            assert!(
                (signed - target).abs() <= 1.0 / T as f64,
                "den = {}: {} vs {}",
                den,
                signed,
                target
            );
        }
    }

    #[test]
    fn test_table_encodes_half_in_every_slot() {
        let params = SigmoidParams {
            degree: 256,
            plaintext_bits: 20,
            moduli_sizes: vec![55, 55, 55],
            input_scale: 4,
        };
        let mut rng = rand::thread_rng();
        let ctx = FheContext::initialize(&params, &mut rng).unwrap();
        let table = CoefficientTable::build(&ctx).unwrap();

        let t = ctx.plaintext_modulus();
        let slots = Vec::<u64>::try_decode(&table.c_half, Encoding::simd()).unwrap();
        assert_eq!(slots.len(), 256);
        assert!(slots.iter().all(|&v| v == inverse(2, t).unwrap()));
    }
}
