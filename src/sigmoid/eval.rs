//! Staged homomorphic evaluation of the sigmoid polynomial.
//!
//! The power ladder x → x² → x³ → x⁵ → x⁷ reuses x² for every odd power,
//! keeping the multiplicative depth at 4. Squaring x³ to reach x⁶ and
//! multiplying by x once more would add a level and exhaust the noise
//! budget at the default parameters, so the ladder order is load-bearing.
//!
//! Every ciphertext-ciphertext product is relinearized back to two ring
//! elements before it is used again; plaintext products leave the
//! ciphertext size unchanged and need no relinearization.

use fhe::bfv::{Ciphertext, RelinearizationKey};
use tracing::debug;

use crate::error::{Result, SigmoidError};
use crate::sigmoid::coeffs::CoefficientTable;

/// Evaluates the degree-7 sigmoid approximation on one ciphertext.
///
/// The input encrypts a scalar replicated across all batch slots; the
/// output encrypts the polynomial value in every slot, decodable with the
/// fixed-point rule of the encoding module.
///
/// # Arguments
///
/// * `input` - encryption of the scalar m (x = m/S in fixed-point terms)
/// * `table` - coefficient plaintexts encoded against the same context
/// * `relin_key` - relinearization keys bound to the encrypting keypair
pub fn evaluate_sigmoid(
    input: &Ciphertext,
    table: &CoefficientTable,
    relin_key: &RelinearizationKey,
) -> Result<Ciphertext> {
    // Linear term first: a plaintext product on the fresh input.
    let linear = input * &table.c_linear;

    // Power ladder, one relinearization per ciphertext product.
    let x2 = relinearized_product(input, input, relin_key)?;
    let x3 = relinearized_product(&x2, input, relin_key)?;
    let cubic = &x3 * &table.c_cubic;

    let x5 = relinearized_product(&x3, &x2, relin_key)?;
    let quintic = &x5 * &table.c_quintic;

    let x7 = relinearized_product(&x5, &x2, relin_key)?;
    let septic = &x7 * &table.c_septic;

    debug!("power ladder complete, accumulating terms");

    // The table already carries the series signs, so the terms just add up.
    let mut acc = &linear + &table.c_half;
    acc += &cubic;
    acc += &quintic;
    acc += &septic;

    Ok(acc)
}

/// Multiplies two ciphertexts and immediately relinearizes the product.
///
/// This is the only ciphertext-ciphertext multiplication path in the
/// evaluator, so the relinearization invariant holds by construction.
fn relinearized_product(
    a: &Ciphertext,
    b: &Ciphertext,
    relin_key: &RelinearizationKey,
) -> Result<Ciphertext> {
    let mut product = a * b;
    relin_key
        .relinearizes(&mut product)
        .map_err(|e| SigmoidError::Domain(e.to_string()))?;
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decrypt_slot, encrypt_input};
    use crate::math::inverse;
    use crate::params::{FheContext, SigmoidParams};
    use crate::sigmoid::coeffs::CoefficientTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_context(seed: u64) -> FheContext {
        let params = SigmoidParams {
            degree: 256,
            plaintext_bits: 20,
            moduli_sizes: vec![55, 55, 55, 55],
            input_scale: 4,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        FheContext::initialize(&params, &mut rng).unwrap()
    }

    #[test]
    fn test_zero_input_yields_half_residue() {
        let ctx = test_context(7);
        let table = CoefficientTable::build(&ctx).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let ct = encrypt_input(&ctx, 0, &mut rng).unwrap();
        let out = evaluate_sigmoid(&ct, &table, &ctx.relin_key).unwrap();
        let u = decrypt_slot(&ctx, &out).unwrap();

        // At m = 0 every power term vanishes and only c½ survives.
        assert_eq!(u, inverse(2, ctx.plaintext_modulus()).unwrap());
    }

    #[test]
    fn test_relinearized_product_squares() {
        let ctx = test_context(9);
        let mut rng = StdRng::seed_from_u64(10);

        let ct = encrypt_input(&ctx, 3, &mut rng).unwrap();
        let squared = relinearized_product(&ct, &ct, &ctx.relin_key).unwrap();

        assert_eq!(decrypt_slot(&ctx, &squared).unwrap(), 9);
    }
}
