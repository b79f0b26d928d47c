//! Modular arithmetic over the plaintext ring Z_t.
//!
//! The plaintext modulus t is a batching-friendly prime, so every nonzero
//! residue is invertible and inverses can be computed by Fermat's little
//! theorem: d^(t-2) ≡ d^(-1) (mod t).

use crate::error::{Result, SigmoidError};

/// Modular arithmetic operations over Z_t
pub struct ModT;

impl ModT {
    /// Add two values modulo t
    #[inline]
    pub fn add(a: u64, b: u64, t: u64) -> u64 {
        let sum = (a as u128) + (b as u128);
        (sum % (t as u128)) as u64
    }

    /// Subtract two values modulo t
    #[inline]
    pub fn sub(a: u64, b: u64, t: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            t - (b - a)
        }
    }

    /// Multiply two values modulo t
    #[inline]
    pub fn mul(a: u64, b: u64, t: u64) -> u64 {
        let prod = (a as u128) * (b as u128);
        (prod % (t as u128)) as u64
    }

    /// Negate a value modulo t
    #[inline]
    pub fn negate(a: u64, t: u64) -> u64 {
        if a == 0 {
            0
        } else {
            t - a
        }
    }

    /// Raise a value to a power modulo t using binary exponentiation
    pub fn pow(base: u64, exp: u64, t: u64) -> u64 {
        let mut result = 1u64;
        let mut base = base % t;
        let mut exp = exp;
        while exp > 0 {
            if exp & 1 == 1 {
                result = Self::mul(result, base, t);
            }
            base = Self::mul(base, base, t);
            exp >>= 1;
        }
        result
    }

    /// Convert a signed integer to its representation in Z_t
    #[inline]
    pub fn from_signed(val: i64, t: u64) -> u64 {
        if val >= 0 {
            (val as u64) % t
        } else {
            let abs = val.unsigned_abs();
            t - (abs % t)
        }
    }

    /// Convert from Z_t to signed representation in [-t/2, t/2)
    #[inline]
    pub fn to_signed(val: u64, t: u64) -> i64 {
        if val <= t / 2 {
            val as i64
        } else {
            -((t - val) as i64)
        }
    }
}

/// Computes d^(-1) mod t via Fermat's little theorem.
///
/// Requires gcd(d, t) = 1, which holds for every d not divisible by the
/// prime t. The returned value lies in [0, t).
///
/// # Errors
///
/// `SigmoidError::Domain` if d ≡ 0 (mod t), which has no inverse.
pub fn inverse(d: u64, t: u64) -> Result<u64> {
    if d % t == 0 {
        return Err(SigmoidError::Domain(format!(
            "no inverse of {} modulo {}",
            d, t
        )));
    }
    Ok(ModT::pow(d, t - 2, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 20-bit batching prime for N = 8192 (t ≡ 1 mod 16384)
    const T: u64 = 1032193;

    #[test]
    fn test_add() {
        assert_eq!(ModT::add(5, 7, T), 12);
        assert_eq!(ModT::add(T - 1, 2, T), 1);
    }

    #[test]
    fn test_sub() {
        assert_eq!(ModT::sub(10, 3, T), 7);
        assert_eq!(ModT::sub(3, 10, T), T - 7);
    }

    #[test]
    fn test_mul() {
        assert_eq!(ModT::mul(5, 7, T), 35);
    }

    #[test]
    fn test_negate() {
        assert_eq!(ModT::negate(5, T), T - 5);
        assert_eq!(ModT::negate(0, T), 0);
    }

    #[test]
    fn test_pow() {
        assert_eq!(ModT::pow(2, 10, T), 1024);
        assert_eq!(ModT::pow(7, 0, T), 1);
        // Fermat: a^(t-1) ≡ 1 for a not divisible by t
        assert_eq!(ModT::pow(12345, T - 1, T), 1);
    }

    #[test]
    fn test_from_signed() {
        assert_eq!(ModT::from_signed(5, T), 5);
        assert_eq!(ModT::from_signed(-5, T), T - 5);
        assert_eq!(ModT::from_signed(0, T), 0);
    }

    #[test]
    fn test_to_signed() {
        assert_eq!(ModT::to_signed(5, T), 5);
        assert_eq!(ModT::to_signed(T - 5, T), -5);
    }

    #[test]
    fn test_inverse_of_taylor_denominators() {
        for d in [2u64, 4, 48, 480, 80640] {
            let inv = inverse(d, T).unwrap();
            assert!(inv < T);
            assert_eq!(ModT::mul(d % T, inv, T), 1, "d = {}", d);
        }
    }

    #[test]
    fn test_inverse_of_zero_fails() {
        assert!(inverse(0, T).is_err());
        assert!(inverse(T, T).is_err());
    }

    #[test]
    fn test_inverse_divides_exactly_when_d_divides_t_minus_1() {
        // For d | t-1 the inverse has the closed form t - (t-1)/d.
        for d in [2u64, 16, 3072] {
            assert_eq!((T - 1) % d, 0);
            assert_eq!(inverse(d, T).unwrap(), T - (T - 1) / d);
        }
    }
}
