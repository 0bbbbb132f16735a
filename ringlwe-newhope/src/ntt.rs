//! Number Theoretic Transform (NTT) for NewHope.
//!
//! Negacyclic transform over Z_q\[X\]/(X^1024 + 1). The forward direction
//! permutes into bit-reversed order, folds in the psi powers and runs the
//! butterfly network; the inverse permutes, runs the network with the
//! inverse twiddles and folds in `psi^-i * n^-1`. The pair is an exact
//! inverse up to reduction, and pointwise products in the transformed
//! domain are negacyclic products.
//!
//! Outputs are congruent mod q but not canonical; callers `freeze` when a
//! canonical value is needed.

use crate::params::common::{LOG_N, N};
use crate::precomp::{
    OMEGAS_INV_MONTGOMERY, OMEGAS_MONTGOMERY, PSIS_BITREV_MONTGOMERY, PSIS_INV_MONTGOMERY,
};
use crate::reduce::{barrett_reduce, montgomery_reduce, LAZY_OFFSET};
use ringlwe_core::{define_bitrev_permute, define_mul_coefficients, define_ntt_network};

define_ntt_network! {
    name: ntt_network,
    coeff: u16,
    wide: u32,
    n: N,
    lazy_offset: LAZY_OFFSET,
    montgomery_reduce: montgomery_reduce,
    barrett_reduce: barrett_reduce
}

define_mul_coefficients! {
    name: mul_coefficients,
    coeff: u16,
    wide: u32,
    n: N,
    montgomery_reduce: montgomery_reduce
}

define_bitrev_permute! {
    name: bitrev_vector,
    coeff: u16,
    n: N,
    log_n: LOG_N
}

/// Forward NTT, in place.
///
/// Output `i` is the input evaluated at `psi^(2i+1)`, in natural order.
/// Accepts coefficients below 2^16; the psi multiplication brings them
/// into [0, 2q) before the network runs.
pub fn ntt(coeffs: &mut [u16; N]) {
    bitrev_vector(coeffs);
    mul_coefficients(coeffs, &PSIS_BITREV_MONTGOMERY);
    ntt_network(coeffs, &OMEGAS_MONTGOMERY);
}

/// Inverse NTT, in place.
pub fn inv_ntt(coeffs: &mut [u16; N]) {
    bitrev_vector(coeffs);
    ntt_network(coeffs, &OMEGAS_INV_MONTGOMERY);
    mul_coefficients(coeffs, &PSIS_INV_MONTGOMERY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::common::Q;
    use crate::reduce::{freeze, montgomery_mul, to_mont};

    fn pattern(mul: usize, add: usize) -> [u16; N] {
        let mut c = [0u16; N];
        for (i, x) in c.iter_mut().enumerate() {
            *x = ((i * mul + add) % Q as usize) as u16;
        }
        c
    }

    #[test]
    fn test_ntt_zero_polynomial() {
        let mut coeffs = [0u16; N];
        ntt(&mut coeffs);
        assert!(coeffs.iter().all(|&c| freeze(c) == 0));
    }

    #[test]
    fn test_ntt_inv_ntt_roundtrip() {
        let mut coeffs = pattern(17, 31);
        let original = coeffs;

        ntt(&mut coeffs);
        inv_ntt(&mut coeffs);

        for i in 0..N {
            assert_eq!(freeze(coeffs[i]), original[i], "roundtrip failed at index {}", i);
        }
    }

    #[test]
    fn test_roundtrip_accepts_unreduced_input() {
        // Noise coefficients sit slightly above q
        let mut coeffs = [Q + 5; N];
        coeffs[7] = u16::MAX;
        ntt(&mut coeffs);
        inv_ntt(&mut coeffs);
        for i in 0..N {
            let expected = if i == 7 { u16::MAX % Q } else { 5 };
            assert_eq!(freeze(coeffs[i]), expected, "index {}", i);
        }
    }

    #[test]
    fn test_ntt_evaluates_at_odd_psi_powers_in_order() {
        let mut coeffs = [0u16; N];
        coeffs[1] = 1;
        ntt(&mut coeffs);

        let mut root = 7u32;
        for (i, &c) in coeffs.iter().enumerate() {
            assert_eq!(freeze(c) as u32, root, "index {}", i);
            root = root * 49 % Q as u32;
        }
    }

    #[test]
    fn test_ntt_of_constant_is_constant() {
        // A constant polynomial evaluates to the same value at every root
        let mut coeffs = [0u16; N];
        coeffs[0] = 5;
        ntt(&mut coeffs);
        assert!(coeffs.iter().all(|&c| freeze(c) == 5));
    }

    #[test]
    fn test_pointwise_product_is_negacyclic() {
        // X^1023 * X = X^1024 = -1
        let mut a = [0u16; N];
        a[N - 1] = 1;
        let mut b = [0u16; N];
        b[1] = 1;

        ntt(&mut a);
        ntt(&mut b);
        let mut prod = [0u16; N];
        for i in 0..N {
            prod[i] = montgomery_mul(a[i], to_mont(b[i]));
        }
        inv_ntt(&mut prod);

        assert_eq!(freeze(prod[0]), Q - 1);
        assert!(prod[1..].iter().all(|&c| freeze(c) == 0));
    }

    #[test]
    fn test_ntt_outputs_fit_lazy_bound() {
        let mut coeffs = pattern(12288, 0);
        ntt(&mut coeffs);
        assert!(coeffs.iter().all(|&c| c < 2 * Q));
    }
}
