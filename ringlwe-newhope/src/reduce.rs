//! Modular arithmetic operations for NewHope.
//!
//! Barrett and Montgomery reduction over `u16` coefficients with
//! q = 12289 and Montgomery radix R = 2^18.

#![allow(clippy::let_and_return)]

use crate::params::common::Q;
use ringlwe_core::{
    define_barrett_reduce, define_freeze, define_montgomery_mul, define_montgomery_reduce,
};

/// -q^(-1) mod 2^18
pub const QINV: u32 = 12287;

/// log2 of the Montgomery radix R = 2^18.
pub const RLOG: u32 = 18;

/// R mod q for Montgomery: 2^18 mod q = 4075
pub const MONT: u16 = 4075;

/// R^2 mod q: (2^18)^2 mod q = 3186
pub const MONT_R2: u32 = 3186;

/// Barrett constant for q=12289: floor(2^16 / q) = 5
pub const BARRETT_MUL: u32 = 5;

/// Lazy offset added before butterfly subtraction.
pub const LAZY_OFFSET: u16 = 3 * Q;

// Approximate reduction of any u16 into [0, 2q)
define_barrett_reduce! {
    name: barrett_reduce,
    coeff: u16,
    wide: u32,
    q: Q,
    barrett_mul: BARRETT_MUL,
    shift: 16
}

define_montgomery_reduce! {
    name: montgomery_reduce,
    coeff: u16,
    wide: u32,
    q: Q,
    qinv: QINV,
    rlog: RLOG
}

define_montgomery_mul! {
    name: montgomery_mul,
    coeff: u16,
    wide: u32,
    montgomery_reduce: montgomery_reduce
}

define_freeze! {
    name: freeze,
    coeff: u16,
    signed: i16,
    q: Q,
    reduce_approx: barrett_reduce
}

/// Convert to Montgomery form: a * R mod q.
#[inline]
pub const fn to_mont(a: u16) -> u16 {
    montgomery_reduce(a as u32 * MONT_R2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrett_reduce_full_range() {
        for a in 0..=u16::MAX {
            let r = barrett_reduce(a);
            assert!(r < 2 * Q, "barrett_reduce({}) = {} not in [0, 2q)", a, r);
            assert_eq!(r % Q, a % Q, "barrett_reduce({}) not congruent", a);
        }
    }

    #[test]
    fn test_freeze_canonical() {
        for a in 0..=u16::MAX {
            let r = freeze(a);
            assert!(r < Q, "freeze({}) = {} not in [0, q)", a, r);
            assert_eq!(r, a % Q);
        }
    }

    #[test]
    fn test_freeze_at_q() {
        assert_eq!(freeze(Q), 0);
        assert_eq!(freeze(Q + 1), 1);
        assert_eq!(freeze(2 * Q), 0);
        assert_eq!(freeze(Q - 1), Q - 1);
    }

    #[test]
    fn test_montgomery_reduce_basic() {
        // montgomery_reduce(R) = R * R^(-1) = 1
        let r = montgomery_reduce(1 << RLOG);
        assert_eq!(freeze(r), 1, "montgomery_reduce(2^18) should be 1");
    }

    #[test]
    fn test_montgomery_roundtrip() {
        for a in (0..Q).step_by(97) {
            let mont = to_mont(a);
            let back = montgomery_reduce(mont as u32);
            assert_eq!(freeze(back), a, "Montgomery roundtrip failed for {}", a);
        }
    }

    #[test]
    fn test_montgomery_mul_correctness() {
        let test_values = [0u16, 1, 100, 500, 1000, 6144, 9999, 12288];

        for &a in &test_values {
            for &b in &test_values {
                let expected = ((a as u32 * b as u32) % Q as u32) as u16;
                // pointwise pattern: mont(a * mont(R^2 * b))
                let result = montgomery_mul(a, to_mont(b));
                assert_eq!(
                    freeze(result),
                    expected,
                    "Montgomery mul failed: {} * {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_montgomery_reduce_congruence() {
        let q = Q as u64;
        for a in (0u32..(4 * Q as u32 * Q as u32)).step_by(40_009) {
            let r = montgomery_reduce(a);
            assert!(r < 2 * Q);
            assert_eq!((r as u64 * (1 << RLOG)) % q, a as u64 % q, "mont({})", a);
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!((1u32 << RLOG) % Q as u32, MONT as u32);
        assert_eq!((1u64 << (2 * RLOG)) % Q as u64, MONT_R2 as u64);
        assert_eq!((1u32 << 16) / Q as u32, BARRETT_MUL);
        // q * QINV = -1 mod R
        assert_eq!((Q as u32 * QINV) & ((1 << RLOG) - 1), (1 << RLOG) - 1);
    }
}
