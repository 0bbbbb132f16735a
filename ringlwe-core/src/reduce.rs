//! Modular arithmetic macros for Ring-LWE.
//!
//! This module provides macros to generate modular arithmetic operations
//! (Barrett reduction, Montgomery reduction, freeze) over unsigned
//! coefficients. Reductions are deliberately loose: outputs may land in
//! `[0, 2q)` and only `freeze` guarantees the canonical range.

/// Generate Barrett reduction function (approximate).
///
/// Barrett reduction computes `a mod q` without division using precomputed constants.
/// This version produces approximate results that may be in range [0, 2q-1].
///
/// # Parameters
/// - `$name`: Function name (e.g., `barrett_reduce`)
/// - `$coeff`: Coefficient type (`u16`)
/// - `$wide`: Wide type for intermediate computations (`u32`)
/// - `$q`: The prime modulus
/// - `$barrett_mul`: Precomputed constant floor(2^k / q)
/// - `$shift`: Bit shift amount (k)
#[macro_export]
macro_rules! define_barrett_reduce {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        wide: $wide:ty,
        q: $q:expr,
        barrett_mul: $barrett_mul:expr,
        shift: $shift:expr
    ) => {
        /// Barrett reduction: compute approximate a mod q without division.
        /// Result is congruent to `a` and lies in [0, 2q-1].
        #[inline]
        pub const fn $name(a: $coeff) -> $coeff {
            let a = a as $wide;
            let t = ((a * $barrett_mul) >> $shift) as $coeff;
            (a - (t as $wide) * ($q as $wide)) as $coeff
        }
    };
}

/// Generate Montgomery reduction function for an unsigned coefficient type.
///
/// Montgomery reduction computes `a * R^(-1) mod q` where `R = 2^rlog`.
/// `R` need not match the width of the wide type; the low `rlog` bits are
/// masked explicitly. All arithmetic wraps in the wide type.
///
/// # Parameters
/// - `$name`: Function name (e.g., `montgomery_reduce`)
/// - `$coeff`: Coefficient type (`u16`)
/// - `$wide`: Wide type for input (`u32`)
/// - `$q`: The prime modulus
/// - `$qinv`: -q^(-1) mod R
/// - `$rlog`: log2(R)
#[macro_export]
macro_rules! define_montgomery_reduce {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        wide: $wide:ty,
        q: $q:expr,
        qinv: $qinv:expr,
        rlog: $rlog:expr
    ) => {
        /// Montgomery reduction: compute a * R^(-1) mod q, result in [0, 2q-1]
        /// for `a < q * R`.
        #[inline]
        pub const fn $name(a: $wide) -> $coeff {
            let mask: $wide = (1 << $rlog) - 1;
            // u = (a mod R) * (-q^-1) mod R, so a + u*q is divisible by R
            let u = a.wrapping_mul($qinv as $wide) & mask;
            let u = u.wrapping_mul($q as $wide);
            (a.wrapping_add(u) >> $rlog) as $coeff
        }
    };
}

/// Generate Montgomery multiplication function.
///
/// Computes `a * b * R^(-1) mod q` for values in Montgomery form.
#[macro_export]
macro_rules! define_montgomery_mul {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        wide: $wide:ty,
        montgomery_reduce: $mont_reduce:ident
    ) => {
        /// Montgomery multiplication: compute a * b * R^(-1) mod q.
        #[inline]
        pub const fn $name(a: $coeff, b: $coeff) -> $coeff {
            $mont_reduce((a as $wide).wrapping_mul(b as $wide))
        }
    };
}

/// Generate freeze function (reduce to canonical [0, q-1]).
///
/// The final conditional subtraction is a masked select on the sign bit of
/// `r - q`, with no data-dependent branch.
#[macro_export]
macro_rules! define_freeze {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        signed: $signed:ty,
        q: $q:expr,
        reduce_approx: $reduce_approx:ident
    ) => {
        /// Freeze: reduce to canonical [0, q-1] range.
        #[inline]
        pub const fn $name(a: $coeff) -> $coeff {
            let r = $reduce_approx(a);
            let m = r.wrapping_sub($q);
            // mask is all ones when r < q (m wrapped negative), else zero
            let mask = ((m as $signed) >> (core::mem::size_of::<$coeff>() * 8 - 1)) as $coeff;
            m ^ ((r ^ m) & mask)
        }
    };
}

#[cfg(test)]
mod tests {
    const Q: u16 = 12289;

    define_barrett_reduce! {
        name: test_barrett,
        coeff: u16,
        wide: u32,
        q: Q,
        barrett_mul: 5u32,
        shift: 16
    }

    define_montgomery_reduce! {
        name: test_montgomery,
        coeff: u16,
        wide: u32,
        q: Q,
        qinv: 12287u32,
        rlog: 18
    }

    define_montgomery_mul! {
        name: test_montgomery_mul,
        coeff: u16,
        wide: u32,
        montgomery_reduce: test_montgomery
    }

    define_freeze! {
        name: test_freeze,
        coeff: u16,
        signed: i16,
        q: Q,
        reduce_approx: test_barrett
    }

    #[test]
    fn test_barrett_basic() {
        assert_eq!(test_barrett(0), 0);
        let r = test_barrett(Q);
        assert!(r == 0 || r == Q, "Barrett(q) should be 0 or q, got {}", r);
        let r = test_barrett(Q + 1);
        assert!(r == 1 || r == Q + 1, "Barrett(q+1) should be 1 or q+1, got {}", r);
    }

    #[test]
    fn test_barrett_full_range() {
        for a in 0..=u16::MAX {
            let r = test_barrett(a);
            assert!(r < 2 * Q, "Barrett({}) = {} out of [0, 2q)", a, r);
            assert_eq!(r % Q, a % Q, "Barrett({}) not congruent", a);
        }
    }

    #[test]
    fn test_freeze_full_range() {
        for a in 0..=u16::MAX {
            assert_eq!(test_freeze(a), a % Q, "freeze({})", a);
        }
    }

    #[test]
    fn test_montgomery_of_r_is_one() {
        // R = 2^18, so montgomery_reduce(R) = 1 (mod q)
        let r = test_montgomery(1 << 18);
        assert_eq!(r % Q, 1);
    }

    #[test]
    fn test_montgomery_mul_recovers_product() {
        // R^2 mod q = 3186; mont(a * mont(R^2 * b)) = a * b mod q
        for &a in &[0u16, 1, 2, 100, 6144, 12288] {
            for &b in &[0u16, 1, 3, 777, 9000, 12288] {
                let t = test_montgomery(3186 * b as u32);
                let r = test_montgomery_mul(a, t);
                assert!(r < 2 * Q);
                assert_eq!(r as u32 % Q as u32, (a as u32 * b as u32) % Q as u32);
            }
        }
    }
}
