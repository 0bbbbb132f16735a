//! NTT (Number Theoretic Transform) macros for Ring-LWE.
//!
//! This module provides macros to generate the table-driven transform used
//! for negacyclic polynomial multiplication in `Z_q[x]/(x^n + 1)`.
//!
//! The butterfly network is Gentleman-Sande style, reading its input in
//! bit-reversed order and producing natural order. One network body serves
//! both directions: the caller picks the forward or inverse twiddle table,
//! and folds the psi (negative-wrap) factors in with a coefficientwise
//! multiply before or after.

/// Generate the butterfly network of the transform.
///
/// # Parameters
/// - `$name`: Function name (e.g., `ntt_network`)
/// - `$coeff`: Coefficient type (`u16`)
/// - `$wide`: Wide type for products (`u32`)
/// - `$n`: Ring degree (a power of four)
/// - `$lazy_offset`: Multiple of q added before subtraction so the difference
///   never wraps (typically `3q`)
/// - `$mont_reduce`: Montgomery reduction function
/// - `$barrett_reduce`: Barrett reduction function
///
/// # Generated function
/// `pub(crate) fn $name(coeffs: &mut [$coeff; $n], omegas: &[$coeff; $n / 2])`
///
/// Levels are processed with growing butterfly distance. On levels with an
/// even index the sums are left unreduced; on odd levels they are
/// Barrett-reduced, which keeps every sum below 2^16. Each difference is
/// multiplied by its twiddle and Montgomery-reduced. Within a level the
/// twiddle index restarts at zero for every starting offset.
#[macro_export]
macro_rules! define_ntt_network {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        wide: $wide:ty,
        n: $n:expr,
        lazy_offset: $lazy_offset:expr,
        montgomery_reduce: $mont_reduce:ident,
        barrett_reduce: $barrett_reduce:ident
    ) => {
        /// Table-driven butterfly network (bit-reversed in, natural order out).
        pub(crate) fn $name(coeffs: &mut [$coeff; $n], omegas: &[$coeff; $n / 2]) {
            let mut distance: usize = 1;

            while distance < $n {
                let reduce_sum = distance.trailing_zeros() % 2 == 1;

                for start in 0..distance {
                    let mut k: usize = 0;
                    let mut j = start;
                    while j < $n - 1 {
                        let w = omegas[k] as $wide;
                        k += 1;

                        let t = coeffs[j];
                        let x = coeffs[j + distance];
                        let sum = t.wrapping_add(x);
                        coeffs[j] = if reduce_sum { $barrett_reduce(sum) } else { sum };
                        let diff = (t as $wide + $lazy_offset as $wide).wrapping_sub(x as $wide);
                        coeffs[j + distance] = $mont_reduce(w.wrapping_mul(diff));

                        j += 2 * distance;
                    }
                }
                distance <<= 1;
            }
        }
    };
}

/// Generate a coefficientwise Montgomery multiply against a table.
///
/// Used to fold the psi powers (and the `n^-1` scaling on the inverse side)
/// into a polynomial before or after the butterfly network.
#[macro_export]
macro_rules! define_mul_coefficients {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        wide: $wide:ty,
        n: $n:expr,
        montgomery_reduce: $mont_reduce:ident
    ) => {
        /// Multiply each coefficient by the matching table entry (Montgomery).
        pub(crate) fn $name(coeffs: &mut [$coeff; $n], factors: &[$coeff; $n]) {
            for (c, &f) in coeffs.iter_mut().zip(factors.iter()) {
                *c = $mont_reduce((*c as $wide).wrapping_mul(f as $wide));
            }
        }
    };
}

/// Generate the in-place bit-reversal permutation over `log_n`-bit indices.
#[macro_export]
macro_rules! define_bitrev_permute {
    (
        name: $name:ident,
        coeff: $coeff:ty,
        n: $n:expr,
        log_n: $log_n:expr
    ) => {
        /// Swap every coefficient with the one at its bit-reversed index.
        pub(crate) fn $name(coeffs: &mut [$coeff; $n]) {
            for i in 0..$n {
                let r = ((i as u32).reverse_bits() >> (32 - $log_n)) as usize;
                if i < r {
                    coeffs.swap(i, r);
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    // Test with NewHope-like parameters (u16, q=12289, n=1024), tables
    // computed at test time from psi = 7.
    mod newhope_like {
        const Q: u16 = 12289;
        const N: usize = 1024;
        const LOG_N: u32 = 10;
        const R_MOD_Q: u64 = (1u64 << 18) % 12289;

        crate::define_barrett_reduce! {
            name: barrett_reduce,
            coeff: u16,
            wide: u32,
            q: Q,
            barrett_mul: 5u32,
            shift: 16
        }

        crate::define_montgomery_reduce! {
            name: montgomery_reduce,
            coeff: u16,
            wide: u32,
            q: Q,
            qinv: 12287u32,
            rlog: 18
        }

        crate::define_freeze! {
            name: freeze,
            coeff: u16,
            signed: i16,
            q: Q,
            reduce_approx: barrett_reduce
        }

        define_ntt_network! {
            name: ntt_network,
            coeff: u16,
            wide: u32,
            n: N,
            lazy_offset: 3 * Q,
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

        fn pow_mod(base: u64, mut exp: u64) -> u64 {
            let q = Q as u64;
            let mut b = base % q;
            let mut r = 1u64;
            while exp > 0 {
                if exp & 1 == 1 {
                    r = r * b % q;
                }
                b = b * b % q;
                exp >>= 1;
            }
            r
        }

        fn inv_mod(a: u64) -> u64 {
            pow_mod(a, Q as u64 - 2)
        }

        fn bitrev(i: usize, bits: u32) -> u64 {
            ((i as u32).reverse_bits() >> (32 - bits)) as u64
        }

        struct Tables {
            psis: [u16; N],
            psis_inv: [u16; N],
            omegas: [u16; N / 2],
            omegas_inv: [u16; N / 2],
        }

        fn tables() -> Tables {
            let psi = 7u64;
            let psi_inv = inv_mod(psi);
            let omega = psi * psi % Q as u64;
            let omega_inv = inv_mod(omega);
            let n_inv = inv_mod(N as u64);
            let q = Q as u64;
            let mut t = Tables {
                psis: [0; N],
                psis_inv: [0; N],
                omegas: [0; N / 2],
                omegas_inv: [0; N / 2],
            };
            for i in 0..N {
                t.psis[i] = (pow_mod(psi, bitrev(i, 10)) * R_MOD_Q % q) as u16;
                t.psis_inv[i] = (pow_mod(psi_inv, i as u64) * n_inv % q * R_MOD_Q % q) as u16;
            }
            for i in 0..N / 2 {
                t.omegas[i] = (pow_mod(omega, bitrev(i, 9)) * R_MOD_Q % q) as u16;
                t.omegas_inv[i] = (pow_mod(omega_inv, bitrev(i, 9)) * R_MOD_Q % q) as u16;
            }
            t
        }

        fn forward(c: &mut [u16; N], t: &Tables) {
            bitrev_vector(c);
            mul_coefficients(c, &t.psis);
            ntt_network(c, &t.omegas);
        }

        fn inverse(c: &mut [u16; N], t: &Tables) {
            bitrev_vector(c);
            ntt_network(c, &t.omegas_inv);
            mul_coefficients(c, &t.psis_inv);
        }

        fn negacyclic_mul(a: &[u16; N], b: &[u16; N]) -> [u16; N] {
            let q = Q as i64;
            let mut acc = [0i64; N];
            for i in 0..N {
                if a[i] == 0 {
                    continue;
                }
                for j in 0..N {
                    let p = a[i] as i64 * b[j] as i64 % q;
                    if i + j < N {
                        acc[i + j] += p;
                    } else {
                        acc[i + j - N] -= p;
                    }
                }
            }
            let mut r = [0u16; N];
            for (o, v) in r.iter_mut().zip(acc.iter()) {
                *o = v.rem_euclid(q) as u16;
            }
            r
        }

        #[test]
        fn test_table_heads() {
            let t = tables();
            assert_eq!(&t.psis[..4], &[4075, 6974, 7373, 7965]);
            assert_eq!(t.psis_inv[0], 256);
        }

        #[test]
        fn test_ntt_zero() {
            let t = tables();
            let mut coeffs = [0u16; N];
            forward(&mut coeffs, &t);
            for (i, &c) in coeffs.iter().enumerate() {
                assert_eq!(c % Q, 0, "NTT of zero should be zero at index {}", i);
            }
        }

        #[test]
        fn test_ntt_roundtrip() {
            let t = tables();
            let mut coeffs = [0u16; N];
            for (i, c) in coeffs.iter_mut().enumerate() {
                *c = ((i * 37 + 11) % Q as usize) as u16;
            }
            let original = coeffs;

            forward(&mut coeffs, &t);
            inverse(&mut coeffs, &t);

            for (i, (&got, &expected)) in coeffs.iter().zip(original.iter()).enumerate() {
                assert_eq!(freeze(got), expected, "roundtrip failed at index {}", i);
            }
        }

        #[test]
        fn test_convolution_theorem() {
            let t = tables();
            let mut a = [0u16; N];
            for (i, c) in a.iter_mut().enumerate() {
                *c = ((i * i + 5) % Q as usize) as u16;
            }
            let mut b = [0u16; N];
            b[0] = 3;
            b[1] = 12288;
            b[511] = 42;
            b[1023] = 9000;
            let expected = negacyclic_mul(&a, &b);

            let mut fa = a;
            let mut fb = b;
            forward(&mut fa, &t);
            forward(&mut fb, &t);
            let mut prod = [0u16; N];
            for i in 0..N {
                // mont(fa * mont(R^2 * fb)) = fa * fb
                let m = montgomery_reduce(3186 * fb[i] as u32);
                prod[i] = montgomery_reduce(fa[i] as u32 * m as u32);
            }
            inverse(&mut prod, &t);

            for i in 0..N {
                assert_eq!(freeze(prod[i]), expected[i], "convolution mismatch at {}", i);
            }
        }

        #[test]
        fn test_bitrev_is_involution() {
            let mut coeffs = [0u16; N];
            for (i, c) in coeffs.iter_mut().enumerate() {
                *c = i as u16;
            }
            bitrev_vector(&mut coeffs);
            assert_eq!(coeffs[1], 512);
            assert_eq!(coeffs[2], 256);
            bitrev_vector(&mut coeffs);
            for (i, &c) in coeffs.iter().enumerate() {
                assert_eq!(c as usize, i);
            }
        }
    }
}
