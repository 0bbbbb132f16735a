//! Reconciliation over the D̃4 lattice.
//!
//! The responder holds `v`, the initiator holds `v'` close to it. The
//! responder publishes a 2-bit hint per coefficient with [`help_rec`];
//! both sides then run [`rec`] on their own element and the same hint and
//! obtain the same 256-bit key. Coefficients are processed in groups of
//! four: `(v[i], v[i+256], v[i+512], v[i+768])`.
//!
//! All selections are mask-based; no branch depends on secret data.

use crate::params::common::{HINT_BYTES, KEY_BYTES, N, SEED_SIZE};
use crate::poly::{Normal, Poly};
use crate::stream::{keystream, NONCE_SIZE};
use zeroize::{Zeroize, Zeroizing};

const Q: i32 = crate::params::common::Q as i32;

/// Groups per polynomial.
const GROUPS: usize = N / 4;

/// How much randomness the hint dither draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconciliationMode {
    /// One random bit per group; the dither takes two positions (0 or 4).
    #[default]
    Standard,
    /// Three random bits per group; the dither takes all eight positions
    /// of one input unit.
    Hardened,
}

impl ReconciliationMode {
    /// Dither bytes drawn from the keystream.
    pub const fn random_bytes(self) -> usize {
        match self {
            ReconciliationMode::Standard => 32,
            ReconciliationMode::Hardened => 96,
        }
    }

    /// Lowercase name for logs and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            ReconciliationMode::Standard => "standard",
            ReconciliationMode::Hardened => "hardened",
        }
    }

    fn dither(self, rand: &[u8], i: usize) -> i32 {
        match self {
            ReconciliationMode::Standard => 4 * ((rand[i >> 3] >> (i & 7)) & 1) as i32,
            ReconciliationMode::Hardened => {
                let g = 3 * (i >> 3);
                let bits = (rand[g] as u32)
                    | ((rand[g + 1] as u32) << 8)
                    | ((rand[g + 2] as u32) << 16);
                ((bits >> (3 * (i & 7))) & 7) as i32
            }
        }
    }
}

/// Reconciliation hint: one 2-bit symbol per coefficient.
#[derive(Clone, PartialEq, Eq)]
pub struct Hint {
    symbols: [u8; N],
}

impl Hint {
    /// Build a hint from symbols, masking each to 2 bits.
    pub fn from_symbols(mut symbols: [u8; N]) -> Self {
        for s in symbols.iter_mut() {
            *s &= 3;
        }
        Self { symbols }
    }

    /// Hint symbols, each in `0..4`.
    pub fn symbols(&self) -> &[u8; N] {
        &self.symbols
    }

    /// Pack into `out[..256]`.
    pub fn pack(&self, out: &mut [u8]) {
        crate::encode::pack_hint(&self.symbols, out);
    }

    /// Unpack from `bytes[..256]`.
    pub fn unpack(bytes: &[u8]) -> Self {
        Self {
            symbols: crate::encode::unpack_hint(&bytes[..HINT_BYTES]),
        }
    }
}

impl core::fmt::Debug for Hint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hint").finish_non_exhaustive()
    }
}

#[inline]
fn ct_abs(v: i32) -> i32 {
    let mask = v >> 31;
    (v ^ mask) - mask
}

/// Distance from `x` to the nearest multiple of 2q, plus the two candidate
/// quotients: `v0 = round(x / 2q)` and `v1` for the half-shifted lattice.
#[inline]
fn f(x: i32) -> (i32, i32, i32) {
    // t = floor(x / q), via 2730 / 2^25 ~ 1/q
    let mut t = (x * 2730) >> 25;
    t -= (12288 - (x - t * 12289)) >> 31;

    let v0 = (t >> 1) + (t & 1);
    let t = t - 1;
    let v1 = (t >> 1) + (t & 1);

    (ct_abs(x - v0 * 2 * Q), v0, v1)
}

/// Distance from `x` to the nearest multiple of 8q.
#[inline]
fn g(x: i32) -> i32 {
    // t = floor(x / 4q)
    let mut t = (x * 2730) >> 27;
    t -= (49155 - (x - t * 49156)) >> 31;

    let t = ((t >> 1) + (t & 1)) * 8 * Q;
    ct_abs(t - x)
}

/// One bit from a point of the fundamental region of D̃4.
#[inline]
fn ld_decode(xs: &[i32; 4]) -> u8 {
    let t = g(xs[0]) + g(xs[1]) + g(xs[2]) + g(xs[3]);
    (((t - 8 * Q) >> 31) & 1) as u8
}

/// Compute the reconciliation hint for `v`.
///
/// The dither is drawn from the keystream of `seed` at nonce
/// `[0, 0, 0, 0, 0, 0, 0, nonce]`; `mode` decides how many bits it uses.
pub fn help_rec(
    v: &Poly<Normal>,
    seed: &[u8; SEED_SIZE],
    nonce: u8,
    mode: ReconciliationMode,
) -> Hint {
    let mut n = [0u8; NONCE_SIZE];
    n[NONCE_SIZE - 1] = nonce;
    let mut rand = Zeroizing::new([0u8; 96]);
    keystream(seed, &n, &mut rand[..mode.random_bytes()]);

    let mut symbols = [0u8; N];
    let mut v0 = [0i32; 4];
    let mut v1 = [0i32; 4];

    for i in 0..GROUPS {
        let d = mode.dither(&rand[..], i);

        let mut sum = 0;
        for j in 0..4 {
            let (dist, a, b) = f(8 * v.coeffs[256 * j + i] as i32 + d);
            sum += dist;
            v0[j] = a;
            v1[j] = b;
        }

        // k = -1 selects the half-integer point
        let k = (2 * Q - 1 - sum) >> 31;
        for j in 0..4 {
            v0[j] = (!k & v0[j]) ^ (k & v1[j]);
        }

        symbols[i] = ((v0[0] - v0[3]) & 3) as u8;
        symbols[256 + i] = ((v0[1] - v0[3]) & 3) as u8;
        symbols[512 + i] = ((v0[2] - v0[3]) & 3) as u8;
        symbols[768 + i] = ((-k + 2 * v0[3]) & 3) as u8;
    }

    v0.zeroize();
    v1.zeroize();
    Hint { symbols }
}

/// Recover the 256-bit key from `v` and a hint.
///
/// Bits are packed little-endian within each byte of `key`.
pub fn rec(v: &Poly<Normal>, hint: &Hint, key: &mut [u8; KEY_BYTES]) {
    key.fill(0);
    let c = &hint.symbols;
    let mut xs = [0i32; 4];

    for i in 0..GROUPS {
        let c3 = c[768 + i] as i32;
        for j in 0..3 {
            xs[j] = 16 * Q + 8 * v.coeffs[256 * j + i] as i32
                - Q * (2 * c[256 * j + i] as i32 + c3);
        }
        xs[3] = 16 * Q + 8 * v.coeffs[768 + i] as i32 - Q * c3;

        key[i >> 3] |= ld_decode(&xs) << (i & 7);
    }

    xs.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_random_poly(seed: u32) -> Poly<Normal> {
        let mut x = seed;
        let mut c = [0u16; N];
        for v in c.iter_mut() {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12345) & 0x7fff_ffff;
            *v = (x % Q as u32) as u16;
        }
        Poly::from_coeffs(c)
    }

    fn perturb(v: &Poly<Normal>, salt: usize) -> Poly<Normal> {
        let mut c = [0u16; N];
        for i in 0..N {
            let e = ((i * 31 + salt) % 33) as i32 - 16;
            c[i] = (v.coeffs()[i] as i32 + e).rem_euclid(Q) as u16;
        }
        Poly::from_coeffs(c)
    }

    #[test]
    fn test_f_nearest_multiple() {
        // 0 is a multiple of 2q; v1 is the quotient one half-step below
        assert_eq!(f(0), (0, 0, 0));
        let (d, v0, _) = f(2 * Q);
        assert_eq!((d, v0), (0, 1));
        let (d, v0, _) = f(2 * Q + 5);
        assert_eq!((d, v0), (5, 1));
        let (d, v0, _) = f(3 * Q + 1);
        assert_eq!((d, v0), (Q - 1, 2));
    }

    #[test]
    fn test_g_distance() {
        assert_eq!(g(0), 0);
        assert_eq!(g(8 * Q), 0);
        assert_eq!(g(8 * Q + 100), 100);
        assert_eq!(g(16 * Q - 7), 7);
        assert_eq!(g(4 * Q), 4 * Q);
    }

    #[test]
    fn test_ld_decode_threshold() {
        assert_eq!(ld_decode(&[0, 0, 0, 0]), 1);
        assert_eq!(ld_decode(&[4 * Q, 4 * Q, 4 * Q, 4 * Q]), 0);
        assert_eq!(ld_decode(&[2 * Q, 2 * Q, 2 * Q, 2 * Q - 1]), 1);
    }

    #[test]
    fn test_rec_agrees_under_noise() {
        for (s, mode) in [
            (1, ReconciliationMode::Standard),
            (2, ReconciliationMode::Standard),
            (3, ReconciliationMode::Hardened),
            (4, ReconciliationMode::Hardened),
        ] {
            let v = pseudo_random_poly(s);
            let hint = help_rec(&v, &[s as u8 + 7; 32], 3, mode);

            let mut k1 = [0u8; KEY_BYTES];
            let mut k2 = [0u8; KEY_BYTES];
            rec(&v, &hint, &mut k1);
            rec(&perturb(&v, s as usize), &hint, &mut k2);
            assert_eq!(k1, k2, "seed {} mode {:?}", s, mode);

            let ones: u32 = k1.iter().map(|b| b.count_ones()).sum();
            assert!((80..=176).contains(&ones), "unbalanced key: {} ones", ones);
        }
    }

    #[test]
    fn test_hint_symbols_are_two_bits() {
        let v = pseudo_random_poly(9);
        for mode in [ReconciliationMode::Standard, ReconciliationMode::Hardened] {
            let hint = help_rec(&v, &[1; 32], 0, mode);
            assert!(hint.symbols().iter().all(|&s| s < 4));
        }
    }

    #[test]
    fn test_help_rec_deterministic() {
        let v = pseudo_random_poly(5);
        let a = help_rec(&v, &[3; 32], 3, ReconciliationMode::Hardened);
        let b = help_rec(&v, &[3; 32], 3, ReconciliationMode::Hardened);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hint_pack_roundtrip() {
        let v = pseudo_random_poly(11);
        let hint = help_rec(&v, &[4; 32], 3, ReconciliationMode::Standard);
        let mut bytes = [0u8; HINT_BYTES];
        hint.pack(&mut bytes);
        assert_eq!(Hint::unpack(&bytes), hint);
    }

    #[test]
    fn test_from_symbols_masks() {
        let hint = Hint::from_symbols([0xff; N]);
        assert!(hint.symbols().iter().all(|&s| s == 3));
    }

    #[test]
    fn test_mode_defaults() {
        assert_eq!(ReconciliationMode::default(), ReconciliationMode::Standard);
        assert_eq!(ReconciliationMode::Standard.random_bytes(), 32);
        assert_eq!(ReconciliationMode::Hardened.random_bytes(), 96);
        assert_eq!(ReconciliationMode::Hardened.name(), "hardened");
    }
}
