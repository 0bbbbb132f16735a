//! Byte encoding and decoding for NewHope.
//!
//! - Ring elements: two wire layouts behind [`WireLayout`], chosen per build
//! - Reconciliation hints: four 2-bit symbols per byte
//! - NewHope-Simple: 3-bit compression of `v` and the message/polynomial
//!   mapping
//!
//! All multi-byte values are little-endian.

#![allow(clippy::needless_range_loop)]

use crate::params::common::{
    ALIGNED_POLY_BYTES, COMPRESSED_BYTES, DENSE_POLY_BYTES, HINT_BYTES, KEY_BYTES, N, Q,
};
use crate::poly::{distance_to_half_q, Domain, Normal, Poly};
use crate::reduce::freeze;

/// Serialization of a ring element.
///
/// Encoding always freezes coefficients first. Decoding does not reject
/// out-of-range values: a 14-bit field above q is carried as an
/// unreduced coefficient.
pub trait WireLayout {
    /// Encoded size of one ring element.
    const POLY_BYTES: usize;

    /// Short name for diagnostics.
    const NAME: &'static str;

    /// Encode `poly` into `out[..POLY_BYTES]`.
    fn encode<D: Domain>(poly: &Poly<D>, out: &mut [u8]);

    /// Decode one ring element from `bytes[..POLY_BYTES]`.
    fn decode<D: Domain>(bytes: &[u8]) -> Poly<D>;
}

/// Dense packing: four 14-bit coefficients in seven bytes.
#[derive(Debug, Clone, Copy)]
pub struct Dense14;

/// Aligned packing: one little-endian u16 per coefficient, top two bits zero.
#[derive(Debug, Clone, Copy)]
pub struct Aligned16;

/// Layout selected at build time by the `aligned-wire` feature.
#[cfg(not(feature = "aligned-wire"))]
pub type BuildLayout = Dense14;

/// Layout selected at build time by the `aligned-wire` feature.
#[cfg(feature = "aligned-wire")]
pub type BuildLayout = Aligned16;

impl WireLayout for Dense14 {
    const POLY_BYTES: usize = DENSE_POLY_BYTES;
    const NAME: &'static str = "dense14";

    fn encode<D: Domain>(poly: &Poly<D>, out: &mut [u8]) {
        for (i, r) in out[..DENSE_POLY_BYTES].chunks_exact_mut(7).enumerate() {
            let t0 = poly.frozen(4 * i);
            let t1 = poly.frozen(4 * i + 1);
            let t2 = poly.frozen(4 * i + 2);
            let t3 = poly.frozen(4 * i + 3);

            r[0] = t0 as u8;
            r[1] = ((t0 >> 8) | (t1 << 6)) as u8;
            r[2] = (t1 >> 2) as u8;
            r[3] = ((t1 >> 10) | (t2 << 4)) as u8;
            r[4] = (t2 >> 4) as u8;
            r[5] = ((t2 >> 12) | (t3 << 2)) as u8;
            r[6] = (t3 >> 6) as u8;
        }
    }

    fn decode<D: Domain>(bytes: &[u8]) -> Poly<D> {
        let mut poly = Poly::<D>::zero();
        for (i, a) in bytes[..DENSE_POLY_BYTES].chunks_exact(7).enumerate() {
            let a: [u16; 7] = [
                a[0] as u16,
                a[1] as u16,
                a[2] as u16,
                a[3] as u16,
                a[4] as u16,
                a[5] as u16,
                a[6] as u16,
            ];
            poly.coeffs[4 * i] = a[0] | ((a[1] & 0x3f) << 8);
            poly.coeffs[4 * i + 1] = (a[1] >> 6) | (a[2] << 2) | ((a[3] & 0x0f) << 10);
            poly.coeffs[4 * i + 2] = (a[3] >> 4) | (a[4] << 4) | ((a[5] & 0x03) << 12);
            poly.coeffs[4 * i + 3] = (a[5] >> 2) | (a[6] << 6);
        }
        poly
    }
}

impl WireLayout for Aligned16 {
    const POLY_BYTES: usize = ALIGNED_POLY_BYTES;
    const NAME: &'static str = "aligned16";

    fn encode<D: Domain>(poly: &Poly<D>, out: &mut [u8]) {
        for (i, r) in out[..ALIGNED_POLY_BYTES].chunks_exact_mut(2).enumerate() {
            r.copy_from_slice(&poly.frozen(i).to_le_bytes());
        }
    }

    fn decode<D: Domain>(bytes: &[u8]) -> Poly<D> {
        let mut poly = Poly::<D>::zero();
        for (c, a) in poly.coeffs.iter_mut().zip(bytes[..ALIGNED_POLY_BYTES].chunks_exact(2)) {
            *c = u16::from_le_bytes([a[0], a[1]]) & 0x3fff;
        }
        poly
    }
}

/// Pack 1024 hint symbols (values 0..4) into 256 bytes.
pub fn pack_hint(symbols: &[u8; N], out: &mut [u8]) {
    for (i, r) in out[..HINT_BYTES].iter_mut().enumerate() {
        *r = symbols[4 * i]
            | (symbols[4 * i + 1] << 2)
            | (symbols[4 * i + 2] << 4)
            | (symbols[4 * i + 3] << 6);
    }
}

/// Unpack 256 bytes into 1024 hint symbols.
pub fn unpack_hint(bytes: &[u8]) -> [u8; N] {
    let mut symbols = [0u8; N];
    for (i, &b) in bytes[..HINT_BYTES].iter().enumerate() {
        symbols[4 * i] = b & 0x03;
        symbols[4 * i + 1] = (b >> 2) & 0x03;
        symbols[4 * i + 2] = (b >> 4) & 0x03;
        symbols[4 * i + 3] = b >> 6;
    }
    symbols
}

/// Compress each coefficient to 3 bits: `round(8 * x / q) mod 8`.
///
/// Eight coefficients pack into three bytes, 384 bytes in total.
pub fn compress(poly: &Poly<Normal>, out: &mut [u8]) {
    let q = Q as u32;
    for (i, r) in out[..COMPRESSED_BYTES].chunks_exact_mut(3).enumerate() {
        let mut t = [0u32; 8];
        for (j, tj) in t.iter_mut().enumerate() {
            let x = freeze(poly.coeffs[8 * i + j]) as u32;
            *tj = (((x << 3) + q / 2) / q) & 7;
        }

        r[0] = (t[0] | (t[1] << 3) | (t[2] << 6)) as u8;
        r[1] = ((t[2] >> 2) | (t[3] << 1) | (t[4] << 4) | (t[5] << 7)) as u8;
        r[2] = ((t[5] >> 1) | (t[6] << 2) | (t[7] << 5)) as u8;
    }
}

/// Inverse of [`compress`]: each 3-bit value `x` maps to `round(x * q / 8)`.
pub fn decompress(bytes: &[u8]) -> Poly<Normal> {
    let q = Q as u32;
    let mut poly = Poly::<Normal>::zero();
    for (i, a) in bytes[..COMPRESSED_BYTES].chunks_exact(3).enumerate() {
        let (a0, a1, a2) = (a[0] as u32, a[1] as u32, a[2] as u32);
        let t = [
            a0 & 7,
            (a0 >> 3) & 7,
            (a0 >> 6) | ((a1 << 2) & 4),
            (a1 >> 1) & 7,
            (a1 >> 4) & 7,
            (a1 >> 7) | ((a2 << 1) & 6),
            (a2 >> 2) & 7,
            a2 >> 5,
        ];
        for j in 0..8 {
            poly.coeffs[8 * i + j] = ((t[j] * q + 4) >> 3) as u16;
        }
    }
    poly
}

/// Map a 32-byte message to a polynomial.
///
/// Bit `i` sets coefficients `i`, `i + 256`, `i + 512` and `i + 768` to
/// q/2 when one and leaves them zero otherwise.
pub fn encode_message(msg: &[u8; KEY_BYTES]) -> Poly<Normal> {
    let mut poly = Poly::<Normal>::zero();
    for i in 0..N / 4 {
        let bit = ((msg[i >> 3] >> (i & 7)) & 1) as u16;
        let mask = 0u16.wrapping_sub(bit);
        for j in 0..4 {
            poly.coeffs[i + 256 * j] = mask & (Q / 2);
        }
    }
    poly
}

/// Recover a message from a noisy polynomial.
///
/// A bit is one when the four coefficients of its group are, in sum,
/// closer to q/2 than to zero.
pub fn decode_message(poly: &Poly<Normal>, msg: &mut [u8; KEY_BYTES]) {
    msg.fill(0);
    for i in 0..N / 4 {
        let mut t = 0u32;
        for j in 0..4 {
            t += distance_to_half_q(poly.coeffs[i + 256 * j]);
        }
        let bit = (t.wrapping_sub(Q as u32) >> 31) & 1;
        msg[i >> 3] |= (bit as u8) << (i & 7);
    }
}
