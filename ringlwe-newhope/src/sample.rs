//! Sampling functions for NewHope.
//!
//! - [`sample_uniform`]: rejection sampling of the public polynomial `a`
//!   from SHAKE128 output, directly in the NTT domain
//! - [`sample_noise`]: centered binomial noise (parameter 16) from the
//!   ChaCha20 keystream

use crate::hash::Xof;
use crate::params::common::{N, NOISE_BYTES, Q, SEED_SIZE, SHAKE128_RATE, UNIFORM_INITIAL_BLOCKS};
use crate::poly::{Normal, Ntt, Poly};
use crate::stream::{keystream, NONCE_SIZE};
use zeroize::Zeroizing;

/// Sample a uniform polynomial in the NTT domain from a public seed.
///
/// Each little-endian 16-bit window of the SHAKE128 stream is masked to
/// 14 bits and kept if it is below q. Sixteen blocks are squeezed up
/// front; further blocks are squeezed one at a time as needed.
///
/// # Arguments
/// * `seed` - 32-byte public seed
///
/// # Returns
/// Polynomial with coefficients uniformly distributed in [0, q-1]
pub fn sample_uniform(seed: &[u8; SEED_SIZE]) -> Poly<Ntt> {
    let mut xof = Xof::new(seed);
    let mut buf = [0u8; SHAKE128_RATE * UNIFORM_INITIAL_BLOCKS];
    xof.squeeze(&mut buf);

    let mut coeffs = [0u16; N];
    let mut ctr = 0;
    let mut pos = 0;
    let mut len = buf.len();

    while ctr < N {
        if pos + 2 > len {
            xof.squeeze(&mut buf[..SHAKE128_RATE]);
            len = SHAKE128_RATE;
            pos = 0;
        }

        let val = u16::from_le_bytes([buf[pos], buf[pos + 1]]) & 0x3fff;
        if val < Q {
            coeffs[ctr] = val;
            ctr += 1;
        }
        pos += 2;
    }

    Poly::from_coeffs(coeffs)
}

/// Sample a noise polynomial from a secret seed and a one-byte nonce.
///
/// Every coefficient is the difference of two 16-bit Hamming weights
/// taken from one little-endian u32 of keystream, offset by q so that it
/// stays non-negative. Values land in `[q - 16, q + 16]`, unreduced.
///
/// The keystream buffer is zeroized before returning.
pub fn sample_noise(seed: &[u8; SEED_SIZE], nonce: u8) -> Poly<Normal> {
    let mut buf = Zeroizing::new([0u8; NOISE_BYTES]);
    let mut n = [0u8; NONCE_SIZE];
    n[0] = nonce;
    keystream(seed, &n, &mut buf[..]);

    let mut poly = Poly::<Normal>::zero();
    for (c, chunk) in poly.coeffs.iter_mut().zip(buf.chunks_exact(4)) {
        let t = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let mut d = 0u32;
        for j in 0..8 {
            d += (t >> j) & 0x0101_0101;
        }
        let a = ((d >> 8) & 0xff) + (d & 0xff);
        let b = (d >> 24) + ((d >> 16) & 0xff);
        *c = (a + Q as u32 - b) as u16;
    }

    poly
}
