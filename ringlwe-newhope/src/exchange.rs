//! NewHope exchange engine.
//!
//! One generic exchange serves both protocol variants: the way the
//! responder turns its `v` into a payload and a shared key is an
//! [`Agreement`] strategy, and the encoding of ring elements is a
//! [`WireLayout`]. Variant modules wrap these functions with fixed-size
//! key types.
//!
//! ```text
//! Alice                                   Bob
//! s, e <- noise; b = a*s + e
//!            -------- b || seed -------->
//!                                         s', e', e'' <- noise
//!                                         u = a*s' + e'
//!                                         v = b*s' + e''
//!            <------ u || payload -------
//! v' = s*u
//! ```

use crate::encode::{compress, decode_message, decompress, encode_message, WireLayout};
use crate::hash::sha3_256;
use crate::params::common::{COMPRESSED_BYTES, HINT_BYTES, KEY_BYTES, SEED_SIZE};
use crate::poly::{Normal, Ntt, Poly};
use crate::reconcile::{help_rec, rec, Hint, ReconciliationMode};
use crate::sample::{sample_noise, sample_uniform};
use crate::stream::{keystream, NONCE_SIZE};
use rand_core::TryCryptoRng;
use ringlwe_core::{Error, Result};
use zeroize::Zeroizing;

/// Noise nonces. The reconciliation dither and the NewHope-Simple message
/// both draw from nonce 3, at opposite ends of the nonce bytes.
const NONCE_S: u8 = 0;
const NONCE_E: u8 = 1;
const NONCE_E2: u8 = 2;
const NONCE_AGREEMENT: u8 = 3;

/// Per-exchange configuration, chosen by the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExchangeConfig {
    /// Dither strength for the reconciliation hint.
    pub mode: ReconciliationMode,
}

impl ExchangeConfig {
    /// Configuration with the hardened reconciliation dither.
    pub const fn hardened() -> Self {
        Self {
            mode: ReconciliationMode::Hardened,
        }
    }
}

/// How the responder turns `v` into a payload and key material, and how the
/// initiator recovers the same material from `v'`.
pub trait Agreement {
    /// Size of the payload following `u` in the responder message.
    const PAYLOAD_SIZE: usize;

    /// Short name for diagnostics.
    const NAME: &'static str;

    /// Responder side. Writes `PAYLOAD_SIZE` bytes to `payload`.
    fn respond(
        v: &Poly<Normal>,
        noise_seed: &[u8; SEED_SIZE],
        config: &ExchangeConfig,
        payload: &mut [u8],
        key: &mut [u8; KEY_BYTES],
    );

    /// Initiator side.
    fn finish(v: &Poly<Normal>, payload: &[u8], key: &mut [u8; KEY_BYTES]);
}

/// Reconciliation: the payload is the packed hint.
#[derive(Debug, Clone, Copy)]
pub struct Reconciliation;

impl Agreement for Reconciliation {
    const PAYLOAD_SIZE: usize = HINT_BYTES;
    const NAME: &'static str = "newhope";

    fn respond(
        v: &Poly<Normal>,
        noise_seed: &[u8; SEED_SIZE],
        config: &ExchangeConfig,
        payload: &mut [u8],
        key: &mut [u8; KEY_BYTES],
    ) {
        let hint = help_rec(v, noise_seed, NONCE_AGREEMENT, config.mode);
        hint.pack(payload);
        rec(v, &hint, key);
    }

    fn finish(v: &Poly<Normal>, payload: &[u8], key: &mut [u8; KEY_BYTES]) {
        rec(v, &Hint::unpack(payload), key);
    }
}

/// NewHope-Simple: the responder encrypts a fresh message into `v` and
/// sends it compressed. The reconciliation mode does not apply.
#[derive(Debug, Clone, Copy)]
pub struct SimpleEncoding;

impl Agreement for SimpleEncoding {
    const PAYLOAD_SIZE: usize = COMPRESSED_BYTES;
    const NAME: &'static str = "newhope-simple";

    fn respond(
        v: &Poly<Normal>,
        noise_seed: &[u8; SEED_SIZE],
        _config: &ExchangeConfig,
        payload: &mut [u8],
        key: &mut [u8; KEY_BYTES],
    ) {
        let mut n = [0u8; NONCE_SIZE];
        n[0] = NONCE_AGREEMENT;
        keystream(noise_seed, &n, key);

        let c = v.add(&encode_message(key));
        compress(&c, payload);
    }

    fn finish(v: &Poly<Normal>, payload: &[u8], key: &mut [u8; KEY_BYTES]) {
        let k = decompress(payload).sub(v);
        decode_message(&k, key);
    }
}

/// Fill `buf` from the caller's random source.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn fill_random(rng: &mut impl TryCryptoRng, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf).map_err(|_| {
        tracing::warn!("random source failed");
        Error::RandomSourceFailure
    })
}

#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
fn check_payload(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        tracing::warn!(expected, actual = bytes.len(), "rejecting peer payload");
        return Err(Error::MalformedPeerPayload {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Initiator key generation.
///
/// Writes `b || seed` to `send_a`, which must be `L::POLY_BYTES + 32`
/// bytes long, and returns the private key `s` in the NTT domain.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn keygen<L: WireLayout>(
    seed: &[u8; SEED_SIZE],
    noise_seed: &[u8; SEED_SIZE],
    send_a: &mut [u8],
) -> Poly<Ntt> {
    let a = sample_uniform(seed);
    let s = sample_noise(noise_seed, NONCE_S).into_ntt();
    let e = sample_noise(noise_seed, NONCE_E).into_ntt();

    let b = e.add(&s.pointwise(&a));
    L::encode(&b, &mut send_a[..L::POLY_BYTES]);
    send_a[L::POLY_BYTES..L::POLY_BYTES + SEED_SIZE].copy_from_slice(seed);

    tracing::debug!(layout = L::NAME, "initiator key generated");
    s
}

/// Responder step.
///
/// Writes `u || payload` to `send_b`, which must be
/// `L::POLY_BYTES + A::PAYLOAD_SIZE` bytes long, and returns the shared
/// secret.
///
/// # Errors
/// [`Error::MalformedPeerPayload`] if `send_a` has the wrong length.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn respond<A: Agreement, L: WireLayout>(
    send_a: &[u8],
    noise_seed: &[u8; SEED_SIZE],
    config: &ExchangeConfig,
    send_b: &mut [u8],
) -> Result<Zeroizing<[u8; 32]>> {
    check_payload(send_a, L::POLY_BYTES + SEED_SIZE)?;

    let b: Poly<Ntt> = L::decode(&send_a[..L::POLY_BYTES]);
    let mut seed = [0u8; SEED_SIZE];
    seed.copy_from_slice(&send_a[L::POLY_BYTES..]);
    let a = sample_uniform(&seed);

    let sp = sample_noise(noise_seed, NONCE_S).into_ntt();
    let ep = sample_noise(noise_seed, NONCE_E).into_ntt();
    let epp = sample_noise(noise_seed, NONCE_E2);

    let u = a.pointwise(&sp).add(&ep);
    let v = b.pointwise(&sp).into_normal().add(&epp);

    let (u_bytes, payload) = send_b.split_at_mut(L::POLY_BYTES);
    L::encode(&u, u_bytes);

    let mut key = Zeroizing::new([0u8; KEY_BYTES]);
    A::respond(&v, noise_seed, config, payload, &mut key);

    tracing::debug!(
        variant = A::NAME,
        layout = L::NAME,
        mode = config.mode.name(),
        "responder finished"
    );
    Ok(Zeroizing::new(sha3_256(&key[..])))
}

/// Initiator completion.
///
/// # Errors
/// [`Error::MalformedPeerPayload`] if `send_b` has the wrong length.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn finish<A: Agreement, L: WireLayout>(
    sk: &Poly<Ntt>,
    send_b: &[u8],
) -> Result<Zeroizing<[u8; 32]>> {
    check_payload(send_b, L::POLY_BYTES + A::PAYLOAD_SIZE)?;

    let u: Poly<Ntt> = L::decode(&send_b[..L::POLY_BYTES]);
    let v = sk.pointwise(&u).into_normal();

    let mut key = Zeroizing::new([0u8; KEY_BYTES]);
    A::finish(&v, &send_b[L::POLY_BYTES..], &mut key);

    tracing::debug!(variant = A::NAME, layout = L::NAME, "initiator finished");
    Ok(Zeroizing::new(sha3_256(&key[..])))
}

/// Draw the two initiator seeds, public seed first.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn draw_initiator_seeds(
    rng: &mut impl TryCryptoRng,
) -> Result<(Zeroizing<[u8; SEED_SIZE]>, Zeroizing<[u8; SEED_SIZE]>)> {
    let mut seed = Zeroizing::new([0u8; SEED_SIZE]);
    let mut noise_seed = Zeroizing::new([0u8; SEED_SIZE]);
    fill_random(rng, &mut seed[..])?;
    fill_random(rng, &mut noise_seed[..])?;
    Ok((seed, noise_seed))
}

/// Draw the responder noise seed.
#[cfg_attr(not(any(feature = "newhope", feature = "newhope-simple")), allow(dead_code))]
pub(crate) fn draw_responder_seed(
    rng: &mut impl TryCryptoRng,
) -> Result<Zeroizing<[u8; SEED_SIZE]>> {
    let mut noise_seed = Zeroizing::new([0u8; SEED_SIZE]);
    fill_random(rng, &mut noise_seed[..])?;
    Ok(noise_seed)
}
