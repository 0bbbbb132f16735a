//! Secret erasure and random-source failure handling.
//!
//! Instrumented random sources stand in for the caller's RNG: one fails
//! after a set number of bytes, the other counts what was drawn.

use rand_core::{TryCryptoRng, TryRngCore};
use ringlwe_newhope::params::common::N;
use ringlwe_newhope::poly::{Normal, Ntt, Poly};
use ringlwe_newhope::stream::chacha20_keystream;
use ringlwe_newhope::Error;
use zeroize::Zeroize;

/// Yields `0x5a` bytes until `budget` is spent, then fails.
struct FailingRng {
    budget: usize,
}

impl TryRngCore for FailingRng {
    type Error = &'static str;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        let mut b = [0u8; 4];
        self.try_fill_bytes(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        let mut b = [0u8; 8];
        self.try_fill_bytes(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        if dst.len() > self.budget {
            return Err("entropy exhausted");
        }
        self.budget -= dst.len();
        dst.fill(0x5a);
        Ok(())
    }
}

impl TryCryptoRng for FailingRng {}

/// Counts calls and bytes; output is a simple counter.
#[derive(Default)]
struct CountingRng {
    calls: usize,
    bytes: usize,
    next: u8,
}

impl TryRngCore for CountingRng {
    type Error = &'static str;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        let mut b = [0u8; 4];
        self.try_fill_bytes(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        let mut b = [0u8; 8];
        self.try_fill_bytes(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.calls += 1;
        self.bytes += dst.len();
        for b in dst.iter_mut() {
            *b = self.next;
            self.next = self.next.wrapping_add(1);
        }
        Ok(())
    }
}

impl TryCryptoRng for CountingRng {}

#[test]
fn poly_zeroize_clears_coefficients() {
    let mut p: Poly<Normal> = Poly::from_coeffs([1234; N]);
    p.zeroize();
    assert!(p.coeffs().iter().all(|&c| c == 0));

    let mut p: Poly<Ntt> = Poly::from_coeffs([77; N]);
    p.reset();
    assert!(p.coeffs().iter().all(|&c| c == 0));
}

#[test]
fn keystream_rejects_bad_lengths_without_output() {
    let mut out = [0xaa; 64];
    assert_eq!(
        chacha20_keystream(&[0u8; 31], &[0u8; 8], &mut out),
        Err(Error::InvalidKeyLength {
            expected: 32,
            actual: 31
        })
    );
    assert_eq!(
        chacha20_keystream(&[0u8; 32], &[0u8; 12], &mut out),
        Err(Error::InvalidNonceLength {
            expected: 8,
            actual: 12
        })
    );
    assert!(out.iter().all(|&b| b == 0xaa));
}

#[cfg(feature = "newhope")]
mod newhope_erasure {
    use super::*;
    use ringlwe_newhope::newhope_types::{PrivateKey, SharedSecret};
    use ringlwe_newhope::{ExchangeConfig, KeyExchange, NewHope};

    #[test]
    fn keygen_fails_cleanly_without_entropy() {
        let mut rng = FailingRng { budget: 0 };
        assert_eq!(
            NewHope::keygen(&mut rng).unwrap_err(),
            Error::RandomSourceFailure
        );

        // Public seed drawn, noise seed not
        let mut rng = FailingRng { budget: 32 };
        assert_eq!(
            NewHope::keygen(&mut rng).unwrap_err(),
            Error::RandomSourceFailure
        );
    }

    #[test]
    fn respond_fails_cleanly_without_entropy() {
        let (_, pk) = NewHope::keygen_from_seeds(&[1; 32], &[2; 32]);
        let mut rng = FailingRng { budget: 16 };
        assert_eq!(
            NewHope::respond(&pk, &ExchangeConfig::default(), &mut rng).unwrap_err(),
            Error::RandomSourceFailure
        );
    }

    #[test]
    fn entropy_drawn_per_step() {
        let mut rng = CountingRng::default();
        let (sk, pk) = NewHope::keygen(&mut rng).unwrap();
        assert_eq!((rng.calls, rng.bytes), (2, 64));

        let (msg, _) = NewHope::respond(&pk, &ExchangeConfig::hardened(), &mut rng).unwrap();
        assert_eq!((rng.calls, rng.bytes), (3, 96));

        // Finishing draws nothing
        let _ = NewHope::finish(sk, &msg).unwrap();
        assert_eq!((rng.calls, rng.bytes), (3, 96));
    }

    #[test]
    fn keygen_output_follows_random_source() {
        let mut counting = CountingRng::default();
        let (_, pk) = NewHope::keygen(&mut counting).unwrap();

        let mut seed = [0u8; 32];
        let mut noise = [0u8; 32];
        for i in 0..32 {
            seed[i] = i as u8;
            noise[i] = (32 + i) as u8;
        }
        let (_, expected) = NewHope::keygen_from_seeds(&seed, &noise);
        assert_eq!(pk, expected);
    }

    #[test]
    fn private_key_zeroize() {
        let (mut sk, _) = NewHope::keygen_from_seeds(&[3; 32], &[4; 32]);
        assert!(sk.to_bytes().iter().any(|&b| b != 0));
        sk.zeroize();
        assert!(sk.to_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn private_key_bytes_roundtrip_into_fresh_key() {
        let (sk, _) = NewHope::keygen_from_seeds(&[3; 32], &[4; 32]);
        let bytes = sk.to_bytes();
        let restored = PrivateKey::from_bytes(&bytes[..]).unwrap();
        assert_eq!(&restored.to_bytes()[..], &bytes[..]);
    }

    #[test]
    fn secrets_wipe_on_drop() {
        fn wipes_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        wipes_on_drop::<PrivateKey>();
        wipes_on_drop::<SharedSecret>();
        wipes_on_drop::<Poly<Normal>>();
        wipes_on_drop::<Poly<Ntt>>();
    }

    #[test]
    fn shared_secret_zeroize() {
        let (_, pk) = NewHope::keygen_from_seeds(&[5; 32], &[6; 32]);
        let (_, mut ss): (_, SharedSecret) =
            NewHope::respond_from_seed(&pk, &[7; 32], &ExchangeConfig::default()).unwrap();
        assert!(ss.as_ref().iter().any(|&b| b != 0));
        ss.zeroize();
        assert!(ss.as_ref().iter().all(|&b| b == 0));
    }
}
