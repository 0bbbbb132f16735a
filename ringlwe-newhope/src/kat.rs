//! Known Answer Tests (KAT) for NewHope.
//!
//! Fixed inputs: public seed `00 01 .. 1f`, initiator noise seed `a5 * 32`,
//! responder noise seed `12 * 32`. Messages are checked through their
//! SHA3-256 digest plus a few raw bytes; shared secrets are checked in full.
//! Both wire layouts are exercised regardless of the build's choice.

use crate::encode::{Aligned16, Dense14, WireLayout};
use crate::exchange::{finish, keygen, respond, Agreement, ExchangeConfig, Reconciliation, SimpleEncoding};
use crate::hash::sha3_256;
use crate::params::common::SEED_SIZE;

/// Helper to decode hex string to bytes
fn hex_decode(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn public_seed() -> [u8; SEED_SIZE] {
    let mut seed = [0u8; SEED_SIZE];
    for (i, s) in seed.iter_mut().enumerate() {
        *s = i as u8;
    }
    seed
}

const ALICE_NOISE: [u8; SEED_SIZE] = [0xa5; SEED_SIZE];
const BOB_NOISE: [u8; SEED_SIZE] = [0x12; SEED_SIZE];

struct Transcript {
    send_a: Vec<u8>,
    send_b: Vec<u8>,
    ss_bob: [u8; 32],
    ss_alice: [u8; 32],
}

fn transcript<A: Agreement, L: WireLayout>(config: &ExchangeConfig) -> Transcript {
    let mut send_a = vec![0u8; L::POLY_BYTES + SEED_SIZE];
    let mut send_b = vec![0u8; L::POLY_BYTES + A::PAYLOAD_SIZE];

    let sk = keygen::<L>(&public_seed(), &ALICE_NOISE, &mut send_a);
    let ss_bob = respond::<A, L>(&send_a, &BOB_NOISE, config, &mut send_b).unwrap();
    let ss_alice = finish::<A, L>(&sk, &send_b).unwrap();

    Transcript {
        send_a,
        send_b,
        ss_bob: *ss_bob,
        ss_alice: *ss_alice,
    }
}

const SS_RECONCILED: &str = "864e53ffb8443d02364048bbf0b3489122e2eead586e6adbc326826d581cd635";
const SS_SIMPLE: &str = "d9e5efc5105153289d6a27ffa3b595801092ec23b6bfaf3c53279d6d26abb70c";

/// Dense 14-bit layout.
mod dense_kat {
    use super::*;

    const SEND_A_DIGEST: &str = "8e7c72a347383229620de30fb109282292dc69551fe7c9d72f1f18ae7203525e";

    #[test]
    fn test_kat_initiator_message() {
        let t = transcript::<Reconciliation, Dense14>(&ExchangeConfig::default());
        assert_eq!(t.send_a.len(), 1824);
        assert_eq!(&t.send_a[..8], &hex_decode("60ad5448c6904bd3")[..]);
        assert_eq!(&t.send_a[1792..], &public_seed()[..]);
        assert_eq!(sha3_256(&t.send_a).to_vec(), hex_decode(SEND_A_DIGEST));
    }

    #[test]
    fn test_kat_standard() {
        let t = transcript::<Reconciliation, Dense14>(&ExchangeConfig::default());
        assert_eq!(t.send_b.len(), 2048);
        assert_eq!(&t.send_b[..8], &hex_decode("e005a95872d078e4")[..]);
        assert_eq!(&t.send_b[2040..], &hex_decode("7733972c15dcd025")[..]);
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("2445295b85905efe3b6deb4b9c211d838ed89726f5059bc5ecf6e9e351ddbd9c")
        );
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_RECONCILED));
        assert_eq!(t.ss_alice, t.ss_bob);
    }

    #[test]
    fn test_kat_hardened() {
        let t = transcript::<Reconciliation, Dense14>(&ExchangeConfig::hardened());
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("77d05f62e284c5a64524c23fcda036d86a52da0ce44747fd50755f37a17a3ae9")
        );
        // Same key bits, one hint symbol moved by the wider dither
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_RECONCILED));
        assert_eq!(t.ss_alice, t.ss_bob);
    }

    #[test]
    fn test_kat_simple() {
        let t = transcript::<SimpleEncoding, Dense14>(&ExchangeConfig::default());
        assert_eq!(t.send_b.len(), 2176);
        assert_eq!(&t.send_b[..8], &hex_decode("e005a95872d078e4")[..]);
        assert_eq!(&t.send_b[2168..], &hex_decode("3d2889c9f704d606")[..]);
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("63094be05c136f577dc7e80ef3317ae1aab85f2249a3626a8ff5ecf918af6c95")
        );
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_SIMPLE));
        assert_eq!(t.ss_alice, t.ss_bob);
    }

    #[test]
    fn test_kat_hint_modes_differ_in_one_symbol() {
        let standard = transcript::<Reconciliation, Dense14>(&ExchangeConfig::default());
        let hard = transcript::<Reconciliation, Dense14>(&ExchangeConfig::hardened());
        assert_eq!(standard.send_b[..1792], hard.send_b[..1792]);

        let standard_hint = crate::encode::unpack_hint(&standard.send_b[1792..]);
        let hard_hint = crate::encode::unpack_hint(&hard.send_b[1792..]);
        let differing = standard_hint
            .iter()
            .zip(hard_hint.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(differing, 1);
    }
}

/// Aligned 16-bit layout.
mod aligned_kat {
    use super::*;

    #[test]
    fn test_kat_initiator_message() {
        let t = transcript::<Reconciliation, Aligned16>(&ExchangeConfig::default());
        assert_eq!(t.send_a.len(), 2080);
        assert_eq!(&t.send_a[..8], &hex_decode("602d5221640ce412")[..]);
        assert_eq!(
            sha3_256(&t.send_a).to_vec(),
            hex_decode("493ff9546631e8968ca16976ce1f0dec3548665bbffee1fbfbee6dc0bfb68cbf")
        );
    }

    #[test]
    fn test_kat_standard() {
        let t = transcript::<Reconciliation, Aligned16>(&ExchangeConfig::default());
        assert_eq!(t.send_b.len(), 2304);
        assert_eq!(&t.send_b[..8], &hex_decode("e005a4222507341e")[..]);
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("22b7294c11bbb490594a1bed27df2bdaca9f5e4d17aaaeb76c133f6a46859050")
        );
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_RECONCILED));
        assert_eq!(t.ss_alice, t.ss_bob);
    }

    #[test]
    fn test_kat_hardened() {
        let t = transcript::<Reconciliation, Aligned16>(&ExchangeConfig::hardened());
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("d54c0f8eaf401c638ec66eff80edbfe370422a3feb8f15d792aa0d8daec3df6d")
        );
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_RECONCILED));
    }

    #[test]
    fn test_kat_simple() {
        let t = transcript::<SimpleEncoding, Aligned16>(&ExchangeConfig::default());
        assert_eq!(t.send_b.len(), 2432);
        assert_eq!(
            sha3_256(&t.send_b).to_vec(),
            hex_decode("1e2caedb68a8a2f64f14ab4e2eecbb2366db3d2b33edd5e24519f7f6974be35f")
        );
        assert_eq!(t.ss_bob.to_vec(), hex_decode(SS_SIMPLE));
        assert_eq!(t.ss_alice, t.ss_bob);
    }
}

/// The public API with the build's layout reproduces the same transcript.
#[cfg(all(feature = "newhope", not(feature = "aligned-wire")))]
mod api_kat {
    use super::*;
    use crate::NewHope;

    #[test]
    fn test_kat_through_public_api() {
        let (sk, pk) = NewHope::keygen_from_seeds(&public_seed(), &ALICE_NOISE);
        let (msg, ss_bob) =
            NewHope::respond_from_seed(&pk, &BOB_NOISE, &ExchangeConfig::default()).unwrap();
        let ss_alice = <NewHope as ringlwe_core::KeyExchange>::finish(sk, &msg).unwrap();

        assert_eq!(
            sha3_256(msg.as_bytes()).to_vec(),
            hex_decode("2445295b85905efe3b6deb4b9c211d838ed89726f5059bc5ecf6e9e351ddbd9c")
        );
        assert_eq!(ss_bob.as_ref(), &hex_decode(SS_RECONCILED)[..]);
        assert_eq!(ss_alice.as_ref(), ss_bob.as_ref());
    }
}
