//! Fuzz target for a full NewHope exchange.
//!
//! This fuzzer tests that:
//! 1. Both parties agree for any seeds, variant and mode
//! 2. The exchange is deterministic in its seeds
//! 3. A corrupted responder message never panics the initiator

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ringlwe_newhope::newhope_simple_types as simple;
use ringlwe_newhope::newhope_types as reconciled;
use ringlwe_newhope::{ExchangeConfig, KeyExchange, NewHope, NewHopeSimple};

#[derive(Debug, Arbitrary)]
struct ExchangeInput {
    seed: [u8; 32],
    alice_noise: [u8; 32],
    bob_noise: [u8; 32],
    hardened: bool,
    corrupt_index: usize,
    corrupt_byte: u8,
    variant: u8,
}

fuzz_target!(|input: ExchangeInput| {
    let config = if input.hardened {
        ExchangeConfig::hardened()
    } else {
        ExchangeConfig::default()
    };

    match input.variant % 2 {
        0 => {
            let (sk, pk) = NewHope::keygen_from_seeds(&input.seed, &input.alice_noise);
            let sk_bytes = sk.to_bytes();
            let (msg, ss_bob) = NewHope::respond_from_seed(&pk, &input.bob_noise, &config).unwrap();
            let ss_alice = NewHope::finish(sk, &msg).unwrap();
            assert_eq!(ss_alice.as_ref(), ss_bob.as_ref(), "NewHope parties disagree");

            let (msg2, _) = NewHope::respond_from_seed(&pk, &input.bob_noise, &config).unwrap();
            assert_eq!(msg, msg2, "Respond should be deterministic");

            let mut bytes = msg.as_bytes().to_vec();
            let idx = input.corrupt_index % bytes.len();
            bytes[idx] ^= input.corrupt_byte.wrapping_add(1);
            let bad = reconciled::PublicKeyBob::from_bytes(&bytes).unwrap();
            let sk = reconciled::PrivateKey::from_bytes(&sk_bytes[..]).unwrap();
            let _ = NewHope::finish(sk, &bad).unwrap();
        }
        _ => {
            let (sk, pk) = NewHopeSimple::keygen_from_seeds(&input.seed, &input.alice_noise);
            let sk_bytes = sk.to_bytes();
            let (msg, ss_bob) =
                NewHopeSimple::respond_from_seed(&pk, &input.bob_noise, &config).unwrap();
            let ss_alice = NewHopeSimple::finish(sk, &msg).unwrap();
            assert_eq!(ss_alice.as_ref(), ss_bob.as_ref(), "NewHope-Simple parties disagree");

            let mut bytes = msg.as_bytes().to_vec();
            let idx = input.corrupt_index % bytes.len();
            bytes[idx] ^= input.corrupt_byte.wrapping_add(1);
            let bad = simple::PublicKeyBob::from_bytes(&bytes).unwrap();
            let sk = simple::PrivateKey::from_bytes(&sk_bytes[..]).unwrap();
            let _ = NewHopeSimple::finish(sk, &bad).unwrap();
        }
    }
});
