//! Fuzz target for decoding untrusted NewHope messages.
//!
//! This fuzzer tests that arbitrary bytes:
//! 1. Are rejected with an error when the length is wrong
//! 2. Never panic the responder or the initiator when the length is right

#![no_main]

use libfuzzer_sys::fuzz_target;

use ringlwe_newhope::newhope_types::{PrivateKey, PublicKeyAlice, PublicKeyBob};
use ringlwe_newhope::{Error, ExchangeConfig, KeyExchange, NewHope};

fuzz_target!(|data: &[u8]| {
    match PublicKeyAlice::from_bytes(data) {
        Ok(pk) => {
            let _ = NewHope::respond_from_seed(&pk, &[0x42; 32], &ExchangeConfig::default())
                .unwrap();
            let _ = NewHope::respond_from_seed(&pk, &[0x42; 32], &ExchangeConfig::hardened())
                .unwrap();
        }
        Err(e) => assert!(matches!(e, Error::MalformedPeerPayload { .. })),
    }

    match PublicKeyBob::from_bytes(data) {
        Ok(msg) => {
            let (sk, _) = NewHope::keygen_from_seeds(&[0x24; 32], &[0x25; 32]);
            let _ = NewHope::finish(sk, &msg).unwrap();
        }
        Err(e) => assert!(matches!(e, Error::MalformedPeerPayload { .. })),
    }

    // Private keys decode without a range check; the result must still be usable
    if let Ok(sk) = PrivateKey::from_bytes(data) {
        let (_, pk) = NewHope::keygen_from_seeds(&[0x24; 32], &[0x25; 32]);
        let (msg, _) = NewHope::respond_from_seed(&pk, &[0x42; 32], &ExchangeConfig::default())
            .unwrap();
        let _ = NewHope::finish(sk, &msg).unwrap();
    }
});
