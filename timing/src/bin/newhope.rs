//! Constant-time verification for the NewHope initiator.
//!
//! Tests that `finish` timing is independent of the reconciliation hint
//! and of the compressed ciphertext it receives.
//!
//! Run with: `cargo run --release -p ringlwe-timing --bin newhope`

use dudect_bencher::rand::Rng;
use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use once_cell::sync::Lazy;
use ringlwe_core::{KeyExchange, Zeroizing};
use ringlwe_newhope::params::common::POLY_BYTES;
use ringlwe_newhope::{newhope_simple_types, newhope_types};
use ringlwe_newhope::{ExchangeConfig, NewHope, NewHopeSimple};
use std::cell::Cell;

/// Private key bytes and two responses that differ only after `u`.
struct TestData<M> {
    sk: Zeroizing<Vec<u8>>,
    msg_valid: M,
    msg_flipped: M,
}

/// Copy of `bytes` with every payload byte (everything after `u`) inverted.
fn flip_payload(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    for b in out[POLY_BYTES..].iter_mut() {
        *b ^= 0xff;
    }
    out
}

static NEWHOPE_DATA: Lazy<TestData<newhope_types::PublicKeyBob>> = Lazy::new(|| {
    let (sk, pk) = NewHope::keygen(&mut rand::rng()).expect("keygen failed");
    let (msg_valid, _ss) =
        NewHope::respond(&pk, &ExchangeConfig::default(), &mut rand::rng()).expect("respond failed");

    let msg_flipped = newhope_types::PublicKeyBob::from_bytes(&flip_payload(msg_valid.as_bytes()))
        .expect("flipped response construction");

    TestData {
        sk: Zeroizing::new(sk.to_bytes().to_vec()),
        msg_valid,
        msg_flipped,
    }
});

static SIMPLE_DATA: Lazy<TestData<newhope_simple_types::PublicKeyBob>> = Lazy::new(|| {
    let (sk, pk) = NewHopeSimple::keygen(&mut rand::rng()).expect("keygen failed");
    let (msg_valid, _ss) = NewHopeSimple::respond(&pk, &ExchangeConfig::default(), &mut rand::rng())
        .expect("respond failed");

    let msg_flipped =
        newhope_simple_types::PublicKeyBob::from_bytes(&flip_payload(msg_valid.as_bytes()))
            .expect("flipped response construction");

    TestData {
        sk: Zeroizing::new(sk.to_bytes().to_vec()),
        msg_valid,
        msg_flipped,
    }
});

/// Number of iterations per batch.
const ITERATIONS: usize = 5_000;

fn classes(rng: &mut BenchRng) -> Vec<Class> {
    (0..ITERATIONS)
        .map(|_| if rng.gen::<bool>() { Class::Left } else { Class::Right })
        .collect()
}

/// Test NewHope `finish` constant-time property.
///
/// Compares timing between:
/// - Left: the hint produced by the responder
/// - Right: the same response with every hint symbol inverted
///
/// `finish` consumes its key, so keys are decoded before the timed section.
fn bench_finish_newhope(runner: &mut CtRunner, rng: &mut BenchRng) {
    let data = &*NEWHOPE_DATA;

    for class in classes(rng) {
        let msg = match class {
            Class::Left => &data.msg_valid,
            Class::Right => &data.msg_flipped,
        };
        let sk = Cell::new(Some(
            newhope_types::PrivateKey::from_bytes(&data.sk).expect("key decode"),
        ));

        runner.run_one(class, || {
            if let Some(sk) = sk.take() {
                let _ = NewHope::finish(sk, msg);
            }
        });
    }
}

/// Test NewHope-Simple `finish` constant-time property.
///
/// - Left: the compressed `v` produced by the responder
/// - Right: the same response with every compressed byte inverted
fn bench_finish_simple(runner: &mut CtRunner, rng: &mut BenchRng) {
    let data = &*SIMPLE_DATA;

    for class in classes(rng) {
        let msg = match class {
            Class::Left => &data.msg_valid,
            Class::Right => &data.msg_flipped,
        };
        let sk = Cell::new(Some(
            newhope_simple_types::PrivateKey::from_bytes(&data.sk).expect("key decode"),
        ));

        runner.run_one(class, || {
            if let Some(sk) = sk.take() {
                let _ = NewHopeSimple::finish(sk, msg);
            }
        });
    }
}

ctbench_main!(bench_finish_newhope, bench_finish_simple);
