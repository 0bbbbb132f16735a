//! # NewHope
//!
//! Ring-LWE key exchange over `Z_q[X]/(X^1024 + 1)` with `q = 12289`, in two
//! variants:
//!
//! - [`NewHope`]: the responder sends a 2-bit reconciliation hint per
//!   coefficient; the initiator recovers the same 256 key bits from it.
//! - [`NewHopeSimple`]: the responder encodes a random message into its
//!   ring element and sends it compressed to 3 bits per coefficient.
//!
//! ## Message Sizes
//!
//! | Variant        | Layout          | Alice -> Bob | Bob -> Alice | Shared Secret |
//! |----------------|-----------------|--------------|--------------|---------------|
//! | NewHope        | dense (default) | 1824 bytes   | 2048 bytes   | 32 bytes      |
//! | NewHope-Simple | dense (default) | 1824 bytes   | 2176 bytes   | 32 bytes      |
//! | NewHope        | `aligned-wire`  | 2080 bytes   | 2304 bytes   | 32 bytes      |
//! | NewHope-Simple | `aligned-wire`  | 2080 bytes   | 2432 bytes   | 32 bytes      |
//!
//! The wire layout is fixed per build; peers must agree on it.
//!
//! ## Interoperability
//!
//! The forward NTT bit-reverses its input before the psi scaling, so `b`
//! and `u` are sent as evaluations at `psi^(2i+1)` in natural order and
//! `inv_ntt(ntt(p)) == p` holds exactly. NewHope implementations whose
//! forward transform skips that permutation send a different
//! representation of the same ring elements. Both peers must run this crate; messages
//! from those implementations decode without error but yield a different
//! shared secret.
//!
//! ## Example
//!
//! ```ignore
//! use ringlwe_newhope::{ExchangeConfig, KeyExchange, NewHope};
//! use rand::rngs::OsRng;
//!
//! let (sk, msg_a) = NewHope::keygen(&mut OsRng)?;
//! let (msg_b, ss_bob) = NewHope::respond(&msg_a, &ExchangeConfig::default(), &mut OsRng)?;
//! let ss_alice = NewHope::finish(sk, &msg_b)?;
//!
//! assert_eq!(ss_alice.as_ref(), ss_bob.as_ref());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod encode;
pub mod exchange;
pub mod hash;
pub mod ntt;
pub mod params;
pub mod poly;
pub mod precomp;
pub mod reconcile;
pub mod reduce;
pub mod sample;
pub mod stream;

mod types;

#[cfg(feature = "newhope")]
mod newhope;
#[cfg(feature = "newhope-simple")]
mod newhope_simple;

#[cfg(test)]
mod kat;

pub use exchange::ExchangeConfig;
pub use reconcile::ReconciliationMode;
pub use ringlwe_core::{Error, KeyExchange, Result};

#[cfg(feature = "newhope")]
pub use newhope::NewHope;
#[cfg(feature = "newhope-simple")]
pub use newhope_simple::NewHopeSimple;

/// Key and message types of the reconciliation variant.
#[cfg(feature = "newhope")]
pub mod newhope_types {
    pub use crate::newhope::{PrivateKey, PublicKeyAlice, PublicKeyBob, SharedSecret};
}

/// Key and message types of the NewHope-Simple variant.
#[cfg(feature = "newhope-simple")]
pub mod newhope_simple_types {
    pub use crate::newhope_simple::{PrivateKey, PublicKeyAlice, PublicKeyBob, SharedSecret};
}
