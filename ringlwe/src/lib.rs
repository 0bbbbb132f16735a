//! # ringlwe
//!
//! Post-quantum key exchange from the Ring Learning With Errors problem.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `newhope` (default): NewHope with a reconciliation hint
//! - `newhope-simple` (default): NewHope-Simple with an encrypted message
//! - `aligned-wire`: Encode ring elements as 16-bit words instead of the
//!   dense 14-bit packing
//!
//! ## Example
//!
//! ```ignore
//! use ringlwe::newhope::{ExchangeConfig, KeyExchange, NewHope};
//!
//! // Alice: generate a key pair
//! let (sk, msg_a) = NewHope::keygen(&mut rng)?;
//!
//! // Bob: answer and derive his copy of the secret
//! let (msg_b, ss_bob) = NewHope::respond(&msg_a, &ExchangeConfig::hardened(), &mut rng)?;
//!
//! // Alice: derive her copy
//! let ss_alice = NewHope::finish(sk, &msg_b)?;
//!
//! assert_eq!(ss_alice.as_ref(), ss_bob.as_ref());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub use ringlwe_core::{Error, Result};

/// Core traits for key exchange.
pub mod traits {
    pub use ringlwe_core::KeyExchange;
}

/// NewHope key exchange over `Z_12289[X]/(X^1024 + 1)`.
#[cfg(any(feature = "newhope", feature = "newhope-simple"))]
pub mod newhope {
    pub use ringlwe_core::KeyExchange;
    pub use ringlwe_newhope::*;
}
