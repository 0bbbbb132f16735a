//! # ringlwe-core
//!
//! Core traits and utilities for the ringlwe key exchange library.
//!
//! This crate provides:
//! - Common error types
//! - The two-party [`KeyExchange`] trait
//! - Unsigned modular arithmetic macros (Barrett, Montgomery, freeze)
//! - Table-driven NTT macros for negacyclic polynomial multiplication
//! - Secure memory handling with zeroize integration

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod ntt;
mod reduce;
mod traits;

pub use error::{Error, Result};
pub use traits::KeyExchange;

/// Re-export zeroize for convenience.
pub use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Re-export subtle for constant-time operations.
pub use subtle;
