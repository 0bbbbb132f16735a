//! Error types for ringlwe key exchange operations.

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during a key exchange.
///
/// Mismatched shared secrets are not reported: neither party can observe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid stream cipher key length.
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// Invalid stream cipher nonce length.
    InvalidNonceLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// The random source failed to produce the requested bytes.
    RandomSourceFailure,

    /// A stored private key has the wrong length.
    InvalidPrivateKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// A message received from the peer has the wrong length.
    MalformedPeerPayload {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength { expected, actual } => {
                write!(f, "invalid key length: expected {expected}, got {actual}")
            }
            Error::InvalidNonceLength { expected, actual } => {
                write!(f, "invalid nonce length: expected {expected}, got {actual}")
            }
            Error::InvalidPrivateKeyLength { expected, actual } => {
                write!(
                    f,
                    "invalid private key length: expected {expected}, got {actual}"
                )
            }
            Error::RandomSourceFailure => write!(f, "random source failure"),
            Error::MalformedPeerPayload { expected, actual } => {
                write!(
                    f,
                    "malformed peer payload: expected {expected} bytes, got {actual}"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
