//! ChaCha20 keystream (DJB variant: 64-bit counter, 64-bit nonce).
//!
//! Used for noise sampling, the reconciliation dither and the
//! NewHope-Simple message. Output starts at block counter zero.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20Legacy;
use ringlwe_core::{Error, Result, Zeroizing};

/// Stream cipher key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Stream cipher nonce size in bytes.
pub const NONCE_SIZE: usize = 8;

/// Fill `out` with keystream for `(key, nonce)`.
///
/// The cipher state, including any buffered partial block, is zeroized
/// when the cipher is dropped.
pub fn keystream(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], out: &mut [u8]) {
    let mut cipher = ChaCha20Legacy::new(key.into(), nonce.into());
    out.fill(0);
    cipher.apply_keystream(out);
}

/// Length-checked keystream over byte slices.
///
/// # Errors
/// - [`Error::InvalidKeyLength`] if `key` is not 32 bytes.
/// - [`Error::InvalidNonceLength`] if `nonce` is not 8 bytes.
pub fn chacha20_keystream(key: &[u8], nonce: &[u8], out: &mut [u8]) -> Result<()> {
    if key.len() != KEY_SIZE {
        return Err(Error::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: key.len(),
        });
    }
    if nonce.len() != NONCE_SIZE {
        return Err(Error::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }

    let mut k = Zeroizing::new([0u8; KEY_SIZE]);
    k.copy_from_slice(key);
    let mut n = [0u8; NONCE_SIZE];
    n.copy_from_slice(nonce);
    keystream(&k, &n, out);
    Ok(())
}
