//! Hash and XOF functions for NewHope.
//!
//! - SHAKE128: expands the public seed into the shared polynomial `a`
//! - SHA3-256: derives the shared secret from the reconciled key

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Sha3_256, Shake128,
};

/// SHA3-256.
///
/// # Arguments
/// * `input` - Data to hash
///
/// # Returns
/// 32-byte hash output
#[inline]
pub fn sha3_256(input: &[u8]) -> [u8; 32] {
    use sha3::Digest;
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, input);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHAKE128 stream over the public seed.
///
/// Successive `squeeze` calls continue the same output stream, so reading
/// 168-byte blocks one at a time yields the same bytes as one large read.
pub struct Xof {
    reader: sha3::Shake128Reader,
}

impl Xof {
    /// Absorb `seed` and prepare to squeeze.
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut hasher = Shake128::default();
        hasher.update(seed);
        Self {
            reader: hasher.finalize_xof(),
        }
    }

    /// Read the next `out.len()` bytes of the stream.
    #[inline]
    pub fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }
}
