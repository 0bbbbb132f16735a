//! NewHope parameters.

/// Common parameters for all NewHope variants.
pub mod common {
    /// Polynomial ring dimension (n).
    pub const N: usize = 1024;

    /// log2(n).
    pub const LOG_N: u32 = 10;

    /// Modulus (q).
    pub const Q: u16 = 12289;

    /// Seed size in bytes (public seed and noise seed).
    pub const SEED_SIZE: usize = 32;

    /// Shared secret size in bytes.
    pub const SHARED_SECRET_SIZE: usize = 32;

    /// Raw reconciled key size in bytes (one bit per coefficient group).
    pub const KEY_BYTES: usize = 32;

    /// Keystream bytes consumed per noise polynomial.
    pub const NOISE_BYTES: usize = 4 * N;

    /// SHAKE128 rate in bytes.
    pub const SHAKE128_RATE: usize = 168;

    /// Blocks squeezed up front by the uniform sampler.
    pub const UNIFORM_INITIAL_BLOCKS: usize = 16;

    /// Packed reconciliation hint size in bytes (2 bits per coefficient).
    pub const HINT_BYTES: usize = N / 4;

    /// Compressed ciphertext polynomial size (3 bits per coefficient).
    pub const COMPRESSED_BYTES: usize = 3 * N / 8;

    /// Dense 14-bit packing of a ring element.
    pub const DENSE_POLY_BYTES: usize = 14 * N / 8;

    /// 16-bit aligned encoding of a ring element.
    pub const ALIGNED_POLY_BYTES: usize = 2 * N;

    /// Ring element size for the wire layout selected at build time.
    #[cfg(not(feature = "aligned-wire"))]
    pub const POLY_BYTES: usize = DENSE_POLY_BYTES;

    /// Ring element size for the wire layout selected at build time.
    #[cfg(feature = "aligned-wire")]
    pub const POLY_BYTES: usize = ALIGNED_POLY_BYTES;
}

/// NewHope with reconciliation.
#[cfg(feature = "newhope")]
pub mod newhope {
    use super::common::{HINT_BYTES, POLY_BYTES, SEED_SIZE};

    /// Initiator message size: `b || seed`.
    pub const SEND_A_SIZE: usize = POLY_BYTES + SEED_SIZE;

    /// Responder message size: `u || hint`.
    pub const SEND_B_SIZE: usize = POLY_BYTES + HINT_BYTES;

    /// Serialized private key size.
    pub const PRIVATE_KEY_SIZE: usize = POLY_BYTES;

    /// Shared secret size in bytes.
    pub const SHARED_SECRET_SIZE: usize = super::common::SHARED_SECRET_SIZE;
}

/// NewHope-Simple (encryption-based, no reconciliation).
#[cfg(feature = "newhope-simple")]
pub mod newhope_simple {
    use super::common::{COMPRESSED_BYTES, POLY_BYTES, SEED_SIZE};

    /// Initiator message size: `b || seed`.
    pub const SEND_A_SIZE: usize = POLY_BYTES + SEED_SIZE;

    /// Responder message size: `u || compress(v)`.
    pub const SEND_B_SIZE: usize = POLY_BYTES + COMPRESSED_BYTES;

    /// Serialized private key size.
    pub const PRIVATE_KEY_SIZE: usize = POLY_BYTES;

    /// Shared secret size in bytes.
    pub const SHARED_SECRET_SIZE: usize = super::common::SHARED_SECRET_SIZE;
}
