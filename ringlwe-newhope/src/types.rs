//! Key and message type macros for NewHope.
//!
//! Each variant module gets its own `PrivateKey`, `PublicKeyAlice`,
//! `PublicKeyBob` and `SharedSecret` with the sizes of that variant and of
//! the build's wire layout.

/// Generate the exchange types for one variant.
macro_rules! define_exchange_types {
    (
        layout: $layout:ty,
        send_a_size: $send_a_size:expr,
        send_b_size: $send_b_size:expr,
        sk_size: $sk_size:expr,
        ss_size: $ss_size:expr
    ) => {
        /// Initiator private key: the secret polynomial in the NTT domain.
        ///
        /// Zeroized on drop. Not `Clone`: finishing an exchange consumes it.
        pub struct PrivateKey {
            sk: $crate::poly::Poly<$crate::poly::Ntt>,
        }

        impl PrivateKey {
            /// Decode a private key written by [`PrivateKey::to_bytes`].
            pub fn from_bytes(bytes: &[u8]) -> ringlwe_core::Result<Self> {
                if bytes.len() != $sk_size {
                    return Err(ringlwe_core::Error::InvalidPrivateKeyLength {
                        expected: $sk_size,
                        actual: bytes.len(),
                    });
                }
                Ok(Self {
                    sk: <$layout as $crate::encode::WireLayout>::decode(bytes),
                })
            }

            /// Encode the key. The buffer is zeroized when dropped.
            pub fn to_bytes(&self) -> ringlwe_core::Zeroizing<[u8; $sk_size]> {
                let mut out = ringlwe_core::Zeroizing::new([0u8; $sk_size]);
                <$layout as $crate::encode::WireLayout>::encode(&self.sk, &mut out[..]);
                out
            }

            pub(crate) fn from_poly(sk: $crate::poly::Poly<$crate::poly::Ntt>) -> Self {
                Self { sk }
            }

            pub(crate) fn poly(&self) -> &$crate::poly::Poly<$crate::poly::Ntt> {
                &self.sk
            }
        }

        impl ringlwe_core::Zeroize for PrivateKey {
            fn zeroize(&mut self) {
                ringlwe_core::Zeroize::zeroize(&mut self.sk);
            }
        }

        // The inner polynomial zeroizes itself on drop
        impl ringlwe_core::ZeroizeOnDrop for PrivateKey {}

        impl core::fmt::Debug for PrivateKey {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("PrivateKey([REDACTED])")
            }
        }

        /// Initiator message: `b || seed`.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct PublicKeyAlice {
            bytes: [u8; $send_a_size],
        }

        impl PublicKeyAlice {
            /// Wrap a received initiator message.
            pub fn from_bytes(bytes: &[u8]) -> ringlwe_core::Result<Self> {
                if bytes.len() != $send_a_size {
                    tracing::warn!(
                        expected = $send_a_size,
                        actual = bytes.len(),
                        "rejecting initiator message"
                    );
                    return Err(ringlwe_core::Error::MalformedPeerPayload {
                        expected: $send_a_size,
                        actual: bytes.len(),
                    });
                }
                let mut result = Self {
                    bytes: [0u8; $send_a_size],
                };
                result.bytes.copy_from_slice(bytes);
                Ok(result)
            }

            /// Get the message as a byte slice.
            pub fn as_bytes(&self) -> &[u8] {
                &self.bytes
            }
        }

        /// Responder message: `u || payload`.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct PublicKeyBob {
            bytes: [u8; $send_b_size],
        }

        impl PublicKeyBob {
            /// Wrap a received responder message.
            pub fn from_bytes(bytes: &[u8]) -> ringlwe_core::Result<Self> {
                if bytes.len() != $send_b_size {
                    tracing::warn!(
                        expected = $send_b_size,
                        actual = bytes.len(),
                        "rejecting responder message"
                    );
                    return Err(ringlwe_core::Error::MalformedPeerPayload {
                        expected: $send_b_size,
                        actual: bytes.len(),
                    });
                }
                let mut result = Self {
                    bytes: [0u8; $send_b_size],
                };
                result.bytes.copy_from_slice(bytes);
                Ok(result)
            }

            /// Get the message as a byte slice.
            pub fn as_bytes(&self) -> &[u8] {
                &self.bytes
            }
        }

        /// Shared secret.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct SharedSecret {
            bytes: [u8; $ss_size],
        }

        impl SharedSecret {
            pub(crate) fn from_digest(digest: ringlwe_core::Zeroizing<[u8; $ss_size]>) -> Self {
                Self { bytes: *digest }
            }
        }

        impl AsRef<[u8]> for SharedSecret {
            fn as_ref(&self) -> &[u8] {
                &self.bytes
            }
        }

        impl ringlwe_core::subtle::ConstantTimeEq for SharedSecret {
            fn ct_eq(&self, other: &Self) -> ringlwe_core::subtle::Choice {
                ringlwe_core::subtle::ConstantTimeEq::ct_eq(&self.bytes[..], &other.bytes[..])
            }
        }

        impl core::fmt::Debug for SharedSecret {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("SharedSecret([REDACTED])")
            }
        }
    };
}

pub(crate) use define_exchange_types;
