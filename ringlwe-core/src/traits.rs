//! Key exchange traits.

use crate::Result;
use rand_core::TryCryptoRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Two-party, single round-trip key exchange.
///
/// The initiator ("Alice") generates a key pair and sends its public
/// message; the responder ("Bob") answers with its own message and derives
/// the shared secret; the initiator finishes with its private key.
///
/// ```text
/// Uninitialized --keygen--> AliceKeyGenerated --respond--> BobResponded --finish--> AliceFinished
/// ```
///
/// # Type Parameters
///
/// Implementations define associated types for keys and messages,
/// ensuring proper zeroization of sensitive material.
///
/// # Example
///
/// ```ignore
/// use ringlwe_core::KeyExchange;
///
/// let (sk, alice_msg) = MyExchange::keygen(&mut rng)?;
/// let (bob_msg, ss_bob) = MyExchange::respond(&alice_msg, &Default::default(), &mut rng)?;
/// let ss_alice = MyExchange::finish(sk, &bob_msg)?;
/// assert_eq!(ss_alice.as_ref(), ss_bob.as_ref());
/// ```
pub trait KeyExchange {
    /// Initiator private key.
    type PrivateKey: Zeroize + ZeroizeOnDrop;

    /// Message sent by the initiator.
    type InitiatorMessage: Clone;

    /// Message sent back by the responder.
    type ResponderMessage: Clone;

    /// Shared secret derived by both parties.
    type SharedSecret: Zeroize + ZeroizeOnDrop + AsRef<[u8]>;

    /// Per-exchange configuration used by the responder.
    type Config: Default + Copy;

    /// Size of the initiator message in bytes.
    const INITIATOR_MESSAGE_SIZE: usize;

    /// Size of the responder message in bytes.
    const RESPONDER_MESSAGE_SIZE: usize;

    /// Size of the shared secret in bytes.
    const SHARED_SECRET_SIZE: usize;

    /// Generate the initiator key pair.
    ///
    /// # Arguments
    ///
    /// * `rng` - A cryptographically secure random number generator.
    ///
    /// # Returns
    ///
    /// A tuple of (private_key, initiator_message).
    ///
    /// # Errors
    ///
    /// [`Error::RandomSourceFailure`](crate::Error::RandomSourceFailure) if
    /// `rng` fails.
    fn keygen(rng: &mut impl TryCryptoRng) -> Result<(Self::PrivateKey, Self::InitiatorMessage)>;

    /// Answer an initiator message and derive the shared secret.
    ///
    /// # Arguments
    ///
    /// * `msg` - The initiator's message.
    /// * `config` - Responder configuration.
    /// * `rng` - A cryptographically secure random number generator.
    ///
    /// # Returns
    ///
    /// A tuple of (responder_message, shared_secret).
    fn respond(
        msg: &Self::InitiatorMessage,
        config: &Self::Config,
        rng: &mut impl TryCryptoRng,
    ) -> Result<(Self::ResponderMessage, Self::SharedSecret)>;

    /// Finish the exchange on the initiator side.
    ///
    /// The private key is consumed: a finished key cannot be used again.
    ///
    /// # Arguments
    ///
    /// * `sk` - The initiator's private key.
    /// * `msg` - The responder's message.
    ///
    /// # Returns
    ///
    /// The shared secret.
    fn finish(sk: Self::PrivateKey, msg: &Self::ResponderMessage) -> Result<Self::SharedSecret>;
}
