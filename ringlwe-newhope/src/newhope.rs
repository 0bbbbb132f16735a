//! NewHope with reconciliation.

use crate::encode::BuildLayout;
use crate::exchange::{self, ExchangeConfig, Reconciliation};
use crate::params::common::SEED_SIZE;
use crate::params::newhope::*;
use crate::types::define_exchange_types;
use rand_core::TryCryptoRng;
use ringlwe_core::{KeyExchange, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

define_exchange_types! {
    layout: BuildLayout,
    send_a_size: SEND_A_SIZE,
    send_b_size: SEND_B_SIZE,
    sk_size: PRIVATE_KEY_SIZE,
    ss_size: SHARED_SECRET_SIZE
}

/// NewHope key exchange: the responder sends a reconciliation hint.
///
/// The hint dither is set per call through [`ExchangeConfig`]; the
/// initiator does not need to know which mode the responder used.
pub struct NewHope;

impl NewHope {
    /// Initiator key generation from explicit seeds.
    ///
    /// # Arguments
    /// * `seed` - Public seed expanded into `a`
    /// * `noise_seed` - Secret seed for the noise polynomials
    pub fn keygen_from_seeds(
        seed: &[u8; SEED_SIZE],
        noise_seed: &[u8; SEED_SIZE],
    ) -> (PrivateKey, PublicKeyAlice) {
        let mut pk = PublicKeyAlice {
            bytes: [0u8; SEND_A_SIZE],
        };
        let sk = exchange::keygen::<BuildLayout>(seed, noise_seed, &mut pk.bytes);
        (PrivateKey::from_poly(sk), pk)
    }

    /// Responder step from an explicit noise seed.
    pub fn respond_from_seed(
        pk: &PublicKeyAlice,
        noise_seed: &[u8; SEED_SIZE],
        config: &ExchangeConfig,
    ) -> Result<(PublicKeyBob, SharedSecret)> {
        let mut msg = PublicKeyBob {
            bytes: [0u8; SEND_B_SIZE],
        };
        let ss = exchange::respond::<Reconciliation, BuildLayout>(
            &pk.bytes,
            noise_seed,
            config,
            &mut msg.bytes,
        )?;
        Ok((msg, SharedSecret::from_digest(ss)))
    }
}

impl KeyExchange for NewHope {
    type PrivateKey = PrivateKey;
    type InitiatorMessage = PublicKeyAlice;
    type ResponderMessage = PublicKeyBob;
    type SharedSecret = SharedSecret;
    type Config = ExchangeConfig;

    const INITIATOR_MESSAGE_SIZE: usize = SEND_A_SIZE;
    const RESPONDER_MESSAGE_SIZE: usize = SEND_B_SIZE;
    const SHARED_SECRET_SIZE: usize = SHARED_SECRET_SIZE;

    fn keygen(rng: &mut impl TryCryptoRng) -> Result<(Self::PrivateKey, Self::InitiatorMessage)> {
        let (seed, noise_seed) = exchange::draw_initiator_seeds(rng)?;
        Ok(Self::keygen_from_seeds(&seed, &noise_seed))
    }

    fn respond(
        msg: &Self::InitiatorMessage,
        config: &Self::Config,
        rng: &mut impl TryCryptoRng,
    ) -> Result<(Self::ResponderMessage, Self::SharedSecret)> {
        let noise_seed = exchange::draw_responder_seed(rng)?;
        Self::respond_from_seed(msg, &noise_seed, config)
    }

    fn finish(sk: Self::PrivateKey, msg: &Self::ResponderMessage) -> Result<Self::SharedSecret> {
        let ss = exchange::finish::<Reconciliation, BuildLayout>(sk.poly(), &msg.bytes)?;
        Ok(SharedSecret::from_digest(ss))
    }
}
