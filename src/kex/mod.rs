//! Key exchange algorithms.
//!
//! The SSH protocol supports several key exchange (kex) algorithms, which are used to establish
//! a shared secret and an exchange hash, from which the one-time keys for the connection are
//! derived. The server signs the exchange hash with its host key, which authenticates the server.
//!
//! The client and the server exchange lists of supported algorithms, and the first algorithm on
//! the client's list that is also supported by the server is used for the connection (see
//! [`negotiate_kex()`]). The chosen algorithm is then executed by a [`KexSession`].
//!
//! # Supported algorithms
//!
//! - "curve25519-sha256" / "curve25519-sha256@libssh.com" ([`CURVE25519_SHA256`] /
//! [`CURVE25519_SHA256_LIBSSH`])
//! - "ecdh-sha2-nistp256" / "ecdh-sha2-nistp384" / "ecdh-sha2-nistp521"
//! ([`ECDH_SHA2_NISTP256`] / [`ECDH_SHA2_NISTP384`] / [`ECDH_SHA2_NISTP521`])
//! - "diffie-hellman-group-exchange-sha256" / "diffie-hellman-group-exchange-sha1"
//! ([`DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256`] / [`DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1`])
//! - "diffie-hellman-group{1,14,15,16,17,18}-*" ([`DIFFIE_HELLMAN_GROUP1_SHA1`],
//! [`DIFFIE_HELLMAN_GROUP14_SHA1`], [`DIFFIE_HELLMAN_GROUP14_SHA256`],
//! [`DIFFIE_HELLMAN_GROUP15_SHA512`], [`DIFFIE_HELLMAN_GROUP16_SHA512`],
//! [`DIFFIE_HELLMAN_GROUP17_SHA512`], [`DIFFIE_HELLMAN_GROUP18_SHA512`])
//! - "rsa2048-sha256" / "rsa1024-sha1" ([`RSA2048_SHA256`] / [`RSA1024_SHA1`])
use bytes::Bytes;
use derivative::Derivative;
use std::task::Poll;
use crate::codec::PacketDecode;
use crate::error::{AlgoNegotiateError, Error, Result};
use crate::util::CryptoRngCore;
pub use self::config::{GexBounds, GexSecretPath, KexConfig};
pub use self::curve25519::{CURVE25519_SHA256, CURVE25519_SHA256_LIBSSH};
pub use self::derive::derive_key;
pub use self::dh::{
    DhGroup, DIFFIE_HELLMAN_GROUP1_SHA1, DIFFIE_HELLMAN_GROUP14_SHA1,
    DIFFIE_HELLMAN_GROUP14_SHA256, DIFFIE_HELLMAN_GROUP15_SHA512, DIFFIE_HELLMAN_GROUP16_SHA512,
    DIFFIE_HELLMAN_GROUP17_SHA512, DIFFIE_HELLMAN_GROUP18_SHA512,
};
pub use self::ecdh::{ECDH_SHA2_NISTP256, ECDH_SHA2_NISTP384, ECDH_SHA2_NISTP521};
pub use self::gex::{
    DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1, DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, validate_group,
};
pub use self::hash::{ExchangeHash, ExchangeValues, HashAlgo};
pub use self::provider::{DhKeypair, DhProvider, GexCapability, NumBigintDh, modpow_manual};
pub use self::rsa::{RSA1024_SHA1, RSA2048_SHA256};
pub use self::secret::SharedSecret;
pub use self::session::{KexSession, KexState};

mod config;
mod curve25519;
mod derive;
mod dh;
mod ecdh;
mod gex;
mod hash;
mod provider;
mod rsa;
mod secret;
mod session;

/// Algorithm for key exchange.
///
/// Algorithms are immutable static values; see the [module documentation][self] for the list.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct KexAlgo {
    /// Name of the algorithm.
    pub name: &'static str,
    /// Hash function used for the exchange hash and key derivation.
    pub hash: HashAlgo,
    /// Security tier, used to filter algorithms by policy.
    pub tier: SecurityTier,
    /// Default position in the list of algorithms (lower is preferred).
    pub priority: u32,
    pub(crate) msg_ids: &'static [u8],
    #[derivative(Debug = "ignore")]
    pub(crate) make_kex: fn(config: &KexConfig, rng: &mut dyn CryptoRngCore) -> Result<Box<dyn Kex + Send>>,
}

impl KexAlgo {
    /// Returns true if `msg_id` is one of the messages used by this algorithm.
    ///
    /// The numbers 30 to 49 are reused by every key exchange method, so the answer depends on the
    /// algorithm.
    pub fn is_kex_message(&self, msg_id: u8) -> bool {
        self.msg_ids.contains(&msg_id)
    }
}

/// Security tier of a [`KexAlgo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityTier {
    /// Algorithms that should only be used for compatibility with old servers (SHA-1, 1024-bit
    /// groups).
    Weak,
    /// Algorithms that are secure with current knowledge.
    Strong,
    /// Algorithms with a large safety margin and a high computational cost.
    Paranoid,
}

/// Handshake transcript that is hashed into the exchange hash.
///
/// It is captured by the transport before the key exchange starts and stays unchanged for the
/// whole key exchange.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Client identification string `V_C` (without CR and LF).
    pub client_ident: Bytes,
    /// Server identification string `V_S` (without CR and LF).
    pub server_ident: Bytes,
    /// Payload of the client SSH_MSG_KEXINIT `I_C`.
    pub client_kex_init: Bytes,
    /// Payload of the server SSH_MSG_KEXINIT `I_S`.
    pub server_kex_init: Bytes,
}

/// Result of a completed key exchange.
///
/// This is produced by [`KexSession::finish()`], after the signature of the exchange hash has
/// been verified.
#[derive(Debug)]
pub struct KexOutput {
    /// The shared secret `K`.
    pub shared_secret: SharedSecret,
    /// The exchange hash `H`.
    pub exchange_hash: Vec<u8>,
    /// Host key blob of the server `K_S`.
    pub server_pubkey: Bytes,
    /// Signature of the exchange hash made by the server host key.
    pub server_exchange_hash_sign: Bytes,
}

pub(crate) trait Kex {
    fn recv_packet(
        &mut self,
        msg_id: u8,
        payload: &mut PacketDecode,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<()>;
    fn send_packet(&mut self) -> Result<Option<Bytes>>;
    fn poll(&mut self, input: &Transcript) -> Poll<Result<KexOutput>>;
}

static ALL_ALGOS: &[&KexAlgo] = &[
    &CURVE25519_SHA256, &CURVE25519_SHA256_LIBSSH,
    &ECDH_SHA2_NISTP256, &ECDH_SHA2_NISTP384, &ECDH_SHA2_NISTP521,
    &DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256,
    &DIFFIE_HELLMAN_GROUP16_SHA512, &DIFFIE_HELLMAN_GROUP18_SHA512,
    &DIFFIE_HELLMAN_GROUP17_SHA512, &DIFFIE_HELLMAN_GROUP15_SHA512,
    &DIFFIE_HELLMAN_GROUP14_SHA256,
    &RSA2048_SHA256,
    &DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1,
    &DIFFIE_HELLMAN_GROUP14_SHA1,
    &RSA1024_SHA1,
    &DIFFIE_HELLMAN_GROUP1_SHA1,
];

/// All supported algorithms, ordered by [`priority`][KexAlgo::priority].
pub fn registry() -> Vec<&'static KexAlgo> {
    let mut algos = ALL_ALGOS.to_vec();
    algos.sort_by_key(|algo| algo.priority);
    algos
}

/// Supported algorithms with at least the given security tier, ordered by priority.
pub fn algos_with_min_tier(min_tier: SecurityTier) -> Vec<&'static KexAlgo> {
    registry().into_iter().filter(|algo| algo.tier >= min_tier).collect()
}

/// Algorithms with at least the given security tier that can run with `config`, ordered by
/// priority.
///
/// Diffie-Hellman group exchange is left out if the [`DhProvider`] in `config` does not support
/// it (see [`KexConfig::effective_gex_capability()`]).
pub fn supported_algos(config: &KexConfig, min_tier: SecurityTier) -> Vec<&'static KexAlgo> {
    let gex_supported = match config.effective_gex_capability() {
        Ok(_) => true,
        Err(err) => {
            log::debug!("disabling Diffie-Hellman group exchange: {}", err);
            false
        },
    };
    algos_with_min_tier(min_tier).into_iter()
        .filter(|algo| gex_supported || !gex::is_group_exchange(algo))
        .collect()
}

/// Finds a supported algorithm by its name.
pub fn find(name: &str) -> Option<&'static KexAlgo> {
    ALL_ALGOS.iter().copied().find(|algo| algo.name == name)
}

/// Chooses the key exchange algorithm (RFC 4253, section 7.1).
///
/// The first algorithm in `our_algos` that is also in `their_algos` is chosen.
pub fn negotiate_kex(
    our_algos: &[&'static KexAlgo],
    their_algos: &[String],
) -> Result<&'static KexAlgo> {
    for our_algo in our_algos.iter() {
        if their_algos.iter().any(|their_algo| their_algo == our_algo.name) {
            log::debug!("negotiated algo {:?} for key exchange", our_algo.name);
            return Ok(our_algo)
        }
    }

    Err(Error::AlgoNegotiate(AlgoNegotiateError {
        algo_name: "key exchange".into(),
        our_algos: our_algos.iter().map(|a| a.name.into()).collect(),
        their_algos: their_algos.into(),
    }))
}
