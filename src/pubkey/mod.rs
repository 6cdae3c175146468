//! Public key algorithms used to authenticate the server.
//!
//! The server signs the exchange hash with its host key; the key exchange accepts the result
//! only if the signature is verified with the algorithm negotiated for the server host key.
//!
//! # Supported algorithms
//!
//! - "ssh-ed25519" ([`SSH_ED25519`], uses [`Ed25519Pubkey`])
//! - "ecdsa-sha2-nistp256" ([`ECDSA_SHA2_NISTP256`], uses [`EcdsaPubkey<p256::NistP256>`])
//! - "ecdsa-sha2-nistp384" ([`ECDSA_SHA2_NISTP384`], uses [`EcdsaPubkey<p384::NistP384>`])
//! - "ssh-rsa" ([`SSH_RSA_SHA1`], uses [`RsaPubkey`])
//! - "rsa-sha2-256" ([`RSA_SHA2_256`], uses [`RsaPubkey`])
//! - "rsa-sha2-512" ([`RSA_SHA2_512`], uses [`RsaPubkey`])
use base64::Engine as _;
use bytes::Bytes;
use derivative::Derivative;
use std::fmt;
use crate::codec::{PacketDecode, PacketEncode};
use crate::error::{Result, Error};
pub use self::ecdsa::{ECDSA_SHA2_NISTP256, ECDSA_SHA2_NISTP384, EcdsaPubkey};
pub use self::ed25519::{SSH_ED25519, Ed25519Pubkey};
pub use self::rsa::{SSH_RSA_SHA1, RSA_SHA2_256, RSA_SHA2_512, RsaPubkey};

mod ecdsa;
mod ed25519;
mod rsa;

/// Algorithm for public key cryptography.
///
/// See the [module documentation][self] for details.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PubkeyAlgo {
    /// Name of the algorithm.
    pub name: &'static str,
    #[derivative(Debug = "ignore")]
    pub(crate) verify: fn(pubkey: &Pubkey, message: &[u8], signature: Bytes) -> Result<SignatureVerified>,
}

impl PubkeyAlgo {
    /// Verify a `signature` of `message` with `pubkey`.
    ///
    /// Fails with [`Error::PubkeyFormat`] if the key cannot be used with this algorithm and with
    /// [`Error::Signature`] if the signature is not valid.
    pub fn verify(&self, pubkey: &Pubkey, message: &[u8], signature: Bytes) -> Result<SignatureVerified> {
        (self.verify)(pubkey, message, signature)
    }
}

/// Public key in one of supported formats.
///
/// This enum is marked as `#[non_exhaustive]`, so we might add new variants without breaking
/// backwards compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Pubkey {
    /// Ed25519 public key.
    Ed25519(Ed25519Pubkey),
    /// RSA public key.
    Rsa(RsaPubkey),
    /// ECDSA public key on NIST P-256 curve.
    EcdsaP256(EcdsaPubkey<p256::NistP256>),
    /// ECDSA public key on NIST P-384 curve.
    EcdsaP384(EcdsaPubkey<p384::NistP384>),
}

impl Pubkey {
    /// Decode a public key from SSH wire encoding.
    ///
    /// This is the encoding initially defined by RFC 4253. For keys other than RSA, the encoding
    /// is defined in the RFC that introduces the key type.
    pub fn decode(blob: Bytes) -> Result<Self> {
        let mut blob = PacketDecode::new(blob);
        let format = blob.get_string()?;
        match format.as_str() {
            "ssh-ed25519" => ed25519::decode_pubkey(&mut blob).map(Pubkey::Ed25519),
            "ssh-rsa" => rsa::decode_pubkey(&mut blob).map(Pubkey::Rsa),
            "ecdsa-sha2-nistp256" => ecdsa::decode_p256(&mut blob).map(Pubkey::EcdsaP256),
            "ecdsa-sha2-nistp384" => ecdsa::decode_p384(&mut blob).map(Pubkey::EcdsaP384),
            _ => {
                log::debug!("unknown pubkey format {:?}", format);
                Err(Error::Decode("unknown public key format"))
            },
        }
    }

    /// Encode a public key into SSH encoding.
    ///
    /// You can use this method to calculate a digest of the public key.
    pub fn encode(&self) -> Bytes {
        let mut blob = PacketEncode::new();
        match self {
            Pubkey::Ed25519(pubkey) => ed25519::encode_pubkey(&mut blob, pubkey),
            Pubkey::Rsa(pubkey) => rsa::encode_pubkey(&mut blob, pubkey),
            Pubkey::EcdsaP256(pubkey) => ecdsa::encode_p256(&mut blob, pubkey),
            Pubkey::EcdsaP384(pubkey) => ecdsa::encode_p384(&mut blob, pubkey),
        }
        blob.finish()
    }

    /// Compute a fingerprint of the public key.
    ///
    /// The fingerprint is in the SHA-256 digest of the public key encoded with base64 (not padded
    /// with `=` characters) and prefixed with `SHA256:`, the same format as OpenSSH prints.
    pub fn fingerprint(&self) -> String {
        use sha2::Digest as _;
        let digest = sha2::Sha256::digest(self.encode());
        format!("SHA256:{}", base64::engine::general_purpose::STANDARD_NO_PAD.encode(digest))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pubkey::Ed25519(pubkey) => fmt::Display::fmt(pubkey, f),
            Pubkey::Rsa(pubkey) => fmt::Display::fmt(pubkey, f),
            Pubkey::EcdsaP256(pubkey) => fmt::Display::fmt(pubkey, f),
            Pubkey::EcdsaP384(pubkey) => fmt::Display::fmt(pubkey, f),
        }
    }
}

/// Proof that a signature was verified.
///
/// Values of this type can only be created inside this crate, after a successful verification.
#[derive(Debug)]
pub struct SignatureVerified(());

impl SignatureVerified {
    fn assertion() -> Self { Self(()) }
}
