use bytes::Bytes;
use rsa::traits::PublicKeyParts as _;
use std::fmt;
use crate::codec::{PacketDecode, PacketEncode};
use crate::error::{Result, Error};
use super::{PubkeyAlgo, Pubkey, SignatureVerified};

/// "ssh-rsa" public key algorithm using SHA-1 from RFC 4253.
///
/// This algorithm is compatible with [`RsaPubkey`].
pub static SSH_RSA_SHA1: PubkeyAlgo = PubkeyAlgo {
    name: "ssh-rsa",
    verify: verify::<sha1::Sha1>,
};

/// "rsa-sha2-256" public key algorithm using SHA-256 from RFC 8332.
///
/// This algorithm is compatible with [`RsaPubkey`].
pub static RSA_SHA2_256: PubkeyAlgo = PubkeyAlgo {
    name: "rsa-sha2-256",
    verify: verify::<sha2::Sha256>,
};

/// "rsa-sha2-512" public key algorithm using SHA-512 from RFC 8332.
///
/// This algorithm is compatible with [`RsaPubkey`].
pub static RSA_SHA2_512: PubkeyAlgo = PubkeyAlgo {
    name: "rsa-sha2-512",
    verify: verify::<sha2::Sha512>,
};

/// RSA public key.
///
/// You can convert it to and from [`rsa::RsaPublicKey`] using `from()`/`into()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPubkey {
    pub(crate) pubkey: rsa::RsaPublicKey,
}

fn verify<H: RsaHash>(pubkey: &Pubkey, message: &[u8], signature: Bytes) -> Result<SignatureVerified> {
    let Pubkey::Rsa(pubkey) = pubkey else { return Err(Error::PubkeyFormat) };

    let mut signature = PacketDecode::new(signature);
    if signature.get_string()? != H::ALGO_NAME {
        return Err(Error::Decode("unexpected signature format"))
    }
    let signature_data = signature.get_bytes()?;

    let hashed = H::digest(message);
    let scheme = rsa::Pkcs1v15Sign::new::<H>();
    match pubkey.pubkey.verify(scheme, &hashed, &signature_data) {
        Ok(_) => Ok(SignatureVerified::assertion()),
        Err(_) => Err(Error::Signature),
    }
}

trait RsaHash: sha2::Digest + sha2::digest::const_oid::AssociatedOid {
    const ALGO_NAME: &'static str;
}

impl RsaHash for sha1::Sha1 { const ALGO_NAME: &'static str = "ssh-rsa"; }
impl RsaHash for sha2::Sha256 { const ALGO_NAME: &'static str = "rsa-sha2-256"; }
impl RsaHash for sha2::Sha512 { const ALGO_NAME: &'static str = "rsa-sha2-512"; }

pub(super) fn encode_pubkey(blob: &mut PacketEncode, pubkey: &RsaPubkey) {
    blob.put_str("ssh-rsa");
    blob.put_biguint(pubkey.pubkey.e());
    blob.put_biguint(pubkey.pubkey.n());
}

pub(super) fn decode_pubkey(blob: &mut PacketDecode) -> Result<RsaPubkey> {
    let e = blob.get_biguint()?;
    let n = blob.get_biguint()?;
    let pubkey = rsa::RsaPublicKey::new(n, e)
        .map_err(|_| Error::Decode("decoded ssh-rsa pubkey is invalid"))?;
    Ok(RsaPubkey { pubkey })
}

impl From<rsa::RsaPublicKey> for RsaPubkey {
    fn from(pubkey: rsa::RsaPublicKey) -> Self { Self { pubkey } }
}

impl From<RsaPubkey> for rsa::RsaPublicKey {
    fn from(pubkey: RsaPubkey) -> Self { pubkey.pubkey }
}

impl fmt::Display for RsaPubkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rsa n {:x}, e {}", self.pubkey.n(), self.pubkey.e())
    }
}
