use bytes::Bytes;
use num_bigint_dig::RandBigInt as _;
use rsa::traits::PublicKeyParts as _;
use std::task::Poll;
use zeroize::Zeroize as _;
use crate::codec::{PacketDecode, PacketEncode};
use crate::codes::msg;
use crate::error::{Error, Result};
use crate::pubkey::Pubkey;
use crate::util::CryptoRngCore;
use super::{KexAlgo, KexOutput, Kex, SecurityTier, Transcript};
use super::hash::{ExchangeHash, ExchangeValues, HashAlgo};
use super::secret::SharedSecret;

static RSA_MSG_IDS: &[u8] = &[msg::KEXRSA_PUBKEY, msg::KEXRSA_SECRET, msg::KEXRSA_DONE];

/// "rsa2048-sha256" key exchange from RFC 4432.
pub static RSA2048_SHA256: KexAlgo = KexAlgo {
    name: "rsa2048-sha256",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 120,
    msg_ids: RSA_MSG_IDS,
    make_kex: |_, _| Ok(Box::new(init_kex(HashAlgo::Sha256, 2048))),
};

/// "rsa1024-sha1" key exchange from RFC 4432.
pub static RSA1024_SHA1: KexAlgo = KexAlgo {
    name: "rsa1024-sha1",
    hash: HashAlgo::Sha1,
    tier: SecurityTier::Weak,
    priority: 150,
    msg_ids: RSA_MSG_IDS,
    make_kex: |_, _| Ok(Box::new(init_kex(HashAlgo::Sha1, 1024))),
};

#[derive(Debug)]
struct RsaKex {
    hash: HashAlgo,
    min_transient_bits: usize,
    kexrsa_pubkey: Option<KexrsaPubkey>,
    kexrsa_secret: Option<KexrsaSecret>,
    kexrsa_secret_sent: bool,
    kexrsa_done: Option<Bytes>,
}

#[derive(Debug)]
struct KexrsaPubkey {
    server_pubkey: Bytes,
    transient_pubkey: Bytes,
}

#[derive(Debug)]
struct KexrsaSecret {
    shared_secret: SharedSecret,
    encrypted_secret: Bytes,
}

fn init_kex(hash: HashAlgo, min_transient_bits: usize) -> RsaKex {
    log::debug!("initialized rsa kex");
    RsaKex {
        hash, min_transient_bits,
        kexrsa_pubkey: None,
        kexrsa_secret: None,
        kexrsa_secret_sent: false,
        kexrsa_done: None,
    }
}

impl Kex for RsaKex {
    fn recv_packet(&mut self, msg_id: u8, payload: &mut PacketDecode, rng: &mut dyn CryptoRngCore) -> Result<()> {
        match msg_id {
            msg::KEXRSA_PUBKEY => recv_kexrsa_pubkey(self, payload, rng),
            msg::KEXRSA_DONE => recv_kexrsa_done(self, payload),
            _ => Err(Error::PacketNotImplemented(msg_id)),
        }
    }

    fn send_packet(&mut self) -> Result<Option<Bytes>> {
        if !self.kexrsa_secret_sent {
            if let Some(kexrsa_secret) = self.kexrsa_secret.as_ref() {
                let payload = send_kexrsa_secret(kexrsa_secret)?;
                self.kexrsa_secret_sent = true;
                return Ok(Some(payload))
            }
        }
        Ok(None)
    }

    fn poll(&mut self, input: &Transcript) -> Poll<Result<KexOutput>> {
        match self.kexrsa_done.take() {
            Some(server_exchange_hash_sign) => Poll::Ready(exchange(self, server_exchange_hash_sign, input)),
            None => Poll::Pending,
        }
    }
}

fn recv_kexrsa_pubkey(kex: &mut RsaKex, payload: &mut PacketDecode, mut rng: &mut dyn CryptoRngCore) -> Result<()> {
    if kex.kexrsa_pubkey.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEXRSA_PUBKEY"))
    }

    // RFC 4432, section 4
    let server_pubkey = payload.get_bytes()?;
    let transient_pubkey = payload.get_bytes()?;

    let transient = match Pubkey::decode(transient_pubkey.clone())? {
        Pubkey::Rsa(transient) => transient.pubkey,
        _ => return Err(Error::Protocol("server sent transient key that is not an RSA key")),
    };

    let n_bits = transient.n().bits();
    if n_bits < kex.min_transient_bits {
        log::warn!("server sent {}-bit transient RSA key, expected at least {} bits",
            n_bits, kex.min_transient_bits);
        return Err(Error::Protocol("server sent transient RSA key that is too short"))
    }
    log::debug!("received SSH_MSG_KEXRSA_PUBKEY with {}-bit transient key", n_bits);

    // RFC 4432, section 4: K is a random number with KLEN bits
    let klen = n_bits - 2 * 8 * kex.hash.output_len() - 49;
    let mut secret = rng.as_rngcore().gen_biguint(klen);
    let shared_secret = SharedSecret::from_biguint(&secret);
    secret.zeroize();

    let mut plaintext = PacketEncode::new();
    plaintext.put_mpint_uint_be(shared_secret.as_mpint_bytes());
    let mut plaintext = plaintext.into_bytes();

    let res = transient.encrypt(&mut rng, oaep(kex.hash), &plaintext);
    plaintext.as_mut().zeroize();
    let encrypted_secret = res.map_err(|err| Error::crypto("could not encrypt secret with RSA-OAEP", err))?;

    kex.kexrsa_pubkey = Some(KexrsaPubkey { server_pubkey, transient_pubkey });
    kex.kexrsa_secret = Some(KexrsaSecret {
        shared_secret,
        encrypted_secret: Bytes::from(encrypted_secret),
    });
    Ok(())
}

fn oaep(hash: HashAlgo) -> rsa::Oaep {
    match hash {
        HashAlgo::Sha1 => rsa::Oaep::new::<sha1::Sha1>(),
        HashAlgo::Sha256 => rsa::Oaep::new::<sha2::Sha256>(),
        HashAlgo::Sha384 => rsa::Oaep::new::<sha2::Sha384>(),
        HashAlgo::Sha512 => rsa::Oaep::new::<sha2::Sha512>(),
    }
}

fn send_kexrsa_secret(kexrsa_secret: &KexrsaSecret) -> Result<Bytes> {
    // RFC 4432, section 4
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEXRSA_SECRET);
    payload.put_bytes(&kexrsa_secret.encrypted_secret);
    log::debug!("sending SSH_MSG_KEXRSA_SECRET");
    Ok(payload.finish())
}

fn recv_kexrsa_done(kex: &mut RsaKex, payload: &mut PacketDecode) -> Result<()> {
    if !kex.kexrsa_secret_sent {
        return Err(Error::Protocol("received SSH_MSG_KEXRSA_DONE before sending SSH_MSG_KEXRSA_SECRET"))
    }
    if kex.kexrsa_done.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEXRSA_DONE"))
    }

    // RFC 4432, section 4
    let server_exchange_hash_sign = payload.get_bytes()?;
    kex.kexrsa_done = Some(server_exchange_hash_sign);
    log::debug!("received SSH_MSG_KEXRSA_DONE");
    Ok(())
}

fn exchange(kex: &mut RsaKex, server_exchange_hash_sign: Bytes, input: &Transcript) -> Result<KexOutput> {
    let (Some(kexrsa_pubkey), Some(kexrsa_secret)) = (kex.kexrsa_pubkey.take(), kex.kexrsa_secret.take()) else {
        return Err(Error::Protocol("rsa kex is missing the secret"))
    };
    let KexrsaPubkey { server_pubkey, transient_pubkey } = kexrsa_pubkey;
    let KexrsaSecret { shared_secret, encrypted_secret } = kexrsa_secret;

    // RFC 4432, section 5
    let exchange_hash = ExchangeHash::new()
        .transcript(input)
        .server_pubkey(server_pubkey.clone())
        .values(ExchangeValues::Rsa { transient_pubkey, encrypted_secret })
        .shared_secret(shared_secret.clone())
        .compute(kex.hash)?;

    Ok(KexOutput { shared_secret, exchange_hash, server_pubkey, server_exchange_hash_sign })
}
