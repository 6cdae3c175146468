use bytes::Bytes;
use std::task::Poll;
use x25519_dalek::{EphemeralSecret, PublicKey};
use crate::codec::{PacketDecode, PacketEncode};
use crate::codes::msg;
use crate::error::{Error, Result};
use crate::util::CryptoRngCore;
use super::{KexAlgo, KexOutput, Kex, SecurityTier, Transcript};
use super::ecdh::ECDH_MSG_IDS;
use super::hash::{ExchangeHash, ExchangeValues, HashAlgo};
use super::secret::SharedSecret;

/// "curve25519-sha256" key exchange from RFC 8731.
pub static CURVE25519_SHA256: KexAlgo = KexAlgo {
    name: "curve25519-sha256",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 10,
    msg_ids: ECDH_MSG_IDS,
    make_kex: |_, rng| Ok(Box::new(init_kex(rng)?)),
};

/// "curve25519-sha256@libssh.com" key exchange, the name used before RFC 8731.
pub static CURVE25519_SHA256_LIBSSH: KexAlgo = KexAlgo {
    name: "curve25519-sha256@libssh.com",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 20,
    msg_ids: ECDH_MSG_IDS,
    make_kex: |_, rng| Ok(Box::new(init_kex(rng)?)),
};

struct Curve25519Kex {
    our_eph_privkey: Option<EphemeralSecret>,
    our_eph_pubkey: PublicKey,
    ecdh_init_sent: bool,
    ecdh_reply: Option<EcdhReply>,
}

#[derive(Debug)]
struct EcdhReply {
    server_pubkey: Bytes,
    server_eph_pubkey: PublicKey,
    server_exchange_hash_sign: Bytes,
}

fn init_kex(rng: &mut dyn CryptoRngCore) -> Result<Curve25519Kex> {
    let our_eph_privkey = EphemeralSecret::random_from_rng(rng);
    let our_eph_pubkey = PublicKey::from(&our_eph_privkey);
    log::debug!("initialized curve25519 kex");
    Ok(Curve25519Kex {
        our_eph_privkey: Some(our_eph_privkey),
        our_eph_pubkey,
        ecdh_init_sent: false,
        ecdh_reply: None,
    })
}

impl Kex for Curve25519Kex {
    fn recv_packet(&mut self, msg_id: u8, payload: &mut PacketDecode, _: &mut dyn CryptoRngCore) -> Result<()> {
        match msg_id {
            msg::KEX_ECDH_REPLY => recv_ecdh_reply(self, payload),
            _ => Err(Error::PacketNotImplemented(msg_id)),
        }
    }

    fn send_packet(&mut self) -> Result<Option<Bytes>> {
        if !self.ecdh_init_sent {
            let payload = send_ecdh_init(self)?;
            self.ecdh_init_sent = true;
            return Ok(Some(payload))
        }
        Ok(None)
    }

    fn poll(&mut self, input: &Transcript) -> Poll<Result<KexOutput>> {
        match (self.our_eph_privkey.take(), self.ecdh_reply.take()) {
            (Some(our_eph_privkey), Some(ecdh_reply)) =>
                Poll::Ready(exchange(self, our_eph_privkey, ecdh_reply, input)),
            (our_eph_privkey, ecdh_reply) => {
                self.our_eph_privkey = our_eph_privkey;
                self.ecdh_reply = ecdh_reply;
                Poll::Pending
            },
        }
    }
}

fn send_ecdh_init(kex: &mut Curve25519Kex) -> Result<Bytes> {
    // RFC 5656, section 4
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEX_ECDH_INIT);
    payload.put_bytes(kex.our_eph_pubkey.as_bytes());
    log::debug!("sending SSH_MSG_KEX_ECDH_INIT");
    Ok(payload.finish())
}

fn recv_ecdh_reply(kex: &mut Curve25519Kex, payload: &mut PacketDecode) -> Result<()> {
    if kex.ecdh_reply.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEX_ECDH_REPLY"))
    }

    // RFC 5656, section 4 and RFC 8731, section 3.1
    let server_pubkey = payload.get_bytes()?;
    let server_eph_pubkey = payload.get_bytes()?;
    let server_exchange_hash_sign = payload.get_bytes()?;

    let server_eph_pubkey: [u8; 32] = server_eph_pubkey.as_ref().try_into()
        .map_err(|_| Error::Protocol("server sent X25519 public key with invalid length"))?;
    let server_eph_pubkey = PublicKey::from(server_eph_pubkey);

    kex.ecdh_reply = Some(EcdhReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign });
    log::debug!("received SSH_MSG_KEX_ECDH_REPLY");

    Ok(())
}

fn exchange(
    kex: &mut Curve25519Kex,
    our_eph_privkey: EphemeralSecret,
    ecdh_reply: EcdhReply,
    input: &Transcript,
) -> Result<KexOutput> {
    let EcdhReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign } = ecdh_reply;

    let raw_secret = our_eph_privkey.diffie_hellman(&server_eph_pubkey);

    // RFC 8731, section 3
    if !raw_secret.was_contributory() {
        log::warn!("server sent X25519 public key of low order");
        return Err(Error::Protocol("X25519 shared secret is all zeros"))
    }
    let shared_secret = SharedSecret::from_uint_be(raw_secret.as_bytes());

    let exchange_hash = ExchangeHash::new()
        .transcript(input)
        .server_pubkey(server_pubkey.clone())
        .values(ExchangeValues::Ecdh {
            client_pubkey: Bytes::copy_from_slice(kex.our_eph_pubkey.as_bytes()),
            server_pubkey: Bytes::copy_from_slice(server_eph_pubkey.as_bytes()),
        })
        .shared_secret(shared_secret.clone())
        .compute(HashAlgo::Sha256)?;

    Ok(KexOutput { shared_secret, exchange_hash, server_pubkey, server_exchange_hash_sign })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use super::*;

    fn transcript() -> Transcript {
        Transcript {
            client_ident: Bytes::from_static(b"SSH-2.0-client"),
            server_ident: Bytes::from_static(b"SSH-2.0-server"),
            client_kex_init: Bytes::from_static(b"ic"),
            server_kex_init: Bytes::from_static(b"is"),
        }
    }

    fn reply(server_eph_pubkey: &[u8]) -> PacketDecode {
        let mut payload = PacketEncode::new();
        payload.put_bytes(b"host key");
        payload.put_bytes(server_eph_pubkey);
        payload.put_bytes(b"signature");
        PacketDecode::new(payload.finish())
    }

    #[test]
    fn test_exchange() {
        let rng = &mut rand_chacha::ChaCha8Rng::seed_from_u64(25519);
        let mut kex = init_kex(rng).unwrap();

        let mut init = PacketDecode::new(kex.send_packet().unwrap().unwrap());
        assert_eq!(init.get_u8().unwrap(), msg::KEX_ECDH_INIT);
        let client_point: [u8; 32] = init.get_bytes().unwrap().as_ref().try_into().unwrap();

        let server_eph_privkey = EphemeralSecret::random_from_rng(&mut *rng);
        let server_eph_pubkey = PublicKey::from(&server_eph_privkey);
        let server_secret = server_eph_privkey.diffie_hellman(&PublicKey::from(client_point));

        kex.recv_packet(msg::KEX_ECDH_REPLY, &mut reply(server_eph_pubkey.as_bytes()), rng).unwrap();
        let output = match kex.poll(&transcript()) {
            Poll::Ready(res) => res.unwrap(),
            Poll::Pending => panic!("kex is still pending"),
        };
        assert_eq!(output.shared_secret, SharedSecret::from_uint_be(server_secret.as_bytes()));
        assert_eq!(output.exchange_hash.len(), 32);
    }

    #[test]
    fn test_rejects_low_order_point() {
        let rng = &mut rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let mut kex = init_kex(rng).unwrap();
        kex.send_packet().unwrap();
        kex.recv_packet(msg::KEX_ECDH_REPLY, &mut reply(&[0; 32]), rng).unwrap();
        match kex.poll(&transcript()) {
            Poll::Ready(Err(Error::Protocol(_))) => {},
            Poll::Ready(res) => panic!("unexpected result {:?}", res),
            Poll::Pending => panic!("kex is still pending"),
        }
    }

    #[test]
    fn test_rejects_bad_length() {
        let rng = &mut rand_chacha::ChaCha8Rng::seed_from_u64(2);
        let mut kex = init_kex(rng).unwrap();
        assert!(kex.recv_packet(msg::KEX_ECDH_REPLY, &mut reply(&[9; 31]), rng).is_err());
    }
}
