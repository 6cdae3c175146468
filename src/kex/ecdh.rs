use bytes::Bytes;
use p256::elliptic_curve;
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey};
use elliptic_curve::ecdh::EphemeralSecret;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use std::task::Poll;
use crate::codec::{PacketDecode, PacketEncode};
use crate::codes::msg;
use crate::error::{Error, Result};
use crate::util::CryptoRngCore;
use super::{KexAlgo, KexOutput, Kex, SecurityTier, Transcript};
use super::hash::{ExchangeHash, ExchangeValues, HashAlgo};
use super::secret::SharedSecret;

pub(super) static ECDH_MSG_IDS: &[u8] = &[msg::KEX_ECDH_INIT, msg::KEX_ECDH_REPLY];

/// "ecdh-sha2-nistp256" key exchange from RFC 5656.
pub static ECDH_SHA2_NISTP256: KexAlgo = KexAlgo {
    name: "ecdh-sha2-nistp256",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 30,
    msg_ids: ECDH_MSG_IDS,
    make_kex: |_, rng| Ok(Box::new(init_kex::<p256::NistP256>(HashAlgo::Sha256, rng)?)),
};

/// "ecdh-sha2-nistp384" key exchange from RFC 5656.
pub static ECDH_SHA2_NISTP384: KexAlgo = KexAlgo {
    name: "ecdh-sha2-nistp384",
    hash: HashAlgo::Sha384,
    tier: SecurityTier::Strong,
    priority: 40,
    msg_ids: ECDH_MSG_IDS,
    make_kex: |_, rng| Ok(Box::new(init_kex::<p384::NistP384>(HashAlgo::Sha384, rng)?)),
};

/// "ecdh-sha2-nistp521" key exchange from RFC 5656.
pub static ECDH_SHA2_NISTP521: KexAlgo = KexAlgo {
    name: "ecdh-sha2-nistp521",
    hash: HashAlgo::Sha512,
    tier: SecurityTier::Paranoid,
    priority: 50,
    msg_ids: ECDH_MSG_IDS,
    make_kex: |_, rng| Ok(Box::new(init_kex::<p521::NistP521>(HashAlgo::Sha512, rng)?)),
};

struct EcdhKex<C: CurveArithmetic> {
    hash: HashAlgo,
    our_eph_privkey: Option<EphemeralSecret<C>>,
    our_eph_pubkey: Bytes,
    ecdh_init_sent: bool,
    ecdh_reply: Option<EcdhReply<C>>,
}

struct EcdhReply<C: CurveArithmetic> {
    server_pubkey: Bytes,
    server_eph_pubkey_bytes: Bytes,
    server_eph_pubkey: PublicKey<C>,
    server_exchange_hash_sign: Bytes,
}

fn init_kex<C>(hash: HashAlgo, mut rng: &mut dyn CryptoRngCore) -> Result<EcdhKex<C>>
    where C: CurveArithmetic,
          FieldBytesSize<C>: ModulusSize,
          AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let our_eph_privkey = EphemeralSecret::<C>::random(&mut rng);
    let our_eph_pubkey = our_eph_privkey.public_key().to_encoded_point(false);
    let our_eph_pubkey = Bytes::copy_from_slice(our_eph_pubkey.as_bytes());
    log::debug!("initialized ecdh kex");
    Ok(EcdhKex {
        hash,
        our_eph_privkey: Some(our_eph_privkey),
        our_eph_pubkey,
        ecdh_init_sent: false,
        ecdh_reply: None,
    })
}

impl<C> Kex for EcdhKex<C>
    where C: CurveArithmetic,
          FieldBytesSize<C>: ModulusSize,
          AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
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

fn send_ecdh_init<C: CurveArithmetic>(kex: &mut EcdhKex<C>) -> Result<Bytes> {
    // RFC 5656, section 4
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEX_ECDH_INIT);
    payload.put_bytes(&kex.our_eph_pubkey);
    log::debug!("sending SSH_MSG_KEX_ECDH_INIT");
    Ok(payload.finish())
}

fn recv_ecdh_reply<C>(kex: &mut EcdhKex<C>, payload: &mut PacketDecode) -> Result<()>
    where C: CurveArithmetic,
          FieldBytesSize<C>: ModulusSize,
          AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    if kex.ecdh_reply.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEX_ECDH_REPLY"))
    }

    // RFC 5656, section 4
    let server_pubkey = payload.get_bytes()?;
    let server_eph_pubkey_bytes = payload.get_bytes()?;
    let server_exchange_hash_sign = payload.get_bytes()?;

    // RFC 5656, section 4 requires the point to be validated (section 3.2.2.1 of SEC1)
    let server_eph_pubkey = PublicKey::<C>::from_sec1_bytes(&server_eph_pubkey_bytes)
        .map_err(|_| {
            log::warn!("server sent ECDH public key that is not a valid point");
            Error::Protocol("server sent invalid ECDH public key")
        })?;

    kex.ecdh_reply = Some(EcdhReply {
        server_pubkey, server_eph_pubkey_bytes, server_eph_pubkey, server_exchange_hash_sign,
    });
    log::debug!("received SSH_MSG_KEX_ECDH_REPLY");

    Ok(())
}

fn exchange<C: CurveArithmetic>(
    kex: &mut EcdhKex<C>,
    our_eph_privkey: EphemeralSecret<C>,
    ecdh_reply: EcdhReply<C>,
    input: &Transcript,
) -> Result<KexOutput> {
    let EcdhReply { server_pubkey, server_eph_pubkey_bytes, server_eph_pubkey, server_exchange_hash_sign } = ecdh_reply;

    let raw_secret = our_eph_privkey.diffie_hellman(&server_eph_pubkey);
    let shared_secret = SharedSecret::from_uint_be(raw_secret.raw_secret_bytes().as_slice());

    let exchange_hash = ExchangeHash::new()
        .transcript(input)
        .server_pubkey(server_pubkey.clone())
        .values(ExchangeValues::Ecdh {
            client_pubkey: kex.our_eph_pubkey.clone(),
            server_pubkey: server_eph_pubkey_bytes,
        })
        .shared_secret(shared_secret.clone())
        .compute(kex.hash)?;

    Ok(KexOutput { shared_secret, exchange_hash, server_pubkey, server_exchange_hash_sign })
}
