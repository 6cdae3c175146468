use bytes::Bytes;
use derivative::Derivative;
use num_bigint_dig::BigUint;
use std::sync::Arc;
use std::task::Poll;
use crate::codec::{PacketDecode, PacketEncode};
use crate::codes::msg;
use crate::error::{Error, Result};
use crate::util::CryptoRngCore;
use super::{KexAlgo, KexConfig, KexOutput, Kex, SecurityTier, Transcript};
use super::config::{GexBounds, GexSecretPath};
use super::dh::DhGroup;
use super::hash::{ExchangeHash, ExchangeValues, HashAlgo};
use super::provider::{DhKeypair, DhProvider, GexCapability, modpow_manual, random_keypair};
use super::secret::SharedSecret;

static GEX_MSG_IDS: &[u8] = &[
    msg::KEX_DH_GEX_REQUEST_OLD, msg::KEX_DH_GEX_GROUP, msg::KEX_DH_GEX_INIT,
    msg::KEX_DH_GEX_REPLY, msg::KEX_DH_GEX_REQUEST,
];

/// Smallest prime that we accept from the server, regardless of the requested bounds.
const MIN_PRIME_BITS: u32 = 1024;

/// "diffie-hellman-group-exchange-sha256" key exchange from RFC 4419.
pub static DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256: KexAlgo = KexAlgo {
    name: "diffie-hellman-group-exchange-sha256",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 60,
    msg_ids: GEX_MSG_IDS,
    make_kex: |config, _| Ok(Box::new(init_kex(HashAlgo::Sha256, config)?)),
};

/// "diffie-hellman-group-exchange-sha1" key exchange from RFC 4419.
pub static DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1: KexAlgo = KexAlgo {
    name: "diffie-hellman-group-exchange-sha1",
    hash: HashAlgo::Sha1,
    tier: SecurityTier::Weak,
    priority: 130,
    msg_ids: GEX_MSG_IDS,
    make_kex: |config, _| Ok(Box::new(init_kex(HashAlgo::Sha1, config)?)),
};

/// Checks the group sent by the server in SSH_MSG_KEX_DH_GEX_GROUP.
///
/// The checks are performed in this order:
///
/// 1. the prime must not be larger than `max_supported_bits`,
/// 2. the generator must be larger than 1,
/// 3. the prime must have at least `max(min_bits, 1024)` bits,
/// 4. the generator must be smaller than `p - 1`.
pub fn validate_group(p: &BigUint, g: &BigUint, min_bits: u32, max_supported_bits: u32) -> Result<()> {
    let p_bits = p.bits();
    if p_bits > max_supported_bits as usize {
        log::warn!("server sent {}-bit prime, but at most {} bits are supported", p_bits, max_supported_bits);
        return Err(Error::Protocol("server sent Diffie-Hellman prime that is too large"))
    }

    if *g <= BigUint::from(1u32) {
        log::warn!("server sent Diffie-Hellman generator {}", g);
        return Err(Error::Protocol("server sent invalid Diffie-Hellman generator"))
    }

    if p_bits < min_bits.max(MIN_PRIME_BITS) as usize {
        log::warn!("server sent {}-bit prime, but we requested at least {} bits", p_bits, min_bits);
        return Err(Error::Protocol("server sent Diffie-Hellman prime that is too small"))
    }

    if *g >= p - BigUint::from(1u32) {
        log::warn!("server sent Diffie-Hellman generator that is not smaller than p - 1");
        return Err(Error::Protocol("server sent invalid Diffie-Hellman generator"))
    }

    Ok(())
}

#[derive(Derivative)]
#[derivative(Debug)]
struct GexKex {
    hash: HashAlgo,
    #[derivative(Debug = "ignore")]
    provider: Arc<dyn DhProvider>,
    secret_path: GexSecretPath,
    capability: GexCapability,
    bounds: GexBounds,
    request_sent: bool,
    group: Option<GexGroup>,
    init_sent: bool,
    reply: Option<GexReply>,
}

#[derive(Debug)]
struct GexGroup {
    group: DhGroup,
    keypair: DhKeypair,
}

#[derive(Debug)]
struct GexReply {
    server_pubkey: Bytes,
    server_eph_pubkey: BigUint,
    server_exchange_hash_sign: Bytes,
}

pub(crate) fn is_group_exchange(algo: &KexAlgo) -> bool {
    std::ptr::eq(algo, &DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256)
        || std::ptr::eq(algo, &DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1)
}

fn init_kex(hash: HashAlgo, config: &KexConfig) -> Result<GexKex> {
    let capability = config.effective_gex_capability()?;
    let bounds = config.gex_bounds.clamp(&capability);
    log::debug!("initialized group exchange kex, requesting {:?}", bounds);
    Ok(GexKex {
        hash, capability, bounds,
        provider: config.dh_provider.clone(),
        secret_path: config.gex_secret_path,
        request_sent: false,
        group: None,
        init_sent: false,
        reply: None,
    })
}

impl Kex for GexKex {
    fn recv_packet(&mut self, msg_id: u8, payload: &mut PacketDecode, rng: &mut dyn CryptoRngCore) -> Result<()> {
        match msg_id {
            msg::KEX_DH_GEX_GROUP => recv_gex_group(self, payload, rng),
            msg::KEX_DH_GEX_REPLY => recv_gex_reply(self, payload),
            _ => Err(Error::PacketNotImplemented(msg_id)),
        }
    }

    fn send_packet(&mut self) -> Result<Option<Bytes>> {
        if !self.request_sent {
            let payload = send_gex_request(self)?;
            self.request_sent = true;
            return Ok(Some(payload))
        }

        if !self.init_sent {
            if let Some(group) = self.group.as_ref() {
                let payload = send_gex_init(group)?;
                self.init_sent = true;
                return Ok(Some(payload))
            }
        }

        Ok(None)
    }

    fn poll(&mut self, input: &Transcript) -> Poll<Result<KexOutput>> {
        match self.reply.take() {
            Some(reply) => Poll::Ready(exchange(self, reply, input)),
            None => Poll::Pending,
        }
    }
}

fn send_gex_request(kex: &GexKex) -> Result<Bytes> {
    // RFC 4419, section 3
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEX_DH_GEX_REQUEST);
    payload.put_u32(kex.bounds.min);
    payload.put_u32(kex.bounds.preferred);
    payload.put_u32(kex.bounds.max);
    log::debug!("sending SSH_MSG_KEX_DH_GEX_REQUEST");
    Ok(payload.finish())
}

fn recv_gex_group(kex: &mut GexKex, payload: &mut PacketDecode, rng: &mut dyn CryptoRngCore) -> Result<()> {
    if !kex.request_sent {
        return Err(Error::Protocol("received SSH_MSG_KEX_DH_GEX_GROUP before sending a request"))
    }
    if kex.group.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEX_DH_GEX_GROUP"))
    }

    let p = payload.get_biguint()?;
    let g = payload.get_biguint()?;
    log::debug!("received SSH_MSG_KEX_DH_GEX_GROUP with {}-bit prime", p.bits());
    validate_group(&p, &g, kex.bounds.min, kex.capability.max_bits())?;

    let group = DhGroup::new(p, g);
    let keypair = if kex.secret_path.use_provider(group.bits()) {
        kex.provider.generate_keypair(&group, rng)?
    } else {
        random_keypair(&group, rng, modpow_manual)?
    };
    if !group.is_in_range(keypair.public()) {
        return Err(Error::Crypto("Diffie-Hellman provider generated an invalid public value", None))
    }

    kex.group = Some(GexGroup { group, keypair });
    Ok(())
}

fn send_gex_init(group: &GexGroup) -> Result<Bytes> {
    // RFC 4419, section 3
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEX_DH_GEX_INIT);
    payload.put_biguint(group.keypair.public());
    log::debug!("sending SSH_MSG_KEX_DH_GEX_INIT");
    Ok(payload.finish())
}

fn recv_gex_reply(kex: &mut GexKex, payload: &mut PacketDecode) -> Result<()> {
    let Some(group) = kex.group.as_ref() else {
        return Err(Error::Protocol("received SSH_MSG_KEX_DH_GEX_REPLY before SSH_MSG_KEX_DH_GEX_GROUP"))
    };
    if kex.reply.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEX_DH_GEX_REPLY"))
    }

    let server_pubkey = payload.get_bytes()?;
    let server_eph_pubkey = payload.get_biguint()?;
    let server_exchange_hash_sign = payload.get_bytes()?;

    if !group.group.is_in_range(&server_eph_pubkey) {
        log::warn!("server sent Diffie-Hellman public value out of range");
        return Err(Error::Protocol("server sent invalid Diffie-Hellman ephemeral public key"))
    }

    kex.reply = Some(GexReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign });
    log::debug!("received SSH_MSG_KEX_DH_GEX_REPLY");
    Ok(())
}

fn compute_secret(
    provider: &dyn DhProvider,
    secret_path: GexSecretPath,
    group: &GexGroup,
    server_eph_pubkey: &BigUint,
) -> Result<BigUint> {
    if secret_path.use_provider(group.group.bits()) {
        provider.agree(&group.group, &group.keypair, server_eph_pubkey)
    } else {
        Ok(modpow_manual(server_eph_pubkey, group.keypair.private(), group.group.p()))
    }
}

fn exchange(kex: &mut GexKex, reply: GexReply, input: &Transcript) -> Result<KexOutput> {
    let GexReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign } = reply;
    let Some(group) = kex.group.as_ref() else {
        return Err(Error::Protocol("group exchange has no group"))
    };

    let shared_secret = compute_secret(&*kex.provider, kex.secret_path, group, &server_eph_pubkey)?;
    if !group.group.is_in_range(&shared_secret) {
        return Err(Error::Protocol("Diffie-Hellman shared secret is out of range"))
    }
    let shared_secret = SharedSecret::from_biguint(&shared_secret);

    let exchange_hash = ExchangeHash::new()
        .transcript(input)
        .server_pubkey(server_pubkey.clone())
        .values(ExchangeValues::Gex {
            min: kex.bounds.min,
            preferred: kex.bounds.preferred,
            max: kex.bounds.max,
            p: group.group.p().clone(),
            g: group.group.g().clone(),
            e: group.keypair.public().clone(),
            f: server_eph_pubkey,
        })
        .shared_secret(shared_secret.clone())
        .compute(kex.hash)?;

    Ok(KexOutput { shared_secret, exchange_hash, server_pubkey, server_exchange_hash_sign })
}
