use bytes::Bytes;
use derivative::Derivative;
use hex_literal::hex;
use num_bigint_dig::BigUint;
use std::sync::Arc;
use std::task::Poll;
use crate::codec::{PacketDecode, PacketEncode};
use crate::codes::msg;
use crate::error::{Error, Result};
use crate::util::CryptoRngCore;
use super::{KexAlgo, KexConfig, KexOutput, Kex, SecurityTier, Transcript};
use super::hash::{ExchangeHash, ExchangeValues, HashAlgo};
use super::provider::{DhKeypair, DhProvider};
use super::secret::SharedSecret;

static DH_MSG_IDS: &[u8] = &[msg::KEXDH_INIT, msg::KEXDH_REPLY];

/// "diffie-hellman-group1-sha1" key exchange from RFC 4253, which SHOULD NOT be used according
/// to RFC 9142.
///
/// Note that the name refers to "group1", but in fact the key exchange uses group 2.
pub static DIFFIE_HELLMAN_GROUP1_SHA1: KexAlgo = KexAlgo {
    name: "diffie-hellman-group1-sha1",
    hash: HashAlgo::Sha1,
    tier: SecurityTier::Weak,
    priority: 160,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_2(), HashAlgo::Sha1, config, rng)?)),
};

/// "diffie-hellman-group14-sha1" key exchange from RFC 4253.
pub static DIFFIE_HELLMAN_GROUP14_SHA1: KexAlgo = KexAlgo {
    name: "diffie-hellman-group14-sha1",
    hash: HashAlgo::Sha1,
    tier: SecurityTier::Weak,
    priority: 140,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_14(), HashAlgo::Sha1, config, rng)?)),
};

/// "diffie-hellman-group14-sha256" key exchange from RFC 8268.
pub static DIFFIE_HELLMAN_GROUP14_SHA256: KexAlgo = KexAlgo {
    name: "diffie-hellman-group14-sha256",
    hash: HashAlgo::Sha256,
    tier: SecurityTier::Strong,
    priority: 110,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_14(), HashAlgo::Sha256, config, rng)?)),
};

/// "diffie-hellman-group15-sha512" key exchange from RFC 8268.
pub static DIFFIE_HELLMAN_GROUP15_SHA512: KexAlgo = KexAlgo {
    name: "diffie-hellman-group15-sha512",
    hash: HashAlgo::Sha512,
    tier: SecurityTier::Strong,
    priority: 100,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_15(), HashAlgo::Sha512, config, rng)?)),
};

/// "diffie-hellman-group16-sha512" key exchange from RFC 8268.
pub static DIFFIE_HELLMAN_GROUP16_SHA512: KexAlgo = KexAlgo {
    name: "diffie-hellman-group16-sha512",
    hash: HashAlgo::Sha512,
    tier: SecurityTier::Strong,
    priority: 70,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_16(), HashAlgo::Sha512, config, rng)?)),
};

/// "diffie-hellman-group17-sha512" key exchange from RFC 8268.
pub static DIFFIE_HELLMAN_GROUP17_SHA512: KexAlgo = KexAlgo {
    name: "diffie-hellman-group17-sha512",
    hash: HashAlgo::Sha512,
    tier: SecurityTier::Paranoid,
    priority: 90,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_17(), HashAlgo::Sha512, config, rng)?)),
};

/// "diffie-hellman-group18-sha512" key exchange from RFC 8268.
pub static DIFFIE_HELLMAN_GROUP18_SHA512: KexAlgo = KexAlgo {
    name: "diffie-hellman-group18-sha512",
    hash: HashAlgo::Sha512,
    tier: SecurityTier::Paranoid,
    priority: 80,
    msg_ids: DH_MSG_IDS,
    make_kex: |config, rng| Ok(Box::new(init_kex(DhGroup::group_18(), HashAlgo::Sha512, config, rng)?)),
};

/// Multiplicative group modulo a safe prime `p` with generator `g`.
///
/// This is used both for the fixed groups from RFC 3526 and for the groups sent by the server in
/// Diffie-Hellman group exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhGroup {
    p: BigUint,
    g: BigUint,
    p_minus_1: BigUint,
}

impl DhGroup {
    /// Creates a group from the prime and the generator.
    ///
    /// The parameters are not validated here, see [`validate_group()`][super::validate_group].
    pub fn new(p: BigUint, g: BigUint) -> DhGroup {
        let one = BigUint::from(1u32);
        let p_minus_1 = if p >= one { &p - one } else { BigUint::from(0u32) };
        DhGroup { p, g, p_minus_1 }
    }

    /// The prime modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Size of the prime in bits.
    pub fn bits(&self) -> usize {
        self.p.bits()
    }

    /// Returns true if `value` lies strictly between 1 and `p - 1` (RFC 8268, section 4).
    ///
    /// Both public values and the shared secret must satisfy this.
    pub fn is_in_range(&self, value: &BigUint) -> bool {
        *value > BigUint::from(1u32) && *value < self.p_minus_1
    }

    pub(crate) fn p_minus_1(&self) -> &BigUint {
        &self.p_minus_1
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
struct DiffieHellmanKex {
    group: DhGroup,
    hash: HashAlgo,
    #[derivative(Debug = "ignore")]
    provider: Arc<dyn DhProvider>,
    keypair: DhKeypair,
    kexdh_init_sent: bool,
    kexdh_reply: Option<KexdhReply>,
}

#[derive(Debug)]
struct KexdhReply {
    server_pubkey: Bytes,
    server_eph_pubkey: BigUint,
    server_exchange_hash_sign: Bytes,
}

fn init_kex(
    group: DhGroup,
    hash: HashAlgo,
    config: &KexConfig,
    rng: &mut dyn CryptoRngCore,
) -> Result<DiffieHellmanKex> {
    let keypair = config.dh_provider.generate_keypair(&group, rng)?;
    if !group.is_in_range(keypair.public()) {
        return Err(Error::Crypto("Diffie-Hellman provider generated an invalid public value", None))
    }
    log::debug!("initialized Diffie-Hellman kex with {}-bit group", group.bits());
    Ok(new_kex(group, hash, config.dh_provider.clone(), keypair))
}

fn new_kex(group: DhGroup, hash: HashAlgo, provider: Arc<dyn DhProvider>, keypair: DhKeypair) -> DiffieHellmanKex {
    DiffieHellmanKex {
        group, hash, provider, keypair,
        kexdh_init_sent: false,
        kexdh_reply: None,
    }
}

impl Kex for DiffieHellmanKex {
    fn recv_packet(&mut self, msg_id: u8, payload: &mut PacketDecode, _: &mut dyn CryptoRngCore) -> Result<()> {
        match msg_id {
            msg::KEXDH_REPLY => recv_kexdh_reply(self, payload),
            _ => Err(Error::PacketNotImplemented(msg_id)),
        }
    }

    fn send_packet(&mut self) -> Result<Option<Bytes>> {
        if !self.kexdh_init_sent {
            let payload = send_kexdh_init(self)?;
            self.kexdh_init_sent = true;
            return Ok(Some(payload))
        }
        Ok(None)
    }

    fn poll(&mut self, input: &Transcript) -> Poll<Result<KexOutput>> {
        match self.kexdh_reply.take() {
            Some(kexdh_reply) => Poll::Ready(exchange(self, kexdh_reply, input)),
            None => Poll::Pending,
        }
    }
}

fn send_kexdh_init(kex: &mut DiffieHellmanKex) -> Result<Bytes> {
    // RFC 4253, section 8
    let mut payload = PacketEncode::new();
    payload.put_u8(msg::KEXDH_INIT);
    payload.put_biguint(kex.keypair.public());
    log::debug!("sending SSH_MSG_KEXDH_INIT");
    Ok(payload.finish())
}

fn recv_kexdh_reply(kex: &mut DiffieHellmanKex, payload: &mut PacketDecode) -> Result<()> {
    if kex.kexdh_reply.is_some() {
        return Err(Error::Protocol("received duplicate SSH_MSG_KEXDH_REPLY"))
    }

    // RFC 4253, section 8
    let server_pubkey = payload.get_bytes()?;
    let server_eph_pubkey = payload.get_biguint()?;
    let server_exchange_hash_sign = payload.get_bytes()?;

    // RFC 8268, section 4
    if !kex.group.is_in_range(&server_eph_pubkey) {
        log::warn!("server sent Diffie-Hellman public value out of range");
        return Err(Error::Protocol("server sent invalid Diffie-Hellman ephemeral public key"))
    }

    kex.kexdh_reply = Some(KexdhReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign });
    log::debug!("received SSH_MSG_KEXDH_REPLY");

    Ok(())
}

fn exchange(kex: &mut DiffieHellmanKex, kexdh_reply: KexdhReply, input: &Transcript) -> Result<KexOutput> {
    let KexdhReply { server_pubkey, server_eph_pubkey, server_exchange_hash_sign } = kexdh_reply;

    let shared_secret = kex.provider.agree(&kex.group, &kex.keypair, &server_eph_pubkey)?;
    if !kex.group.is_in_range(&shared_secret) {
        return Err(Error::Protocol("Diffie-Hellman shared secret is out of range"))
    }
    let shared_secret = SharedSecret::from_biguint(&shared_secret);

    let exchange_hash = ExchangeHash::new()
        .transcript(input)
        .server_pubkey(server_pubkey.clone())
        .values(ExchangeValues::Dh { e: kex.keypair.public().clone(), f: server_eph_pubkey })
        .shared_secret(shared_secret.clone())
        .compute(kex.hash)?;

    Ok(KexOutput { shared_secret, exchange_hash, server_pubkey, server_exchange_hash_sign })
}

impl DhGroup {
    /// Oakley group 2 (1024 bits).
    pub fn group_2() -> DhGroup {
        // RFC 2409, section 6.2
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE65381"
            "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }

    /// Group 14 (2048 bits).
    pub fn group_14() -> DhGroup {
        // RFC 3526, section 3
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE45B3D"
            "C2007CB8" "A163BF05" "98DA4836" "1C55D39A" "69163FA8" "FD24CF5F"
            "83655D23" "DCA3AD96" "1C62F356" "208552BB" "9ED52907" "7096966D"
            "670C354E" "4ABC9804" "F1746C08" "CA18217C" "32905E46" "2E36CE3B"
            "E39E772C" "180E8603" "9B2783A2" "EC07A28F" "B5C55DF0" "6F4C52C9"
            "DE2BCBF6" "95581718" "3995497C" "EA956AE5" "15D22618" "98FA0510"
            "15728E5A" "8AACAA68" "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }

    /// Group 15 (3072 bits).
    pub fn group_15() -> DhGroup {
        // RFC 3526, section 4
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE45B3D"
            "C2007CB8" "A163BF05" "98DA4836" "1C55D39A" "69163FA8" "FD24CF5F"
            "83655D23" "DCA3AD96" "1C62F356" "208552BB" "9ED52907" "7096966D"
            "670C354E" "4ABC9804" "F1746C08" "CA18217C" "32905E46" "2E36CE3B"
            "E39E772C" "180E8603" "9B2783A2" "EC07A28F" "B5C55DF0" "6F4C52C9"
            "DE2BCBF6" "95581718" "3995497C" "EA956AE5" "15D22618" "98FA0510"
            "15728E5A" "8AAAC42D" "AD33170D" "04507A33" "A85521AB" "DF1CBA64"
            "ECFB8504" "58DBEF0A" "8AEA7157" "5D060C7D" "B3970F85" "A6E1E4C7"
            "ABF5AE8C" "DB0933D7" "1E8C94E0" "4A25619D" "CEE3D226" "1AD2EE6B"
            "F12FFA06" "D98A0864" "D8760273" "3EC86A64" "521F2B18" "177B200C"
            "BBE11757" "7A615D6C" "770988C0" "BAD946E2" "08E24FA0" "74E5AB31"
            "43DB5BFC" "E0FD108E" "4B82D120" "A93AD2CA" "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }

    /// Group 16 (4096 bits).
    pub fn group_16() -> DhGroup {
        // RFC 3526, section 5
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE45B3D"
            "C2007CB8" "A163BF05" "98DA4836" "1C55D39A" "69163FA8" "FD24CF5F"
            "83655D23" "DCA3AD96" "1C62F356" "208552BB" "9ED52907" "7096966D"
            "670C354E" "4ABC9804" "F1746C08" "CA18217C" "32905E46" "2E36CE3B"
            "E39E772C" "180E8603" "9B2783A2" "EC07A28F" "B5C55DF0" "6F4C52C9"
            "DE2BCBF6" "95581718" "3995497C" "EA956AE5" "15D22618" "98FA0510"
            "15728E5A" "8AAAC42D" "AD33170D" "04507A33" "A85521AB" "DF1CBA64"
            "ECFB8504" "58DBEF0A" "8AEA7157" "5D060C7D" "B3970F85" "A6E1E4C7"
            "ABF5AE8C" "DB0933D7" "1E8C94E0" "4A25619D" "CEE3D226" "1AD2EE6B"
            "F12FFA06" "D98A0864" "D8760273" "3EC86A64" "521F2B18" "177B200C"
            "BBE11757" "7A615D6C" "770988C0" "BAD946E2" "08E24FA0" "74E5AB31"
            "43DB5BFC" "E0FD108E" "4B82D120" "A9210801" "1A723C12" "A787E6D7"
            "88719A10" "BDBA5B26" "99C32718" "6AF4E23C" "1A946834" "B6150BDA"
            "2583E9CA" "2AD44CE8" "DBBBC2DB" "04DE8EF9" "2E8EFC14" "1FBECAA6"
            "287C5947" "4E6BC05D" "99B2964F" "A090C3A2" "233BA186" "515BE7ED"
            "1F612970" "CEE2D7AF" "B81BDD76" "2170481C" "D0069127" "D5B05AA9"
            "93B4EA98" "8D8FDDC1" "86FFB7DC" "90A6C08F" "4DF435C9" "34063199"
            "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }

    /// Group 17 (6144 bits).
    pub fn group_17() -> DhGroup {
        // RFC 3526, section 6
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE45B3D"
            "C2007CB8" "A163BF05" "98DA4836" "1C55D39A" "69163FA8" "FD24CF5F"
            "83655D23" "DCA3AD96" "1C62F356" "208552BB" "9ED52907" "7096966D"
            "670C354E" "4ABC9804" "F1746C08" "CA18217C" "32905E46" "2E36CE3B"
            "E39E772C" "180E8603" "9B2783A2" "EC07A28F" "B5C55DF0" "6F4C52C9"
            "DE2BCBF6" "95581718" "3995497C" "EA956AE5" "15D22618" "98FA0510"
            "15728E5A" "8AAAC42D" "AD33170D" "04507A33" "A85521AB" "DF1CBA64"
            "ECFB8504" "58DBEF0A" "8AEA7157" "5D060C7D" "B3970F85" "A6E1E4C7"
            "ABF5AE8C" "DB0933D7" "1E8C94E0" "4A25619D" "CEE3D226" "1AD2EE6B"
            "F12FFA06" "D98A0864" "D8760273" "3EC86A64" "521F2B18" "177B200C"
            "BBE11757" "7A615D6C" "770988C0" "BAD946E2" "08E24FA0" "74E5AB31"
            "43DB5BFC" "E0FD108E" "4B82D120" "A9210801" "1A723C12" "A787E6D7"
            "88719A10" "BDBA5B26" "99C32718" "6AF4E23C" "1A946834" "B6150BDA"
            "2583E9CA" "2AD44CE8" "DBBBC2DB" "04DE8EF9" "2E8EFC14" "1FBECAA6"
            "287C5947" "4E6BC05D" "99B2964F" "A090C3A2" "233BA186" "515BE7ED"
            "1F612970" "CEE2D7AF" "B81BDD76" "2170481C" "D0069127" "D5B05AA9"
            "93B4EA98" "8D8FDDC1" "86FFB7DC" "90A6C08F" "4DF435C9" "34028492"
            "36C3FAB4" "D27C7026" "C1D4DCB2" "602646DE" "C9751E76" "3DBA37BD"
            "F8FF9406" "AD9E530E" "E5DB382F" "413001AE" "B06A53ED" "9027D831"
            "179727B0" "865A8918" "DA3EDBEB" "CF9B14ED" "44CE6CBA" "CED4BB1B"
            "DB7F1447" "E6CC254B" "33205151" "2BD7AF42" "6FB8F401" "378CD2BF"
            "5983CA01" "C64B92EC" "F032EA15" "D1721D03" "F482D7CE" "6E74FEF6"
            "D55E702F" "46980C82" "B5A84031" "900B1C9E" "59E7C97F" "BEC7E8F3"
            "23A97A7E" "36CC88BE" "0F1D45B7" "FF585AC5" "4BD407B2" "2B4154AA"
            "CC8F6D7E" "BF48E1D8" "14CC5ED2" "0F8037E0" "A79715EE" "F29BE328"
            "06A1D58B" "B7C5DA76" "F550AA3D" "8A1FBFF0" "EB19CCB1" "A313D55C"
            "DA56C9EC" "2EF29632" "387FE8D7" "6E3C0468" "043E8F66" "3F4860EE"
            "12BF2D5B" "0B7474D6" "E694F91E" "6DCC4024" "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }

    /// Group 18 (8192 bits).
    pub fn group_18() -> DhGroup {
        // RFC 3526, section 7
        DhGroup::new(BigUint::from_bytes_be(&hex!(
            "FFFFFFFF" "FFFFFFFF" "C90FDAA2" "2168C234" "C4C6628B" "80DC1CD1"
            "29024E08" "8A67CC74" "020BBEA6" "3B139B22" "514A0879" "8E3404DD"
            "EF9519B3" "CD3A431B" "302B0A6D" "F25F1437" "4FE1356D" "6D51C245"
            "E485B576" "625E7EC6" "F44C42E9" "A637ED6B" "0BFF5CB6" "F406B7ED"
            "EE386BFB" "5A899FA5" "AE9F2411" "7C4B1FE6" "49286651" "ECE45B3D"
            "C2007CB8" "A163BF05" "98DA4836" "1C55D39A" "69163FA8" "FD24CF5F"
            "83655D23" "DCA3AD96" "1C62F356" "208552BB" "9ED52907" "7096966D"
            "670C354E" "4ABC9804" "F1746C08" "CA18217C" "32905E46" "2E36CE3B"
            "E39E772C" "180E8603" "9B2783A2" "EC07A28F" "B5C55DF0" "6F4C52C9"
            "DE2BCBF6" "95581718" "3995497C" "EA956AE5" "15D22618" "98FA0510"
            "15728E5A" "8AAAC42D" "AD33170D" "04507A33" "A85521AB" "DF1CBA64"
            "ECFB8504" "58DBEF0A" "8AEA7157" "5D060C7D" "B3970F85" "A6E1E4C7"
            "ABF5AE8C" "DB0933D7" "1E8C94E0" "4A25619D" "CEE3D226" "1AD2EE6B"
            "F12FFA06" "D98A0864" "D8760273" "3EC86A64" "521F2B18" "177B200C"
            "BBE11757" "7A615D6C" "770988C0" "BAD946E2" "08E24FA0" "74E5AB31"
            "43DB5BFC" "E0FD108E" "4B82D120" "A9210801" "1A723C12" "A787E6D7"
            "88719A10" "BDBA5B26" "99C32718" "6AF4E23C" "1A946834" "B6150BDA"
            "2583E9CA" "2AD44CE8" "DBBBC2DB" "04DE8EF9" "2E8EFC14" "1FBECAA6"
            "287C5947" "4E6BC05D" "99B2964F" "A090C3A2" "233BA186" "515BE7ED"
            "1F612970" "CEE2D7AF" "B81BDD76" "2170481C" "D0069127" "D5B05AA9"
            "93B4EA98" "8D8FDDC1" "86FFB7DC" "90A6C08F" "4DF435C9" "34028492"
            "36C3FAB4" "D27C7026" "C1D4DCB2" "602646DE" "C9751E76" "3DBA37BD"
            "F8FF9406" "AD9E530E" "E5DB382F" "413001AE" "B06A53ED" "9027D831"
            "179727B0" "865A8918" "DA3EDBEB" "CF9B14ED" "44CE6CBA" "CED4BB1B"
            "DB7F1447" "E6CC254B" "33205151" "2BD7AF42" "6FB8F401" "378CD2BF"
            "5983CA01" "C64B92EC" "F032EA15" "D1721D03" "F482D7CE" "6E74FEF6"
            "D55E702F" "46980C82" "B5A84031" "900B1C9E" "59E7C97F" "BEC7E8F3"
            "23A97A7E" "36CC88BE" "0F1D45B7" "FF585AC5" "4BD407B2" "2B4154AA"
            "CC8F6D7E" "BF48E1D8" "14CC5ED2" "0F8037E0" "A79715EE" "F29BE328"
            "06A1D58B" "B7C5DA76" "F550AA3D" "8A1FBFF0" "EB19CCB1" "A313D55C"
            "DA56C9EC" "2EF29632" "387FE8D7" "6E3C0468" "043E8F66" "3F4860EE"
            "12BF2D5B" "0B7474D6" "E694F91E" "6DBE1159" "74A3926F" "12FEE5E4"
            "38777CB6" "A932DF8C" "D8BEC4D0" "73B931BA" "3BC832B6" "8D9DD300"
            "741FA7BF" "8AFC47ED" "2576F693" "6BA42466" "3AAB639C" "5AE4F568"
            "3423B474" "2BF1C978" "238F16CB" "E39D652D" "E3FDB8BE" "FC848AD9"
            "22222E04" "A4037C07" "13EB57A8" "1A23F0C7" "3473FC64" "6CEA306B"
            "4BCBC886" "2F8385DD" "FA9D4B7F" "A2C087E8" "79683303" "ED5BDD3A"
            "062B3CF5" "B3A278A6" "6D2A13F8" "3F44F82D" "DF310EE0" "74AB6A36"
            "4597E899" "A0255DC1" "64F31CC5" "0846851D" "F9AB4819" "5DED7EA1"
            "B1D510BD" "7EE74D73" "FAF36BC3" "1ECFA268" "359046F4" "EB879F92"
            "4009438B" "481C6CD7" "889A002E" "D5EE382B" "C9190DA6" "FC026E47"
            "9558E447" "5677E9AA" "9E3050E2" "765694DF" "C81F56E8" "80B96E71"
            "60C980DD" "98EDD3DF" "FFFFFFFF" "FFFFFFFF"
        )), BigUint::from(2u32))
    }
}
