use kagi::kex::{self, DhGroup, DhKeypair, DhProvider, GexBounds, GexSecretPath, HashAlgo, NumBigintDh};
use kagi::num_bigint_dig::BigUint;
use kagi::{CryptoRngCore, Error, ErrorKind, KexAlgo, KexConfig, KexSession};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use crate::server::{self, GexServer, Server as _};

fn config(secret_path: GexSecretPath) -> KexConfig {
    KexConfig::default().with(|c| {
        c.gex_bounds = GexBounds::new(1024, 2048, 8192).unwrap();
        c.gex_secret_path = secret_path;
    })
}

fn check_gex(algo: &'static KexAlgo, group: DhGroup, config: KexConfig, seed: u64) {
    let _ = env_logger::try_init();
    let rng = &mut ChaCha8Rng::seed_from_u64(seed);
    let mut server = GexServer::new(group.p().clone(), group.g().clone(), algo.hash, seed);
    let mut session = KexSession::new(algo, &kagi::pubkey::SSH_ED25519, config);

    server::drive(&mut session, &mut server, rng).unwrap();
    assert_eq!(server.request, Some((1024, 2048, 8192)));
    assert_eq!(Some(session.shared_secret()), server.shared_secret());
    assert_eq!(session.exchange_hash().len(), algo.hash.output_len());
}

#[test] fn test_gex_sha256() {
    check_gex(&kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, DhGroup::group_14(),
        config(GexSecretPath::Auto), 1);
}

#[test] fn test_gex_sha1() {
    check_gex(&kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA1, DhGroup::group_14(),
        config(GexSecretPath::Auto), 2);
}

#[test] fn test_gex_manual_secret() {
    check_gex(&kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, DhGroup::group_2(),
        config(GexSecretPath::Manual), 3);
}

#[test] fn test_gex_provider_secret() {
    check_gex(&kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, DhGroup::group_15(),
        config(GexSecretPath::Provider), 4);
}

#[test] fn test_zero_generator_fails_permanently() {
    let rng = &mut ChaCha8Rng::seed_from_u64(5);
    let p = DhGroup::group_14().p().clone();
    let mut server = GexServer::new(p, BigUint::from(0u32), HashAlgo::Sha256, 5);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, &kagi::pubkey::SSH_ED25519,
        config(GexSecretPath::Auto));

    let err = server::drive(&mut session, &mut server, rng).unwrap_err();
    assert!(matches!(err, Error::Protocol(_)), "unexpected error {:?}", err);
    assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    assert!(session.is_failed());
    assert!(session.send_packet().is_none());
    assert!(session.advance(kagi::bytes::Bytes::from_static(&[kagi::codes::msg::KEX_DH_GEX_REPLY]), rng).is_err());
    assert!(session.is_failed());
}

#[test] fn test_group_below_requested_minimum() {
    let rng = &mut ChaCha8Rng::seed_from_u64(6);
    let group = DhGroup::group_2();
    let mut server = GexServer::new(group.p().clone(), group.g().clone(), HashAlgo::Sha256, 6);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    match server::drive(&mut session, &mut server, rng) {
        Err(Error::Protocol(_)) => {},
        res => panic!("unexpected result {:?}", res),
    }
    assert_eq!(server.request, Some((2048, 4096, 8192)));
    assert!(session.is_failed());
}

/// Provider that handles primes of at most 4096 bits.
struct Dh4096;

impl DhProvider for Dh4096 {
    fn name(&self) -> &'static str { "dh-4096" }

    fn static_range(&self) -> Option<(u32, u32)> { Some((1024, 4096)) }

    fn generate_keypair(&self, group: &DhGroup, rng: &mut dyn CryptoRngCore) -> kagi::Result<DhKeypair> {
        assert!(group.bits() <= 4096, "provider used with {}-bit prime", group.bits());
        NumBigintDh.generate_keypair(group, rng)
    }

    fn agree(&self, group: &DhGroup, keypair: &DhKeypair, peer_public: &BigUint) -> kagi::Result<BigUint> {
        NumBigintDh.agree(group, keypair, peer_public)
    }
}

fn config_4096() -> KexConfig {
    config(GexSecretPath::Provider).with(|c| c.dh_provider = Arc::new(Dh4096) as Arc<dyn DhProvider>)
}

#[test] fn test_request_follows_configured_provider() {
    let rng = &mut ChaCha8Rng::seed_from_u64(7);
    let group = DhGroup::group_16();
    let mut server = GexServer::new(group.p().clone(), group.g().clone(), HashAlgo::Sha256, 7);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, &kagi::pubkey::SSH_ED25519, config_4096());

    server::drive(&mut session, &mut server, rng).unwrap();
    assert_eq!(server.request, Some((1024, 2048, 4096)));
    assert_eq!(Some(session.shared_secret()), server.shared_secret());
}

#[test] fn test_group_above_provider_capability() {
    let rng = &mut ChaCha8Rng::seed_from_u64(8);
    let group = DhGroup::group_17();
    let mut server = GexServer::new(group.p().clone(), group.g().clone(), HashAlgo::Sha256, 8);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP_EXCHANGE_SHA256, &kagi::pubkey::SSH_ED25519, config_4096());

    match server::drive(&mut session, &mut server, rng) {
        Err(Error::Protocol(_)) => {},
        res => panic!("unexpected result {:?}", res),
    }
    assert_eq!(server.request, Some((1024, 2048, 4096)));
    assert!(session.is_failed());
}
