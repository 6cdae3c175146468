use kagi::kex;
use kagi::{Error, KexAlgo, KexConfig, KexSession};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use crate::server::{self, Curve25519Server, EcdhP256Server, Server};

fn check_exchange(algo: &'static KexAlgo, server: &mut dyn Server, seed: u64) -> KexSession {
    let _ = env_logger::try_init();
    let rng = &mut ChaCha8Rng::seed_from_u64(seed);
    let mut session = KexSession::new(algo, &kagi::pubkey::SSH_ED25519, KexConfig::default());
    server::drive(&mut session, server, rng).unwrap();
    assert_eq!(Some(session.shared_secret()), server.shared_secret());
    assert_eq!(session.exchange_hash().len(), algo.hash.output_len());
    session
}

#[test] fn test_ecdh_nistp256() {
    check_exchange(&kex::ECDH_SHA2_NISTP256, &mut EcdhP256Server::new(1), 1);
}

#[test] fn test_curve25519_sha256() {
    check_exchange(&kex::CURVE25519_SHA256, &mut Curve25519Server::new(2), 2);
}

#[test] fn test_curve25519_sha256_libssh() {
    check_exchange(&kex::CURVE25519_SHA256_LIBSSH, &mut Curve25519Server::new(3), 3);
}

#[test] fn test_host_key_does_not_match_algo() {
    let rng = &mut ChaCha8Rng::seed_from_u64(4);
    let mut server = Curve25519Server::new(4);
    let mut session = KexSession::new(
        &kex::CURVE25519_SHA256, &kagi::pubkey::ECDSA_SHA2_NISTP256, KexConfig::default());
    match server::drive(&mut session, &mut server, rng) {
        Err(Error::PubkeyFormat) => {},
        res => panic!("unexpected result {:?}", res),
    }
    assert!(session.is_failed());
}
