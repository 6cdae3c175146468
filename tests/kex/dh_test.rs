use kagi::kex::{self, DhGroup, HashAlgo};
use kagi::{Error, KexAlgo, KexConfig, KexSession, KexState};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use crate::server::{self, DhServer, Server as _};

fn check_dh(algo: &'static KexAlgo, group: DhGroup, seed: u64) {
    let _ = env_logger::try_init();
    let rng = &mut ChaCha8Rng::seed_from_u64(seed);
    let mut server = DhServer::new(group, algo.hash, seed);
    let mut session = KexSession::new(algo, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    server::drive(&mut session, &mut server, rng).unwrap();
    assert_eq!(session.state(), KexState::Completed);
    assert_eq!(Some(session.shared_secret()), server.shared_secret());
    assert_eq!(session.exchange_hash().len(), algo.hash.output_len());
    assert_eq!(session.host_key(), &server.host_key.pubkey());
    assert_eq!(session.server_pubkey(), &server.host_key.blob());
}

#[test] fn test_group1_sha1() {
    check_dh(&kex::DIFFIE_HELLMAN_GROUP1_SHA1, DhGroup::group_2(), 1);
}

#[test] fn test_group14_sha1() {
    check_dh(&kex::DIFFIE_HELLMAN_GROUP14_SHA1, DhGroup::group_14(), 2);
}

#[test] fn test_group14_sha256() {
    check_dh(&kex::DIFFIE_HELLMAN_GROUP14_SHA256, DhGroup::group_14(), 3);
}

#[test] fn test_group16_sha512() {
    check_dh(&kex::DIFFIE_HELLMAN_GROUP16_SHA512, DhGroup::group_16(), 4);
}

#[test] fn test_server_uses_wrong_group() {
    let rng = &mut ChaCha8Rng::seed_from_u64(5);
    let mut server = DhServer::new(DhGroup::group_2(), HashAlgo::Sha256, 5);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP14_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    // the server computes a different secret, so its signature covers a different hash
    match server::drive(&mut session, &mut server, rng) {
        Err(Error::Signature) => {},
        res => panic!("unexpected result {:?}", res),
    }
    assert!(session.is_failed());
}
