use kagi::kex;
use kagi::{Error, KexConfig, KexSession};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use crate::server::{self, RsaSha1Server, Server as _};

#[test] fn test_rsa1024_sha1() {
    let _ = env_logger::try_init();
    let rng = &mut ChaCha8Rng::seed_from_u64(1);
    let mut server = RsaSha1Server::new(1, 1024);
    let mut session = KexSession::new(&kex::RSA1024_SHA1, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    server::drive(&mut session, &mut server, rng).unwrap();
    assert_eq!(Some(session.shared_secret()), server.shared_secret());
    assert_eq!(session.exchange_hash().len(), 20);
}

#[test] fn test_rsa2048_rejects_short_transient_key() {
    let rng = &mut ChaCha8Rng::seed_from_u64(2);
    let mut server = RsaSha1Server::new(2, 1024);
    let mut session = KexSession::new(&kex::RSA2048_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    match server::drive(&mut session, &mut server, rng) {
        Err(Error::Protocol(_)) => {},
        res => panic!("unexpected result {:?}", res),
    }
    assert!(session.is_failed());
    assert!(server.shared_secret().is_none());
}
