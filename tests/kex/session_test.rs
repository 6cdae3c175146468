use bytes::Bytes;
use kagi::kex::{self, DhGroup, HashAlgo, SecurityTier};
use kagi::codes::disconnect;
use kagi::{Error, KexConfig, KexSession};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use crate::server::{self, Curve25519Server, DhServer, Server};

/// Flips the last byte of every packet from the server, which breaks the signature.
struct Tampered<S>(S);

impl<S: Server> Server for Tampered<S> {
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        self.0.recv(packet).into_iter().map(|packet| {
            let mut packet = packet.to_vec();
            if let Some(last) = packet.last_mut() {
                *last ^= 0x01;
            }
            Bytes::from(packet)
        }).collect()
    }

    fn shared_secret(&self) -> Option<&kex::SharedSecret> {
        self.0.shared_secret()
    }
}

#[test] fn test_negotiate_and_run() {
    let _ = env_logger::try_init();
    let rng = &mut ChaCha8Rng::seed_from_u64(1);
    let their_algos = vec![
        "diffie-hellman-group1-sha1".to_string(),
        "diffie-hellman-group14-sha256".to_string(),
        "curve25519-sha256@libssh.com".to_string(),
    ];

    let our_algos = kex::algos_with_min_tier(SecurityTier::Strong);
    let algo = kex::negotiate_kex(&our_algos, &their_algos).unwrap();
    assert_eq!(algo.name, "curve25519-sha256@libssh.com");

    let mut server = Curve25519Server::new(1);
    let mut session = KexSession::new(algo, &kagi::pubkey::SSH_ED25519, KexConfig::default());
    server::drive(&mut session, &mut server, rng).unwrap();
    assert!(session.is_completed());
}

#[test] fn test_negotiate_fails_without_common_algo() {
    let their_algos = vec!["diffie-hellman-group1-sha1".to_string()];
    let our_algos = kex::algos_with_min_tier(SecurityTier::Strong);
    match kex::negotiate_kex(&our_algos, &their_algos) {
        Err(err @ Error::AlgoNegotiate(_)) =>
            assert_eq!(err.disconnect_reason(), disconnect::KEY_EXCHANGE_FAILED),
        res => panic!("unexpected result {:?}", res),
    }
}

#[test] fn test_bad_signature() {
    let rng = &mut ChaCha8Rng::seed_from_u64(2);
    let mut server = Tampered(DhServer::new(DhGroup::group_14(), HashAlgo::Sha256, 2));
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP14_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());

    let err = server::drive(&mut session, &mut server, rng).unwrap_err();
    assert!(matches!(err, Error::Signature), "unexpected error {:?}", err);
    assert_eq!(err.disconnect_reason(), disconnect::HOST_KEY_NOT_VERIFIABLE);
    assert!(session.is_failed());
}

#[test] fn test_derive_keys() {
    let rng = &mut ChaCha8Rng::seed_from_u64(3);
    let mut server = DhServer::new(DhGroup::group_14(), HashAlgo::Sha256, 3);
    let mut session = KexSession::new(
        &kex::DIFFIE_HELLMAN_GROUP14_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());
    server::drive(&mut session, &mut server, rng).unwrap();

    // the first key exchange in a connection uses its exchange hash as the session id
    let session_id = session.exchange_hash().to_vec();
    let server_secret = server.shared_secret().unwrap();
    for (key_type, key_len) in [(b'A', 16), (b'C', 32), (b'E', 64)] {
        let client_key = session.derive_key(&session_id, key_type, key_len);
        let server_key = kex::derive_key(
            HashAlgo::Sha256, server_secret, &session_id, &session_id, key_type, key_len);
        assert_eq!(client_key.len(), key_len);
        assert_eq!(client_key, server_key);
    }

    let output = session.finish();
    assert_eq!(&output.shared_secret, server_secret);
    assert_eq!(output.exchange_hash, session_id);
}

#[test] fn test_message_after_completion() {
    let rng = &mut ChaCha8Rng::seed_from_u64(4);
    let mut server = Curve25519Server::new(4);
    let mut session = KexSession::new(&kex::CURVE25519_SHA256, &kagi::pubkey::SSH_ED25519, KexConfig::default());
    server::drive(&mut session, &mut server, rng).unwrap();

    let packet = Bytes::from_static(&[kagi::codes::msg::KEX_ECDH_REPLY]);
    assert!(session.advance(packet, rng).is_err());
    assert!(session.is_completed());
    assert!(!session.advance(Bytes::from_static(&[kagi::codes::msg::NEWKEYS]), rng).unwrap());
}
