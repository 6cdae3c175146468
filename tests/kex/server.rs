//! Scripted SSH server side of the key exchanges, used to drive a [`KexSession`].
use bytes::Bytes;
use kagi::codes::msg;
use kagi::kex::{DhGroup, ExchangeHash, ExchangeValues, HashAlgo, SharedSecret};
use kagi::num_bigint_dig::{BigUint, RandBigInt as _};
use kagi::{KexSession, PacketDecode, PacketEncode, Pubkey, Transcript};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub fn transcript() -> Transcript {
    Transcript {
        client_ident: Bytes::from_static(b"SSH-2.0-kagi_test"),
        server_ident: Bytes::from_static(b"SSH-2.0-scripted_server"),
        client_kex_init: Bytes::from_static(b"\x14client kexinit payload"),
        server_kex_init: Bytes::from_static(b"\x14server kexinit payload"),
    }
}

/// Server side of one key exchange.
pub trait Server {
    /// Packets that the server sends before it receives anything.
    fn start(&mut self) -> Vec<Bytes> { Vec::new() }

    /// Handles a packet from the client and returns the packets sent in response.
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes>;

    /// The shared secret computed by the server, once known.
    fn shared_secret(&self) -> Option<&SharedSecret>;
}

/// Runs `session` against `server` until the session completes or fails.
pub fn drive(session: &mut KexSession, server: &mut dyn Server, rng: &mut ChaCha8Rng) -> kagi::Result<()> {
    session.begin(transcript(), rng)?;
    let mut to_client: VecDeque<Bytes> = server.start().into();
    loop {
        while let Some(packet) = session.send_packet() {
            to_client.extend(server.recv(packet));
        }
        if session.is_completed() {
            return Ok(())
        }

        let packet = to_client.pop_front().expect("client and server are both waiting");
        assert!(session.advance(packet, rng)?, "client ignored a key exchange message");
    }
}

/// Ed25519 host key of the server.
pub struct HostKey {
    signing: ed25519_dalek::SigningKey,
}

impl HostKey {
    pub fn new(seed: u8) -> HostKey {
        HostKey { signing: ed25519_dalek::SigningKey::from_bytes(&[seed; 32]) }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::Ed25519(self.signing.verifying_key().into())
    }

    pub fn blob(&self) -> Bytes {
        self.pubkey().encode()
    }

    pub fn sign(&self, exchange_hash: &[u8]) -> Bytes {
        use ed25519_dalek::Signer as _;
        let signature = self.signing.sign(exchange_hash);
        let mut blob = PacketEncode::new();
        blob.put_str("ssh-ed25519");
        blob.put_bytes(&signature.to_bytes());
        blob.finish()
    }
}

fn exchange_hash(hash: HashAlgo, host_key: &HostKey, values: ExchangeValues, secret: &SharedSecret) -> Vec<u8> {
    ExchangeHash::new()
        .transcript(&transcript())
        .server_pubkey(host_key.blob())
        .values(values)
        .shared_secret(secret.clone())
        .compute(hash)
        .expect("all fields of the exchange hash are set")
}

/// Server for the fixed-group Diffie-Hellman exchange (RFC 4253, section 8).
pub struct DhServer {
    pub group: DhGroup,
    pub hash: HashAlgo,
    pub host_key: HostKey,
    pub rng: ChaCha8Rng,
    pub shared_secret: Option<SharedSecret>,
}

impl DhServer {
    pub fn new(group: DhGroup, hash: HashAlgo, seed: u64) -> DhServer {
        DhServer {
            group, hash,
            host_key: HostKey::new(seed as u8),
            rng: ChaCha8Rng::seed_from_u64(seed),
            shared_secret: None,
        }
    }
}

impl Server for DhServer {
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        let mut packet = PacketDecode::new(packet);
        assert_eq!(packet.get_u8().unwrap(), msg::KEXDH_INIT);
        let e = packet.get_biguint().unwrap();

        let y = self.rng.gen_biguint_range(&BigUint::from(2u32), self.group.p());
        let f = self.group.g().modpow(&y, self.group.p());
        let secret = SharedSecret::from_biguint(&e.modpow(&y, self.group.p()));
        let values = ExchangeValues::Dh { e, f: f.clone() };
        let exchange_hash = exchange_hash(self.hash, &self.host_key, values, &secret);
        self.shared_secret = Some(secret);

        let mut reply = PacketEncode::new();
        reply.put_u8(msg::KEXDH_REPLY);
        reply.put_bytes(&self.host_key.blob());
        reply.put_biguint(&f);
        reply.put_bytes(&self.host_key.sign(&exchange_hash));
        vec![reply.finish()]
    }

    fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }
}

/// Server for the Diffie-Hellman group exchange (RFC 4419).
pub struct GexServer {
    pub p: BigUint,
    pub g: BigUint,
    pub hash: HashAlgo,
    pub host_key: HostKey,
    pub rng: ChaCha8Rng,
    pub request: Option<(u32, u32, u32)>,
    pub shared_secret: Option<SharedSecret>,
}

impl GexServer {
    pub fn new(p: BigUint, g: BigUint, hash: HashAlgo, seed: u64) -> GexServer {
        GexServer {
            p, g, hash,
            host_key: HostKey::new(seed as u8),
            rng: ChaCha8Rng::seed_from_u64(seed),
            request: None,
            shared_secret: None,
        }
    }
}

impl Server for GexServer {
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        let mut packet = PacketDecode::new(packet);
        match packet.get_u8().unwrap() {
            msg::KEX_DH_GEX_REQUEST => {
                let min = packet.get_u32().unwrap();
                let preferred = packet.get_u32().unwrap();
                let max = packet.get_u32().unwrap();
                self.request = Some((min, preferred, max));

                let mut reply = PacketEncode::new();
                reply.put_u8(msg::KEX_DH_GEX_GROUP);
                reply.put_biguint(&self.p);
                reply.put_biguint(&self.g);
                vec![reply.finish()]
            },
            msg::KEX_DH_GEX_INIT => {
                let (min, preferred, max) = self.request.expect("client sent init before request");
                let e = packet.get_biguint().unwrap();
                let p_minus_1 = &self.p - BigUint::from(1u32);
                assert!(e > BigUint::from(1u32) && e < p_minus_1, "client sent e out of range");

                let y = self.rng.gen_biguint_range(&BigUint::from(2u32), &self.p);
                let f = self.g.modpow(&y, &self.p);
                let secret = SharedSecret::from_biguint(&e.modpow(&y, &self.p));
                let values = ExchangeValues::Gex {
                    min, preferred, max,
                    p: self.p.clone(), g: self.g.clone(),
                    e, f: f.clone(),
                };
                let exchange_hash = exchange_hash(self.hash, &self.host_key, values, &secret);
                self.shared_secret = Some(secret);

                let mut reply = PacketEncode::new();
                reply.put_u8(msg::KEX_DH_GEX_REPLY);
                reply.put_bytes(&self.host_key.blob());
                reply.put_biguint(&f);
                reply.put_bytes(&self.host_key.sign(&exchange_hash));
                vec![reply.finish()]
            },
            msg_id => panic!("unexpected message {}", msg_id),
        }
    }

    fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }
}

/// Server for the ECDH exchange on NIST P-256 (RFC 5656, section 4).
pub struct EcdhP256Server {
    pub host_key: HostKey,
    pub rng: ChaCha8Rng,
    pub shared_secret: Option<SharedSecret>,
}

impl EcdhP256Server {
    pub fn new(seed: u64) -> EcdhP256Server {
        EcdhP256Server {
            host_key: HostKey::new(seed as u8),
            rng: ChaCha8Rng::seed_from_u64(seed),
            shared_secret: None,
        }
    }
}

impl Server for EcdhP256Server {
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        use kagi::elliptic_curve::sec1::ToEncodedPoint as _;

        let mut packet = PacketDecode::new(packet);
        assert_eq!(packet.get_u8().unwrap(), msg::KEX_ECDH_INIT);
        let client_point = packet.get_bytes().unwrap();
        let client_pubkey = kagi::p256::PublicKey::from_sec1_bytes(&client_point).unwrap();

        let eph_secret = kagi::p256::ecdh::EphemeralSecret::random(&mut self.rng);
        let server_point = Bytes::copy_from_slice(
            eph_secret.public_key().to_encoded_point(false).as_bytes());
        let raw_secret = eph_secret.diffie_hellman(&client_pubkey);
        let secret = SharedSecret::from_uint_be(raw_secret.raw_secret_bytes());

        let values = ExchangeValues::Ecdh { client_pubkey: client_point, server_pubkey: server_point.clone() };
        let exchange_hash = exchange_hash(HashAlgo::Sha256, &self.host_key, values, &secret);
        self.shared_secret = Some(secret);

        let mut reply = PacketEncode::new();
        reply.put_u8(msg::KEX_ECDH_REPLY);
        reply.put_bytes(&self.host_key.blob());
        reply.put_bytes(&server_point);
        reply.put_bytes(&self.host_key.sign(&exchange_hash));
        vec![reply.finish()]
    }

    fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }
}

/// Server for the X25519 exchange (RFC 8731).
pub struct Curve25519Server {
    pub host_key: HostKey,
    pub rng: ChaCha8Rng,
    pub shared_secret: Option<SharedSecret>,
}

impl Curve25519Server {
    pub fn new(seed: u64) -> Curve25519Server {
        Curve25519Server {
            host_key: HostKey::new(seed as u8),
            rng: ChaCha8Rng::seed_from_u64(seed),
            shared_secret: None,
        }
    }
}

impl Server for Curve25519Server {
    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        let mut packet = PacketDecode::new(packet);
        assert_eq!(packet.get_u8().unwrap(), msg::KEX_ECDH_INIT);
        let client_point: [u8; 32] = packet.get_byte_array().unwrap();

        let eph_secret = x25519_dalek::EphemeralSecret::random_from_rng(&mut self.rng);
        let server_point = x25519_dalek::PublicKey::from(&eph_secret);
        let raw_secret = eph_secret.diffie_hellman(&x25519_dalek::PublicKey::from(client_point));
        let secret = SharedSecret::from_uint_be(raw_secret.as_bytes());

        let values = ExchangeValues::Ecdh {
            client_pubkey: Bytes::copy_from_slice(&client_point),
            server_pubkey: Bytes::copy_from_slice(server_point.as_bytes()),
        };
        let exchange_hash = exchange_hash(HashAlgo::Sha256, &self.host_key, values, &secret);
        self.shared_secret = Some(secret);

        let mut reply = PacketEncode::new();
        reply.put_u8(msg::KEX_ECDH_REPLY);
        reply.put_bytes(&self.host_key.blob());
        reply.put_bytes(server_point.as_bytes());
        reply.put_bytes(&self.host_key.sign(&exchange_hash));
        vec![reply.finish()]
    }

    fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }
}

/// Server for the RSA key exchange with SHA-1 (RFC 4432).
pub struct RsaSha1Server {
    pub host_key: HostKey,
    pub transient: kagi::rsa::RsaPrivateKey,
    pub transient_blob: Bytes,
    pub shared_secret: Option<SharedSecret>,
}

impl RsaSha1Server {
    pub fn new(seed: u64, transient_bits: usize) -> RsaSha1Server {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let transient = kagi::rsa::RsaPrivateKey::new(&mut rng, transient_bits).unwrap();
        let transient_blob = Pubkey::Rsa(transient.to_public_key().into()).encode();
        RsaSha1Server {
            host_key: HostKey::new(seed as u8),
            transient, transient_blob,
            shared_secret: None,
        }
    }
}

impl Server for RsaSha1Server {
    fn start(&mut self) -> Vec<Bytes> {
        let mut pubkey = PacketEncode::new();
        pubkey.put_u8(msg::KEXRSA_PUBKEY);
        pubkey.put_bytes(&self.host_key.blob());
        pubkey.put_bytes(&self.transient_blob);
        vec![pubkey.finish()]
    }

    fn recv(&mut self, packet: Bytes) -> Vec<Bytes> {
        let mut packet = PacketDecode::new(packet);
        assert_eq!(packet.get_u8().unwrap(), msg::KEXRSA_SECRET);
        let encrypted_secret = packet.get_bytes().unwrap();

        let plaintext = self.transient.decrypt(kagi::rsa::Oaep::new::<sha1::Sha1>(), &encrypted_secret).unwrap();
        let secret = SharedSecret::from_biguint(&PacketDecode::new(plaintext.into()).get_biguint().unwrap());

        let values = ExchangeValues::Rsa {
            transient_pubkey: self.transient_blob.clone(),
            encrypted_secret,
        };
        let exchange_hash = exchange_hash(HashAlgo::Sha1, &self.host_key, values, &secret);
        self.shared_secret = Some(secret);

        let mut done = PacketEncode::new();
        done.put_u8(msg::KEXRSA_DONE);
        done.put_bytes(&self.host_key.sign(&exchange_hash));
        vec![done.finish()]
    }

    fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }
}
