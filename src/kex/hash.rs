use bytes::Bytes;
use num_bigint_dig::BigUint;
use crate::codec::PacketEncode;
use crate::error::{Error, Result};
use super::{SharedSecret, Transcript};

/// Hash function used by a key exchange algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgo {
    /// SHA-1 (20 bytes).
    Sha1,
    /// SHA-256 (32 bytes).
    Sha256,
    /// SHA-384 (48 bytes).
    Sha384,
    /// SHA-512 (64 bytes).
    Sha512,
}

impl HashAlgo {
    /// Hash `data`.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        use sha2::Digest as _;
        match self {
            HashAlgo::Sha1 => sha1::Sha1::digest(data).to_vec(),
            HashAlgo::Sha256 => sha2::Sha256::digest(data).to_vec(),
            HashAlgo::Sha384 => sha2::Sha384::digest(data).to_vec(),
            HashAlgo::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }

    /// Length of the digest in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgo::Sha1 => 20,
            HashAlgo::Sha256 => 32,
            HashAlgo::Sha384 => 48,
            HashAlgo::Sha512 => 64,
        }
    }
}

/// Values that are specific to a family of key exchange algorithms.
///
/// They are hashed between the server host key and the shared secret.
#[derive(Debug, Clone)]
pub enum ExchangeValues {
    /// Fixed-group Diffie-Hellman (RFC 4253, section 8).
    Dh {
        /// Client public value `e`.
        e: BigUint,
        /// Server public value `f`.
        f: BigUint,
    },
    /// Diffie-Hellman group exchange (RFC 4419, section 3).
    Gex {
        /// Minimal size of the group in bits requested by the client.
        min: u32,
        /// Preferred size of the group in bits requested by the client.
        preferred: u32,
        /// Maximal size of the group in bits requested by the client.
        max: u32,
        /// Safe prime `p` sent by the server.
        p: BigUint,
        /// Generator `g` sent by the server.
        g: BigUint,
        /// Client public value `e`.
        e: BigUint,
        /// Server public value `f`.
        f: BigUint,
    },
    /// Elliptic-curve Diffie-Hellman (RFC 5656, section 4).
    Ecdh {
        /// Client ephemeral public key `Q_C`.
        client_pubkey: Bytes,
        /// Server ephemeral public key `Q_S`.
        server_pubkey: Bytes,
    },
    /// RSA key exchange (RFC 4432, section 5).
    Rsa {
        /// Transient RSA public key `K_T`.
        transient_pubkey: Bytes,
        /// Secret encrypted with the transient key.
        encrypted_secret: Bytes,
    },
}

/// Computation of the exchange hash `H`.
///
/// The fields can be set in any order, the hash is always computed over them in the order
/// prescribed by the key exchange method. [`compute()`][Self::compute()] fails if any field is
/// missing.
#[derive(Debug, Clone, Default)]
pub struct ExchangeHash {
    client_ident: Option<Bytes>,
    server_ident: Option<Bytes>,
    client_kex_init: Option<Bytes>,
    server_kex_init: Option<Bytes>,
    server_pubkey: Option<Bytes>,
    values: Option<ExchangeValues>,
    shared_secret: Option<SharedSecret>,
}

impl ExchangeHash {
    /// Creates an empty [`ExchangeHash`].
    pub fn new() -> ExchangeHash {
        ExchangeHash::default()
    }

    /// Sets all fields of the handshake transcript at once.
    pub fn transcript(&mut self, input: &Transcript) -> &mut Self {
        self.client_ident(input.client_ident.clone())
            .server_ident(input.server_ident.clone())
            .client_kex_init(input.client_kex_init.clone())
            .server_kex_init(input.server_kex_init.clone())
    }

    /// Sets the client identification string `V_C` (without CR and LF).
    pub fn client_ident(&mut self, value: Bytes) -> &mut Self {
        self.client_ident = Some(value);
        self
    }

    /// Sets the server identification string `V_S` (without CR and LF).
    pub fn server_ident(&mut self, value: Bytes) -> &mut Self {
        self.server_ident = Some(value);
        self
    }

    /// Sets the payload of the client SSH_MSG_KEXINIT `I_C`.
    pub fn client_kex_init(&mut self, value: Bytes) -> &mut Self {
        self.client_kex_init = Some(value);
        self
    }

    /// Sets the payload of the server SSH_MSG_KEXINIT `I_S`.
    pub fn server_kex_init(&mut self, value: Bytes) -> &mut Self {
        self.server_kex_init = Some(value);
        self
    }

    /// Sets the server host key blob `K_S`.
    pub fn server_pubkey(&mut self, value: Bytes) -> &mut Self {
        self.server_pubkey = Some(value);
        self
    }

    /// Sets the values specific to the key exchange method.
    pub fn values(&mut self, values: ExchangeValues) -> &mut Self {
        self.values = Some(values);
        self
    }

    /// Sets the shared secret `K`.
    pub fn shared_secret(&mut self, secret: SharedSecret) -> &mut Self {
        self.shared_secret = Some(secret);
        self
    }

    /// Encodes the fields into the data that is hashed.
    pub fn encode(&self) -> Result<Bytes> {
        fn field<'a, T>(value: &'a Option<T>, name: &'static str) -> Result<&'a T> {
            match value {
                Some(value) => Ok(value),
                None => {
                    log::debug!("exchange hash is missing {}", name);
                    Err(Error::Protocol("exchange hash is missing a field"))
                },
            }
        }

        let mut data = PacketEncode::new();
        data.put_bytes(field(&self.client_ident, "V_C")?);
        data.put_bytes(field(&self.server_ident, "V_S")?);
        data.put_bytes(field(&self.client_kex_init, "I_C")?);
        data.put_bytes(field(&self.server_kex_init, "I_S")?);
        data.put_bytes(field(&self.server_pubkey, "K_S")?);

        match field(&self.values, "exchange values")? {
            ExchangeValues::Dh { e, f } => {
                data.put_biguint(e);
                data.put_biguint(f);
            },
            ExchangeValues::Gex { min, preferred, max, p, g, e, f } => {
                data.put_u32(*min);
                data.put_u32(*preferred);
                data.put_u32(*max);
                data.put_biguint(p);
                data.put_biguint(g);
                data.put_biguint(e);
                data.put_biguint(f);
            },
            ExchangeValues::Ecdh { client_pubkey, server_pubkey } => {
                data.put_bytes(client_pubkey);
                data.put_bytes(server_pubkey);
            },
            ExchangeValues::Rsa { transient_pubkey, encrypted_secret } => {
                data.put_bytes(transient_pubkey);
                data.put_bytes(encrypted_secret);
            },
        }

        data.put_mpint_uint_be(field(&self.shared_secret, "K")?.as_mpint_bytes());
        Ok(data.finish())
    }

    /// Computes the exchange hash with the given hash function.
    pub fn compute(&self, hash: HashAlgo) -> Result<Vec<u8>> {
        Ok(hash.digest(&self.encode()?))
    }
}
