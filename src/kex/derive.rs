use crate::codec::PacketEncode;
use super::hash::HashAlgo;
use super::secret::SharedSecret;

/// Derives a key from the result of a key exchange (RFC 4253, section 7.2).
///
/// `key_type` is one of the letters `b'A'` to `b'F'` and `session_id` is the exchange hash of the
/// first key exchange in the connection. The key is extended with further hashes until it has
/// `key_len` bytes.
pub fn derive_key(
    hash: HashAlgo,
    shared_secret: &SharedSecret,
    exchange_hash: &[u8],
    session_id: &[u8],
    key_type: u8,
    key_len: usize,
) -> Vec<u8> {
    let mut to_hash_prefix = PacketEncode::new();
    to_hash_prefix.put_mpint_uint_be(shared_secret.as_mpint_bytes());
    to_hash_prefix.put_raw(exchange_hash);

    let mut key = {
        let mut to_hash = to_hash_prefix.clone();
        to_hash.put_u8(key_type);
        to_hash.put_raw(session_id);
        hash.digest(&to_hash.finish())
    };

    while key.len() < key_len {
        let mut to_hash = to_hash_prefix.clone();
        to_hash.put_raw(&key);
        key.extend_from_slice(&hash.digest(&to_hash.finish()));
    }

    key.truncate(key_len);
    key
}
