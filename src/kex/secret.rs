use num_bigint_dig::BigUint;
use std::fmt;
use zeroize::Zeroize as _;

/// Shared secret `K` established by the key exchange.
///
/// The secret is stored as the content of a `mpint`: big endian, without redundant leading zero
/// bytes, and with a single zero byte prepended if the most significant bit would be set. This is
/// exactly the form that is hashed into the exchange hash and the derived keys, so the secret is
/// always interpreted as a non-negative number. The bytes are zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret {
    mpint: Vec<u8>,
}

impl SharedSecret {
    /// Normalizes an unsigned big endian integer (such as a raw ECDH secret).
    pub fn from_uint_be(value_be: &[u8]) -> SharedSecret {
        let first_nonzero = value_be.iter().position(|&b| b != 0).unwrap_or(value_be.len());
        let digits = &value_be[first_nonzero..];

        let mut mpint = Vec::with_capacity(digits.len() + 1);
        if digits.first().map_or(false, |&b| b & 0x80 != 0) {
            mpint.push(0);
        }
        mpint.extend_from_slice(digits);
        SharedSecret { mpint }
    }

    /// Normalizes a [`BigUint`] (such as a Diffie-Hellman secret).
    pub fn from_biguint(value: &BigUint) -> SharedSecret {
        let mut value_be = value.to_bytes_be();
        let secret = Self::from_uint_be(&value_be);
        value_be.zeroize();
        secret
    }

    /// The content of the `mpint` encoding (without the length prefix).
    pub fn as_mpint_bytes(&self) -> &[u8] {
        &self.mpint
    }

    /// Decodes the secret back into a number.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.mpint)
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.mpint.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SharedSecret").field("len", &self.mpint.len()).finish_non_exhaustive()
    }
}
