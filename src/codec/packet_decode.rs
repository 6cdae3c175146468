use bytes::{Buf as _, Bytes};
use num_bigint_dig::BigUint;
use std::str;
use crate::{Error, Result};

/// Decoding of SSH packets and other payloads (low level API).
///
/// The format of SSH payloads is described in RFC 4251, section 5. This struct just wraps a
/// [`Bytes`] instance.
#[derive(Debug)]
pub struct PacketDecode {
    buf: Bytes,
}

impl PacketDecode {
    /// Wraps the bytes into [`PacketDecode`].
    pub fn new(buf: Bytes) -> PacketDecode {
        PacketDecode { buf }
    }

    /// Decode a `byte`.
    pub fn get_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Decode a `uint32`.
    pub fn get_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    /// Decode a `string`.
    pub fn get_bytes(&mut self) -> Result<Bytes> {
        let len = self.get_u32()? as usize;
        self.ensure(len)?;
        Ok(self.buf.split_to(len))
    }

    /// Decode a `string` with fixed length.
    pub fn get_byte_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.get_bytes()?;
        if bytes.len() != N {
            return Err(Error::Decode("wrong size of `string`"))
        }

        let mut array = [0; N];
        array.copy_from_slice(&bytes);
        Ok(array)
    }

    /// Decode a `string` in UTF-8.
    pub fn get_string(&mut self) -> Result<String> {
        self.get_bytes().and_then(|x| decode_string(&x))
    }

    /// Decode a non-negative `mpint` as [`BigUint`].
    ///
    /// Negative numbers (with the most significant bit set) are rejected.
    pub fn get_biguint(&mut self) -> Result<BigUint> {
        let bytes = self.get_bytes()?;
        if bytes.first().map_or(false, |&b| b & 0x80 != 0) {
            return Err(Error::Decode("mpint is negative"))
        }
        Ok(BigUint::from_bytes_be(&bytes))
    }

    fn ensure(&self, min_remaining: usize) -> Result<()> {
        if min_remaining <= self.buf.remaining() {
            Ok(())
        } else {
            Err(Error::Decode("unexpected end of packet"))
        }
    }

    /// Return the number of remaining undecoded bytes.
    pub fn remaining_len(&self) -> usize {
        self.buf.len()
    }
}

fn decode_string(bytes: &[u8]) -> Result<String> {
    match str::from_utf8(bytes) {
        Ok(string) => Ok(string.into()),
        Err(_) => Err(Error::Decode("string is not valid utf-8")),
    }
}
