//! Encoding and decoding of SSH payloads (RFC 4251, section 5).
pub use self::packet_encode::PacketEncode;
pub use self::packet_decode::PacketDecode;

mod packet_encode;
mod packet_decode;
