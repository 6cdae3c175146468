//! Various codes from the SSH protocol.
#![allow(missing_docs)]

/// Message numbers used by the key exchange.
///
/// Numbers 30 to 49 are reserved for the key exchange method (RFC 4250, section 4.1.2), so the
/// same number means different messages in different methods.
pub mod msg {
    pub const IGNORE: u8 = 2;
    pub const NEWKEYS: u8 = 21;

    pub const KEXDH_INIT: u8 = 30;
    pub const KEXDH_REPLY: u8 = 31;

    pub const KEX_ECDH_INIT: u8 = 30;
    pub const KEX_ECDH_REPLY: u8 = 31;

    pub const KEX_DH_GEX_REQUEST_OLD: u8 = 30;
    pub const KEX_DH_GEX_GROUP: u8 = 31;
    pub const KEX_DH_GEX_INIT: u8 = 32;
    pub const KEX_DH_GEX_REPLY: u8 = 33;
    pub const KEX_DH_GEX_REQUEST: u8 = 34;

    pub const KEXRSA_PUBKEY: u8 = 30;
    pub const KEXRSA_SECRET: u8 = 31;
    pub const KEXRSA_DONE: u8 = 32;
}

/// Reason codes for SSH_MSG_DISCONNECT (RFC 4253, section 11.1).
pub mod disconnect {
    pub const HOST_NOT_ALLOWED_TO_CONNECT: u32 = 1;
    pub const PROTOCOL_ERROR: u32 = 2;
    pub const KEY_EXCHANGE_FAILED: u32 = 3;
    pub const RESERVED: u32 = 4;
    pub const MAC_ERROR: u32 = 5;
    pub const COMPRESSION_ERROR: u32 = 6;
    pub const SERVICE_NOT_AVAILABLE: u32 = 7;
    pub const PROTOCOL_VERSION_NOT_SUPPORTED: u32 = 8;
    pub const HOST_KEY_NOT_VERIFIABLE: u32 = 9;
    pub const CONNECTION_LOST: u32 = 10;
    pub const BY_APPLICATION: u32 = 11;

}
