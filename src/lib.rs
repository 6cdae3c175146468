//! Client side of the SSH key exchange in pure Rust.
//!
//! Kagi implements the key exchange algorithms of the SSH transport layer protocol (RFC 4253
//! and its extensions) as a sans-IO state machine: the transport passes packets from the server
//! to a [`KexSession`] and sends the packets that the session produces. When the exchange
//! completes, the session provides the shared secret and the exchange hash (whose signature by
//! the server host key has already been verified), from which the connection keys are derived.
//!
//! - The supported algorithms are listed in the [`kex`] module, use [`kex::negotiate_kex()`] to
//! choose one.
//! - Host key algorithms that verify the server signature are in the [`pubkey`] module.
//! - Group exchange parameters and the Diffie-Hellman backend are configured with
//! [`KexConfig`].
#![allow(clippy::collapsible_if)]
#![allow(clippy::module_inception)]
#![allow(clippy::type_complexity)]
#![warn(missing_docs)]

pub use crate::codec::{PacketEncode, PacketDecode};
pub use crate::error::{Result, Error, ErrorKind, AlgoNegotiateError};
pub use crate::util::CryptoRngCore;

pub use self::kex::{KexAlgo, KexConfig, KexOutput, KexSession, KexState, SecurityTier, Transcript};
pub use self::pubkey::{PubkeyAlgo, Pubkey};

pub use bytes;
pub use ecdsa;
pub use ecdsa::elliptic_curve;
pub use ed25519_dalek;
pub use num_bigint_dig;
pub use p256;
pub use p384;
pub use p521;
pub use rsa;

mod codec;
pub mod codes;
mod error;
pub mod kex;
pub mod pubkey;
mod util;
