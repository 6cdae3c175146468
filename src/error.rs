use crate::codes::disconnect;

/// Result type for our [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error that occured during the key exchange.
///
/// This enum is `#[non_exhaustive]`, so we reserve the right to add more variants and don't
/// consider this to break backwards compatibility. Use [`Error::kind()`] to find out whether the
/// peer misbehaved, the local crypto failed, or the local configuration is unusable.
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Error {
    #[error("cryptography error: {0}")]
    Crypto(&'static str, #[source] Option<Box<dyn std::error::Error + Send + Sync>>),
    #[error("randomness error: {0}")]
    Random(&'static str),
    #[error("signature verification failed")]
    Signature,
    #[error("public key does not match the public key algorithm")]
    PubkeyFormat,
    #[error("protocol error: {0}")]
    Protocol(&'static str),
    #[error("could not decode bytes: {0}")]
    Decode(&'static str),
    #[error("could not negotiate algorithm: {0}")]
    AlgoNegotiate(AlgoNegotiateError),
    #[error("packet {0} not implemented")]
    PacketNotImplemented(u8),
    #[error("unsupported configuration: {0}")]
    Config(&'static str),
}

/// Coarse classification of an [`Error`].
///
/// The transport should disconnect on any error from the key exchange, but the kind tells it
/// whom to blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The peer sent a malformed message, an out-of-range parameter or a bad signature.
    ProtocolViolation,
    /// The local crypto library failed (entropy, key generation or key agreement).
    CryptoProvider,
    /// The local configuration cannot support the requested algorithm.
    UnsupportedConfiguration,
}

impl Error {
    /// Wraps a crypto library error, preserving it as the source of the returned error.
    pub(crate) fn crypto<E>(context: &'static str, cause: E) -> Error
        where E: std::error::Error + Send + Sync + 'static
    {
        Error::Crypto(context, Some(Box::new(cause)))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Crypto(..) | Error::Random(_) => ErrorKind::CryptoProvider,
            Error::Config(_) => ErrorKind::UnsupportedConfiguration,
            Error::Signature | Error::PubkeyFormat | Error::Protocol(_) | Error::Decode(_) |
            Error::AlgoNegotiate(_) | Error::PacketNotImplemented(_) =>
                ErrorKind::ProtocolViolation,
        }
    }

    /// The reason code that should be sent in SSH_MSG_DISCONNECT after this error.
    ///
    /// See [`codes::disconnect`][crate::codes::disconnect] for the codes.
    pub fn disconnect_reason(&self) -> u32 {
        match self {
            Error::Signature | Error::PubkeyFormat => disconnect::HOST_KEY_NOT_VERIFIABLE,
            Error::Protocol(_) | Error::Decode(_) | Error::PacketNotImplemented(_) =>
                disconnect::PROTOCOL_ERROR,
            Error::AlgoNegotiate(_) | Error::Crypto(..) | Error::Random(_) | Error::Config(_) =>
                disconnect::KEY_EXCHANGE_FAILED,
        }
    }
}

/// Error that occured because we could not negotiate an algorithm.
///
/// During the SSH key exchange, the client and the server must negotiate which cryptographic
/// algorithms to use, as described in RFC 4253, section 7.1. This error occurs when there is no
/// intersection between the set of algorithms supported by us (the client) and by the server.
#[derive(Debug, Clone, thiserror::Error)]
#[error("for {algo_name:}, our algos are {our_algos:?}, their algos are {their_algos:?}")]
pub struct AlgoNegotiateError {
    /// Human readable name of the algorithm.
    pub algo_name: String,
    /// The set of algorithms supplied by us (the client).
    pub our_algos: Vec<String>,
    /// The set of algorithms supplied by them (the server).
    pub their_algos: Vec<String>,
}
