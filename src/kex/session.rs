use bytes::Bytes;
use derivative::Derivative;
use std::collections::VecDeque;
use std::task::Poll;
use crate::codec::PacketDecode;
use crate::error::{Error, Result};
use crate::pubkey::{Pubkey, PubkeyAlgo};
use crate::util::CryptoRngCore;
use super::{Kex, KexAlgo, KexConfig, KexOutput, Transcript};
use super::derive::derive_key;
use super::secret::SharedSecret;

/// State of a [`KexSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KexState {
    /// The session was created, but [`KexSession::begin()`] was not called yet.
    Idle,
    /// The key exchange started and no message from the server was consumed yet.
    Started,
    /// We are waiting for further messages from the server.
    AwaitingReply,
    /// The exchange hash was computed and its signature was verified.
    Completed,
    /// The key exchange failed. This state is permanent.
    Failed,
}

/// One key exchange on a connection.
///
/// The session is driven by the transport layer:
///
/// 1. create the session with the negotiated [`KexAlgo`] and [`PubkeyAlgo`],
/// 2. call [`begin()`][Self::begin()] with the [`Transcript`] of the handshake,
/// 3. send all packets returned by [`send_packet()`][Self::send_packet()] to the server,
/// 4. pass every packet from the server to [`advance()`][Self::advance()] and send the packets
/// that it produced, until [`is_completed()`][Self::is_completed()] returns true,
/// 5. read the results with the accessors or consume the session with
/// [`finish()`][Self::finish()].
///
/// When the exchange fails, the session moves to [`KexState::Failed`] for good and the transport
/// should disconnect (see [`Error::disconnect_reason()`]). A new key exchange (re-keying) uses a
/// new session.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct KexSession {
    algo: &'static KexAlgo,
    pubkey_algo: &'static PubkeyAlgo,
    config: KexConfig,
    state: KexState,
    transcript: Option<Transcript>,
    #[derivative(Debug = "ignore")]
    kex: Option<Box<dyn Kex + Send>>,
    outbox: VecDeque<Bytes>,
    completed: Option<Completed>,
}

#[derive(Debug)]
struct Completed {
    output: KexOutput,
    host_key: Pubkey,
}

impl KexSession {
    /// Creates a session that will execute `algo` and verify the server host key with
    /// `pubkey_algo`.
    pub fn new(algo: &'static KexAlgo, pubkey_algo: &'static PubkeyAlgo, config: KexConfig) -> KexSession {
        KexSession {
            algo, pubkey_algo, config,
            state: KexState::Idle,
            transcript: None,
            kex: None,
            outbox: VecDeque::new(),
            completed: None,
        }
    }

    /// The key exchange algorithm of this session.
    pub fn algo(&self) -> &'static KexAlgo {
        self.algo
    }

    /// The current state.
    pub fn state(&self) -> KexState {
        self.state
    }

    /// Returns true if the key exchange completed successfully.
    pub fn is_completed(&self) -> bool {
        self.state == KexState::Completed
    }

    /// Returns true if the key exchange failed.
    pub fn is_failed(&self) -> bool {
        self.state == KexState::Failed
    }

    /// Returns true if the message with type `msg_id` belongs to this key exchange.
    ///
    /// Only these messages should be passed to [`advance()`][Self::advance()].
    pub fn is_kex_message(&self, msg_id: u8) -> bool {
        self.algo.is_kex_message(msg_id)
    }

    /// Starts the key exchange.
    ///
    /// This generates our ephemeral keys and queues the first message for the server (if the
    /// algorithm sends one first).
    pub fn begin(&mut self, transcript: Transcript, rng: &mut dyn CryptoRngCore) -> Result<()> {
        if self.state != KexState::Idle {
            return Err(Error::Protocol("key exchange was already started"))
        }

        log::debug!("starting key exchange {:?}", self.algo.name);
        let res = (self.algo.make_kex)(&self.config, rng);
        let kex = self.check(res)?;
        self.kex = Some(kex);
        self.transcript = Some(transcript);
        self.state = KexState::Started;

        let res = self.flush_kex();
        self.check(res)
    }

    /// Handles a packet from the server.
    ///
    /// The `packet` is the whole payload, including the message type. Returns `Ok(false)` if the
    /// packet is not a key exchange message of this algorithm (the session is not changed), and
    /// `Ok(true)` if the packet was consumed.
    pub fn advance(&mut self, packet: Bytes, rng: &mut dyn CryptoRngCore) -> Result<bool> {
        if self.state == KexState::Failed {
            return Err(Error::Protocol("key exchange has already failed"))
        }

        let mut payload = PacketDecode::new(packet);
        let res = payload.get_u8();
        let msg_id = self.check(res)?;
        if !self.is_kex_message(msg_id) {
            return Ok(false)
        }

        match self.state {
            KexState::Idle =>
                return Err(self.fail(Error::Protocol("received key exchange message before key exchange started"))),
            KexState::Completed =>
                return Err(Error::Protocol("received key exchange message after key exchange completed")),
            KexState::Started | KexState::AwaitingReply | KexState::Failed => {},
        }

        let res = self.advance_kex(msg_id, &mut payload, rng);
        self.check(res)?;
        Ok(true)
    }

    fn advance_kex(&mut self, msg_id: u8, payload: &mut PacketDecode, rng: &mut dyn CryptoRngCore) -> Result<()> {
        let (Some(kex), Some(transcript)) = (self.kex.as_mut(), self.transcript.as_ref()) else {
            return Err(Error::Protocol("key exchange was not started"))
        };

        kex.recv_packet(msg_id, payload, rng)?;
        match kex.poll(transcript) {
            Poll::Pending => {
                self.flush_kex()?;
                self.state = KexState::AwaitingReply;
                Ok(())
            },
            Poll::Ready(output) => {
                let output = output?;
                self.flush_kex()?;
                self.complete(output)
            },
        }
    }

    fn flush_kex(&mut self) -> Result<()> {
        if let Some(kex) = self.kex.as_mut() {
            while let Some(packet) = kex.send_packet()? {
                self.outbox.push_back(packet);
            }
        }
        Ok(())
    }

    fn complete(&mut self, output: KexOutput) -> Result<()> {
        let host_key = Pubkey::decode(output.server_pubkey.clone())?;
        log::debug!("server host key {}, fingerprint {}", host_key, host_key.fingerprint());

        self.pubkey_algo.verify(&host_key, &output.exchange_hash, output.server_exchange_hash_sign.clone())?;
        log::debug!("verified signature of exchange hash with {:?}", self.pubkey_algo.name);

        self.completed = Some(Completed { output, host_key });
        self.kex = None;
        self.state = KexState::Completed;
        Ok(())
    }

    fn check<T>(&mut self, res: Result<T>) -> Result<T> {
        res.map_err(|err| self.fail(err))
    }

    fn fail(&mut self, err: Error) -> Error {
        log::debug!("key exchange {:?} failed: {}", self.algo.name, err);
        self.state = KexState::Failed;
        self.kex = None;
        self.outbox.clear();
        err
    }

    /// Returns the next packet that should be sent to the server.
    pub fn send_packet(&mut self) -> Option<Bytes> {
        self.outbox.pop_front()
    }

    fn completed(&self) -> &Completed {
        match (self.state, self.completed.as_ref()) {
            (KexState::Completed, Some(completed)) => completed,
            _ => panic!("key exchange is not completed (state {:?})", self.state),
        }
    }

    /// The shared secret `K`.
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn shared_secret(&self) -> &SharedSecret {
        &self.completed().output.shared_secret
    }

    /// The exchange hash `H`.
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn exchange_hash(&self) -> &[u8] {
        &self.completed().output.exchange_hash
    }

    /// The host key blob `K_S` sent by the server.
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn server_pubkey(&self) -> &Bytes {
        &self.completed().output.server_pubkey
    }

    /// The server host key that signed the exchange hash.
    ///
    /// Note that the key exchange only proves that the server owns this key, the transport must
    /// still check that the key is trusted.
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn host_key(&self) -> &Pubkey {
        &self.completed().host_key
    }

    /// Derives a key for the connection (RFC 4253, section 7.2), see [`derive_key()`].
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn derive_key(&self, session_id: &[u8], key_type: u8, key_len: usize) -> Vec<u8> {
        let output = &self.completed().output;
        derive_key(self.algo.hash, &output.shared_secret, &output.exchange_hash, session_id, key_type, key_len)
    }

    /// Consumes the completed session.
    ///
    /// # Panics
    ///
    /// Panics if the key exchange is not completed.
    pub fn finish(self) -> KexOutput {
        match (self.state, self.completed) {
            (KexState::Completed, Some(completed)) => completed.output,
            (state, _) => panic!("key exchange is not completed (state {:?})", state),
        }
    }
}
