//! Provides the communication channel connecting the two protocol parties.
//!
//! The [`Channel`] trait is the only interface protocol code talks to, so
//! how bytes physically travel between the parties (network sockets,
//! in-memory queues, etc.) is decided by whoever implements the trait and
//! can be swapped without touching protocol code.
//!
//! In contrast to message-oriented transports, a [`Channel`] delivers a
//! byte-exact ordered stream: [`Channel::recv_bytes`] returns exactly the
//! requested number of bytes, buffering and reassembling underlying
//! messages as needed. [`SimpleChannel`] implements this on top of
//! in-memory queues.

use std::{collections::VecDeque, fmt};

use tokio::sync::mpsc::{channel, error::SendError, Receiver, Sender};
use tracing::{trace, Level};

/// Errors related to sending / receiving bytes between the two parties.
#[derive(Debug)]
pub struct Error {
    /// The protocol phase during which the error occurred.
    pub phase: String,
    /// The specific error that was raised.
    pub reason: ErrorKind,
}

/// The specific error that occurred when trying to send / receive bytes.
#[derive(Debug)]
pub enum ErrorKind {
    /// The bytes could not be received over the channel.
    RecvError(String),
    /// The bytes could not be sent over the channel.
    SendError(String),
}

/// A communication channel used to send/receive bytes to/from the other party.
///
/// The channel must deliver bytes reliably and in the order they were sent,
/// and it must not interleave concurrent protocol executions: within one
/// batch, the order of sends on one side is the order of receives on the
/// other.
pub trait Channel {
    /// The error that can occur sending bytes over the channel.
    type SendError: fmt::Debug;
    /// The error that can occur receiving bytes over the channel.
    type RecvError: fmt::Debug;

    /// Sends a batch of bytes to the other party.
    // We allow the async_fn_in_trait lint because we don't need to place
    // additional bounds on the returned future.
    #[allow(async_fn_in_trait)]
    async fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), Self::SendError>;

    /// Receives exactly `len` bytes from the other party.
    #[allow(async_fn_in_trait)]
    async fn recv_bytes(&mut self, len: usize) -> Result<Vec<u8>, Self::RecvError>;
}

/// Sends bytes to the other party, recording the phase on failure.
pub(crate) async fn send(
    channel: &mut impl Channel,
    phase: &str,
    bytes: Vec<u8>,
) -> Result<(), Error> {
    channel.send_bytes(bytes).await.map_err(|e| Error {
        phase: phase.to_string(),
        reason: ErrorKind::SendError(format!("{e:?}")),
    })
}

/// Receives exactly `len` bytes from the other party, recording the phase on
/// failure.
pub(crate) async fn recv(
    channel: &mut impl Channel,
    phase: &str,
    len: usize,
) -> Result<Vec<u8>, Error> {
    let bytes = channel.recv_bytes(len).await.map_err(|e| Error {
        phase: phase.to_string(),
        reason: ErrorKind::RecvError(format!("{e:?}")),
    })?;
    if bytes.len() != len {
        return Err(Error {
            phase: phase.to_string(),
            reason: ErrorKind::RecvError(format!(
                "expected {len} bytes, the channel returned {}",
                bytes.len()
            )),
        });
    }
    Ok(bytes)
}

/// Sends an unsigned integer as 64 bits little-endian.
///
/// The fixed width is part of the wire contract; both peers must use it
/// independently of their machine word size.
pub(crate) async fn send_u64(channel: &mut impl Channel, phase: &str, v: u64) -> Result<(), Error> {
    send(channel, phase, v.to_le_bytes().to_vec()).await
}

/// Receives an unsigned 64-bit little-endian integer.
pub(crate) async fn recv_u64(channel: &mut impl Channel, phase: &str) -> Result<u64, Error> {
    let bytes = recv(channel, phase, 8).await?;
    let bytes: [u8; 8] = bytes.try_into().map_err(|_| Error {
        phase: phase.to_string(),
        reason: ErrorKind::RecvError("short read".to_string()),
    })?;
    Ok(u64::from_le_bytes(bytes))
}

/// A simple in-process channel between two parties using [`Sender`] and
/// [`Receiver`].
#[derive(Debug)]
pub struct SimpleChannel {
    s: Sender<Vec<u8>>,
    r: Receiver<Vec<u8>>,
    buffered: VecDeque<u8>,
    /// The total number of bytes sent over the channel.
    bytes_sent: u64,
}

impl SimpleChannel {
    /// Creates a connected pair of channels for the two parties.
    pub fn pair() -> (Self, Self) {
        let buffer_capacity = 1024;
        let (s_a_to_b, r_a_to_b) = channel(buffer_capacity);
        let (s_b_to_a, r_b_to_a) = channel(buffer_capacity);
        (
            SimpleChannel {
                s: s_a_to_b,
                r: r_b_to_a,
                buffered: VecDeque::new(),
                bytes_sent: 0,
            },
            SimpleChannel {
                s: s_b_to_a,
                r: r_a_to_b,
                buffered: VecDeque::new(),
                bytes_sent: 0,
            },
        )
    }

    /// Returns the total number of bytes sent on this channel.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

/// The error raised by `recv` calls of a [`SimpleChannel`].
#[derive(Debug)]
pub enum AsyncRecvError {
    /// The channel has been closed.
    Closed,
    /// No message was received before the timeout.
    TimeoutElapsed,
}

impl Channel for SimpleChannel {
    type SendError = SendError<Vec<u8>>;
    type RecvError = AsyncRecvError;

    #[tracing::instrument(level = Level::TRACE, skip(self, bytes))]
    async fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), SendError<Vec<u8>>> {
        self.bytes_sent += bytes.len() as u64;
        trace!(size = bytes.len(), "Sending msg");
        self.s.send(bytes).await
    }

    #[tracing::instrument(level = Level::TRACE, skip(self))]
    async fn recv_bytes(&mut self, len: usize) -> Result<Vec<u8>, AsyncRecvError> {
        while self.buffered.len() < len {
            let chunk = self.r.recv();
            match tokio::time::timeout(std::time::Duration::from_secs(10 * 60), chunk).await {
                Ok(Some(chunk)) => {
                    trace!(size = chunk.len(), "Received chunk");
                    self.buffered.extend(chunk);
                }
                Ok(None) => return Err(AsyncRecvError::Closed),
                Err(_) => return Err(AsyncRecvError::TimeoutElapsed),
            }
        }
        Ok(self.buffered.drain(..len).collect())
    }
}
