//! Binary message transport for the key-event channel.
//!
//! The handler never talks to a consumer directly.  It hands encoded bytes to
//! a [`BinaryMessenger`] together with a channel name and gets back a
//! one-shot receiver for the reply.  Each request owns its own receiver, so a
//! reply always finds the request that caused it no matter in which order the
//! consumer answers.
//!
//! # Delivery guarantees
//!
//! - At most one reply per send.
//! - No ordering between replies of different sends.
//! - If the transport is torn down, the reply sender is dropped and the
//!   receiver resolves with an error; the request is never answered.
//!
//! # Testability
//!
//! [`mock::RecordingMessenger`] records every send and lets tests answer them
//! in any order.

use thiserror::Error;
use tokio::sync::oneshot;

pub mod in_process;
pub mod mock;

pub use in_process::{in_process_channel, InProcessMessenger, IncomingMessage, MessageInbox, Responder};

/// Receiving end of the reply to one send.
pub type ReplyReceiver = oneshot::Receiver<Vec<u8>>;

/// Error type for messenger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessengerError {
    /// Nobody is listening on the other side any more.
    #[error("messenger closed: no consumer is listening on channel {channel:?}")]
    Closed { channel: String },
}

/// Trait abstracting the asynchronous request/reply transport.
///
/// `send` must not block: it queues the message and returns immediately.
pub trait BinaryMessenger: Send + Sync {
    /// Sends `message` on `channel` and returns a receiver for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::Closed`] if the message cannot be queued.
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<ReplyReceiver, MessengerError>;
}
