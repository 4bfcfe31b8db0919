//! Recording messenger for unit testing.
//!
//! Allows tests to inspect every message the handler sent and to answer them
//! individually, in any order, or not at all.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use super::{BinaryMessenger, MessengerError, ReplyReceiver, Responder};

/// A mock implementation of [`BinaryMessenger`] that records sends.
pub struct RecordingMessenger {
    sent: Mutex<Vec<SentMessage>>,
    closed: AtomicBool,
}

/// One recorded send.
struct SentMessage {
    channel: String,
    payload: Vec<u8>,
    responder: Option<Responder>,
}

impl RecordingMessenger {
    /// Creates an open messenger with nothing recorded.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent send fail with [`MessengerError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("lock poisoned").len()
    }

    /// Channel name of the `index`-th send.
    pub fn channel(&self, index: usize) -> String {
        self.sent.lock().expect("lock poisoned")[index].channel.clone()
    }

    /// Payload of the `index`-th send.
    pub fn payload(&self, index: usize) -> Vec<u8> {
        self.sent.lock().expect("lock poisoned")[index].payload.clone()
    }

    /// Payload of the `index`-th send parsed as JSON.
    pub fn payload_json(&self, index: usize) -> serde_json::Value {
        serde_json::from_slice(&self.payload(index)).expect("payload is not JSON")
    }

    /// Answers the `index`-th send with `reply`.
    ///
    /// Panics if that send was already answered or dropped.
    pub fn reply(&self, index: usize, reply: &[u8]) -> bool {
        let responder = self.sent.lock().expect("lock poisoned")[index]
            .responder
            .take()
            .expect("message already answered");
        responder.respond(reply.to_vec())
    }

    /// Drops the responder of the `index`-th send without answering.
    pub fn drop_reply(&self, index: usize) {
        self.sent.lock().expect("lock poisoned")[index].responder = None;
    }
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryMessenger for RecordingMessenger {
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<ReplyReceiver, MessengerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MessengerError::Closed {
                channel: channel.to_string(),
            });
        }
        let (responder, receiver) = Responder::pair();
        self.sent.lock().expect("lock poisoned").push(SentMessage {
            channel: channel.to_string(),
            payload: message,
            responder: Some(responder),
        });
        Ok(receiver)
    }
}
