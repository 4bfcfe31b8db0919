//! In-process messenger backed by Tokio channels.
//!
//! [`in_process_channel`] returns the two ends of a transport living in one
//! process: the [`InProcessMessenger`] the handler sends on, and the
//! [`MessageInbox`] the consumer reads from.  Every message carries a
//! [`Responder`] that delivers exactly one reply to the sender.
//!
//! ```text
//! KeyChannelHandler ──send──▶ InProcessMessenger ══mpsc══▶ MessageInbox ──▶ consumer
//!        ▲                                                                     │
//!        └────────────────────── oneshot (Responder) ◀────────────────────────┘
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::{BinaryMessenger, MessengerError, ReplyReceiver};

/// Creates a connected messenger/inbox pair.
pub fn in_process_channel() -> (InProcessMessenger, MessageInbox) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (InProcessMessenger { sender }, MessageInbox { receiver })
}

/// Sending half of the in-process transport.
#[derive(Debug, Clone)]
pub struct InProcessMessenger {
    sender: mpsc::UnboundedSender<IncomingMessage>,
}

impl BinaryMessenger for InProcessMessenger {
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<ReplyReceiver, MessengerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let incoming = IncomingMessage {
            channel: channel.to_string(),
            payload: message,
            responder: Responder { sender: reply_tx },
        };
        self.sender.send(incoming).map_err(|_| MessengerError::Closed {
            channel: channel.to_string(),
        })?;
        Ok(reply_rx)
    }
}

/// Consumer half of the in-process transport.
#[derive(Debug)]
pub struct MessageInbox {
    receiver: mpsc::UnboundedReceiver<IncomingMessage>,
}

impl MessageInbox {
    /// Waits for the next message.  Returns `None` once every messenger clone
    /// has been dropped and the queue is drained.
    pub async fn recv(&mut self) -> Option<IncomingMessage> {
        self.receiver.recv().await
    }

    /// Returns the next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<IncomingMessage> {
        self.receiver.try_recv().ok()
    }
}

/// One message as seen by the consumer.
#[derive(Debug)]
pub struct IncomingMessage {
    /// Channel the message was sent on.
    pub channel: String,
    /// Encoded record.
    pub payload: Vec<u8>,
    responder: Responder,
}

impl IncomingMessage {
    /// Answers the message.  Returns `false` if the sender stopped waiting.
    pub fn respond(self, reply: Vec<u8>) -> bool {
        self.responder.respond(reply)
    }

    /// Splits the message so the reply can be sent later, from elsewhere.
    pub fn into_parts(self) -> (String, Vec<u8>, Responder) {
        (self.channel, self.payload, self.responder)
    }
}

/// Single-use reply handle for one message.
///
/// Dropping it without responding leaves the request unanswered.
#[derive(Debug)]
pub struct Responder {
    sender: oneshot::Sender<Vec<u8>>,
}

impl Responder {
    /// Creates a responder paired with a fresh reply receiver.
    pub fn pair() -> (Self, ReplyReceiver) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Delivers `reply`.  Returns `false` if the requester is gone.
    pub fn respond(self, reply: Vec<u8>) -> bool {
        let delivered = self.sender.send(reply).is_ok();
        if !delivered {
            debug!("reply dropped: requester no longer waiting");
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_reaches_inbox_and_reply_reaches_sender() {
        // Arrange
        let (messenger, mut inbox) = in_process_channel();

        // Act
        let reply_rx = messenger.send("keyevent", b"ping".to_vec()).expect("send");
        let incoming = inbox.recv().await.expect("message");
        assert_eq!(incoming.channel, "keyevent");
        assert_eq!(incoming.payload, b"ping");
        assert!(incoming.respond(b"pong".to_vec()));

        // Assert
        assert_eq!(reply_rx.await.expect("reply"), b"pong");
    }

    #[tokio::test]
    async fn test_send_fails_when_inbox_dropped() {
        let (messenger, inbox) = in_process_channel();
        drop(inbox);

        let err = messenger.send("keyevent", vec![]).unwrap_err();

        assert_eq!(
            err,
            MessengerError::Closed {
                channel: "keyevent".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_replies_may_be_sent_out_of_order() {
        // Arrange
        let (messenger, mut inbox) = in_process_channel();
        let first_rx = messenger.send("keyevent", b"1".to_vec()).unwrap();
        let second_rx = messenger.send("keyevent", b"2".to_vec()).unwrap();
        let (_, _, first) = inbox.recv().await.unwrap().into_parts();
        let (_, _, second) = inbox.recv().await.unwrap().into_parts();

        // Act – answer the second request first
        second.respond(b"b".to_vec());
        first.respond(b"a".to_vec());

        // Assert
        assert_eq!(first_rx.await.unwrap(), b"a");
        assert_eq!(second_rx.await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn test_dropped_responder_closes_reply() {
        let (messenger, mut inbox) = in_process_channel();
        let reply_rx = messenger.send("keyevent", vec![]).unwrap();

        drop(inbox.recv().await.unwrap());

        assert!(reply_rx.await.is_err());
    }

    #[test]
    fn test_respond_after_requester_gone_returns_false() {
        let (responder, receiver) = Responder::pair();
        drop(receiver);
        assert!(!responder.respond(vec![1]));
    }

    #[test]
    fn test_try_recv_on_empty_inbox_returns_none() {
        let (_messenger, mut inbox) = in_process_channel();
        assert!(inbox.try_recv().is_none());
    }
}
