//! KeyChannelHandler: relays native key messages to the consumer channel.
//!
//! This use case is the heart of the crate.  For every native key message it
//! builds the canonical record, sends it on the channel, and reports the
//! consumer's handled/unhandled verdict to the caller.
//!
//! # Flow
//!
//! ```text
//! host thread                          Tokio runtime
//! ───────────                          ─────────────
//! handle_key_event(event, callback)
//!   ├─ encode_key_event ── bad action ─▶ callback(false), nothing sent
//!   ├─ codec.encode
//!   ├─ messenger.send ──── closed ─────▶ callback(false)
//!   ├─ pending.track()
//!   └─ spawn ───────────────────────────▶ await own reply
//!                                          ├─ {"handled": b}  → callback(b)
//!                                          ├─ malformed       → callback(false)
//!                                          ├─ reply dropped   → no callback
//!                                          └─ handler dropped → no callback
//! ```
//!
//! # Ordering
//!
//! Records are sent in call order.  Replies may arrive in any order: each
//! spawned task owns the receiver for exactly one request, so a reply can only
//! ever reach the callback registered with that request.
//!
//! # Architecture
//!
//! This use case depends only on traits ([`BinaryMessenger`],
//! [`KeyStateProvider`]).  All infrastructure implementations are injected at
//! construction time, making the use case fully unit-testable.

use std::sync::Arc;

use keyevent_core::{
    encode_key_event, EncodeError, JsonMessageCodec, KeyEventMessage, KeyEventReply,
    KeyStateProvider, MessageCodec, NativeKeyEvent, ProtocolError,
};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::application::pending_events::{PendingEventGuard, PendingTicket};
use crate::infrastructure::messenger::{BinaryMessenger, MessengerError, ReplyReceiver};
use crate::infrastructure::storage::ChannelConfig;

/// Error type for the handle-key-event use case.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The native message could not be turned into a record.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The record could not be serialized.
    #[error("failed to serialize key event: {0}")]
    Serialize(ProtocolError),
    /// The transport refused the message.
    #[error(transparent)]
    Transport(#[from] MessengerError),
    /// The consumer's reply is not a valid verdict.
    #[error("malformed reply from consumer: {0}")]
    MalformedReply(ProtocolError),
    /// The transport dropped the request without replying.
    #[error("reply channel closed before a reply arrived")]
    ReplyDropped,
    /// Construction happened outside a Tokio runtime.
    #[error("no Tokio runtime available: {0}")]
    NoRuntime(String),
}

/// A sent request whose verdict has not arrived yet.
///
/// Holds its slot in the [`PendingEventGuard`] until resolved or dropped.
#[derive(Debug)]
pub struct PendingVerdict {
    reply: ReplyReceiver,
    _ticket: PendingTicket,
}

impl PendingVerdict {
    /// Waits for the consumer's reply and extracts the `handled` field.
    ///
    /// # Errors
    ///
    /// - [`HandleError::ReplyDropped`] if the transport gave up on the request.
    /// - [`HandleError::MalformedReply`] if the reply is not
    ///   `{"handled": <bool>}`.
    pub async fn resolve(self) -> Result<bool, HandleError> {
        let bytes = self.reply.await.map_err(|_| HandleError::ReplyDropped)?;
        let reply = JsonMessageCodec::<KeyEventReply>::new()
            .decode(&bytes)
            .map_err(HandleError::MalformedReply)?;
        Ok(reply.handled)
    }
}

/// Owns the channel and all pending-request bookkeeping.
///
/// Dropping the handler discards every unanswered request: their callbacks
/// are never invoked.
pub struct KeyChannelHandler {
    channel: String,
    messenger: Arc<dyn BinaryMessenger>,
    key_state: Arc<dyn KeyStateProvider>,
    event_codec: JsonMessageCodec<KeyEventMessage>,
    pending: Arc<PendingEventGuard>,
    runtime: Handle,
    shutdown: watch::Sender<bool>,
}

impl KeyChannelHandler {
    /// Creates a handler that spawns reply tasks on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::NoRuntime`] when called outside a runtime.
    pub fn new(
        config: &ChannelConfig,
        messenger: Arc<dyn BinaryMessenger>,
        key_state: Arc<dyn KeyStateProvider>,
    ) -> Result<Self, HandleError> {
        let runtime = Handle::try_current().map_err(|e| HandleError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(config, messenger, key_state, runtime))
    }

    /// Creates a handler that spawns reply tasks on `runtime`.
    ///
    /// Use this when the host delivers key messages on a thread that is not
    /// part of the runtime (for example a Win32 message loop).
    pub fn with_runtime(
        config: &ChannelConfig,
        messenger: Arc<dyn BinaryMessenger>,
        key_state: Arc<dyn KeyStateProvider>,
        runtime: Handle,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            channel: config.name.clone(),
            messenger,
            key_state,
            event_codec: JsonMessageCodec::new(),
            pending: PendingEventGuard::new(config.max_pending_events),
            runtime,
            shutdown,
        }
    }

    /// Name of the channel records are sent on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The guard counting unanswered requests.
    pub fn pending_events(&self) -> &Arc<PendingEventGuard> {
        &self.pending
    }

    /// Encodes `event`, sends it, and returns a handle to its verdict.
    ///
    /// Modifier state is sampled here, once per record.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::Encode`] for an unrecognized action (nothing is
    /// sent), [`HandleError::Serialize`] if the record cannot be serialized,
    /// or [`HandleError::Transport`] if the messenger refuses it.
    pub fn dispatch(&self, event: &NativeKeyEvent) -> Result<PendingVerdict, HandleError> {
        let record = encode_key_event(event, self.key_state.as_ref())?;
        let bytes = self
            .event_codec
            .encode(&record)
            .map_err(HandleError::Serialize)?;
        let reply = self.messenger.send(&self.channel, bytes)?;

        debug!(
            key_code = record.key_code,
            scan_code = record.scan_code,
            modifiers = record.modifiers.bits(),
            event_type = record.event_type.as_str(),
            channel = %self.channel,
            "key event sent"
        );

        Ok(PendingVerdict {
            reply,
            _ticket: self.pending.track(),
        })
    }

    /// Relays `event` to the consumer and reports its verdict to `callback`.
    ///
    /// `callback` is invoked at most once:
    ///
    /// - synchronously with `false` if the action is unrecognized or the
    ///   message cannot be sent;
    /// - asynchronously with the consumer's verdict once it replies, or with
    ///   `false` if the reply is malformed or the reply task is cancelled
    ///   (runtime shut down) while the handler is alive;
    /// - never, if the transport drops the request or the handler is dropped
    ///   first.
    pub fn handle_key_event<F>(&self, event: NativeKeyEvent, callback: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let verdict = match self.dispatch(&event) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(key_code = event.key_code, "{e}; key event not handled");
                callback(false);
                return;
            }
        };

        let key_code = event.key_code;
        let mut shutdown = self.shutdown.subscribe();
        let callback = VerdictCallback::new(key_code, callback, shutdown.clone());
        self.runtime.spawn(async move {
            tokio::select! {
                result = verdict.resolve() => match result {
                    Ok(handled) => callback.deliver(handled),
                    Err(HandleError::ReplyDropped) => {
                        debug!(key_code, "reply channel closed; verdict discarded");
                        callback.discard();
                    }
                    Err(e) => {
                        warn!(key_code, "{e}; treating key event as unhandled");
                        callback.deliver(false);
                    }
                },
                _ = shutdown.changed() => {
                    debug!(key_code, "handler shut down; discarding pending key event");
                    callback.discard();
                }
            }
        });
    }
}

impl Drop for KeyChannelHandler {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

/// Holds a caller's callback until its reply task settles it.
///
/// If the task is torn down without settling (for example the runtime behind
/// the handle has shut down) while the handler is still alive, the event is
/// reported as unhandled.  After handler teardown it is discarded silently.
struct VerdictCallback<F: FnOnce(bool)> {
    callback: Option<F>,
    key_code: i32,
    shutdown: watch::Receiver<bool>,
}

impl<F: FnOnce(bool)> VerdictCallback<F> {
    fn new(key_code: i32, callback: F, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            callback: Some(callback),
            key_code,
            shutdown,
        }
    }

    fn deliver(mut self, handled: bool) {
        if let Some(callback) = self.callback.take() {
            callback(handled);
        }
    }

    fn discard(mut self) {
        self.callback = None;
    }
}

impl<F: FnOnce(bool)> Drop for VerdictCallback<F> {
    fn drop(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        if *self.shutdown.borrow() {
            debug!(key_code = self.key_code, "handler shut down; discarding pending key event");
            return;
        }
        warn!(
            key_code = self.key_code,
            "reply task ended without a verdict; treating key event as unhandled"
        );
        callback(false);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
