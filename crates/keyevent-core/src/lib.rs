//! # keyevent-core
//!
//! Shared library for the key-event channel containing the canonical wire
//! record, the modifier sampler, the dead-key normalizer, and the JSON codec.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or transports.
//! Host key state is reached only through the [`KeyStateProvider`] trait, so
//! every function here is deterministic under a test fixture.
//!
//! # Architecture overview (for beginners)
//!
//! A host operating system delivers raw keyboard messages: a virtual key code,
//! a hardware scan code, a character, an up/down action, and an "extended"
//! flag.  A higher-level consumer (for example a UI framework) wants to decide
//! whether it handles each key.  This crate turns the raw message into one
//! canonical record that the consumer can understand:
//!
//! - **`keymap`** – Host constants (native action codes, scan-code extended
//!   bit, dead-key marker), the private modifier bitmask, and the dead-key
//!   normalizer.
//!
//! - **`protocol`** – The wire record itself ([`KeyEventMessage`]), the reply
//!   the consumer sends back ([`KeyEventReply`]), the [`JsonMessageCodec`]
//!   that turns both into bytes, and the encoder that builds a record from a
//!   [`NativeKeyEvent`].

pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `keyevent_core::KeyEventMessage` instead of the full module path.
pub use keymap::modifiers::{sample_modifiers, KeyStateProvider, LogicalKey, ModifierFlags};
pub use protocol::codec::{JsonMessageCodec, MessageCodec, ProtocolError};
pub use protocol::encoder::{encode_key_event, EncodeError, NativeKeyEvent};
pub use protocol::messages::{KeyEventMessage, KeyEventReply, KeyEventType};
