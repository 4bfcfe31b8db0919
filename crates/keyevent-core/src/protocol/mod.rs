//! Protocol module containing the wire records, the encoder, and the JSON codec.

pub mod codec;
pub mod encoder;
pub mod messages;

pub use codec::{JsonMessageCodec, MessageCodec, ProtocolError};
pub use encoder::{encode_key_event, EncodeError, NativeKeyEvent};
pub use messages::*;
