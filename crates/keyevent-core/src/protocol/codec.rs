//! JSON codec for the key-event channel.
//!
//! The transport moves opaque bytes.  [`MessageCodec`] is the boundary that
//! turns typed records into those bytes and back; [`JsonMessageCodec`] is the
//! implementation used on this channel (UTF-8 JSON, one object per message).

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The record could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(String),

    /// The bytes are not valid JSON, or do not match the expected record.
    #[error("failed to decode message: {0}")]
    Decode(String),
}

/// Converts records of type `T` to and from transport bytes.
pub trait MessageCodec<T> {
    /// Serializes `message` into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode(&self, message: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one record from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed.
    fn decode(&self, bytes: &[u8]) -> Result<T, ProtocolError>;
}

/// UTF-8 JSON codec for any serde record.
///
/// # Examples
///
/// ```rust
/// use keyevent_core::{JsonMessageCodec, KeyEventReply, MessageCodec};
///
/// let codec = JsonMessageCodec::<KeyEventReply>::new();
/// let bytes = codec.encode(&KeyEventReply { handled: true }).unwrap();
/// assert_eq!(bytes, br#"{"handled":true}"#);
/// assert!(codec.decode(&bytes).unwrap().handled);
/// ```
#[derive(Debug)]
pub struct JsonMessageCodec<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonMessageCodec<T> {
    pub const fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for JsonMessageCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonMessageCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonMessageCodec<T> {}

impl<T> MessageCodec<T> for JsonMessageCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, message: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(message).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
