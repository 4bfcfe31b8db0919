//! Key-event channel message types.
//!
//! # Wire format
//!
//! Every outbound record is a JSON object with exactly these keys, in this
//! order:
//!
//! ```json
//! {"keyCode":65,"scanCode":30,"characterCodePoint":97,"keymap":"windows","modifiers":0,"type":"keydown"}
//! ```
//!
//! The consumer answers each record with an object carrying at least a boolean
//! `handled` field:
//!
//! ```json
//! {"handled":true}
//! ```

use serde::{Deserialize, Serialize};

use crate::keymap::modifiers::ModifierFlags;

/// Default name of the channel the records are sent on.
pub const DEFAULT_CHANNEL_NAME: &str = "keyevent";

/// Whether the record describes a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventType {
    #[serde(rename = "keydown")]
    KeyDown,
    #[serde(rename = "keyup")]
    KeyUp,
}

impl KeyEventType {
    /// The literal wire value (`"keydown"` or `"keyup"`).
    pub fn as_str(self) -> &'static str {
        match self {
            KeyEventType::KeyDown => "keydown",
            KeyEventType::KeyUp => "keyup",
        }
    }
}

/// Canonical key-event record sent to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEventMessage {
    /// Native virtual key code, passed through unchanged.
    pub key_code: i32,
    /// Native scan code with the extended bit OR'd in for extended keys.
    pub scan_code: i32,
    /// Unicode code point with the dead-key marker cleared.
    pub character_code_point: u32,
    /// Which host keymap the raw codes belong to.
    pub keymap: String,
    /// Modifier keys down at the time the record was built.
    pub modifiers: ModifierFlags,
    /// Press or release.
    #[serde(rename = "type")]
    pub event_type: KeyEventType,
}

/// The consumer's verdict for one record.
///
/// `handled` is required; a reply without it fails to decode.  Unknown fields
/// are ignored so consumers may attach extra information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventReply {
    pub handled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> KeyEventMessage {
        KeyEventMessage {
            key_code: 0x41,
            scan_code: 0x1E,
            character_code_point: 0x61,
            keymap: "windows".to_string(),
            modifiers: ModifierFlags::empty(),
            event_type: KeyEventType::KeyDown,
        }
    }

    #[test]
    fn test_key_event_serializes_with_wire_keys_in_order() {
        // Arrange
        let msg = sample_message();

        // Act
        let json = serde_json::to_string(&msg).expect("serialize");

        // Assert
        assert_eq!(
            json,
            r#"{"keyCode":65,"scanCode":30,"characterCodePoint":97,"keymap":"windows","modifiers":0,"type":"keydown"}"#
        );
    }

    #[test]
    fn test_key_up_serializes_as_keyup() {
        let msg = KeyEventMessage {
            event_type: KeyEventType::KeyUp,
            ..sample_message()
        };
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(value["type"], "keyup");
    }

    #[test]
    fn test_event_type_as_str_matches_serde() {
        for ty in [KeyEventType::KeyDown, KeyEventType::KeyUp] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_reply_ignores_unknown_fields() {
        let reply: KeyEventReply =
            serde_json::from_str(r#"{"handled":true,"latency_us":12}"#).expect("decode");
        assert!(reply.handled);
    }

    #[test]
    fn test_reply_without_handled_is_rejected() {
        let result: Result<KeyEventReply, _> = serde_json::from_str(r#"{"consumed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result: Result<KeyEventType, _> = serde_json::from_str(r#""keypress""#);
        assert!(result.is_err());
    }
}
