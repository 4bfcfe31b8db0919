//! Event encoder: native key message → canonical [`KeyEventMessage`].
//!
//! # Pipeline
//!
//! ```text
//! NativeKeyEvent ──┬─ action      → KeyEventType (or UnrecognizedAction)
//!                  ├─ scan_code   → scan_code | SCANCODE_EXTENDED if extended
//!                  ├─ character   → undead_char(character)
//!                  └─ (host)      → sample_modifiers(provider)
//! ```
//!
//! The action is checked before the host is queried, so an unrecognized
//! action produces no record and performs no key-state reads.

use thiserror::Error;

use crate::keymap::dead_key::undead_char;
use crate::keymap::modifiers::{sample_modifiers, KeyStateProvider};
use crate::keymap::windows::{KEYMAP, SCANCODE_EXTENDED, WM_KEYDOWN, WM_KEYUP};
use crate::protocol::messages::{KeyEventMessage, KeyEventType};

/// Raw key message as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeKeyEvent {
    /// Native virtual key code.
    pub key_code: i32,
    /// Hardware scan code, without the extended bit.
    pub scan_code: i32,
    /// Native action code (`WM_KEYDOWN` / `WM_KEYUP`).
    pub action: u32,
    /// Character produced by the key, possibly carrying the dead-key marker.
    pub character: u32,
    /// `true` if the host flagged the key as extended (e.g. right Ctrl).
    pub extended: bool,
    /// `true` if the key was already down before this message.
    ///
    /// Accepted for interface compatibility; it is not encoded.
    pub was_down: bool,
}

impl NativeKeyEvent {
    /// Convenience constructor for a `WM_KEYDOWN` message.
    pub fn key_down(key_code: i32, scan_code: i32, character: u32) -> Self {
        Self {
            key_code,
            scan_code,
            action: WM_KEYDOWN,
            character,
            extended: false,
            was_down: false,
        }
    }

    /// Convenience constructor for a `WM_KEYUP` message.
    pub fn key_up(key_code: i32, scan_code: i32, character: u32) -> Self {
        Self {
            action: WM_KEYUP,
            was_down: true,
            ..Self::key_down(key_code, scan_code, character)
        }
    }

    /// Returns a copy with the extended flag set to `extended`.
    pub fn with_extended(self, extended: bool) -> Self {
        Self { extended, ..self }
    }
}

/// Error returned when a native message cannot be encoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The native action is neither a key press nor a key release.
    #[error("unknown key event action: 0x{0:04X}")]
    UnrecognizedAction(u32),
}

impl KeyEventType {
    /// Maps a native action code to a record type.
    ///
    /// Returns `None` for anything other than `WM_KEYDOWN` / `WM_KEYUP`.
    pub fn from_native(action: u32) -> Option<Self> {
        match action {
            WM_KEYDOWN => Some(KeyEventType::KeyDown),
            WM_KEYUP => Some(KeyEventType::KeyUp),
            _ => None,
        }
    }
}

/// Builds the canonical record for `event`, sampling modifiers from `provider`.
///
/// # Errors
///
/// Returns [`EncodeError::UnrecognizedAction`] when `event.action` is not a
/// press or release; in that case `provider` is never queried.
///
/// # Examples
///
/// ```rust
/// use keyevent_core::{encode_key_event, KeyEventType, KeyStateProvider, LogicalKey, NativeKeyEvent};
///
/// struct NothingDown;
/// impl KeyStateProvider for NothingDown {
///     fn is_key_down(&self, _key: LogicalKey) -> bool { false }
/// }
///
/// let msg = encode_key_event(&NativeKeyEvent::key_down(0x41, 0x1E, 0x61), &NothingDown).unwrap();
/// assert_eq!(msg.key_code, 65);
/// assert_eq!(msg.event_type, KeyEventType::KeyDown);
/// ```
pub fn encode_key_event(
    event: &NativeKeyEvent,
    provider: &dyn KeyStateProvider,
) -> Result<KeyEventMessage, EncodeError> {
    let event_type =
        KeyEventType::from_native(event.action).ok_or(EncodeError::UnrecognizedAction(event.action))?;

    let scan_code = if event.extended {
        event.scan_code | SCANCODE_EXTENDED
    } else {
        event.scan_code
    };

    Ok(KeyEventMessage {
        key_code: event.key_code,
        scan_code,
        character_code_point: undead_char(event.character),
        keymap: KEYMAP.to_string(),
        modifiers: sample_modifiers(provider),
        event_type,
    })
}
