//! Dead-key normalizer.

use super::windows::DEAD_KEY_MARKER;

/// Reverts the character reported for a dead key to its normal value.
///
/// Characters without the marker bit are returned unchanged, so this is
/// applied unconditionally to every event.
///
/// # Examples
///
/// ```rust
/// use keyevent_core::keymap::undead_char;
///
/// assert_eq!(undead_char(0x8000_005E), 0x5E); // dead-key caret -> '^'
/// assert_eq!(undead_char(0x61), 0x61);
/// ```
pub fn undead_char(ch: u32) -> u32 {
    ch & !DEAD_KEY_MARKER
}
