//! Windows host constants.
//!
//! # Where do these numbers come from? (for beginners)
//!
//! Windows delivers keyboard input as window messages.  A key press arrives as
//! `WM_KEYDOWN` (0x0100) and a release as `WM_KEYUP` (0x0101).  Each message
//! carries a Virtual Key (VK) code such as `VK_A = 0x41`, a hardware scan code,
//! and flags.  The values below are copied from `<winuser.h>` so this crate can
//! stay free of any Windows bindings.

/// Keymap tag attached to every record produced on this host.
pub const KEYMAP: &str = "windows";

/// Native action code for a key press (`WM_KEYDOWN`).
pub const WM_KEYDOWN: u32 = 0x0100;

/// Native action code for a key release (`WM_KEYUP`).
pub const WM_KEYUP: u32 = 0x0101;

/// Bit OR'd into the scan code when the host reports an extended key.
///
/// Win32 marks some keys as "extended", such as ShiftRight, which shares its
/// scan code with ShiftLeft.  Downstream scan-code tables mark these keys with
/// this bit, so the record carries it the same way.
pub const SCANCODE_EXTENDED: i32 = 0xE000;

/// Bit the host sets on the character of a dead key.
///
/// When a dead key is pressed the mapped character is the "normal" character
/// with this bit set: dead-key caret reports `0x8000_005E`.
pub const DEAD_KEY_MARKER: u32 = 0x8000_0000;

// ── Virtual key codes of the tracked modifier keys ────────────────────────────

pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_CAPITAL: u16 = 0x14;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;
pub const VK_NUMLOCK: u16 = 0x90;
pub const VK_SCROLL: u16 = 0x91;
pub const VK_LSHIFT: u16 = 0xA0;
pub const VK_RSHIFT: u16 = 0xA1;
pub const VK_LCONTROL: u16 = 0xA2;
pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_LMENU: u16 = 0xA4;
pub const VK_RMENU: u16 = 0xA5;
