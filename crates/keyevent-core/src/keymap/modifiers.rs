//! Modifier sampler.
//!
//! The record carries a modifier bitmask that uses a private, host-independent
//! bit layout (see [`ModifierFlags`]).  The bits are not derived from the event
//! being reported: every tracked key is queried live from the host each time a
//! record is built, so the mask may include keys unrelated to the event (for
//! example a held Caps Lock).
//!
//! # Why a trait? (for beginners)
//!
//! Reading the keyboard state is a read of global, OS-owned state.  Hiding it
//! behind [`KeyStateProvider`] lets the production code ask the real keyboard
//! while tests hand in a fixture that reports exactly the keys they want.

use serde::{Deserialize, Serialize};

/// Bitmask of modifier keys that were down when a record was built.
///
/// The bit positions are fixed by the consumer's protocol and are unrelated to
/// the host's own modifier layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierFlags(pub u32);

impl ModifierFlags {
    pub const SHIFT: u32 = 1 << 0;
    pub const SHIFT_LEFT: u32 = 1 << 1;
    pub const SHIFT_RIGHT: u32 = 1 << 2;
    pub const CONTROL: u32 = 1 << 3;
    pub const CONTROL_LEFT: u32 = 1 << 4;
    pub const CONTROL_RIGHT: u32 = 1 << 5;
    pub const ALT: u32 = 1 << 6;
    pub const ALT_LEFT: u32 = 1 << 7;
    pub const ALT_RIGHT: u32 = 1 << 8;
    pub const WIN_LEFT: u32 = 1 << 9;
    pub const WIN_RIGHT: u32 = 1 << 10;
    pub const CAPS_LOCK: u32 = 1 << 11;
    pub const NUM_LOCK: u32 = 1 << 12;
    pub const SCROLL_LOCK: u32 = 1 << 13;

    /// Union of every defined bit.
    pub const ALL: u32 = (1 << 14) - 1;

    /// No modifier down.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every bit in `bits` is set.
    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    /// Raw bitmask as sent on the wire.
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// The fourteen host keys the sampler tracks.
///
/// Generic keys (`Shift`, `Control`, `Alt`) are queried separately from their
/// sided variants, because the host reports them separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Shift,
    ShiftLeft,
    ShiftRight,
    Control,
    ControlLeft,
    ControlRight,
    Alt,
    AltLeft,
    AltRight,
    WinLeft,
    WinRight,
    CapsLock,
    NumLock,
    ScrollLock,
}

impl LogicalKey {
    /// Every tracked key, in bit order.
    pub const ALL: [LogicalKey; 14] = [
        LogicalKey::Shift,
        LogicalKey::ShiftLeft,
        LogicalKey::ShiftRight,
        LogicalKey::Control,
        LogicalKey::ControlLeft,
        LogicalKey::ControlRight,
        LogicalKey::Alt,
        LogicalKey::AltLeft,
        LogicalKey::AltRight,
        LogicalKey::WinLeft,
        LogicalKey::WinRight,
        LogicalKey::CapsLock,
        LogicalKey::NumLock,
        LogicalKey::ScrollLock,
    ];

    /// The [`ModifierFlags`] bit this key sets when down.
    pub fn flag(self) -> u32 {
        match self {
            LogicalKey::Shift => ModifierFlags::SHIFT,
            LogicalKey::ShiftLeft => ModifierFlags::SHIFT_LEFT,
            LogicalKey::ShiftRight => ModifierFlags::SHIFT_RIGHT,
            LogicalKey::Control => ModifierFlags::CONTROL,
            LogicalKey::ControlLeft => ModifierFlags::CONTROL_LEFT,
            LogicalKey::ControlRight => ModifierFlags::CONTROL_RIGHT,
            LogicalKey::Alt => ModifierFlags::ALT,
            LogicalKey::AltLeft => ModifierFlags::ALT_LEFT,
            LogicalKey::AltRight => ModifierFlags::ALT_RIGHT,
            LogicalKey::WinLeft => ModifierFlags::WIN_LEFT,
            LogicalKey::WinRight => ModifierFlags::WIN_RIGHT,
            LogicalKey::CapsLock => ModifierFlags::CAPS_LOCK,
            LogicalKey::NumLock => ModifierFlags::NUM_LOCK,
            LogicalKey::ScrollLock => ModifierFlags::SCROLL_LOCK,
        }
    }

    /// Win32 virtual key code of this key.
    pub fn windows_vk(self) -> u16 {
        use super::windows::*;
        match self {
            LogicalKey::Shift => VK_SHIFT,
            LogicalKey::ShiftLeft => VK_LSHIFT,
            LogicalKey::ShiftRight => VK_RSHIFT,
            LogicalKey::Control => VK_CONTROL,
            LogicalKey::ControlLeft => VK_LCONTROL,
            LogicalKey::ControlRight => VK_RCONTROL,
            LogicalKey::Alt => VK_MENU,
            LogicalKey::AltLeft => VK_LMENU,
            LogicalKey::AltRight => VK_RMENU,
            LogicalKey::WinLeft => VK_LWIN,
            LogicalKey::WinRight => VK_RWIN,
            LogicalKey::CapsLock => VK_CAPITAL,
            LogicalKey::NumLock => VK_NUMLOCK,
            LogicalKey::ScrollLock => VK_SCROLL,
        }
    }
}

/// Live source of host key state.
///
/// Implementations must not cache: the sampler calls this once per tracked
/// key for every record it builds.
#[cfg_attr(test, mockall::automock)]
pub trait KeyStateProvider: Send + Sync {
    /// Returns `true` if `key` is currently down on the host.
    fn is_key_down(&self, key: LogicalKey) -> bool;
}

/// Queries every tracked key and packs the result into a [`ModifierFlags`].
pub fn sample_modifiers(provider: &dyn KeyStateProvider) -> ModifierFlags {
    let bits = LogicalKey::ALL
        .iter()
        .filter(|key| provider.is_key_down(**key))
        .fold(0u32, |acc, key| acc | key.flag());
    ModifierFlags(bits)
}
