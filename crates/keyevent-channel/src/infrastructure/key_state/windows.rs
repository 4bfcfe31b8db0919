//! Win32 key-state provider.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use keyevent_core::{KeyStateProvider, LogicalKey};
use windows::Win32::UI::Input::KeyboardAndMouse::GetKeyState;

/// Answers key-state queries with `GetKeyState`.
///
/// `GetKeyState` reflects the keyboard state as of the message currently being
/// processed by the calling thread, so the sampled modifiers are consistent
/// with the key message being encoded.
pub struct Win32KeyState;

impl Win32KeyState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win32KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStateProvider for Win32KeyState {
    fn is_key_down(&self, key: LogicalKey) -> bool {
        // SAFETY: GetKeyState only reads the calling thread's key-state table
        // and accepts any virtual key code.
        let state = unsafe { GetKeyState(i32::from(key.windows_vk())) };
        // The high-order bit is set while the key is down.
        state < 0
    }
}
