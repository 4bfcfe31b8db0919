//! WinRT `CoreWindow` key-state provider.
//!
//! `CoreWindow` objects are bound to the thread that owns them, so the window
//! is looked up on every query instead of being stored.

#![cfg(target_os = "windows")]

use keyevent_core::{KeyStateProvider, LogicalKey};
use tracing::debug;
use windows::System::VirtualKey;
use windows::UI::Core::{CoreVirtualKeyStates, CoreWindow};

use super::KeyStateError;

/// Answers key-state queries with `CoreWindow::GetKeyState`.
pub struct CoreWindowKeyState;

impl CoreWindowKeyState {
    /// Verifies that the calling thread owns a `CoreWindow`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStateError::Host`] if no window is attached to the thread.
    pub fn for_current_thread() -> Result<Self, KeyStateError> {
        CoreWindow::GetForCurrentThread().map_err(|e| KeyStateError::Host(e.message().to_string()))?;
        Ok(Self)
    }
}

impl KeyStateProvider for CoreWindowKeyState {
    fn is_key_down(&self, key: LogicalKey) -> bool {
        // WinRT VirtualKey values are the Win32 VK codes.
        let virtual_key = VirtualKey(i32::from(key.windows_vk()));
        let state = CoreWindow::GetForCurrentThread().and_then(|window| window.GetKeyState(virtual_key));
        match state {
            Ok(state) => state.0 & CoreVirtualKeyStates::Down.0 == CoreVirtualKeyStates::Down.0,
            Err(e) => {
                debug!(?key, "CoreWindow key state unavailable: {}", e.message());
                false
            }
        }
    }
}
