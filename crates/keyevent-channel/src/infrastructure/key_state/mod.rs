//! Live host key-state providers.
//!
//! The modifier sampler in `keyevent_core` asks a [`KeyStateProvider`] whether
//! each tracked key is down.  This module supplies the host implementations:
//!
//! - **Win32** – `GetKeyState` on the calling thread's keyboard state.
//! - **CoreWindow** – `CoreWindow::GetKeyState` for apps hosted in a WinRT
//!   `CoreWindow`.
//!
//! Both answer the same question for the same fourteen keys; which one is
//! used is chosen once, at construction, through [`KeyStateBackend`].
//!
//! # Testability
//!
//! [`mock::FixtureKeyState`] reports a caller-controlled set of keys and is
//! also the fallback on hosts that have neither backend.

use std::sync::Arc;

use keyevent_core::KeyStateProvider;
use serde::{Deserialize, Serialize};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod core_window;
#[cfg(target_os = "windows")]
pub mod windows;

/// Which host mechanism answers key-state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStateBackend {
    /// Win32 `GetKeyState`.
    #[default]
    Win32,
    /// WinRT `CoreWindow::GetKeyState` on the current thread's window.
    CoreWindow,
}

/// Error type for key-state provider construction.
#[derive(Debug, thiserror::Error)]
pub enum KeyStateError {
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
    #[error("host key-state query unavailable: {0}")]
    Host(String),
}

/// Builds the host provider for `backend`.
///
/// # Errors
///
/// Returns [`KeyStateError::UnsupportedPlatform`] on non-Windows hosts and
/// [`KeyStateError::Host`] when the CoreWindow backend is requested from a
/// thread without a window.
pub fn host_key_state(
    backend: KeyStateBackend,
) -> Result<Arc<dyn KeyStateProvider>, KeyStateError> {
    #[cfg(target_os = "windows")]
    {
        match backend {
            KeyStateBackend::Win32 => Ok(Arc::new(windows::Win32KeyState::new())),
            KeyStateBackend::CoreWindow => {
                Ok(Arc::new(core_window::CoreWindowKeyState::for_current_thread()?))
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(KeyStateError::UnsupportedPlatform(format!(
            "{backend:?} key state requires Windows, running on {}",
            std::env::consts::OS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_default_is_win32() {
        assert_eq!(KeyStateBackend::default(), KeyStateBackend::Win32);
    }

    #[test]
    fn test_backend_serializes_kebab_case() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            backend: KeyStateBackend,
        }
        let toml_str = toml::to_string(&Wrapper {
            backend: KeyStateBackend::CoreWindow,
        })
        .expect("serialize");
        assert_eq!(toml_str.trim(), r#"backend = "core-window""#);

        let parsed: Wrapper = toml::from_str(r#"backend = "win32""#).expect("deserialize");
        assert_eq!(parsed.backend, KeyStateBackend::Win32);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_host_key_state_unsupported_off_windows() {
        let result = host_key_state(KeyStateBackend::Win32);
        assert!(matches!(result, Err(KeyStateError::UnsupportedPlatform(_))));
    }
}
