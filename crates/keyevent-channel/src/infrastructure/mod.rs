//! Infrastructure layer for the key-event channel.
//!
//! Contains OS-facing and transport adapters: live host key-state queries,
//! the binary messenger, and file-system configuration storage.
//!
//! **Dependency rule**: this layer may depend on `keyevent_core`, but MUST NOT
//! be imported by `keyevent_core`.  The application layer reaches it only
//! through traits.

pub mod key_state;
pub mod messenger;
pub mod storage;
