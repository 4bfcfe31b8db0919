//! Host keyboard definitions used when building the canonical record.
//!
//! The native key code is passed through unchanged and tagged with the keymap
//! that produced it; no cross-platform translation happens here.  What this
//! module does own is the small amount of host knowledge the encoder needs:
//! which native action codes mean "down" and "up", how an extended scan code
//! is marked, how a dead key is marked, and the private modifier bitmask.

pub mod dead_key;
pub mod modifiers;
pub mod windows;

pub use dead_key::undead_char;
pub use modifiers::{sample_modifiers, KeyStateProvider, LogicalKey, ModifierFlags};
