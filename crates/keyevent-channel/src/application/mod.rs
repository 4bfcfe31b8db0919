//! Application layer use cases for the key-event channel.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (here: the pure encoder in `keyevent-core`) and the infrastructure (host
//! key-state queries, the message transport, configuration files).
//!
//! Use cases in this layer depend on traits (`BinaryMessenger`,
//! `KeyStateProvider`) rather than concrete implementations, so tests can
//! inject fixtures without a real keyboard or consumer.
//!
//! # Sub-modules
//!
//! - **`handle_key_event`** – Builds the canonical record for each native key
//!   message, sends it on the channel, and reports the consumer's verdict to
//!   the caller.  This runs on every keystroke.
//!
//! - **`pending_events`** – Counts requests that were sent but not yet
//!   answered and warns once each time the count crosses a ceiling.

pub mod handle_key_event;
pub mod pending_events;
