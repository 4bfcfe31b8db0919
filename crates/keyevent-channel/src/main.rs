//! keyevent-relay entry point.
//!
//! Wires a [`KeyChannelHandler`] to an in-process consumer and feeds it key
//! messages read from stdin, one per line:
//!
//! ```text
//! <down|up|ACTION> <keyCode> <scanCode> <char> [extended]
//! down 0x41 0x1E 0x61
//! up   0xA3 0x1D 0 extended
//! ```
//!
//! Integers are decimal or `0x`-prefixed hex.  The consumer reports the key
//! codes given with `--handled` as handled and everything else as unhandled.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, init tracing
//!  └─ host_key_state()          -- Win32 / CoreWindow, fixture elsewhere
//!  └─ in_process_channel()
//!       ├─ run_consumer          (Tokio task, answers every record)
//!       └─ KeyChannelHandler     (fed from stdin)
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use keyevent_channel::application::handle_key_event::KeyChannelHandler;
use keyevent_channel::infrastructure::key_state::{host_key_state, mock::FixtureKeyState};
use keyevent_channel::infrastructure::messenger::{in_process_channel, MessageInbox};
use keyevent_channel::infrastructure::storage::{
    load_config, load_config_from, ConfigError, HandlerConfig,
};
use keyevent_core::keymap::windows::{WM_KEYDOWN, WM_KEYUP};
use keyevent_core::{
    JsonMessageCodec, KeyEventMessage, KeyEventReply, KeyStateProvider, MessageCodec, NativeKeyEvent,
};

/// How long to wait for outstanding verdicts once stdin is exhausted.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Command-line arguments for the relay.
#[derive(Debug, Parser)]
#[command(name = "keyevent-relay", version, about = "Relay key events from stdin to an in-process consumer")]
struct Args {
    /// Path to the TOML config file (defaults to the platform config dir).
    #[arg(long, env = "KEYEVENT_CONFIG")]
    config: Option<PathBuf>,

    /// Key codes the consumer reports as handled.  Repeatable.
    #[arg(long = "handled", value_parser = parse_int::<i32>)]
    handled: Vec<i32>,

    /// Overrides `channel.max_pending_events`.
    #[arg(long)]
    max_pending: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match load_config() {
            Err(ConfigError::NoPlatformConfigDir) => HandlerConfig::default(),
            other => other.context("failed to load config")?,
        },
    };
    if let Some(max_pending) = args.max_pending {
        config.channel.max_pending_events = max_pending;
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        channel = %config.channel.name,
        max_pending = config.channel.max_pending_events,
        "keyevent relay starting"
    );

    let key_state: Arc<dyn KeyStateProvider> = match host_key_state(config.host.key_state_backend) {
        Ok(provider) => provider,
        Err(e) => {
            warn!("{e}; no modifiers will be reported");
            Arc::new(FixtureKeyState::new())
        }
    };

    let (messenger, inbox) = in_process_channel();
    let handled_keys: HashSet<i32> = args.handled.into_iter().collect();
    let consumer = tokio::spawn(run_consumer(inbox, handled_keys));

    let handler = KeyChannelHandler::new(&config.channel, Arc::new(messenger), key_state)
        .context("failed to create key channel handler")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_event_line(line) {
            Ok(event) => {
                let key_code = event.key_code;
                handler.handle_key_event(event, move |handled| {
                    info!(key_code, handled, "verdict");
                });
            }
            Err(e) => warn!("skipping {line:?}: {e}"),
        }
    }

    let drained = tokio::time::timeout(DRAIN_TIMEOUT, handler.pending_events().drained()).await;
    tokio::task::yield_now().await;
    if drained.is_err() {
        let unanswered = handler.pending_events().pending();
        warn!(unanswered, "discarding unanswered key events");
    }
    drop(handler);
    consumer.await.context("consumer task failed")?;

    info!("keyevent relay stopped");
    Ok(())
}

/// Answers every record on `inbox` until all senders are gone.
async fn run_consumer(mut inbox: MessageInbox, handled_keys: HashSet<i32>) {
    let event_codec = JsonMessageCodec::<KeyEventMessage>::new();
    let reply_codec = JsonMessageCodec::<KeyEventReply>::new();

    while let Some(message) = inbox.recv().await {
        let handled = match event_codec.decode(&message.payload) {
            Ok(record) => {
                info!(
                    key_code = record.key_code,
                    scan_code = record.scan_code,
                    character = record.character_code_point,
                    modifiers = record.modifiers.bits(),
                    event_type = record.event_type.as_str(),
                    "consumer received key event"
                );
                handled_keys.contains(&record.key_code)
            }
            Err(e) => {
                warn!("consumer received undecodable record: {e}");
                false
            }
        };

        match reply_codec.encode(&KeyEventReply { handled }) {
            Ok(bytes) => {
                message.respond(bytes);
            }
            Err(e) => error!("failed to encode reply: {e}"),
        }
    }
}

/// Parses `<down|up|ACTION> <keyCode> <scanCode> <char> [extended]`.
fn parse_event_line(line: &str) -> Result<NativeKeyEvent, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [action, key_code, scan_code, character, rest @ ..] = fields.as_slice() else {
        return Err("expected: <down|up|ACTION> <keyCode> <scanCode> <char> [extended]".to_string());
    };

    let action = match *action {
        "down" => WM_KEYDOWN,
        "up" => WM_KEYUP,
        other => parse_int::<u32>(other)?,
    };
    let extended = match rest {
        [] => false,
        ["extended"] => true,
        _ => return Err(format!("unexpected trailing fields: {rest:?}")),
    };

    Ok(NativeKeyEvent {
        key_code: parse_int(key_code)?,
        scan_code: parse_int(scan_code)?,
        action,
        character: parse_int(character)?,
        extended,
        was_down: false,
    })
}

/// Parses a decimal or `0x`-prefixed hex integer.
fn parse_int<T: TryFrom<i64>>(s: &str) -> Result<T, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => s.parse::<i64>(),
    }
    .map_err(|e| format!("invalid integer {s:?}: {e}"))?;
    T::try_from(parsed).map_err(|_| format!("integer {s:?} out of range"))
}
