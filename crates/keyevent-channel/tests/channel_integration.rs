//! Integration tests for the key-event channel.
//!
//! These tests exercise the handler end-to-end: `KeyChannelHandler` + the
//! in-process messenger + a consumer task answering from the inbox, plus a
//! mockall messenger for the send-count contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use keyevent_channel::application::handle_key_event::KeyChannelHandler;
use keyevent_channel::infrastructure::key_state::mock::FixtureKeyState;
use keyevent_channel::infrastructure::messenger::{
    in_process_channel, BinaryMessenger, MessageInbox, MessengerError, ReplyReceiver,
};
use keyevent_channel::infrastructure::storage::ChannelConfig;
use keyevent_core::{
    JsonMessageCodec, KeyEventMessage, KeyEventType, LogicalKey, MessageCodec, ModifierFlags,
    NativeKeyEvent,
};
use mockall::mock;
use tokio::sync::mpsc;

mock! {
    Messenger {}
    impl BinaryMessenger for Messenger {
        fn send(&self, channel: &str, message: Vec<u8>) -> Result<ReplyReceiver, MessengerError>;
    }
}

/// Consumer that marks even key codes as handled and records what it saw.
async fn even_keys_consumer(
    mut inbox: MessageInbox,
    seen: mpsc::UnboundedSender<KeyEventMessage>,
) {
    let codec = JsonMessageCodec::<KeyEventMessage>::new();
    while let Some(message) = inbox.recv().await {
        let record = codec.decode(&message.payload).expect("handler sent a valid record");
        let handled = record.key_code % 2 == 0;
        let _ = seen.send(record);
        message.respond(format!(r#"{{"handled":{handled}}}"#).into_bytes());
    }
}

fn collect_verdicts(
    tx: &mpsc::UnboundedSender<(i32, bool)>,
    key_code: i32,
) -> impl FnOnce(bool) + Send + 'static {
    let tx = tx.clone();
    move |handled| {
        let _ = tx.send((key_code, handled));
    }
}

#[tokio::test]
async fn test_in_process_round_trip_reports_consumer_verdicts() {
    // Arrange
    let (messenger, inbox) = in_process_channel();
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    tokio::spawn(even_keys_consumer(inbox, seen_tx));
    let key_state = Arc::new(FixtureKeyState::with_keys(&[LogicalKey::CapsLock]));
    let handler = KeyChannelHandler::new(
        &ChannelConfig::default(),
        Arc::new(messenger),
        key_state,
    )
    .expect("runtime available");
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Act
    for key_code in [0x41, 0x42, 0x43, 0x44] {
        handler.handle_key_event(
            NativeKeyEvent::key_down(key_code, 0x10, key_code as u32 + 0x20),
            collect_verdicts(&tx, key_code),
        );
    }

    // Assert
    let mut verdicts = HashMap::new();
    for _ in 0..4 {
        let (key, handled) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("verdict in time")
            .expect("channel open");
        verdicts.insert(key, handled);
    }
    assert_eq!(verdicts[&0x41], false);
    assert_eq!(verdicts[&0x42], true);
    assert_eq!(verdicts[&0x43], false);
    assert_eq!(verdicts[&0x44], true);

    let first = seen_rx.recv().await.expect("record seen");
    assert_eq!(first.key_code, 0x41);
    assert_eq!(first.keymap, "windows");
    assert_eq!(first.event_type, KeyEventType::KeyDown);
    assert_eq!(first.modifiers, ModifierFlags(ModifierFlags::CAPS_LOCK));
    assert_eq!(handler.pending_events().pending(), 0);
}

#[tokio::test]
async fn test_unanswered_requests_stay_pending_until_teardown() {
    // Arrange – consumer that reads but never answers
    let (messenger, mut inbox) = in_process_channel();
    let handler = KeyChannelHandler::new(
        &ChannelConfig {
            max_pending_events: 3,
            ..ChannelConfig::default()
        },
        Arc::new(messenger),
        Arc::new(FixtureKeyState::new()),
    )
    .expect("runtime available");
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Act
    for key_code in 0..5 {
        handler.handle_key_event(NativeKeyEvent::key_down(key_code, 0, 0), collect_verdicts(&tx, key_code));
    }
    let mut held = Vec::new();
    while let Some(message) = inbox.try_recv() {
        held.push(message.into_parts().2);
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Assert
    assert_eq!(held.len(), 5);
    assert_eq!(handler.pending_events().pending(), 5);
    assert_eq!(handler.pending_events().overflow_warnings(), 1);
    assert!(rx.try_recv().is_err(), "no verdict without a reply");

    drop(handler);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(held.into_iter().all(|responder| !responder.respond(br#"{"handled":true}"#.to_vec())));
    assert!(rx.try_recv().is_err(), "teardown must not invoke callbacks");
}

#[tokio::test]
async fn test_unrecognized_action_never_reaches_transport() {
    // Arrange
    let mut messenger = MockMessenger::new();
    messenger.expect_send().never();
    let handler = KeyChannelHandler::new(
        &ChannelConfig::default(),
        Arc::new(messenger),
        Arc::new(FixtureKeyState::new()),
    )
    .expect("runtime available");
    let (tx, rx) = std::sync::mpsc::channel();

    // Act – WM_SYSKEYDOWN is not a recognized action
    handler.handle_key_event(
        NativeKeyEvent {
            action: 0x0104,
            ..NativeKeyEvent::key_down(0x12, 0x38, 0)
        },
        move |handled| {
            let _ = tx.send(handled);
        },
    );

    // Assert
    assert_eq!(rx.try_recv(), Ok(false));
}

#[tokio::test]
async fn test_recognized_action_sends_exactly_once_on_configured_channel() {
    // Arrange
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .withf(|channel, _| channel.to_string() == "custom/keys")
        .times(1)
        .returning(|channel, _| {
            Err(MessengerError::Closed {
                channel: channel.to_string(),
            })
        });
    let handler = KeyChannelHandler::new(
        &ChannelConfig {
            name: "custom/keys".to_string(),
            ..ChannelConfig::default()
        },
        Arc::new(messenger),
        Arc::new(FixtureKeyState::new()),
    )
    .expect("runtime available");
    let (tx, rx) = std::sync::mpsc::channel();

    // Act
    handler.handle_key_event(NativeKeyEvent::key_up(0x41, 0x1E, 0x61), move |handled| {
        let _ = tx.send(handled);
    });

    // Assert – a refused send degrades to "not handled"
    assert_eq!(rx.try_recv(), Ok(false));
    assert_eq!(handler.channel(), "custom/keys");
    assert_eq!(handler.pending_events().pending(), 0);
}

#[tokio::test]
async fn test_dispatch_future_resolves_with_consumer_verdict() {
    let (messenger, inbox) = in_process_channel();
    let (seen_tx, _seen_rx) = mpsc::unbounded_channel();
    tokio::spawn(even_keys_consumer(inbox, seen_tx));
    let handler = KeyChannelHandler::new(
        &ChannelConfig::default(),
        Arc::new(messenger),
        Arc::new(FixtureKeyState::new()),
    )
    .expect("runtime available");

    let verdict = handler
        .dispatch(&NativeKeyEvent::key_down(0x42, 0x30, 0x62))
        .expect("dispatch");

    assert_eq!(verdict.resolve().await.expect("verdict"), true);
}
