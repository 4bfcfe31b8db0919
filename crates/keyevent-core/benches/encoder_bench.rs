//! Criterion benchmarks for the key-event encoding hot path.
//!
//! Every host key message goes through the encoder, the modifier sampler, and
//! the JSON codec before it reaches the channel, so these run once per
//! keystroke.
//!
//! Run with:
//! ```bash
//! cargo bench --package keyevent-core --bench encoder_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyevent_core::{
    encode_key_event, JsonMessageCodec, KeyEventMessage, KeyEventReply, KeyStateProvider,
    LogicalKey, MessageCodec, NativeKeyEvent,
};

/// Host fixture with left Shift held.
struct ShiftHeld;

impl KeyStateProvider for ShiftHeld {
    fn is_key_down(&self, key: LogicalKey) -> bool {
        matches!(key, LogicalKey::Shift | LogicalKey::ShiftLeft)
    }
}

fn bench_encode_record(c: &mut Criterion) {
    let event = NativeKeyEvent::key_down(0x41, 0x1E, 0x41);
    c.bench_function("encode_key_event", |b| {
        b.iter(|| encode_key_event(black_box(&event), &ShiftHeld))
    });
}

fn bench_encode_to_bytes(c: &mut Criterion) {
    let codec = JsonMessageCodec::<KeyEventMessage>::new();
    let event = NativeKeyEvent::key_down(0x41, 0x1E, 0x41);
    c.bench_function("encode_key_event_to_json", |b| {
        b.iter(|| {
            let msg = encode_key_event(black_box(&event), &ShiftHeld).expect("encode");
            codec.encode(&msg).expect("serialize")
        })
    });
}

fn bench_decode_reply(c: &mut Criterion) {
    let codec = JsonMessageCodec::<KeyEventReply>::new();
    let bytes = br#"{"handled":true}"#;
    c.bench_function("decode_reply", |b| {
        b.iter(|| codec.decode(black_box(bytes)).expect("decode"))
    });
}

criterion_group!(benches, bench_encode_record, bench_encode_to_bytes, bench_decode_reply);
criterion_main!(benches);
