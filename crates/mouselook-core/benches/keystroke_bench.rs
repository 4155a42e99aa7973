//! Criterion benchmarks for the per-message hot path.
//!
//! Every message the game window receives passes through the filter, which
//! unpacks the keystroke parameter block and decodes a chord.  These
//! benchmarks keep that path honest.
//!
//! Run with:
//! ```bash
//! cargo bench --package mouselook-core --bench keystroke_bench
//! ```

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mouselook_core::keymap::KeyboardLayout;
use mouselook_core::protocol::messages::WindowMessage;
use mouselook_core::{Keybind, KeybindFormatter, KeystrokeParams, Modifiers};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const BENCH_SCAN_CODES: &[u16] = &[
    0x1E,   // A
    0x21,   // F
    0x3B,   // F1
    0x39,   // Space
    0x2A,   // Left Shift
    0xE01D, // Right Ctrl
    0xE048, // Up
    0xE052, // Insert
];

/// Layout that names every scan code after its hex value.
struct HexLayout;

impl KeyboardLayout for HexLayout {
    fn scan_to_virtual_key(&self, scan_code: u16) -> u32 {
        u32::from(scan_code & 0xFF)
    }

    fn virtual_key_to_scan(&self, virtual_key: u32) -> u16 {
        virtual_key as u16
    }

    fn key_name(&self, params: u32) -> Option<String> {
        Some(format!("{:04X}", KeystrokeParams::unpack(params).full_scan_code()))
    }

    fn held_modifiers(&self) -> Modifiers {
        Modifiers::NONE
    }
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystroke_pack");
    for &scan in BENCH_SCAN_CODES {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{scan:04X}")), &scan, |b, &scan| {
            b.iter(|| KeystrokeParams::for_keystroke(black_box(scan), black_box(true)).pack())
        });
    }
    group.finish();
}

fn bench_decode_chord(c: &mut Criterion) {
    let raw: Vec<isize> = BENCH_SCAN_CODES
        .iter()
        .map(|&s| KeystrokeParams::for_keystroke(s, false).pack() as isize)
        .collect();

    c.bench_function("decode_key_down_chord", |b| {
        b.iter(|| {
            for &lparam in &raw {
                if let WindowMessage::Key(key) = WindowMessage::decode(0x0100, 0x46, black_box(lparam)) {
                    black_box(key.chord(Modifiers(Modifiers::SHIFT)));
                }
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let formatter = KeybindFormatter::new(Arc::new(HexLayout));
    // Build the table outside the measured loop.
    formatter.names();
    let chord = Keybind {
        key: 0xE052,
        alt: true,
        ctrl: false,
        shift: true,
    };

    c.bench_function("render_keybind", |b| {
        b.iter(|| formatter.render(black_box(&chord), true))
    });
}

criterion_group!(benches, bench_pack, bench_decode_chord, bench_render);
criterion_main!(benches);
