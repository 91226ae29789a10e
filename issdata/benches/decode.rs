use criterion::{black_box, criterion_group, criterion_main, Criterion};

use issdata::block::SwapMode;
use issdata::cfg::{Config, Policy};
use issdata::ser::StreamWriter;
use issdata::session::Session;
use issdata::word::{Adc, DataKind, Info};
use issdata::Word;

/// A trigger every 64 words, an ADC extension every 16, ADC hits between
fn synthetic_words(n: usize) -> Vec<u64> {
    let mut words = Vec::with_capacity(n);
    for i in 0..n {
        let low = (i as u32 * 7) & 0x0FFF_FFFF;
        let w = if i % 64 == 0 {
            Info::extension(63, (i / 64) as u32, low).to_raw()
        } else if i % 16 == 0 {
            Info::extension(1, (i / 64) as u32, low).to_raw()
        } else {
            Adc {
                module: (i % 4) as u8,
                channel: (i % 16) as u8,
                kind: DataKind::QLong,
                conversion: (i % 4096) as u16,
                low_timestamp: low,
            }
            .to_raw()
        };
        words.push(w);
    }
    return words;
}

fn decode_words(c: &mut Criterion) {
    let words = synthetic_words(1 << 16);
    c.bench_function("decode_words", |b| {
        b.iter(|| {
            for &w in &words {
                let _ = black_box(Word::decode(w));
            }
        })
    });
}

fn swap_words(c: &mut Criterion) {
    let words = synthetic_words(1 << 16);
    let swap = SwapMode { known: true, endian: true, words: true };
    c.bench_function("swap_words", |b| {
        b.iter(|| {
            for &w in &words {
                let _ = black_box(swap.apply(w));
            }
        })
    });
}

fn session_events(c: &mut Criterion) {
    let mut writer = StreamWriter::new(1 << 16);
    writer.swap_endian = true;
    let bytes = writer.stream(&synthetic_words(1 << 18));
    for (name, policy) in [("session_trigger", Policy::Trigger), ("session_window", Policy::Window(512))] {
        let config = Config { policy, ..Config::default() };
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut session = Session::open(&bytes).unwrap();
                let mut n = 0usize;
                session.run(&config, |e| n += e.len()).unwrap();
                black_box(n)
            })
        });
    }
}

criterion_group!(benches, decode_words, swap_words, session_events);
criterion_main!(benches);
