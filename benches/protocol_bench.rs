use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tn3270r::datastream::decode_inbound;
use tn3270r::{Cp037, Screen, Terminal};

/// An Erase Write painting a small form: two fields plus a repeated rule.
fn sample_record() -> Vec<u8> {
    let mut record = vec![
        0xF5, 0xC3, // Erase Write, WCC reset
        0x11, 0x40, 0x40, // SBA(0)
        0x1D, 0x20, // protected field
    ];
    // 60 characters of text
    record.extend(std::iter::repeat(0xC1).take(60));
    record.extend_from_slice(&[
        0x11, 0xC1, 0x50, // SBA(80)
        0x3C, 0x60, 0xC2, 0x4F, // RA('-') to 143
        0x1D, 0x00, 0x13, // unprotected field, IC
    ]);
    record
}

fn bench_decode(c: &mut Criterion) {
    let record = sample_record();
    c.bench_function("decode_inbound", |b| {
        b.iter(|| decode_inbound(black_box(&record), &Cp037).unwrap())
    });
}

fn bench_apply(c: &mut Criterion) {
    let record = sample_record();
    let message = decode_inbound(&record, &Cp037).unwrap();
    c.bench_function("screen_apply", |b| {
        let mut screen = Screen::new(24, 80);
        b.iter(|| screen.apply(black_box(&message)))
    });
}

fn bench_process_inbound(c: &mut Criterion) {
    let record = sample_record();
    let term = Terminal::new(24, 80);
    c.bench_function("process_inbound", |b| {
        b.iter(|| term.process_inbound(black_box(&record)).unwrap())
    });
}

fn bench_query_reply(c: &mut Criterion) {
    let query = [0xF3u8, 0x00, 0x05, 0x01, 0xFF, 0x02];
    let term = Terminal::new(24, 80);
    c.bench_function("query_reply", |b| {
        b.iter(|| term.process_inbound(black_box(&query)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_decode,
    bench_apply,
    bench_process_inbound,
    bench_query_reply
);
criterion_main!(benches);
