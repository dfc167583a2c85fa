use std::io::Cursor;
use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tb_formats::{CategoryMap, FlashData, LogFileParser, RecordingSink, SyncProcessingContext};
use tb_test_utils::{CellStats, FlashImageBuilder};

fn flash_decode_benchmark(c: &mut Criterion) {
    let mut builder = FlashImageBuilder::new().total_rotations(5);
    for slot in 0..40 {
        builder = builder.message(&format!("TB0003a2_{slot:08X}"));
        for rotation in 0..5 {
            builder = builder.cell(
                slot,
                rotation,
                CellStats {
                    started: 4,
                    completed: 2,
                    seconds: 300,
                    ..Default::default()
                },
            );
        }
    }
    let image = builder.build();

    c.bench_function("FlashData::decode (full grid)", |b| {
        b.iter(|| {
            let flash = FlashData::decode(black_box(&image)).unwrap();
            black_box(flash.all_stats());
        })
    });
}

fn log_parse_benchmark(c: &mut Criterion) {
    let mut log = String::new();
    for i in 0..1000 {
        log.push_str(&format!(
            "0r0032c012pS15d02h{:02}m{:02}s297/221/209V:PLAY TB0003a2_2156B516 @VOL=03 @Volt=221\n",
            (i / 60) % 60,
            i % 60
        ));
        log.push_str(
            "0r0032c012pS15d02h45m47s295/214/214V:PLAYED TB0003a2_2156B516 0002/0753sec @VOL=02 @Volt=214\n",
        );
    }
    let categories = CategoryMap::default();
    let context = Arc::new(SyncProcessingContext::default());

    c.bench_function("LogFileParser::parse (2000 lines)", |b| {
        b.iter(|| {
            let mut parser = LogFileParser::new(Arc::clone(&context), &categories);
            let mut sink = RecordingSink::default();
            parser
                .parse("log.txt", Cursor::new(black_box(log.as_bytes())), &mut sink)
                .unwrap();
            black_box(sink.events.len());
        })
    });
}

criterion_group!(benches, flash_decode_benchmark, log_parse_benchmark);
criterion_main!(benches);
