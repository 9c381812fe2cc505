//! Performance benchmarks for the hot conversion and parsing paths

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use speedmeter::directory::parse_server_listing;
use speedmeter::units::calc_mbps;

/// Build a synthetic server listing with `count` entries
fn synthetic_listing(count: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<settings>\n<servers>\n");
    for i in 0..count {
        xml.push_str(&format!(
            "<server url=\"http://s{i}.example/upload.php\" lat=\"1.0\" lon=\"2.0\" \
             name=\"City {i}\" country=\"Testland\" cc=\"TL\" sponsor=\"Net {i}\" \
             id=\"{i}\" host=\"s{i}.example:8080\" />\n"
        ));
    }
    xml.push_str("</servers>\n</settings>\n");
    xml
}

fn bench_calc_mbps(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let finish = start + Duration::milliseconds(1_337);

    c.bench_function("calc_mbps", |b| {
        b.iter(|| calc_mbps(black_box(start), black_box(finish), black_box(2_750_000)).unwrap())
    });
}

fn bench_parse_server_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_server_listing");
    for count in [10usize, 100, 1000] {
        let xml = synthetic_listing(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &xml, |b, xml| {
            b.iter(|| parse_server_listing(black_box(xml)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_calc_mbps, bench_parse_server_listing);
criterion_main!(benches);
