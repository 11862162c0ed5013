use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use socket_core::{parse_mac, Address, MacAddress};

fn bench_parse_mac(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_mac");
    group.throughput(Throughput::Elements(1));

    for (name, text) in [
        ("raw", "0a1B2c3D4e5F"),
        ("colon", "0a:1b:2c:3d:4e:5f"),
        ("dash", "0A-1B-2C-3D-4E-5F"),
    ] {
        group.bench_function(name, |b| b.iter(|| parse_mac(black_box(text))));
    }

    // Rejections should stay as cheap as acceptances.
    group.bench_function("bad_length", |b| b.iter(|| parse_mac(black_box("0a1b2c"))));
    group.bench_function("bad_digit_last", |b| {
        b.iter(|| parse_mac(black_box("0a:1b:2c:3d:4e:5g")))
    });
    group.finish();
}

fn bench_display(c: &mut Criterion) {
    let mac = MacAddress::new([0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]);
    c.bench_function("mac_display", |b| b.iter(|| black_box(&mac).to_string()));

    c.bench_function("address_from_str", |b| {
        b.iter(|| black_box("192.168.100.200:65535").parse::<Address>())
    });
}

criterion_group!(benches, bench_parse_mac, bench_display);
criterion_main!(benches);
