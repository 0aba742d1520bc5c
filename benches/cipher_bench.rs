use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use isl_cipher::{ByteTransform, CipherSpec, Transform};

fn chain_throughput(c: &mut Criterion) {
    let short = CipherSpec::compile(&[0x02, 0x01, 0x01, 0x00]).unwrap();
    // Forty operations from a sixty-byte spec.
    let long = CipherSpec::compile(&[0x05, 0x02, 0x9b].repeat(20)).unwrap();
    let payload = b"10x toy car,15x dog on a string,4x inflatable motorcycle\n".repeat(64);

    let mut group = c.benchmark_group("transform_in_place");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for (name, spec) in [("short_chain", &short), ("long_chain", &long)] {
        group.bench_function(name, |b| {
            let mut transform = Transform::encoder(spec);
            let mut buf = payload.clone();
            b.iter(|| transform.transform_in_place(black_box(&mut buf)))
        });
    }
    group.finish();
}

fn spec_compile(c: &mut Criterion) {
    let raw = [0x01, 0x02, 0x7b, 0x03, 0x04, 0x10, 0x05].repeat(10);
    c.bench_function("compile_and_invert", |b| {
        b.iter(|| {
            let spec = CipherSpec::compile(black_box(&raw)).unwrap();
            black_box(spec.inverse())
        })
    });
    c.bench_function("noop_probe", |b| {
        let spec = CipherSpec::compile(&raw).unwrap();
        b.iter(|| black_box(&spec).is_noop())
    });
}

criterion_group!(benches, chain_throughput, spec_compile);
criterion_main!(benches);
