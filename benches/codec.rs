use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lancast::protocol::{parse, serialize, Packet, PacketType, ProtocolVersion};
use std::hint::black_box;

fn sample_packet(user_data_size: usize) -> Packet {
    Packet {
        packet_type: PacketType::IAmHere,
        application_id: 7,
        peer_id: 0x00C0FFEE,
        snapshot_index: 99,
        user_data: vec![0u8; user_data_size],
    }
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_serialize");

    for size in [0usize, 64, 256, 1024, 4096] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let packet = sample_packet(size);
            b.iter(|| {
                let bytes = serialize(black_box(&packet), ProtocolVersion::V1).unwrap();
                black_box(bytes);
            });
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_parse");

    for version in [ProtocolVersion::V0, ProtocolVersion::V1] {
        for size in [0usize, 1024, 4096] {
            let encoded = serialize(&sample_packet(size), version).unwrap();
            group.throughput(Throughput::Bytes(encoded.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{version:?}"), size),
                &encoded,
                |b, encoded| {
                    b.iter(|| {
                        let decoded = parse(black_box(encoded)).unwrap();
                        black_box(decoded);
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_serialize, bench_parse);
criterion_main!(benches);
