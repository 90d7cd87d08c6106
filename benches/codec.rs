use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use fclink::{FILE_DATA_CACHE, Frame, PAYLOAD_CAPACITY, PacketType, StreamDecoder};

fn upgrade_chunk() -> Frame {
    let mut frame = Frame::with_payload(PacketType::UpgradeData.as_u8(), &[0u8; PAYLOAD_CAPACITY])
        .expect("chunk fits");
    frame.write_int32(0x0001_0000, 0).expect("offset field");
    frame
        .write_bytes(&[0xA5; FILE_DATA_CACHE], FILE_DATA_CACHE, 5)
        .expect("data field");
    frame
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let heartbeat = Frame::with_payload(PacketType::Heartbeat.as_u8(), &[]).expect("empty");
    group.throughput(Throughput::Bytes(5));
    group.bench_function("encode_heartbeat", |b| {
        b.iter(|| {
            black_box(heartbeat.wire_bytes().expect("valid frame"));
        });
    });

    let chunk = upgrade_chunk();
    group.throughput(Throughput::Bytes(PAYLOAD_CAPACITY as u64));
    group.bench_function("encode_upgrade_chunk", |b| {
        b.iter(|| {
            black_box(chunk.wire_bytes().expect("valid frame"));
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let wire = upgrade_chunk().wire_bytes().expect("valid frame");
    group.throughput(Throughput::Bytes(wire.len() as u64));
    group.bench_function("decode_upgrade_chunk", |b| {
        let mut decoder = StreamDecoder::new();
        b.iter(|| {
            for &byte in wire.iter() {
                decoder.feed(byte);
            }
            black_box(decoder.try_take_packet());
        });
    });

    let mut noisy = vec![0x13; 256];
    noisy.extend_from_slice(&wire);
    group.throughput(Throughput::Bytes(noisy.len() as u64));
    group.bench_function("resync_then_decode", |b| {
        let mut decoder = StreamDecoder::new();
        b.iter(|| {
            decoder.feed_slice(&noisy);
            black_box(decoder.try_take_packet());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
