//! Performance benchmarks for DirCrypt
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dircrypt::config::{CryptConfig, Mode};
use dircrypt::core::CryptEngine;
use dircrypt::crypto::{open, seal, SymmetricKey};
use tempfile::TempDir;

fn bench_seal_open(c: &mut Criterion) {
    let key = SymmetricKey::derive(b"bench key");
    let mut group = c.benchmark_group("aes_256_gcm");

    for size in [1024usize, 64 * 1024, 1024 * 1024].iter() {
        let plaintext = vec![0x5Au8; *size];
        let blob = seal(&key, &plaintext).unwrap();

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("seal", size), &plaintext, |b, data| {
            b.iter(|| seal(&key, black_box(data)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("open", size), &blob, |b, data| {
            b.iter(|| open(&key, black_box(data)).unwrap());
        });
    }

    group.finish();
}

fn bench_directory_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory_roundtrip");
    group.sample_size(10);

    for workers in [1usize, 4, 16].iter() {
        let dir = TempDir::new().unwrap();
        for i in 0..200 {
            std::fs::write(dir.path().join(format!("file_{}.txt", i)), vec![b'x'; 4096]).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(workers), workers, |b, &workers| {
            b.iter(|| {
                for mode in [Mode::Encrypt, Mode::Decrypt] {
                    let config = CryptConfig {
                        root: dir.path().to_path_buf(),
                        mode,
                        workers,
                        ..Default::default()
                    };
                    black_box(CryptEngine::new(config, "bench").execute().unwrap());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_seal_open, bench_directory_roundtrip);
criterion_main!(benches);
