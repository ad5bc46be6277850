//! Benchmarks for the cache and vault hot paths.
//!
//! `unlock_pbkdf2_100k` is the headline number: it is the cost paid once per
//! unlocked session, and the reason the derived key is kept for the session
//! instead of re-derived per operation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use zeptovault::cache::ResponseCache;
use zeptovault::store::MemoryStore;
use zeptovault::vault::{KeyVault, PassphraseCipher, KEY_LEN};

fn bench_fingerprint(c: &mut Criterion) {
    let long_prompt = "explain ownership and borrowing ".repeat(64);
    c.bench_function("fingerprint_short_prompt", |b| {
        b.iter(|| {
            ResponseCache::fingerprint(
                black_box("openai"),
                black_box("gpt-4o"),
                black_box("What is Rust?"),
            )
        })
    });
    c.bench_function("fingerprint_2kb_prompt", |b| {
        b.iter(|| {
            ResponseCache::fingerprint(
                black_box("openai"),
                black_box("gpt-4o"),
                black_box(long_prompt.as_str()),
            )
        })
    });
}

fn bench_cache_ops(c: &mut Criterion) {
    c.bench_function("cache_get_hit", |b| {
        let mut cache = ResponseCache::new(3600, 100);
        cache.put("openai", "gpt-4o", "warm", "resp".into());
        b.iter(|| black_box(cache.get("openai", "gpt-4o", "warm")))
    });
    c.bench_function("cache_put_with_eviction", |b| {
        let mut cache = ResponseCache::new(3600, 100);
        for i in 0..100 {
            cache.put("openai", "gpt-4o", &format!("p{i}"), "resp".into());
        }
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            cache.put("openai", "gpt-4o", &format!("fresh-{n}"), "resp".into());
        })
    });
}

fn bench_vault(c: &mut Criterion) {
    let cipher = PassphraseCipher::from_raw_key(&[7u8; KEY_LEN]);
    let record = cipher.encrypt(b"sk-test-123").unwrap();
    c.bench_function("encrypt_small_key", |b| {
        b.iter(|| cipher.encrypt(black_box(b"sk-test-123")).unwrap())
    });
    c.bench_function("decrypt_small_key", |b| {
        b.iter(|| cipher.decrypt(black_box(&record)).unwrap())
    });

    let mut group = c.benchmark_group("kdf");
    group.sample_size(10);
    group.bench_function("unlock_pbkdf2_100k", |b| {
        b.iter(|| {
            let vault = KeyVault::unlock(MemoryStore::new(), black_box("correct horse"));
            black_box(vault.lock())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_fingerprint, bench_cache_ops, bench_vault);
criterion_main!(benches);
