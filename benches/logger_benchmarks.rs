//! Criterion benchmarks for split_logging

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use split_logging::prelude::*;
use std::io;
use std::sync::Arc;

fn plain_config() -> FormatterConfig {
    FormatterConfig::new().with_force_colors(false)
}

fn sample_entry() -> LogEntry {
    LogEntry::new(LogLevel::Warn, "disk low").with_fields(
        LogContext::new()
            .with_field("service", "billing")
            .with_field("free_mb", 512)
            .with_field("mount", "/var/lib"),
    )
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_split_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .formatter(TextFormatter::new(plain_config()))
        .build();
    logger.split_logs_to(io::sink(), io::sink());

    group.bench_function("debug_stdout_only", |b| {
        b.iter(|| {
            logger.debug(black_box("retry 3"));
        });
    });

    group.bench_function("warn_both_streams", |b| {
        b.iter(|| {
            logger.warn(black_box("disk low"));
        });
    });

    group.bench_function("logf", |b| {
        b.iter(|| {
            logger.logf(LogLevel::Info, format_args!("retry {}", black_box(3)));
        });
    });

    group.finish();
}

fn bench_default_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_fields");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .formatter(TextFormatter::new(plain_config()))
        .output(io::sink())
        .build();

    group.bench_function("none", |b| {
        b.iter(|| {
            logger.info(black_box("no defaults"));
        });
    });

    logger.set_default_fields(Some(
        (0..8).map(|i| (format!("key{}", i), i as i64)).collect(),
    ));

    group.bench_function("eight_fields", |b| {
        b.iter(|| {
            logger.info(black_box("with defaults"));
        });
    });

    group.bench_function("eight_fields_plus_call_site", |b| {
        b.iter(|| {
            logger.log_with_fields(
                LogLevel::Info,
                black_box("merged"),
                LogContext::new().with_field("request_id", "abc"),
            );
        });
    });

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let entry = sample_entry();
    let colored = TextFormatter::default();
    let plain = TextFormatter::new(plain_config());
    let json = JsonFormatter::default();

    group.bench_function("text_colored", |b| {
        b.iter(|| black_box(colored.format(black_box(&entry))));
    });

    group.bench_function("text_plain", |b| {
        b.iter(|| black_box(plain.format(black_box(&entry))));
    });

    group.bench_function("json", |b| {
        b.iter(|| black_box(json.format(black_box(&entry))));
    });

    group.finish();
}

// ============================================================================
// Concurrency Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(
        Logger::builder()
            .formatter(TextFormatter::new(plain_config()))
            .build(),
    );
    logger.split_logs_to(io::sink(), io::sink());

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                logger.warn(format!("message {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_split_dispatch,
    bench_default_fields,
    bench_formatters,
    bench_concurrent_logging,
);

criterion_main!(benches);
