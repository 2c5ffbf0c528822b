//! Performance benchmarks for edgestat
//!
//! Covers the per-probe bookkeeping that runs on every dashboard tick and
//! every burst request, plus config parsing and console rendering.

use chrono::Local;
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use edgestat::{
    cli::Cli,
    config::parser::ConfigParser,
    history::HistoryPanels,
    models::{Config, LatencyPhases, ProbeResult, Target},
    output::{abbreviate_header, ConsoleRenderer},
    probe::{content_hash, ContentHasher},
    CumulativeLatency, Edge, HistoryBox, WindowedSeries,
};
use std::{hint::black_box, net::Ipv4Addr, time::Duration};

fn sample_edges(count: u8) -> Vec<Edge> {
    (1..=count).map(|i| Edge::new(Ipv4Addr::new(10, 0, 0, i))).collect()
}

fn sample_phases(i: u64) -> LatencyPhases {
    LatencyPhases {
        dns: Duration::from_micros(50 + i % 10),
        tcp_connect: Duration::from_millis(10 + i % 40),
        tls_handshake: Some(Duration::from_millis(20 + i % 60)),
        server_processing: Duration::from_millis(30 + i % 90),
        content_transfer: Duration::from_millis(5 + i % 20),
    }
}

fn benchmark_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    for distinct in [4usize, 32, 256] {
        group.bench_with_input(BenchmarkId::new("history_box_add", distinct), &distinct, |b, &distinct| {
            let values: Vec<String> = (0..1024).map(|i| format!("value-{}", i % distinct)).collect();
            b.iter(|| {
                let mut history = HistoryBox::new("Status Code");
                for value in &values {
                    history.add(value.as_str());
                }
                black_box(history.len())
            })
        });
    }

    group.bench_function("panels_record", |b| {
        let now = Local::now();
        b.iter(|| {
            let mut panels = HistoryPanels::default();
            for i in 0..100u16 {
                panels.record(200 + i % 3, "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=", now);
            }
            black_box(panels)
        })
    });

    group.finish();
}

fn benchmark_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_series");

    for edge_count in [1u8, 8, 32] {
        group.bench_with_input(BenchmarkId::new("record_ticks", edge_count), &edge_count, |b, &edge_count| {
            let edges = sample_edges(edge_count);
            b.iter(|| {
                let mut series = WindowedSeries::new(edges.clone());
                for _ in 0..20 {
                    for (index, edge) in edges.iter().enumerate() {
                        black_box(series.record(index, Some(*edge), 200));
                    }
                }
                black_box(series.series(0).len())
            })
        });
    }

    group.finish();
}

fn benchmark_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency");

    group.bench_function("cumulative_from_phases", |b| {
        let phases: Vec<LatencyPhases> = (0..256).map(sample_phases).collect();
        b.iter(|| {
            for p in &phases {
                black_box(CumulativeLatency::from_phases(black_box(p)));
            }
        })
    });

    group.bench_function("latency_block", |b| {
        let renderer = ConsoleRenderer::new(false);
        let target = Target::parse("https://www.example.com/", None, None).unwrap_or_else(|e| panic!("{}", e));
        let result = ProbeResult {
            status: 200,
            reason: "OK".to_string(),
            phases: sample_phases(7),
            ..ProbeResult::default()
        };
        b.iter(|| black_box(renderer.latency_block(target.protocol, &result)))
    });

    group.finish();
}

fn benchmark_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");
    let headers = [
        "Server",
        "Content-Type",
        "Access-Control-Allow-Origin",
        "Strict-Transport-Security",
        "X-Content-Type-Options",
    ];

    group.bench_function("abbreviate_header", |b| {
        b.iter(|| {
            for name in &headers {
                black_box(abbreviate_header(black_box(name)));
            }
        })
    });

    group.finish();
}

fn benchmark_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_hash");

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let body = vec![0x5au8; size];
        group.bench_with_input(BenchmarkId::new("one_shot", size), &body, |b, body| {
            b.iter(|| black_box(content_hash(body)))
        });
        group.bench_with_input(BenchmarkId::new("streamed_8k", size), &body, |b, body| {
            b.iter(|| {
                let mut hasher = ContentHasher::new();
                for chunk in body.chunks(8 * 1024) {
                    hasher.update(chunk);
                }
                black_box(hasher.finish())
            })
        });
    }

    group.finish();
}

fn benchmark_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");

    group.bench_function("parse_cli_args", |b| {
        b.iter(|| {
            black_box(Cli::parse_from([
                "edgestat", "request", "https://www.example.com/", "-t", "edge.example.net", "-a", "-n", "4",
            ]))
        })
    });

    group.bench_function("config_pipeline", |b| {
        b.iter(|| {
            let cli = Cli::parse_from(["edgestat", "--no-color", "request", "http://www.example.com/"]);
            black_box(ConfigParser::new(cli).parse())
        })
    });

    group.bench_function("to_target", |b| {
        let config = Config {
            url: Some("https://www.example.com/static/app.js".to_string()),
            port: Some(8443),
            ..Config::default()
        };
        b.iter(|| black_box(config.to_target()))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_history,
    benchmark_series,
    benchmark_latency,
    benchmark_output,
    benchmark_hashing,
    benchmark_config
);
criterion_main!(benches);
