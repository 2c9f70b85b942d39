//! Benchmarks for chatfold linearization, streaming and segmentation.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench linearize -- linearize`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatfold::config::{StreamingConfig, TopicConfig};
use chatfold::core::TopicSegmenter;
use chatfold::parser::ArchiveParser;
use chatfold::parsing::linearize;
use chatfold::streaming::JsonArrayStream;

use serde_json::{Map, Value, json};

// =============================================================================
// Test Data Generators
// =============================================================================

/// A chain of `depth` nodes where every fourth node also has a stale sibling.
fn generate_mapping(depth: usize) -> Map<String, Value> {
    let mut mapping = Map::new();
    mapping.insert(
        "root".into(),
        json!({"message": null, "parent": null, "children": ["n0"]}),
    );
    let mut parent = "root".to_string();
    for i in 0..depth {
        let id = format!("n{i}");
        let mut children = Vec::new();
        if i + 1 < depth {
            children.push(format!("n{}", i + 1));
        }
        if i % 4 == 0 {
            let stale = format!("s{i}");
            mapping.insert(
                stale.clone(),
                json!({
                    "message": {"author": {"role": "assistant"}, "content": {"parts": ["stale"]}, "create_time": 1},
                    "parent": id,
                    "children": [],
                }),
            );
            children.push(stale);
        }
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        mapping.insert(
            id.clone(),
            json!({
                "message": {"author": {"role": role}, "content": {"parts": [format!("Message number {i}")]}, "create_time": 1_700_000_000 + i as i64},
                "parent": parent,
                "children": children,
            }),
        );
        parent = id;
    }
    mapping
}

fn generate_archive(conversations: usize) -> String {
    let items: Vec<String> = (0..conversations)
        .map(|i| {
            let conv = json!({
                "title": format!("Conversation {i}"),
                "current_node": "n19",
                "mapping": generate_mapping(20),
            });
            conv.to_string()
        })
        .collect();
    format!("[{}]", items.join(",\n"))
}

fn generate_month_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let hour = (i / 60) % 24;
            let minute = i % 60;
            let day = 1 + (i / 1440) % 28;
            format!("[2026-01-{day:02} {hour:02}:{minute:02}:00] user: Message number {i} ^msg-{:06}", i + 1)
        })
        .collect()
}

// =============================================================================
// Linearization Benchmarks
// =============================================================================

fn bench_linearize(c: &mut Criterion) {
    let mut group = c.benchmark_group("linearize");

    for depth in [100_usize, 1_000, 10_000] {
        let mapping = generate_mapping(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::new("active", depth), &mapping, |b, mapping| {
            let current = format!("n{}", depth - 1);
            b.iter(|| black_box(linearize(black_box(mapping), Some(current.as_str()))));
        });
        group.bench_with_input(BenchmarkId::new("latest", depth), &mapping, |b, mapping| {
            b.iter(|| black_box(linearize(black_box(mapping), None)));
        });
    }
    group.finish();
}

// =============================================================================
// Streaming Benchmarks
// =============================================================================

fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");

    for size in [10_usize, 100, 1_000] {
        let archive = generate_archive(size);
        group.throughput(Throughput::Bytes(archive.len() as u64));
        group.bench_with_input(BenchmarkId::new("array_values", size), &archive, |b, archive| {
            b.iter(|| {
                let config = StreamingConfig::new().with_chunk_size(64 * 1024);
                let count = JsonArrayStream::new(archive.as_bytes(), config)
                    .filter_map(Result::ok)
                    .count();
                black_box(count)
            });
        });
        group.bench_with_input(BenchmarkId::new("bulk_parse", size), &archive, |b, archive| {
            let parser = ArchiveParser::new();
            b.iter(|| black_box(parser.parse_str(black_box(archive)).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Segmentation Benchmarks
// =============================================================================

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let segmenter = TopicSegmenter::new(&TopicConfig::default());

    for size in [1_000_usize, 10_000, 100_000] {
        let lines = generate_month_lines(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| black_box(segmenter.annotate(black_box(lines))));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_linearize, bench_streaming, bench_segmentation);

criterion_main!(benches);
