use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use complyscan::manifest::DependencyPolicy;
use complyscan::rules::ViolationScanner;

const MODULE: &str = r#"import os
import json
import requests
from tensorflow import keras

API_URL = "https://api.example.com/v1"
TIMEOUT = 30


class client_session:
    def fetchItems(self, page):
        response = requests.get(API_URL + "/items", timeout=TIMEOUT)
        print(response.status_code)
        return response.json()

    def retry(self):
        for attempt in range(5):
            try:
                return self.fetchItems(attempt)
            except:
                pass


def run(payload):
    # TODO: validate payload
    result = eval(payload)
    host = "10.0.0.1"
    return result * 42
"#;

// Helper building a source file of roughly `copies` times the sample module
fn build_source(copies: usize) -> String {
    MODULE.repeat(copies)
}

fn bench_scan_by_size(c: &mut Criterion) {
    let policy = DependencyPolicy::parse("requests\nflask\nno tensorflow\n");
    let scanner = ViolationScanner::new();
    let mut group = c.benchmark_group("scan_by_size");

    for copies in [1usize, 10, 100] {
        let source = build_source(copies);
        group.bench_with_input(BenchmarkId::from_parameter(copies), &source, |b, src| {
            b.iter(|| scanner.scan(black_box(src), black_box(&policy)))
        });
    }

    group.finish();
}

fn bench_clean_source(c: &mut Criterion) {
    let policy = DependencyPolicy::parse("flask\n");
    let scanner = ViolationScanner::new();
    let source = "from flask import Flask\n\napp = Flask(__name__)\n".repeat(200);

    c.bench_function("scan_clean_source", |b| {
        b.iter(|| scanner.scan(black_box(&source), black_box(&policy)))
    });
}

fn bench_manifest_parse(c: &mut Criterion) {
    let manifest: String = (0..200)
        .map(|i| format!("package-{i}>=1.{i}\n# pinned\nno legacy-{i}\n"))
        .collect();

    c.bench_function("manifest_parse_600_lines", |b| {
        b.iter(|| DependencyPolicy::parse(black_box(&manifest)))
    });
}

criterion_group!(
    benches,
    bench_scan_by_size,
    bench_clean_source,
    bench_manifest_parse
);
criterion_main!(benches);
