use hedsuite_consolidate::{combine_tests, consolidate_sources, SourceFile};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use tempfile::tempdir;

fn synthetic_file(code: &str, cases: usize) -> Vec<Value> {
    (0..cases)
        .map(|i| {
            json!({
                "error_code": code,
                "alt_codes": ["VALUE_INVALID"],
                "name": format!("{}-{i}", code.to_lowercase()),
                "description": "synthetic case",
                "tests": {
                    "string_tests": {"fails": ["Red/#"], "passes": ["Red"]},
                    "sidecar_tests": {"fails": [], "passes": []}
                }
            })
        })
        .collect()
}

fn bench_consolidate_throughput(c: &mut Criterion) {
    let codes: Vec<String> = (0..100).map(|i| format!("CODE_{i:03}_INVALID")).collect();
    let sources: Vec<SourceFile> = codes
        .iter()
        .map(|code| SourceFile::records(format!("{code}.json"), synthetic_file(code, 20)))
        .collect();
    c.bench_function("consolidate_in_memory_2000_cases", |b| {
        b.iter(|| consolidate_sources(sources.clone()))
    });

    let dir = tempdir().expect("tempdir");
    for code in &codes {
        let body = serde_json::to_vec(&synthetic_file(code, 20)).expect("encode");
        std::fs::write(dir.path().join(format!("{code}.json")), body).expect("write");
    }
    c.bench_function("combine_tests_from_disk_100_files", |b| {
        b.iter(|| combine_tests(dir.path(), &[]).expect("combine"))
    });
}

criterion_group!(benches, bench_consolidate_throughput);
criterion_main!(benches);
