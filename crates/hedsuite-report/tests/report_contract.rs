// SPDX-License-Identifier: Apache-2.0

use std::fs;

use hedsuite_consolidate::combine_tests;
use hedsuite_model::Category;
use hedsuite_report::{write_report, CategoryCorpus, CoverageAnalyzer, IndexFormat, TestIndex};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn reporters_read_the_consolidated_corpus_without_changing_it() {
    let tmp = tempdir().expect("tmp");
    let dir = tmp.path().join("validation_tests");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(
        dir.join("TAG_INVALID.json"),
        json!([{
            "error_code": "TAG_INVALID",
            "alt_codes": ["VALUE_INVALID"],
            "name": "t1",
            "description": "bad tag",
            "schema": "8.4.0",
            "tests": {"string_tests": {"fails": ["Red/#"], "passes": ["Red"]}}
        }])
        .to_string(),
    )
    .expect("write");
    fs::write(dir.join("VERSION_DEPRECATED.json"), "[{\"error_code\": \"OLD\"}]").expect("write");

    let consolidation =
        combine_tests(&dir, &["VERSION_DEPRECATED".to_string()]).expect("combine");
    let before = consolidation.clone();
    let corpora = [CategoryCorpus {
        category: Category::Validation,
        source_dir: &dir,
        records: &consolidation.merged,
    }];

    let coverage = CoverageAnalyzer::analyze(&corpora);
    assert_eq!(coverage.summary().total_error_codes, 1);
    assert!(!coverage.codes().contains_key("OLD"));

    let index = TestIndex::build(&corpora);
    assert_eq!(index.len(), 1);
    assert_eq!(index.entries()[0].file, "TAG_INVALID.json");
    assert_eq!(
        index.entries()[0].path,
        dir.join("TAG_INVALID.json").display().to_string()
    );
    assert_eq!(consolidation, before);

    let out = tmp.path().join("docs/test_index.json");
    write_report(&out, &index.render(IndexFormat::Json).expect("render")).expect("write");
    let decoded: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("decode");
    assert_eq!(decoded[0]["name"], json!("t1"));
    assert_eq!(decoded[0]["schema"], json!("8.4.0"));
}

#[test]
fn write_report_surfaces_io_failures() {
    let tmp = tempdir().expect("tmp");
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "file").expect("write");
    let err = write_report(&blocker.join("report.md"), "# report").expect_err("blocked");
    assert!(err.0.starts_with("failed to create"), "{}", err.0);
}
