// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use hedsuite_consolidate::{
    category_layout, combine_tests, consolidate_suite, render_suite_summary, ConsolidateOptions,
    Consolidation, RunOutcome,
};
use hedsuite_core::SuiteConfig;
use hedsuite_model::Category;
use hedsuite_report::{write_report, CategoryCorpus, CoverageAnalyzer, IndexFormat, TestIndex};
use hedsuite_schema::{validate_directory, validate_file, StructureReport, StructureValidator};
use serde_json::json;
use tracing::{debug, info};

use crate::helpers::{emit_report, to_payload};
use crate::{CliError, LogFlags, OutputMode};

pub(crate) fn run_consolidate(
    config: &SuiteConfig,
    dry_run: bool,
    log_flags: LogFlags,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let report = consolidate_suite(config, &ConsolidateOptions { dry_run })
        .map_err(|e| CliError::internal(e.to_string()))?;
    let artifacts: Vec<_> = report
        .categories
        .iter()
        .filter_map(|category| category.artifacts.as_ref())
        .flat_map(|artifacts| artifacts.artifacts.iter())
        .collect();
    let payload = json!({
        "command": "consolidate",
        "summary": to_payload(&report.summary).map_err(CliError::internal)?,
        "artifacts": to_payload(&artifacts).map_err(CliError::internal)?,
    });
    let text = render_suite_summary(&report.summary, log_flags.is_verbose());
    emit_report(output_mode, &text, payload).map_err(CliError::internal)?;

    if report.summary.outcome == RunOutcome::Failed {
        return Err(CliError::validation(&format!(
            "consolidation recorded {} error(s)",
            report.summary.totals.error_count()
        )));
    }
    Ok(())
}

pub(crate) fn run_validate_structure(
    config: &SuiteConfig,
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    schema: Option<PathBuf>,
    log_flags: LogFlags,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let schema_path = schema.or_else(|| config.schema_path.clone());
    let validator = StructureValidator::resolve(schema_path.as_deref())
        .map_err(|e| CliError::internal(format!("Failed to load schema: {e}")))?;
    info!(
        schema = schema_path
            .as_ref()
            .map_or_else(|| "builtin".to_string(), |p| p.display().to_string()),
        "structure validation started"
    );

    let skip = config.consolidated_file_names();
    let files = match (file, dir) {
        (Some(file), _) => vec![validate_file(&validator, &file)],
        (None, Some(dir)) => validate_directory(&validator, &dir, &skip)
            .map_err(|e| CliError::internal(e.to_string()))?,
        (None, None) => {
            let mut files = Vec::new();
            for layout in [&config.validation, &config.schema] {
                let dir = config.category_dir(layout);
                if dir.is_dir() {
                    files.extend(
                        validate_directory(&validator, &dir, &skip)
                            .map_err(|e| CliError::internal(e.to_string()))?,
                    );
                }
            }
            files
        }
    };
    let report = StructureReport { files };
    let payload = json!({
        "command": "validate-structure",
        "passed": report.passed(),
        "failed": report.failed(),
        "files": to_payload(&report.files).map_err(CliError::internal)?,
    });
    emit_report(output_mode, &report.render(log_flags.is_verbose()), payload)
        .map_err(CliError::internal)?;

    if !report.is_success() {
        return Err(CliError::validation(&format!(
            "{} file(s) failed structure validation",
            report.failed()
        )));
    }
    Ok(())
}

pub(crate) fn run_coverage(
    config: &SuiteConfig,
    markdown: Option<PathBuf>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let sources = report_sources(config)?;
    let analyzer = CoverageAnalyzer::analyze(&corpora(&sources));
    let payload = json!({
        "command": "coverage",
        "summary": to_payload(&analyzer.summary()).map_err(CliError::internal)?,
        "codes": to_payload(analyzer.codes()).map_err(CliError::internal)?,
        "markdown": markdown,
    });
    emit_report(output_mode, &analyzer.render_console(), payload).map_err(CliError::internal)?;

    if let Some(path) = markdown {
        let source = config.test_data_dir.display().to_string();
        write_report(&path, &analyzer.render_markdown(&source))
            .map_err(|e| CliError::internal(e.to_string()))?;
        if !output_mode.json {
            println!("\n[SUCCESS] Markdown report written to: {}", path.display());
        }
    }
    Ok(())
}

pub(crate) fn run_index(
    config: &SuiteConfig,
    output: PathBuf,
    format: IndexFormat,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let sources = report_sources(config)?;
    let index = TestIndex::build(&corpora(&sources));
    let rendered = index
        .render(format)
        .map_err(|e| CliError::internal(e.to_string()))?;
    write_report(&output, &rendered).map_err(|e| CliError::internal(e.to_string()))?;

    let text = format!(
        "Found {} test cases\nIndex written to: {}\n",
        index.len(),
        output.display()
    );
    let payload = json!({
        "command": "index",
        "entries": index.len(),
        "output": output,
    });
    emit_report(output_mode, &text, payload).map_err(CliError::internal)
}

struct ReportSource {
    category: Category,
    dir: PathBuf,
    consolidation: Consolidation,
}

// Reporters read the post-exclusion corpus of every category directory that
// exists; nothing is written.
fn report_sources(config: &SuiteConfig) -> Result<Vec<ReportSource>, CliError> {
    let mut sources = Vec::new();
    for category in Category::ALL {
        let dir = config.category_dir(category_layout(config, category));
        if !dir.is_dir() {
            debug!(category = category.as_str(), dir = %dir.display(), "category directory absent");
            continue;
        }
        let consolidation = combine_tests(&dir, &config.excluded_prefixes)
            .map_err(|e| CliError::internal(e.to_string()))?;
        sources.push(ReportSource {
            category,
            dir,
            consolidation,
        });
    }
    Ok(sources)
}

fn corpora(sources: &[ReportSource]) -> Vec<CategoryCorpus<'_>> {
    sources
        .iter()
        .map(|source| CategoryCorpus {
            category: source.category,
            source_dir: &source.dir,
            records: &source.consolidation.merged,
        })
        .collect()
}
