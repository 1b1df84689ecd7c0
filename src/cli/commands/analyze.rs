//! Implementation of the `mender analyze` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::cli::display::{
    action_failure, action_success, colorize_confidence, colorize_review, list_table, render_list,
};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, FixReport};
use crate::domain::ports::{NullSourceReader, SourceReader};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::source::FsSourceReader;
use crate::services::TriagePipeline;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Failure analysis JSON file, or `-` for stdin
    pub input: PathBuf,

    /// Where to write the report (default from config: .mender/fix-report.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum strategies running at once (1 = sequential)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub concurrency: Option<u16>,

    /// Directory that file paths in diagnostics are relative to
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Do not read the source tree; fixes needing file contents are skipped
    #[arg(long)]
    pub no_source: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub report_path: PathBuf,
    pub report: FixReport,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        if !report.ok {
            lines.push(action_failure(&format!(
                "Triage failed: {}",
                report.run_error.as_deref().unwrap_or("unknown error")
            )));
        } else {
            lines.push(action_success(&format!(
                "{} of {} error(s) have fix proposals (overall confidence {:.2})",
                report.fixable_errors, report.total_errors, report.overall_confidence
            )));

            let mut table = list_table(&["target", "confidence", "mode", "candidates", "fix"]);
            for group in &report.consolidated {
                let rep = &group.representative;
                let fix = rep.command.as_deref().unwrap_or(&rep.description);
                table.add_row(vec![
                    group.target_file.clone().unwrap_or_else(|| "(command)".to_string()),
                    colorize_confidence(group.confidence).to_string(),
                    colorize_review(rep.requires_human_review).to_string(),
                    group.candidates.len().to_string(),
                    truncate(fix, 72),
                ]);
            }
            lines.push(String::new());
            lines.push(render_list(
                "fix group",
                "fix groups",
                &table,
                report.consolidated.len(),
            ));
        }

        lines.push(format!("\nReport written to {}", self.report_path.display()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.report).unwrap_or_default()
    }
}

/// Serialize `report` to `path`, creating parent directories.
pub async fn write_report(report: &FixReport, path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let body = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .context("Failed to serialize report")?;
    tokio::fs::write(path, body + "\n")
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

/// Run the pipeline and write the report. Returns the process exit code.
pub async fn execute(args: AnalyzeArgs, mut config: Config, json_mode: bool) -> Result<i32> {
    if let Some(concurrency) = args.concurrency {
        config.engine.max_concurrency = usize::from(concurrency);
    }
    if let Some(root) = args.source_root {
        config.engine.source_root = root;
    }
    if let Some(path) = args.output {
        config.output.report_path = path;
    }
    ConfigLoader::validate(&config).context("Invalid configuration after CLI overrides")?;

    let sources: Arc<dyn SourceReader> = if args.no_source {
        Arc::new(NullSourceReader::new())
    } else {
        Arc::new(FsSourceReader::new(config.engine.source_root.clone()))
    };
    let pipeline = TriagePipeline::from_config(&config, sources);

    let run_id = Uuid::new_v4();
    let report = pipeline
        .run_path(&args.input)
        .instrument(info_span!("analyze", %run_id))
        .await;

    write_report(&report, &config.output.report_path, config.output.pretty).await?;
    info!(%run_id, path = %config.output.report_path.display(), ok = report.ok, "report written");

    let exit_code = report.exit_code();
    output(
        &AnalyzeOutput {
            report_path: config.output.report_path,
            report,
        },
        json_mode,
    );
    Ok(exit_code)
}
