//! Console reporting and the per-run results list

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use csv::Writer;
use serde::Serialize;

use crate::api::{ProvisionOutcome, ProvisionRequest};

/// Result of one input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    /// Line of the row in the input file
    pub line: usize,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub request_id: String,
    pub outcome: ProvisionOutcome,
}

impl RowResult {
    pub fn new(line: usize, request: &ProvisionRequest, outcome: ProvisionOutcome) -> Self {
        Self {
            line,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email_id.clone(),
            request_id: request.request_id.clone(),
            outcome,
        }
    }
}

/// Everything a run produced, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub results: Vec<RowResult>,
}

impl RunReport {
    pub fn push(&mut self, result: RowResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn provisioned(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.provisioned()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

pub fn progress_line(request: &ProvisionRequest) -> String {
    format!(
        "Provisioning user: {} {} ({})",
        request.first_name, request.last_name, request.email_id
    )
}

pub fn outcome_lines(outcome: &ProvisionOutcome) -> Vec<String> {
    match outcome {
        ProvisionOutcome::Provisioned { user_id } => vec![format!(
            "User provisioned successfully. Happay User ID: {}",
            user_id
        )],
        ProvisionOutcome::Rejected { status_code, body } => vec![
            format!("Error: {} - {}", status_code, body),
            "Failed to provision user.".to_string(),
        ],
        ProvisionOutcome::Failed { reason } => vec![
            format!("Error: {}", reason),
            "Failed to provision user.".to_string(),
        ],
    }
}

pub fn summary_line(report: &RunReport) -> String {
    format!(
        "Processed {} rows: {} provisioned, {} failed",
        report.total(),
        report.provisioned(),
        report.failed()
    )
}

pub fn print_default_path(path: &Path) {
    println!(
        "Defaulting to file in the current directory: {}",
        path.display().to_string().cyan()
    );
}

pub fn print_missing_file(path: &Path) {
    println!("{}", format!("File not found: {}", path.display()).yellow());
}

pub fn print_progress(request: &ProvisionRequest) {
    println!("{}", progress_line(request));
}

pub fn print_outcome(outcome: &ProvisionOutcome) {
    for line in outcome_lines(outcome) {
        if outcome.is_success() {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }
}

pub fn print_summary(report: &RunReport) {
    let line = summary_line(report);
    if report.has_failures() {
        println!("{}", line.yellow().bold());
    } else {
        println!("{}", line.bright_green().bold());
    }
}

/// One CSV line of the results report
#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    line: usize,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    request_id: &'a str,
    status: &'static str,
    http_status: Option<u16>,
    happay_user_id: Option<&'a str>,
    error: Option<String>,
}

/// Write the results list as CSV
pub fn write_csv_report(report: &RunReport, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;

    for result in &report.results {
        wtr.serialize(ReportRecord {
            line: result.line,
            first_name: &result.first_name,
            last_name: &result.last_name,
            email: &result.email,
            request_id: &result.request_id,
            status: result.outcome.label(),
            http_status: result.outcome.status_code(),
            happay_user_id: result.outcome.user_id(),
            error: result.outcome.error(),
        })
        .with_context(|| format!("Failed to write report row for line {}", result.line))?;
    }

    wtr.flush().context("Failed to flush report writer")?;

    log::info!("Results report written to: {}", path.display());
    Ok(())
}
