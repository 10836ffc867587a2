//! Security scan commands
//!
//! Findings arrive as a JSON document encoded in a string, one page at a
//! time; `findings` follows every page and prints the combined list.

use anyhow::{Context, Result};
use colored::Colorize;
use cwhisper_core::scan::{CodeScanStatus, GetCodeScanRequest, ListCodeScanFindingsRequest};
use serde_json::Value;

use super::common;
use crate::cli::ScanCommands;
use crate::output::{OutputFormat, format_cell, wire_name, write_json, write_table};

const FINDING_COLUMNS: [&str; 5] = ["severity", "title", "filePath", "startLine", "ruleId"];

pub async fn run(cmd: ScanCommands, output: OutputFormat) -> Result<()> {
    match cmd {
        ScanCommands::Status { job_id } => status(job_id).await,
        ScanCommands::Findings { job_id } => findings(job_id, output).await,
    }
}

async fn status(job_id: String) -> Result<()> {
    let client = common::client().await?;
    let response = client
        .get_code_scan(&GetCodeScanRequest {
            job_id,
            profile_arn: client.active_profile_arn(),
        })
        .await?;

    let label = wire_name(&response.status);
    let label = match response.status {
        CodeScanStatus::Completed => label.green(),
        CodeScanStatus::Pending => label.yellow(),
        CodeScanStatus::Failed => label.red(),
    };
    println!("{} {}", "Status:".bold(), label.bold());
    if let Some(message) = response.error_message {
        println!("  {} {}", "Error:".bold(), message);
    }
    Ok(())
}

async fn findings(job_id: String, output: OutputFormat) -> Result<()> {
    let client = common::client().await?;
    let mut request = ListCodeScanFindingsRequest::new(job_id);
    let mut all = Vec::new();

    loop {
        let page = client
            .list_code_scan_findings(&request, client.active_profile_arn())
            .await?;
        all.extend(parse_findings(&page.findings)?);
        match common::next_page(request.next_token.as_deref(), page.next_token) {
            Some(token) => request.next_token = Some(token),
            None => break,
        }
    }

    match output {
        OutputFormat::Json => write_json(&mut std::io::stdout(), &all),
        OutputFormat::Table => {
            let rows = all
                .iter()
                .map(|f| {
                    FINDING_COLUMNS
                        .iter()
                        .map(|col| format_cell(f.get(*col)))
                        .collect()
                })
                .collect();
            write_table(&mut std::io::stdout(), &FINDING_COLUMNS, rows)
        }
    }
}

/// Decode one page of findings; an empty page may come back as an empty string.
fn parse_findings(raw: &str) -> Result<Vec<Value>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(raw).context("findings are not valid JSON")?;
    Ok(match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}
