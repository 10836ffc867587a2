//! Code fix commands

use anyhow::Result;
use colored::Colorize;
use cwhisper_core::codefix::{CodeFixJobStatus, GetCodeFixJobRequest};

use super::common;
use crate::cli::FixCommands;
use crate::output::wire_name;

pub async fn run(cmd: FixCommands) -> Result<()> {
    match cmd {
        FixCommands::Status { job_id } => status(job_id).await,
    }
}

async fn status(job_id: String) -> Result<()> {
    let client = common::client().await?;
    let response = client
        .get_code_fix_job(&GetCodeFixJobRequest {
            job_id,
            profile_arn: client.active_profile_arn(),
        })
        .await?;

    let label = match response.job_status {
        Some(status @ CodeFixJobStatus::Succeeded) => wire_name(&status).green().bold(),
        Some(status @ CodeFixJobStatus::InProgress) => wire_name(&status).cyan(),
        Some(status @ CodeFixJobStatus::Failed) => wire_name(&status).red().bold(),
        None => "unknown".dimmed(),
    };
    println!("{} {}", "Status:".bold(), label);

    if let Some(fix) = response.suggested_fix {
        if let Some(description) = fix.description {
            println!("  {} {}", "Fix:".bold(), description);
        }
        let references = fix.references.map_or(0, |r| r.len());
        if references > 0 {
            println!("  {} {references}", "References:".bold());
        }
        if let Some(diff) = fix.code_diff {
            println!("\n{diff}");
        }
    }
    Ok(())
}
