//! Unit test generation commands

use anyhow::{Result, bail};
use colored::Colorize;
use cwhisper_core::testgen::{GetTestGenerationRequest, TestGenerationJobStatus};

use super::common;
use crate::cli::TestgenCommands;
use crate::output::{format_epoch, wire_name};

pub async fn run(cmd: TestgenCommands) -> Result<()> {
    match cmd {
        TestgenCommands::Status { job_id, group } => status(job_id, group).await,
    }
}

async fn status(job_id: String, group: String) -> Result<()> {
    let client = common::client().await?;
    let response = client
        .get_test_generation(&GetTestGenerationRequest {
            test_generation_job_group_name: group,
            test_generation_job_id: job_id.clone(),
            profile_arn: client.active_profile_arn(),
        })
        .await?;

    let Some(job) = response.test_generation_job else {
        bail!("service returned no test generation job for '{job_id}'");
    };

    let name = wire_name(&job.status);
    let label = match job.status {
        TestGenerationJobStatus::Completed => name.green().bold(),
        TestGenerationJobStatus::InProgress => name.cyan(),
        TestGenerationJobStatus::Failed => name.red().bold(),
    };
    println!("{} {}", "Status:".bold(), label);
    if let Some(progress) = job.progress_rate {
        println!("  {} {progress}%", "Progress:".bold());
    }
    if let Some(reason) = job.job_status_reason {
        println!("  {} {}", "Reason:".bold(), reason);
    }
    if let Some(created) = job.creation_time {
        println!("  {} {}", "Created:".bold(), format_epoch(created).dimmed());
    }
    if let Some(summary) = job.job_summary.or(job.short_answer) {
        println!("\n{summary}");
    }
    Ok(())
}
