//! Code transformation commands

use anyhow::Result;
use colored::Colorize;
use cwhisper_core::transform::{
    ResumeTransformationRequest, TransformationJobRequest, TransformationStatus,
    TransformationStep, TransformationUserActionStatus,
};

use super::common;
use crate::cli::TransformCommands;
use crate::output::{OutputFormat, format_epoch, wire_name, write_json, write_table};

pub async fn run(cmd: TransformCommands, output: OutputFormat) -> Result<()> {
    let client = common::client().await?;
    let profile_arn = client.active_profile_arn();
    let job = |job_id: String| TransformationJobRequest {
        profile_arn: profile_arn.clone(),
        ..TransformationJobRequest::new(job_id)
    };

    match cmd {
        TransformCommands::Status { job_id } => {
            let response = client.get_transformation(&job(job_id)).await?;
            let details = response.transformation_job;
            println!("{} {}", "Status:".bold(), status_label(&details.status));
            if let Some(reason) = details.reason {
                println!("  {} {}", "Reason:".bold(), reason);
            }
            for (label, time) in [
                ("Created:", details.creation_time),
                ("Started:", details.start_execution_time),
                ("Ended:", details.end_execution_time),
            ] {
                if let Some(time) = time {
                    println!("  {} {}", label.bold(), format_epoch(time).dimmed());
                }
            }
        }
        TransformCommands::Plan { job_id } => {
            let response = client.get_transformation_plan(&job(job_id)).await?;
            let steps = response.transformation_plan.transformation_steps;
            match output {
                OutputFormat::Json => write_json(&mut std::io::stdout(), &steps)?,
                OutputFormat::Table => write_table(
                    &mut std::io::stdout(),
                    &["step", "status", "description"],
                    step_rows(&steps),
                )?,
            }
        }
        TransformCommands::Stop { job_id } => {
            let response = client.stop_transformation(&job(job_id)).await?;
            println!(
                "{} {}",
                "Stop requested:".bold(),
                status_label(&response.transformation_status)
            );
        }
        TransformCommands::Resume { job_id, reject } => {
            let action = if reject {
                TransformationUserActionStatus::Rejected
            } else {
                TransformationUserActionStatus::Completed
            };
            let response = client
                .resume_transformation(&ResumeTransformationRequest {
                    transformation_job_id: job_id,
                    user_action_status: Some(action),
                    profile_arn: profile_arn.clone(),
                })
                .await?;
            println!(
                "{} {}",
                "Resumed:".bold(),
                status_label(&response.transformation_status)
            );
        }
    }
    Ok(())
}

fn status_label(status: &TransformationStatus) -> colored::ColoredString {
    let name = wire_name(status);
    match status {
        TransformationStatus::Completed => name.green().bold(),
        TransformationStatus::PartiallyCompleted => name.yellow().bold(),
        s if s.is_terminal() => name.red().bold(),
        _ => name.cyan(),
    }
}

fn step_rows(steps: &[TransformationStep]) -> Vec<Vec<String>> {
    steps
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.status.clone().unwrap_or_default(),
                s.description.clone(),
            ]
        })
        .collect()
}
