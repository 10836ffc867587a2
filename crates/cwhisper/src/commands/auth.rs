//! Authentication status
//!
//! Reports which API the next request would use and, under bearer auth,
//! checks the token against the service.

use anyhow::Result;
use colored::Colorize;
use cwhisper_client::auth::{AuthProvider, BEARER_TOKEN_ENV, EnvAuth};

use super::common;
use crate::cli::AuthCommands;

pub async fn run(cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Status => status().await,
    }
}

async fn status() -> Result<()> {
    let auth = EnvAuth::from_env().await;

    if auth.is_bearer_token_auth() {
        println!("{}", "Bearer token: present (user API)".green().bold());
        if let Some(url) = auth.sso_start_url() {
            println!("  {} {}", "SSO start URL:".bold(), url);
        }
        println!(
            "  {} {}",
            "Enterprise SSO:".bold(),
            if auth.is_valid_enterprise_sso_in_use() {
                "yes"
            } else {
                "no"
            }
        );
        if let Some(arn) = auth.active_profile_arn() {
            println!("  {} {}", "Profile:".bold(), arn.dimmed());
        }

        print!("\n  {} ", "Service access:".bold());
        match common::client().await?.list_feature_evaluations().await {
            Ok(_) => println!("{}", "OK".green()),
            Err(e) => println!("{} ({})", "FAILED".red(), e),
        }
    } else {
        match auth.credentials().await {
            Ok(credentials) => {
                println!("{}", "IAM credentials: present (legacy API)".green().bold());
                println!(
                    "  {} {}",
                    "Access key:".bold(),
                    credentials.access_key_id.dimmed()
                );
            }
            Err(e) => {
                println!("{}", "Not authenticated".red().bold());
                println!("  {}", e.to_string().dimmed());
                println!(
                    "\n  Set {} or configure AWS credentials (environment, profile or SSO).",
                    BEARER_TOKEN_ENV.cyan().bold()
                );
            }
        }
    }

    Ok(())
}
