//! CLI argument definitions using clap

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::commands;
use crate::output::OutputFormat;

/// A CLI for the code-assistant service
#[derive(Parser)]
#[command(name = "cwhisper")]
#[command(author, version, about)]
#[command(long_about = "A CLI for the code-assistant service.\n\n\
    Request inline completions and follow security scans, code transformations, \
    test generation and code fix jobs. Authenticates with a bearer token when one \
    is available and falls back to IAM-signed requests otherwise.")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format for listings
    #[arg(short, long, value_enum, default_value_t, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Show or initialize local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect how requests will be authenticated
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Request inline completions for the end of a file
    Complete {
        /// Source file to complete
        file: PathBuf,

        /// Programming language (detected from the file extension by default)
        #[arg(long)]
        language: Option<String>,

        /// Maximum number of completions to request
        #[arg(long)]
        max_results: Option<u32>,
    },

    /// List customizations available to this profile
    Customizations,

    /// Follow security scan jobs
    Scan {
        #[command(subcommand)]
        command: ScanCommands,
    },

    /// Follow code transformation jobs
    Transform {
        #[command(subcommand)]
        command: TransformCommands,
    },

    /// Follow unit test generation jobs
    Testgen {
        #[command(subcommand)]
        command: TestgenCommands,
    },

    /// Follow code fix jobs
    Fix {
        #[command(subcommand)]
        command: FixCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings and endpoint
    Show,
    /// Print the settings file location
    Path,
    /// Create or update the settings file
    Init {
        /// Opt out of sharing content with the service
        #[arg(long)]
        opt_out: bool,

        /// Disable usage telemetry
        #[arg(long)]
        no_telemetry: bool,

        /// Accept the given flags without prompting
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
pub enum AuthCommands {
    /// Show which API and identity requests will use
    Status,
}

#[derive(clap::Subcommand)]
pub enum ScanCommands {
    /// Show the status of a scan job
    Status { job_id: String },
    /// List the findings of a completed scan job
    Findings { job_id: String },
}

#[derive(clap::Subcommand)]
pub enum TransformCommands {
    /// Show the status of a transformation job
    Status { job_id: String },
    /// Show the steps planned for a transformation job
    Plan { job_id: String },
    /// Stop a transformation job
    Stop { job_id: String },
    /// Resume a paused transformation job
    Resume {
        job_id: String,

        /// Reject the pending user action instead of accepting it
        #[arg(long)]
        reject: bool,
    },
}

#[derive(clap::Subcommand)]
pub enum TestgenCommands {
    /// Show the status of a test generation job
    Status {
        job_id: String,

        /// Job group the job was started in
        #[arg(long)]
        group: String,
    },
}

#[derive(clap::Subcommand)]
pub enum FixCommands {
    /// Show the status and suggested fix of a code fix job
    Status { job_id: String },
}

#[derive(Clone, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let output = self.output;
        match self.command {
            Some(Commands::Config { command }) => commands::config::run(command),
            Some(Commands::Auth { command }) => commands::auth::run(command).await,
            Some(Commands::Complete {
                file,
                language,
                max_results,
            }) => {
                commands::complete::run(commands::complete::CompleteArgs {
                    file,
                    language,
                    max_results,
                    output,
                })
                .await
            }
            Some(Commands::Customizations) => commands::customizations::run(output).await,
            Some(Commands::Scan { command }) => commands::scan::run(command, output).await,
            Some(Commands::Transform { command }) => {
                commands::transform::run(command, output).await
            }
            Some(Commands::Testgen { command }) => commands::testgen::run(command).await,
            Some(Commands::Fix { command }) => commands::fix::run(command).await,
            Some(Commands::Completion { shell }) => {
                commands::completion::generate_completions(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::banner::print_banner_with_version();
                Ok(())
            }
            None => {
                // Show help when no subcommand is given
                use clap::CommandFactory;
                let mut cmd = Self::command();
                cmd.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
