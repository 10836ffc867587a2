//! Settings commands
//!
//! `init` writes the user's content-sharing and telemetry choices, plus a
//! generated client id, to the settings file.

use anyhow::{Context, Result};
use colored::Colorize;
use cwhisper_core::config::Settings;
use cwhisper_core::endpoint::ServiceConfig;
use inquire::Confirm;

use crate::cli::ConfigCommands;

pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(),
        ConfigCommands::Path => {
            println!("{}", Settings::path()?.display());
            Ok(())
        }
        ConfigCommands::Init {
            opt_out,
            no_telemetry,
            yes,
        } => init(opt_out, no_telemetry, yes),
    }
}

fn show() -> Result<()> {
    let settings = Settings::load_or_default()?;
    let service = ServiceConfig::resolve(&settings);
    let ide = settings.ide();

    println!("{} {}", "Settings file:".bold(), Settings::path()?.display());
    println!("  {} {}", "Content sharing:".bold(), sharing_label(settings.opt_out));
    println!(
        "  {} {}",
        "Telemetry:".bold(),
        if settings.telemetry_enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        }
    );
    println!(
        "  {} {}",
        "Client ID:".bold(),
        settings.client_id.as_deref().unwrap_or("(not set)").dimmed()
    );
    println!("  {} {} {}", "IDE:".bold(), ide.category, ide.version.dimmed());
    println!("  {} {}", "Region:".bold(), service.region);
    println!("  {} {}", "Endpoint:".bold(), service.endpoint);
    Ok(())
}

fn init(opt_out: bool, no_telemetry: bool, yes: bool) -> Result<()> {
    let mut settings = Settings::load_or_default()?;

    let (opt_out, telemetry) = if yes {
        (opt_out, !no_telemetry)
    } else {
        let share = Confirm::new("Share your content with the service to help improve it?")
            .with_default(!opt_out)
            .prompt()
            .context("prompt cancelled")?;
        let telemetry = Confirm::new("Send usage telemetry?")
            .with_default(!no_telemetry)
            .prompt()
            .context("prompt cancelled")?;
        (!share, telemetry)
    };

    settings.opt_out = opt_out;
    settings.telemetry_enabled = telemetry;
    let (client_id, generated) = settings.ensure_client_id();
    let path = settings.save()?;

    println!("{} {}", "Saved settings to".green(), path.display());
    println!("  {} {}", "Content sharing:".bold(), sharing_label(opt_out));
    if generated {
        println!("  {} {}", "New client ID:".bold(), client_id.dimmed());
    }
    Ok(())
}

fn sharing_label(opt_out: bool) -> colored::ColoredString {
    if opt_out {
        "opted out".yellow()
    } else {
        "opted in".green()
    }
}
