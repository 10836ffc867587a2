//! ASCII art banner for cwhisper CLI

use colored::Colorize;

const LOGO: &str = r#"
                 _     _
  _____      __ | |__ (_)___ _ __   ___ _ __
 / __\ \ /\ / / | '_ \| / __| '_ \ / _ \ '__|
| (__ \ V  V /  | | | | \__ \ |_) |  __/ |
 \___| \_/\_/   |_| |_|_|___/ .__/ \___|_|
                            |_|"#;

pub fn print_banner() {
    for line in LOGO.lines() {
        println!("{}", line.bold());
    }
}

/// Print the banner with version info
pub fn print_banner_with_version() {
    print_banner();
    println!(
        " {} {}",
        "Completions, scans and transformations from the terminal".dimmed(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
    );
    println!();
}
