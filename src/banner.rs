//! Startup banner. Cosmetic only.

use colored::Colorize;

const BANNER: &str = r#"
╔══════════════════════════════════════════════╗
║   route53-ddns - Route 53 public IP sync     ║
╚══════════════════════════════════════════════╝"#;

/// Print the banner to stdout.
pub fn print() {
    println!("{}", BANNER.bright_cyan().bold());
}
