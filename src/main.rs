//! route53-ddns - keep a Route 53 A record pointed at this machine.

use clap::{Parser, Subcommand};
use route53_ddns::banner;
use route53_ddns::config::Config;
use route53_ddns::resolver::IpResolver;
use route53_ddns::route53::{Route53Api, Route53Client};
use route53_ddns::sync;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "route53-ddns")]
#[command(about = "Keeps a Route 53 A record pointed at the machine's current public IP")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass (the default)
    Sync,

    /// Show the resolved public IP and the published record, without writing
    Status,

    /// Validate the config file and zone reachability
    Validate,
}

fn get_config_path(cli_path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }

    let default = Config::default_path()?;
    if default.exists() {
        return Ok(default);
    }

    // Fall back to <program>.conf in the working directory.
    let name = default
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("route53-ddns.conf"));
    if name.exists() {
        return Ok(name);
    }

    Ok(default)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    banner::print();

    let cli = Cli::parse();

    let result = match get_config_path(cli.config) {
        Ok(config_path) => match cli.command.unwrap_or(Commands::Sync) {
            Commands::Sync => cmd_sync(&config_path).await,
            Commands::Status => cmd_status(&config_path).await,
            Commands::Validate => cmd_validate(&config_path).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "exiting");
        std::process::exit(1);
    }
}

async fn cmd_sync(config_path: &Path) -> anyhow::Result<()> {
    let resolver = IpResolver::new();
    let report = sync::run(&resolver, config_path, Route53Client::from_config).await?;

    info!(fqdn = %report.fqdn, outcome = ?report.outcome, "sync complete");
    Ok(())
}

async fn cmd_status(config_path: &Path) -> anyhow::Result<()> {
    let resolver = IpResolver::new();
    let resolved_ip = resolver.resolve().await?;
    println!("Current public IP: {}", resolved_ip);

    let config = Config::load_from(config_path)?;
    let client = Route53Client::from_config(&config);
    let (zone_id, current) = sync::find_zone_and_record(&client, &config.fqdn).await?;

    println!("Published record:  {} -> {} ({})", config.fqdn, current, zone_id);
    if resolved_ip == current {
        println!("In sync.");
    } else {
        println!("Out of sync; `route53-ddns sync` would update the record.");
    }

    Ok(())
}

async fn cmd_validate(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load_from(config_path)?;
    println!("Config OK: {}", config_path.display());

    let client = Route53Client::from_config(&config);
    let zones = client.list_hosted_zones().await?;
    let qualified = format!("{}.", config.fqdn);

    if zones.iter().any(|zone| zone.name == qualified) {
        println!("Hosted zone for {} reachable.", config.fqdn);
        Ok(())
    } else {
        Err(route53_ddns::DdnsError::ZoneNotFound(config.fqdn).into())
    }
}
