//! Aia configuration check - load the bot's access configuration and print it.
//!
//! Runs the same bootstrap the bot performs at startup (env export, whitelist
//! and user profile load) and prints the summaries the admin commands show.

use aia::{Command, ConfigurationUnit, PartOutcome, UnitSettings};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the configuration check.
#[derive(Parser, Debug)]
#[command(name = "aia-config")]
#[command(about = "Load and print the Aia bot access configuration")]
#[command(version)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = "aia.toml", env = "AIA_CONFIG")]
    config: PathBuf,

    /// Known command keyword; repeat for each. Without any, keywords are not validated
    #[arg(long = "command", value_name = "KEYWORD")]
    commands: Vec<String>,

    /// Do not export the env file
    #[arg(long)]
    skip_env: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(config_file = ?args.config, "Loading settings");
    let settings = UnitSettings::from_file(&args.config)?;

    let registry: Vec<Command> = args
        .commands
        .iter()
        .map(|keyword| Command::new(keyword.as_str(), true))
        .collect();

    let (unit, outcome) = if args.skip_env {
        let unit = ConfigurationUnit::new(settings);
        let outcome = unit.reload(&registry);
        (unit, outcome)
    } else {
        ConfigurationUnit::bootstrap(settings, &registry)
    };
    report("whitelist", outcome.whitelist());
    report("profiles", outcome.profiles());

    println!("{}", unit.describe_configuration());
    println!();
    println!("{}", unit.describe_whitelist());

    let snapshot = unit.snapshot();
    let mut profiles: Vec<_> = snapshot.profiles().values().collect();
    profiles.sort_by(|a, b| a.user_id().cmp(b.user_id()));
    for profile in profiles {
        let keywords: Vec<&str> = profile
            .active_commands()
            .iter()
            .map(|keyword| keyword.as_str())
            .collect();
        println!("{}: {}", profile.user_id(), keywords.join(", "));
    }

    Ok(())
}

fn report(part: &str, outcome: &PartOutcome) {
    match outcome {
        PartOutcome::Replaced { count } => info!(part, count, "Loaded"),
        PartOutcome::Retained { reason } => warn!(part, error = %reason.kind, "Not loaded"),
        PartOutcome::Disabled => info!(part, "Disabled"),
    }
}
