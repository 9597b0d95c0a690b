use anyhow::Result;
use charge_planner::config::Config;
use charge_planner::logging::init_logging;
use charge_planner::service::{PlannerService, preview_plans};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

/// Publishes the next scheduled charge plan whenever a vehicle connects
#[derive(Debug, Parser)]
#[command(name = "charge-planner", version = env!("APP_VERSION"), about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "CHARGE_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration, print each vehicle's next plan and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Error reading configuration file: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    init_logging(&config.effective_logging())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if cli.check {
        return check(&config);
    }

    info!("Charge Planner {} starting up", env!("APP_VERSION"));

    let (service, eventloop) = PlannerService::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to create service: {}", e))?;

    match service.run(eventloop).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Service failed with error: {}", e);
            Err(anyhow::anyhow!("Service error: {}", e))
        }
    }
}

/// Dry run: resolve every vehicle's schedule against the current time
fn check(config: &Config) -> Result<()> {
    println!("zone: {}", config.schedule_zone()?);
    for line in preview_plans(config, &Utc::now())? {
        println!("{}", line);
    }
    Ok(())
}
