mod benchmark;
mod common;
mod config;
mod datatypes;
mod lab;
mod store;

use crate::config::Config;
use crate::lab::LabClient;
use clap::{Arg, Command, value_parser};
use console::style;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("tvb-store")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Initializes the TVB datatype store and benchmarks simulations through the lab")
        .subcommand(Command::new("init").about("Apply pending schema migrations (default)"))
        .subcommand(Command::new("reset").about("Roll back every applied migration"))
        .subcommand(Command::new("status").about("List migrations and whether they are applied"))
        .subcommand(
            Command::new("refresh-flags")
                .about("Recompute the mapping flags of one stored time series")
                .arg(
                    Arg::new("id")
                        .value_name("TIME_SERIES_ID")
                        .required(true)
                        .value_parser(value_parser!(i32)),
                ),
        )
        .subcommand(
            Command::new("benchmark")
                .about("Run the standard simulations through the lab and print their timings")
                .arg(
                    Arg::new("lab-url")
                        .long("lab-url")
                        .value_name("URL")
                        .help("Lab API base URL, overrides LAB_URL"),
                )
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory holding connectivity/connectivity_*.zip, overrides TVB_DATA_DIR"),
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = cli().get_matches();
    let mut config = Config::from_env()?;
    tracing::info!(
        "Starting {} ({} deployment)",
        config.app_name,
        config.deployment.to_uppercase()
    );

    match matches.subcommand() {
        Some(("reset", _)) => {
            let db = store::connect(&config).await?;
            store::reset(&db).await?;
            println!("{} Store reset", style("✅").green());
        }
        Some(("status", _)) => {
            let db = store::connect(&config).await?;
            for migration in store::status(&db).await? {
                let state = if migration.applied {
                    style("applied").green()
                } else {
                    style("pending").yellow()
                };
                println!("{state:>8}  {}", migration.name);
            }
        }
        Some(("refresh-flags", sub)) => {
            let id = *sub
                .get_one::<i32>("id")
                .ok_or_else(|| anyhow::anyhow!("missing time series id"))?;
            let db = store::connect(&config).await?;
            let flags = datatypes::time_series::refresh_mapping_flags(&db, id).await?;
            println!(
                "Time series {id}: surface mapping {}, volume mapping {}",
                flags.has_surface_mapping, flags.has_volume_mapping
            );
        }
        Some(("benchmark", sub)) => {
            if let Some(url) = sub.get_one::<String>("lab-url") {
                config.lab_url.clone_from(url);
            }
            if let Some(dir) = sub.get_one::<PathBuf>("data-dir") {
                config.data_dir.clone_from(dir);
            }
            run_benchmark(&config).await?;
        }
        _ => {
            let db = store::connect(&config).await?;
            let applied = store::initialize(&db).await?;
            println!(
                "{} Store initialized ({applied} migration(s) applied)",
                style("✅").green()
            );
        }
    }

    Ok(())
}

async fn run_benchmark(config: &Config) -> anyhow::Result<()> {
    let lab = LabClient::new(&config.lab_url)?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling benchmark");
            trigger.cancel();
        }
    });

    println!("{}", style(format!("Benchmarking against {}", config.lab_url)).bold());
    println!("{}", style("━".repeat(40)).dim());

    if let Err(e) = benchmark::run_default_suites(
        &lab,
        &config.data_dir,
        config.poll_interval(),
        &cancel,
    )
    .await
    {
        tracing::error!(database = e.is_database(), "Benchmark aborted: {e}");
        return Err(e.into());
    }
    Ok(())
}
