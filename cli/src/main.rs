pub mod cli;
pub mod command_scorer;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Command};
use command_scorer::CommandScorer;
use common::logger::init_logger;
use lpscope::trend::series;
use lpscope::{AppConfig, LpScope};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Found → JSON; missing → error message and exit status 1.
fn print_found<T: Serialize>(value: Option<T>, missing: &str) -> anyhow::Result<()> {
    match value {
        Some(v) => print_json(&v),
        None => {
            eprintln!("{missing}");
            std::process::exit(1);
        }
    }
}

async fn serve(scope: LpScope, cfg: &AppConfig) -> anyhow::Result<()> {
    let cache = Arc::clone(scope.pool_cache());
    cache.start_background_refresh(cfg.refresh_interval);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    cache.stop_background_refresh();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::from_env().context("load configuration")?;
    init_logger("lpscope", cfg.production);

    // Fail fast: no scorer, no service.
    let scorer = CommandScorer::locate(cfg.scorer_cmd.as_deref())?;
    let scope = LpScope::builder(cfg.clone())
        .scorer(Arc::new(scorer))
        .build()?;

    match cli.command {
        Command::Serve => serve(scope, &cfg).await,
        Command::Pools => print_json(&scope.list_all()),
        Command::Pair { asset_a, asset_b } => print_found(
            scope.get_by_pair(&asset_a, &asset_b),
            "No pool found for pair",
        ),
        Command::Pool { pool_id } => print_found(scope.get_pool(&pool_id), "Pool not found"),
        Command::Trend { pool_id, metric } => {
            let trend = scope.get_trend(&pool_id);
            match metric {
                Some(m) => print_json(&series(&trend, m)),
                None => print_json(&trend),
            }
        }
        Command::Issuer { issuer } => {
            print_found(scope.issuer_summary(&issuer), "Issuer not found")
        }
        Command::Alerts => print_json(&scope.alerts()),
    }
}
