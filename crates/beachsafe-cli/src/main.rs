//! BeachSafe
//!
//! Predicts Green/Yellow/Red swimming safety for Goa beaches from weather,
//! crowd, tide, and hazard conditions using a trained decision forest.

use anyhow::Result;
use beachsafe_cli::commands::{self, PredictRequest};
use beachsafe_cli::{AppConfig, Cli, Commands};
use beachsafe_classifiers::crowd::estimate_crowd;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };
    beachsafe_telemetry::metrics::describe_metrics();

    let config = AppConfig::load(&cli.config, &cli)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Train {
            dataset,
            trees,
            seed,
        } => {
            let report = commands::train(&config, dataset, trees, seed)?;
            commands::print_training_report(&report, &config);
        }

        Commands::Predict {
            beach,
            weather,
            crowd,
            tide,
            hazard,
            no_log,
            json,
        } => {
            let predictor = commands::load_predictor(&config)?;
            let request = PredictRequest {
                beach,
                weather,
                crowd,
                tide,
                hazard,
                at: commands::now(),
                log: !no_log,
            };
            let outcome = commands::predict(&config, &predictor, request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                commands::print_prediction(&outcome);
            }
        }

        Commands::Map {
            weather,
            tide,
            json,
        } => {
            let predictor = commands::load_predictor(&config)?;
            let statuses = commands::map(&config, &predictor, weather, tide).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                commands::print_map(&statuses);
            }
        }

        Commands::Crowd { beach, at } => {
            let estimate = estimate_crowd(&beach, at.unwrap_or_else(commands::now));
            commands::print_crowd(&estimate);
        }

        Commands::Trends { days } => {
            let today = commands::now().date();
            let trends = commands::trends(&config, today, days)?;
            commands::print_trends(&trends);
        }

        Commands::Vocab => {
            let predictor = commands::load_predictor(&config)?;
            commands::print_vocab(&predictor);
        }
    }

    if let Some(handle) = metrics_handle {
        println!();
        print!("{}", handle.render());
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("beachsafe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beachsafe=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Install the Prometheus recorder and return a handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    info!("Metrics recorder installed");
    Ok(handle)
}
