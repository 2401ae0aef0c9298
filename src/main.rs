use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use purchase_pulse::config::{Config, ConfigOverrides};
use purchase_pulse::constants::DEFAULT_CONFIG_PATH;
use purchase_pulse::model::FeatureVector;
use purchase_pulse::state::AppState;
use purchase_pulse::{logging, server};

#[derive(Parser)]
#[command(name = "purchase_pulse")]
#[command(about = "Customer purchase prediction API")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Model artifact (JSON) to load
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Dataset CSV holding the evaluation rows
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Number of leading dataset rows used for evaluation
    #[arg(long, global = true)]
    eval_rows: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Prometheus exporter address, e.g. 127.0.0.1:9464
        #[arg(long)]
        metrics_addr: Option<String>,

        /// Directory for rolling JSON log files
        #[arg(long, default_value = "logs")]
        log_dir: String,
    },
    /// Print confusion-matrix counts on the evaluation slice
    Evaluate,
    /// Print features ranked by absolute coefficient
    Importance,
    /// Classify a single customer
    Predict {
        /// Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed[,interaction]
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        features: Vec<f64>,
    },
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut overrides = ConfigOverrides {
        model_path: cli.model.clone(),
        dataset_path: cli.dataset.clone(),
        eval_rows: cli.eval_rows,
        ..Default::default()
    };
    if let Commands::Serve {
        host,
        port,
        metrics_addr,
        ..
    } = &cli.command
    {
        overrides.host = host.clone();
        overrides.port = *port;
        overrides.metrics_addr = metrics_addr.clone();
    }

    Ok(Config::layered(
        &cli.config,
        |key| std::env::var(key).ok(),
        &overrides,
    )?)
}

fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: Config) -> Result<()> {
    if let Some(addr) = &config.metrics.addr {
        let addr = addr
            .parse::<std::net::SocketAddr>()
            .context("invalid metrics address")?;
        purchase_pulse::metrics::init_metrics(addr)?;
    }

    let state = AppState::load(&config).map_err(|e| {
        error!("Failed to load model resources: {}", e);
        e
    })?;
    let addr = config.bind_addr()?;

    server::start_server(Arc::new(state), addr).await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let _guard = match &cli.command {
        Commands::Serve { log_dir, .. } => Some(logging::init_logging(log_dir)),
        _ => {
            init_cli_logging();
            None
        }
    };

    let config = build_config(&cli).context("invalid configuration")?;

    match cli.command {
        Commands::Serve { .. } => {
            info!("Starting purchase_pulse v{}", env!("CARGO_PKG_VERSION"));
            serve(config).await?;
        }
        Commands::Evaluate => {
            let state = AppState::load(&config)?;
            println!("{}", serde_json::to_string_pretty(&state.performance)?);
        }
        Commands::Importance => {
            let state = AppState::load(&config)?;
            println!("{}", serde_json::to_string_pretty(&state.importance)?);
        }
        Commands::Predict { features } => {
            let model = purchase_pulse::LogisticModel::load(&config.model.path)?;
            let features = FeatureVector::from_values(&features)?;
            let output = serde_json::json!({
                "prediction": model.predict(&features),
                "probability": model.predict_proba(&features),
            });
            println!("{}", output);
        }
    }

    Ok(())
}
