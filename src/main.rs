use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use core_kpi::config::Config;
use core_kpi::ingest::run_ingest;
use core_kpi::logging;
use core_kpi::metrics;
use core_kpi::server;
use core_kpi::synth::{write_sample_logs, SamplePlan};
use core_kpi::{KpiService, KpiStore};

#[derive(Parser)]
#[command(name = "core-kpi")]
#[command(about = "5G core AMF/SMF log KPI pipeline")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse AMF and SMF logs and append their KPIs to the store
    Ingest {
        #[arg(long)]
        amf_log: Option<PathBuf>,
        #[arg(long)]
        smf_log: Option<PathBuf>,
    },
    /// Serve the KPI read API over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print one read API payload as JSON
    Report {
        #[arg(value_enum)]
        view: View,
    },
    /// Write synthetic AMF and SMF logs
    Generate {
        #[arg(long, default_value = "logs")]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 5)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Summary,
    Mobility,
    Session,
    Slices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let _log_guard = logging::init_logging(&config.log_dir);
    metrics::init_metrics(config.metrics_addr);

    match cli.command {
        Commands::Ingest { amf_log, smf_log } => {
            let amf_log = amf_log.unwrap_or_else(|| config.amf_log.clone());
            let smf_log = smf_log.unwrap_or_else(|| config.smf_log.clone());
            let db_path = config.db_path.clone();

            let report = tokio::task::spawn_blocking(move || {
                let store = KpiStore::open(&db_path)?;
                run_ingest(&store, &amf_log, &smf_log)
            })
            .await
            .context("ingest task panicked")??;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve { port } => {
            let store = KpiStore::open(&config.db_path)?;
            let port = port.unwrap_or(config.port);
            server::start_server(KpiService::new(store), port).await?;
        }
        Commands::Report { view } => {
            let service = KpiService::new(KpiStore::open(&config.db_path)?);
            let response = match view {
                View::Summary => service.summary_response(),
                View::Mobility => service.mobility_response(),
                View::Session => service.session_response(),
                View::Slices => service.slices_response(),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.is_error() {
                anyhow::bail!("report failed");
            }
        }
        Commands::Generate { out_dir, seed } => {
            let files = write_sample_logs(&out_dir, seed, &SamplePlan::default())?;
            info!(
                "Generated {} AMF lines -> {} and {} SMF lines -> {}",
                files.amf_lines,
                files.amf_log.display(),
                files.smf_lines,
                files.smf_log.display()
            );
        }
    }

    Ok(())
}
