use std::fs::File;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use overlap_engine::api::{AppState, UploadResponse, create_router};
use overlap_engine::calculation::compute_pairs;
use overlap_engine::cancellation::CancellationToken;
use overlap_engine::config::{ConfigLoader, LoggingConfig};
use overlap_engine::error::EngineError;
use overlap_engine::models::CalculationResult;
use overlap_engine::telemetry::{self, TelemetryError};

#[derive(Parser, Debug)]
#[command(
    name = "overlap-engine",
    about = "Find the employees who worked together the longest",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the calculation on a local CSV file
    Compute(ComputeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ComputeArgs {
    /// CSV file with EmpID, ProjectID, DateFrom, DateTo columns
    csv: PathBuf,
    /// Date used for missing end dates (YYYY-MM-DD); today when omitted
    #[arg(long, value_parser = parse_as_of)]
    as_of: Option<NaiveDate>,
    /// Print the JSON response body instead of a text ranking
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_as_of(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => serve(args).await,
        Command::Compute(args) => compute(args),
    }
}

async fn serve(mut args: ServeArgs) -> Result<(), AppError> {
    let mut loader = match args.config.take() {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::defaults(),
    };

    if let Some(host) = args.host.take() {
        loader.config_mut().server.host = host;
    }
    if let Some(port) = args.port.take() {
        loader.config_mut().server.port = port;
    }

    telemetry::init(loader.logging())?;

    let addr = loader.server().socket_addr()?;
    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "overlap engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn compute(args: ComputeArgs) -> Result<(), AppError> {
    telemetry::init(&LoggingConfig {
        level: "warn".to_string(),
    })?;

    let file = File::open(&args.csv).map_err(|source| AppError::Open {
        path: args.csv.display().to_string(),
        source,
    })?;
    let reference_date = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let result = compute_pairs(file, &CancellationToken::new(), reference_date)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&UploadResponse::from(&result))?
        );
    } else {
        print_ranking(&result);
    }
    Ok(())
}

fn print_ranking(result: &CalculationResult) {
    let response = UploadResponse::from(result);
    println!("{}", response.message);

    for (rank, pair) in response.all_pairs.iter().enumerate() {
        println!(
            "{:>3}. {} & {}: {} days",
            rank + 1,
            pair.employee_id_a,
            pair.employee_id_b,
            pair.total_days
        );
        for project in &pair.projects {
            println!(
                "       project {}: {} days ({} to {})",
                project.project_id, project.days_worked, project.start_date, project.end_date
            );
        }
    }
}
