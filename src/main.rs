//! Attendance Report - builds the attendance control spreadsheet for payroll review.

use std::path::{Path, PathBuf};

use attendance_report as app;
use clap::{Parser, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::report::format::sheet_title;
use app::source::{self, BatchClient, ReportRequest};

/// Build the attendance control report from an employee batch.
#[derive(Parser)]
#[command(name = "attendance-report", version)]
struct Cli {
    /// Request or batch JSON file (fetched from the configured upstream service when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// First report day, YYYY-MM-DD
    #[arg(long)]
    start: Option<String>,

    /// Last report day, YYYY-MM-DD
    #[arg(long)]
    end: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, load_note) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, "Config loaded successfully"),
        ConfigLoadResult::Missing => (AppConfig::default(), "Config missing, using defaults"),
        ConfigLoadResult::Invalid(e) => {
            let err = anyhow::Error::new(app::AppError::from(e));
            return Err(err.context(format!("Invalid config {}", config_path.display())));
        }
    };

    // Initialize logging
    let _guard = init_logging(&config.logging);
    tracing::info!("Attendance report starting...");
    tracing::info!("Config path: {:?} ({load_note})", config_path);

    let outcome = if cli.init_config {
        config.save(&config_path).map(|()| config_path.clone()).map_err(app::AppError::from)
    } else {
        run(&cli, &config).await
    };

    match outcome {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Report failed (status {}): {e}", e.status_code());
            Err(e.into())
        }
    }
}

/// Load input, build the grid and write the output file.
async fn run(cli: &Cli, config: &AppConfig) -> app::Result<PathBuf> {
    let requested = app::report::DateRange::from_request(cli.start.as_deref(), cli.end.as_deref());

    let value = match &cli.input {
        Some(path) => source::load_file(path)?,
        None if config.source.has_upstream() => {
            let client = BatchClient::new(&config.source.url, config.source.timeout_secs)?;
            source::fetch_with_fallback(&client, requested.as_ref(), &config.source.fallback_file).await?
        }
        None => {
            tracing::info!("No input or upstream configured, using {}", config.source.fallback_file.display());
            source::load_file(&config.source.fallback_file)?
        }
    };

    let request = ReportRequest::from_value(value)?.with_range(cli.start.clone(), cli.end.clone());
    let employees = source::parse_batch(&request.employees)?;
    let range = request.range();

    let grid = config.report.grid_builder().build(&employees, range.as_ref())?;

    let title = config
        .report
        .sheet_title
        .clone()
        .unwrap_or_else(|| sheet_title(&grid.days));
    let file_name = request.file_name(&config.report.default_file_name);

    std::fs::create_dir_all(&cli.output)?;
    match cli.format {
        OutputFormat::Xlsx => {
            let path = cli.output.join(file_name);
            app::export::export_report_to_excel(&grid, &config.export, &title, &path)?;
            Ok(path)
        }
        OutputFormat::Json => {
            let path = cli.output.join(Path::new(&file_name).with_extension("json"));
            std::fs::write(&path, serde_json::to_vec_pretty(&grid)?)?;
            tracing::info!("Grid written to {}", path.display());
            Ok(path)
        }
    }
}

/// Console logging, plus a daily rolling file when a log directory is configured.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "attendance-report.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
