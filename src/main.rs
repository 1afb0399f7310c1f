use analytics::DashboardOptions;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::settings::Config;
use configuration::{LoggingSettings, OutputFormat};
use core_types::{FilterCriteria, Selection};
use dataset::DatasetCache;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the Salesboard application.
fn main() -> Result<()> {
    // Load SALESBOARD__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Filters(args) => handle_filters(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// KPIs and chart-ready aggregates for a SaaS sales export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "salesboard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the dashboard for a filter state and print it.
    Report(ReportArgs),
    /// List the available filter options (date span, regions, industries).
    Filters(FiltersArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// The sales CSV to read (overrides `dataset.path`).
    #[arg(long)]
    data: Option<PathBuf>,

    /// First order date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last order date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Restrict to a region. Repeat for several; omit for all.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Restrict to an industry. Repeat for several; omit for all.
    #[arg(long = "industry")]
    industries: Vec<String>,

    /// Number of products in the ranking and default trend.
    #[arg(long)]
    top_n: Option<usize>,

    /// Number of countries in the country x segment breakdown.
    #[arg(long)]
    top_k: Option<usize>,

    /// Track these products in the monthly trend instead of the top N.
    #[arg(long = "product")]
    products: Vec<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Parser)]
struct FiltersArgs {
    /// The sales CSV to read (overrides `dataset.path`).
    #[arg(long)]
    data: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let cache = dataset_cache(args.data.clone(), config);
    let dataset = cache.get().context("Failed to load the sales dataset")?;

    let criteria = build_criteria(&args, config, dataset.default_criteria());
    let options = DashboardOptions {
        top_n: args.top_n.unwrap_or(config.analysis.top_n).max(1),
        top_k: args.top_k.unwrap_or(config.analysis.top_k).max(1),
        trend_products: if args.products.is_empty() {
            config.analysis.trend_products.clone()
        } else {
            Some(args.products.clone())
        },
    };

    tracing::info!(
        rows = dataset.len(),
        start = ?criteria.start_date,
        end = ?criteria.end_date,
        "Computing dashboard"
    );
    let snapshot = analytics::compute(dataset.transactions(), &criteria, &options);

    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Table => print!("{}", render::render_snapshot(&snapshot)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}

fn handle_filters(args: FiltersArgs, config: &Config) -> Result<()> {
    let cache = dataset_cache(args.data, config);
    let dataset = cache.get().context("Failed to load the sales dataset")?;
    print!("{}", render::render_filter_options(&dataset));
    Ok(())
}

fn dataset_cache(data: Option<PathBuf>, config: &Config) -> DatasetCache {
    let path = data.unwrap_or_else(|| config.dataset.path.clone());
    tracing::debug!(path = %path.display(), "Using dataset");
    DatasetCache::from_path(path)
}

/// Layers command-line filters over the configured ones. Unset date bounds
/// fall back to the dataset's full span, like the dashboard's initial state.
fn build_criteria(args: &ReportArgs, config: &Config, span: FilterCriteria) -> FilterCriteria {
    let configured = config.filters.to_criteria();

    let start = args.from.or(configured.start_date).or(span.start_date);
    let end = args.to.or(configured.end_date).or(span.end_date);

    let regions = if args.regions.is_empty() {
        configured.regions
    } else {
        Selection::from_values(args.regions.iter().cloned())
    };
    let industries = if args.industries.is_empty() {
        configured.industries
    } else {
        Selection::from_values(args.industries.iter().cloned())
    };

    FilterCriteria::unrestricted()
        .with_date_range(start, end)
        .with_regions(regions)
        .with_industries(industries)
}

/// Installs the global subscriber: stderr by default, a daily rolling file
/// when `logging.directory` is configured.
fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .context("Invalid logging.level directive")?;

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}
