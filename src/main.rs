use analytics::{AnalyticsEngine, StatisticsReport};
use anyhow::{Context, bail};
use api_client::{MarketDataProvider, YahooClient};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use core_types::{MarketDataPoint, Trade};
use database::{HistoryEntry, HistoryRepository};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

mod display;

/// The main entry point for the Candleview trade analysis application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    let _log_guard = web_server::telemetry::init(&config.logging);

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config).await,
        Commands::History(command) => handle_history(command, &config).await,
        Commands::Serve(args) => {
            let mut config = config;
            if let Some(port) = args.port {
                config.server.port = port;
            }
            web_server::run_server(config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance statistics for a trader's closed trades, measured against the market.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML configuration file [default: candleview.toml].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a trade file against daily market data.
    Analyze(AnalyzeArgs),
    /// Browse or remove saved analyses.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// JSON trade file: a list of trades or an object with a "trades" list.
    #[arg(long)]
    trades: PathBuf,

    /// JSON market data file. When omitted, data is downloaded for --symbol.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    market: Option<PathBuf>,

    /// The symbol to analyze against (e.g., "AAPL").
    #[arg(long)]
    symbol: Option<String>,

    /// The start date of the market data (format: YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// The end date of the market data, exclusive (format: YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Initial capital [default: analysis.default_capital].
    #[arg(long)]
    capital: Option<Decimal>,

    /// Do not save the analysis to history.
    #[arg(long)]
    no_save: bool,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List saved analyses, newest first.
    List,
    /// Show a saved analysis with its trades.
    Show { id: Uuid },
    /// Delete a saved analysis.
    Delete { id: Uuid },
}

#[derive(Args)]
struct ServeArgs {
    /// Port to listen on [default: server.port].
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of a single analysis.
async fn handle_analyze(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let symbol = args
        .symbol
        .clone()
        .unwrap_or_else(|| config.analysis.default_symbol.clone());
    let capital = args.capital.unwrap_or(config.analysis.default_capital);

    let trades = ingest::parse_trade_file(&read_file(&args.trades)?)
        .with_context(|| format!("Failed to read trades from {}", args.trades.display()))?;

    let (market, range) = match (&args.market, args.from, args.to) {
        (Some(path), _, _) => {
            let market = ingest::parse_market_data(&read_file(path)?)
                .with_context(|| format!("Failed to read market data from {}", path.display()))?;
            let range = market_span(&market)?;
            (market, range)
        }
        (None, Some(from), Some(to)) => {
            let market = fetch_with_spinner(config, &symbol, from, to).await?;
            (market, Some((from, to)))
        }
        _ => bail!("Either --market or both --from and --to are required"),
    };

    let engine = AnalyticsEngine::new();
    let report = engine.calculate(&market, &trades, capital)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} | {} trades | capital {}", symbol, trades.len(), capital);
        println!("{}", display::report_table(&report));
    }

    if args.no_save {
        return Ok(());
    }
    match range {
        Some((start, end)) => save_to_history(config, &symbol, start, end, capital, &report, &trades).await,
        None => {
            tracing::warn!("Market data is empty; the analysis was not saved.");
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// The first and last day of a market series read from a file.
fn market_span(market: &[MarketDataPoint]) -> anyhow::Result<Option<(NaiveDate, NaiveDate)>> {
    let (Some(first), Some(last)) = (market.first(), market.last()) else {
        return Ok(None);
    };
    Ok(Some((first.time.normalize()?, last.time.normalize()?)))
}

async fn fetch_with_spinner(
    config: &Config,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<MarketDataPoint>> {
    let client = YahooClient::new(&config.market_data)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Downloading {} from {} to {}...", symbol, from, to));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.fetch_daily(symbol, from, to).await;
    spinner.finish_and_clear();

    Ok(result?)
}

async fn save_to_history(
    config: &Config,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    capital: Decimal,
    report: &StatisticsReport,
    trades: &[Trade],
) -> anyhow::Result<()> {
    let repo = open_history(config).await?;
    let entry = HistoryEntry::from_report(symbol, start, end, capital, report);
    repo.save_analysis(&entry, trades).await?;
    eprintln!("Saved to history as {}", entry.id);
    Ok(())
}

// ==============================================================================
// History Command Logic
// ==============================================================================

async fn handle_history(command: HistoryCommand, config: &Config) -> anyhow::Result<()> {
    let repo = open_history(config).await?;

    match command {
        HistoryCommand::List => {
            let entries = repo.list_analyses().await?;
            if entries.is_empty() {
                println!("(no saved analyses)");
            } else {
                println!("{}", display::history_table(&entries));
            }
        }
        HistoryCommand::Show { id } => {
            let entry = repo.get_analysis(id).await?;
            let trades = repo.get_trades(id).await?;
            println!("{}", display::history_table(std::slice::from_ref(&entry)));
            println!("{}", display::trades_table(&trades));
        }
        HistoryCommand::Delete { id } => {
            repo.delete_analysis(id).await?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

async fn open_history(config: &Config) -> anyhow::Result<HistoryRepository> {
    let pool = database::connect(&config.history.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.history.database_url))?;
    database::run_migrations(&pool).await?;
    Ok(HistoryRepository::new(pool, config.history.limit))
}
