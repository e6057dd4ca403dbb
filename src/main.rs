//! Astrobot - conversational natal chart assistant
//!
//! CLI entry point: the interactive conversation, one-shot chart
//! computation, and description store seeding.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use astrobot::chart::ChartCalculator;
use astrobot::cli::{Cli, Command, get_log_path};
use astrobot::config::Config;
use astrobot::conversation::{ConversationEngine, ConversationHandle};
use astrobot::descriptions::{SeedEntry, SqliteDescriptions};
use astrobot::ephemeris::MeanEphemeris;
use astrobot::geo::{FinderTimezoneLookup, GeoResolver, NominatimGeocoder};
use astrobot::repl::ReplSession;
use astrobot::session::SessionStore;
use astrobot::validation::{validate_date, validate_time};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Write to a log file, not stdout: the terminal belongs to the conversation
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Astrobot loaded config: geocoder={}, year-cutoff={}",
        config.geocoder.base_url, config.chart.year_cutoff
    );

    match cli.command {
        None | Some(Command::Repl) => cmd_repl(&config).await,
        Some(Command::Chart { date, time, place }) => cmd_chart(&config, &date, &time, &place).await,
        Some(Command::Seed { file }) => cmd_seed(&config, &file),
    }
}

/// Open the description store, creating its directory if needed
fn open_descriptions(config: &Config) -> Result<SqliteDescriptions> {
    if let Some(parent) = config.descriptions.database.parent() {
        fs::create_dir_all(parent).context("Failed to create description store directory")?;
    }
    SqliteDescriptions::open(&config.descriptions.database).context("Failed to open description store")
}

/// Wire the collaborators into a geo resolver and chart calculator
fn build_calculator(config: &Config) -> Result<(Arc<GeoResolver>, Arc<ChartCalculator>)> {
    let geocoder = NominatimGeocoder::from_config(&config.geocoder).context("Failed to build geocoder")?;
    let geo = Arc::new(GeoResolver::new(Arc::new(geocoder), Arc::new(FinderTimezoneLookup::new())));

    let descriptions = open_descriptions(config)?;
    let calculator = Arc::new(ChartCalculator::new(
        Box::new(MeanEphemeris::new()),
        Arc::new(descriptions),
        Arc::clone(&geo),
        config.chart.observer_altitude_m,
    ));

    Ok((geo, calculator))
}

/// Run the interactive conversation
async fn cmd_repl(config: &Config) -> Result<()> {
    let (geo, calculator) = build_calculator(config)?;
    let engine = ConversationEngine::new(SessionStore::new(), geo, calculator, config.chart.year_cutoff);
    let conversation = ConversationHandle::spawn(engine);

    let mut repl = ReplSession::new(conversation.clone());
    let result = repl.run().await;

    conversation.shutdown().await?;
    result
}

/// Compute and print one chart without the conversation
async fn cmd_chart(config: &Config, date: &str, time: &str, place: &str) -> Result<()> {
    let date = validate_date(date, config.chart.year_cutoff).map_err(|e| eyre::eyre!(e.to_string()))?;
    let time = validate_time(time).map_err(|e| eyre::eyre!(e.to_string()))?;

    let (geo, calculator) = build_calculator(config)?;
    let coords = geo
        .resolve_coordinates(place)
        .await
        .context(format!("Failed to resolve {:?}", place))?;

    let chart = calculator
        .compute(date, time, coords)
        .context("Failed to compute chart")?;

    println!("{}", format!("Natal chart for {}", place).bright_cyan().bold());
    println!(
        "Coordinates: {:.4}, {:.4}",
        coords.latitude, coords.longitude
    );
    println!();

    for position in chart.positions() {
        println!(
            "{}: {:.2}\u{b0} in {}",
            position.body.to_string().yellow(),
            position.degree,
            position.sign
        );
        println!("  {}", position.description.dimmed());
    }

    let ascendant = chart.ascendant();
    println!(
        "{}: {:.2}\u{b0} in {}",
        "Ascendant".yellow(),
        ascendant.degree,
        ascendant.sign
    );
    println!("  {}", ascendant.description.dimmed());

    Ok(())
}

/// Import description texts into the store
fn cmd_seed(config: &Config, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let entries: Vec<SeedEntry> = serde_yaml::from_str(&content).context("Failed to parse seed file")?;

    let store = open_descriptions(config)?;
    let imported = store.import(&entries).context("Failed to import descriptions")?;

    println!("Imported {} descriptions into {}", imported, config.descriptions.database.display());
    Ok(())
}
