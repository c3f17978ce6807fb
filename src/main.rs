use analytics::{AnalyticsEngine, DashboardSession, RankingSizes};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::settings::Config;
use configuration::OutputFormat;
use core_types::Dimension;
use exporter::{write_artifact, CsvExporter, InsightsPdf};
use ingest::DataSources;
use std::path::{Path, PathBuf};

mod render;
mod shell;

/// The main entry point for the ROI dashboard.
fn main() -> Result<()> {
    // ROI_* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.sources.apply(&mut config);

    let _log_guard = configuration::init_logging(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Export(args) => handle_export(args, &config),
        Commands::Options => handle_options(&config),
        Commands::Shell => shell::run(open_session(&config)?, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Influencer campaign ROI dashboard: joins the roster, posts, tracking and
/// payout exports and reports ROAS by persona and influencer.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A TOML configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the campaign summary, ROAS over time and the leaderboards.
    Report(ReportArgs),
    /// Write the filtered CSV and/or the Insights PDF.
    Export(ExportArgs),
    /// List the filter values found in the data and the default date range.
    Options,
    /// Explore the data interactively, recomputing on every filter change.
    Shell,
}

/// Overrides for where the four input files are read from.
#[derive(Args)]
struct SourceArgs {
    /// Directory holding the input CSV files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Influencer roster file name, relative to the data directory.
    #[arg(long, global = true)]
    influencers: Option<String>,
    /// Posts file name, relative to the data directory.
    #[arg(long, global = true)]
    posts: Option<String>,
    /// Tracking file name, relative to the data directory.
    #[arg(long, global = true)]
    tracking: Option<String>,
    /// Payouts file name, relative to the data directory.
    #[arg(long, global = true)]
    payouts: Option<String>,
}

impl SourceArgs {
    fn apply(&self, config: &mut Config) {
        let data = &mut config.data;
        if let Some(dir) = &self.data_dir {
            data.dir = dir.clone();
        }
        let overrides = [
            (&mut data.influencers, &self.influencers),
            (&mut data.posts, &self.posts),
            (&mut data.tracking, &self.tracking),
            (&mut data.payouts, &self.payouts),
        ];
        for (target, value) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

/// Filter selections. An omitted dimension keeps every observed value.
#[derive(Args)]
struct FilterArgs {
    /// Platforms to include (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    platform: Vec<String>,
    /// Genders to include.
    #[arg(long, value_delimiter = ',')]
    gender: Vec<String>,
    /// Influencer categories to include.
    #[arg(long, value_delimiter = ',')]
    category: Vec<String>,
    /// Brands (tracking source) to include.
    #[arg(long, visible_alias = "brand", value_delimiter = ',')]
    source: Vec<String>,
    /// First day of the ROAS-over-time series (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day of the ROAS-over-time series (format: YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl FilterArgs {
    fn apply(&self, session: &mut DashboardSession) -> Result<()> {
        let selections = [
            (Dimension::Platform, &self.platform),
            (Dimension::Gender, &self.gender),
            (Dimension::Category, &self.category),
            (Dimension::Source, &self.source),
        ];
        for (dimension, values) in selections {
            if !values.is_empty() {
                session.select(dimension, values.iter().cloned());
            }
        }
        if self.start.is_some() || self.end.is_some() {
            session.set_date_range(self.start, self.end)?;
        }
        Ok(())
    }
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Output format (overrides `output.format`).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Write the filtered CSV. With neither flag, both artifacts are written.
    #[arg(long)]
    csv: bool,
    /// Write the Insights PDF.
    #[arg(long)]
    pdf: bool,
    /// Output directory (overrides `output.dir`).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the four inputs and starts a session with the configured leaderboard sizes.
fn open_session(config: &Config) -> Result<DashboardSession> {
    let data = &config.data;
    let sources = DataSources::in_dir(&data.dir, &data.influencers, &data.posts, &data.tracking, &data.payouts);
    let dataset = ingest::load_dataset(&sources).context("Failed to load input data")?;

    let engine = AnalyticsEngine::new(RankingSizes {
        bottom_influencers: config.rankings.bottom_influencers,
        top_influencers: config.rankings.top_influencers,
        top_posts: config.rankings.top_posts,
    });
    Ok(DashboardSession::new(dataset, engine))
}

fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    args.filters.apply(&mut session)?;
    let view = session.view();

    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Table => render::print_dashboard(&view, &config.report.currency_label),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    args.filters.apply(&mut session)?;

    let out_dir = args.out_dir.as_deref().unwrap_or(&config.output.dir);
    let (csv, pdf) = match (args.csv, args.pdf) {
        (false, false) => (true, true),
        flags => flags,
    };

    if csv {
        let path = export_csv(&session, &mut CsvExporter::new(), out_dir, config)?;
        println!("Filtered data written to {}", path.display());
    }
    if pdf {
        let path = export_pdf(&session, out_dir, config)?;
        println!("Insights PDF written to {}", path.display());
    }
    Ok(())
}

fn handle_options(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    render::print_options(session.options(), session.observed_range());
    Ok(())
}

pub(crate) fn export_csv(
    session: &DashboardSession,
    exporter: &mut CsvExporter,
    out_dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    let bytes = exporter.export(session.filtered(), session.tracking_columns())?;
    Ok(write_artifact(out_dir, &config.output.csv_file_name, &bytes)?)
}

pub(crate) fn export_pdf(session: &DashboardSession, out_dir: &Path, config: &Config) -> Result<PathBuf> {
    let view = session.view();
    let pdf = InsightsPdf::new(
        config.report.title.as_str(),
        config.report.currency_label.as_str(),
        config.rankings.pdf_top_influencers,
    );
    let bytes = pdf.render(&view.summary, &view.top_influencers)?;
    Ok(write_artifact(out_dir, &config.output.pdf_file_name, &bytes)?)
}
