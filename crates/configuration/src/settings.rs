use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section may be omitted; the defaults reproduce the standard
/// dashboard setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
    pub rankings: RankingsConfig,
    pub logging: LoggingConfig,
}

/// Where the four input CSV exports are found.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory the file names below are resolved against.
    pub dir: PathBuf,
    pub influencers: String,
    pub posts: String,
    pub tracking: String,
    pub payouts: String,
}

/// Where exported artifacts are written and how the CLI prints results.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub csv_file_name: String,
    pub pdf_file_name: String,
    pub format: OutputFormat,
}

/// Rendering of the dashboard view on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Text used on the Insights PDF and money columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    /// Printed in front of money amounts. The PDF uses a built-in font, so keep this ASCII.
    pub currency_label: String,
}

/// Sizes of the leaderboards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingsConfig {
    pub bottom_influencers: usize,
    pub top_influencers: usize,
    /// How many of the top influencers are listed on the PDF.
    pub pdf_top_influencers: usize,
    pub top_posts: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, a daily-rolling log file is also written here.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rankings;
        let sizes = [
            ("bottom_influencers", r.bottom_influencers),
            ("top_influencers", r.top_influencers),
            ("pdf_top_influencers", r.pdf_top_influencers),
            ("top_posts", r.top_posts),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, n)| *n == 0) {
            return Err(ConfigError::ValidationError(format!(
                "rankings.{} must be at least 1",
                name
            )));
        }
        if r.pdf_top_influencers > r.top_influencers {
            return Err(ConfigError::ValidationError(format!(
                "rankings.pdf_top_influencers ({}) cannot exceed rankings.top_influencers ({})",
                r.pdf_top_influencers, r.top_influencers
            )));
        }
        Ok(())
    }
}

// --- Default Implementations ---

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            influencers: "influencers.csv".to_string(),
            posts: "posts.csv".to_string(),
            tracking: "tracking.csv".to_string(),
            payouts: "payouts.csv".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv_file_name: "filtered_data.csv".to_string(),
            pdf_file_name: "HealthKart_Insights.pdf".to_string(),
            format: OutputFormat::Table,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "HealthKart Influencer Campaign Insights Summary".to_string(),
            currency_label: "Rs.".to_string(),
        }
    }
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            bottom_influencers: 5,
            top_influencers: 10,
            pdf_top_influencers: 5,
            top_posts: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
