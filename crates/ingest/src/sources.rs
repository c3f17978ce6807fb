use crate::error::IngestError;
use crate::raw::RawTable;
use crate::tables::{parse_influencers, parse_payouts, parse_posts, parse_tracking};
use core_types::Dataset;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The locations of the four input exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub influencers: PathBuf,
    pub posts: PathBuf,
    pub tracking: PathBuf,
    pub payouts: PathBuf,
}

impl DataSources {
    /// Resolves the four file names against a directory.
    pub fn in_dir(
        dir: &Path,
        influencers: &str,
        posts: &str,
        tracking: &str,
        payouts: &str,
    ) -> Self {
        Self {
            influencers: dir.join(influencers),
            posts: dir.join(posts),
            tracking: dir.join(tracking),
            payouts: dir.join(payouts),
        }
    }

    fn labelled(&self) -> [(&'static str, &Path); 4] {
        [
            ("influencers", self.influencers.as_path()),
            ("posts", self.posts.as_path()),
            ("tracking", self.tracking.as_path()),
            ("payouts", self.payouts.as_path()),
        ]
    }

    /// Labels of the inputs whose files do not exist.
    pub fn missing(&self) -> Vec<String> {
        self.labelled()
            .iter()
            .filter(|(_, path)| !path.is_file())
            .map(|(label, path)| format!("{} ({})", label, path.display()))
            .collect()
    }
}

fn read_table(name: &str, path: &Path) -> Result<RawTable, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RawTable::from_reader(name, BufReader::new(file))
}

/// Loads and validates all four tables.
///
/// Nothing is parsed unless every file is present; the error then names all
/// missing inputs at once.
pub fn load_dataset(sources: &DataSources) -> Result<Dataset, IngestError> {
    let missing = sources.missing();
    if !missing.is_empty() {
        return Err(IngestError::MissingInputs(missing));
    }

    let influencers = parse_influencers(&read_table("Influencers", &sources.influencers)?)?;
    let posts = parse_posts(&read_table("Posts", &sources.posts)?)?;
    let tracking = parse_tracking(&read_table("Tracking", &sources.tracking)?)?;
    let payouts = parse_payouts(&read_table("Payouts", &sources.payouts)?)?;

    tracing::info!(
        influencers = influencers.len(),
        posts = posts.len(),
        tracking = tracking.events.len(),
        payouts = payouts.len(),
        "Loaded input tables."
    );

    Ok(Dataset {
        influencers,
        posts,
        tracking,
        payouts,
    })
}
