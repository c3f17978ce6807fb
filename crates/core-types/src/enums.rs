use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The influencer attributes a dashboard user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Platform,
    Gender,
    Category,
    /// The brand a conversion was tracked for.
    Source,
}

impl Dimension {
    /// All dimensions, in the order the filter controls are presented.
    pub const ALL: [Dimension; 4] = [
        Dimension::Platform,
        Dimension::Gender,
        Dimension::Category,
        Dimension::Source,
    ];

    /// The CSV column backing this dimension.
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Platform => "platform",
            Dimension::Gender => "gender",
            Dimension::Category => "category",
            Dimension::Source => "source",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "platform" => Ok(Dimension::Platform),
            "gender" => Ok(Dimension::Gender),
            "category" => Ok(Dimension::Category),
            "source" | "brand" => Ok(Dimension::Source),
            other => Err(CoreError::InvalidInput(
                "dimension".to_string(),
                format!("'{}' (expected platform, gender, category or source)", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_brand_as_source() {
        assert_eq!("Brand".parse::<Dimension>().unwrap(), Dimension::Source);
        assert_eq!(" platform ".parse::<Dimension>().unwrap(), Dimension::Platform);
        assert!("region".parse::<Dimension>().is_err());
    }
}
