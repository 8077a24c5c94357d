use crate::domain::krate::Version;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionDto {
    #[serde(rename = "crate")]
    pub krate: String,
    pub num: String,
    pub downloads: u64,
    pub yanked: bool,
    pub created_at: DateTime<Utc>,
}

impl VersionDto {
    pub fn new(krate: &str, version: &Version) -> Self {
        Self {
            krate: krate.to_string(),
            num: version.num.to_string(),
            downloads: version.downloads,
            yanked: version.yanked,
            created_at: version.created_at,
        }
    }
}

/// One day of downloads for a single version.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionDownloadDto {
    pub version: String,
    pub downloads: u64,
    #[serde(with = "day")]
    pub date: NaiveDate,
}

/// Downloads of every older version summed per day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExtraDownloadDto {
    #[serde(with = "day")]
    pub date: NaiveDate,
    pub downloads: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DownloadsDto {
    pub version_downloads: Vec<VersionDownloadDto>,
    pub extra_downloads: Vec<ExtraDownloadDto>,
}

mod day {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}
