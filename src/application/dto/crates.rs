use crate::domain::krate::Crate;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CrateDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub downloads: u64,
    pub keywords: Vec<String>,
    pub max_version: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Crate> for CrateDto {
    fn from(krate: Crate) -> Self {
        let max_version = krate.max_version().map(|v| v.num.to_string());
        let name = String::from(krate.name);
        Self {
            id: name.clone(),
            name,
            description: krate.description,
            downloads: krate.downloads,
            keywords: krate.keywords,
            max_version,
            created_at: krate.created_at,
            updated_at: krate.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryDto {
    pub num_crates: u64,
    pub num_downloads: u64,
    pub most_downloaded: Vec<CrateDto>,
    pub just_updated: Vec<CrateDto>,
}
