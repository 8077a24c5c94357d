// src/domain/krate/entity.rs
use crate::domain::krate::value_objects::CrateName;
use crate::domain::krate::version::{NewVersion, Version};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crate {
    pub name: CrateName,
    pub description: Option<String>,
    pub downloads: u64,
    pub keywords: Vec<String>,
    /// Newest first.
    pub versions: Vec<Version>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Crate {
    /// Case-insensitive match of an already lower-cased needle against the
    /// name, description and keywords.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.as_str().to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Highest version that is not yanked, preferring stable releases.
    pub fn max_version(&self) -> Option<&Version> {
        let live = || self.versions.iter().filter(|v| !v.yanked);
        live()
            .filter(|v| !v.num.is_prerelease())
            .max_by(|a, b| a.num.cmp(&b.num))
            .or_else(|| live().max_by(|a, b| a.num.cmp(&b.num)))
    }
}

/// Data needed to register a crate with a repository.
#[derive(Debug, Clone)]
pub struct NewCrate {
    pub name: CrateName,
    pub description: Option<String>,
    pub downloads: u64,
    pub keywords: Vec<String>,
    pub versions: Vec<NewVersion>,
    /// Defaults to the creation instant when absent.
    pub updated_at: Option<DateTime<Utc>>,
}
