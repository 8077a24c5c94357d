// src/domain/keyword.rs
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub keyword: String,
    pub crates_cnt: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordSort {
    #[default]
    Alpha,
    Crates,
}

impl KeywordSort {
    /// Unknown values fall back to alphabetical order.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("crates") => Self::Crates,
            _ => Self::Alpha,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Crates => "crates",
        }
    }
}

#[async_trait]
pub trait KeywordRepository: Send + Sync {
    async fn list_page(
        &self,
        sort: KeywordSort,
        offset: u64,
        limit: u32,
    ) -> DomainResult<(Vec<Keyword>, u64)>;

    async fn find(&self, keyword: &str) -> DomainResult<Option<Keyword>>;
}

#[cfg(test)]
mod tests {
    use super::KeywordSort;

    #[test]
    fn keyword_sort_defaults_to_alpha() {
        assert_eq!(KeywordSort::parse(None), KeywordSort::Alpha);
        assert_eq!(KeywordSort::parse(Some("downloads")), KeywordSort::Alpha);
        assert_eq!(KeywordSort::parse(Some("crates")), KeywordSort::Crates);
    }
}
