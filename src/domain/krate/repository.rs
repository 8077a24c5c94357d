use crate::domain::errors::DomainResult;
use crate::domain::krate::{entity::Crate, value_objects::CrateName};
use async_trait::async_trait;

/// Normalised search request handed to the read repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateSearch {
    pub query: String,
    pub offset: u64,
    pub limit: u32,
}

#[async_trait]
pub trait CrateReadRepository: Send + Sync {
    /// Returns one page of matches and the total number of matches.
    async fn search(&self, search: CrateSearch) -> DomainResult<(Vec<Crate>, u64)>;

    async fn find_by_name(&self, name: &CrateName) -> DomainResult<Option<Crate>>;

    async fn list_by_keyword(&self, keyword: &str) -> DomainResult<Vec<Crate>>;

    async fn most_downloaded(&self, limit: u32) -> DomainResult<Vec<Crate>>;

    async fn recently_updated(&self, limit: u32) -> DomainResult<Vec<Crate>>;

    async fn totals(&self) -> DomainResult<(u64, u64)>;
}
