use crate::{
    application::{
        dto::{KeywordDto, Page, PageRequest},
        error::{ApplicationError, ApplicationResult},
    },
    domain::keyword::{KeywordRepository, KeywordSort},
};
use std::sync::Arc;

pub struct ListKeywordsQuery {
    pub sort: KeywordSort,
    pub page: PageRequest,
}

pub struct KeywordQueryService {
    repo: Arc<dyn KeywordRepository>,
    default_per_page: u32,
    max_per_page: u32,
}

impl KeywordQueryService {
    pub fn new(repo: Arc<dyn KeywordRepository>, default_per_page: u32, max_per_page: u32) -> Self {
        Self {
            repo,
            default_per_page,
            max_per_page,
        }
    }

    pub async fn list_keywords(&self, query: ListKeywordsQuery) -> ApplicationResult<Page<KeywordDto>> {
        let (page, per_page, offset) = query
            .page
            .resolve(self.default_per_page, self.max_per_page)?;
        tracing::debug!(sort = query.sort.as_str(), page, per_page, "listing keywords");
        let (records, total) = self.repo.list_page(query.sort, offset, per_page).await?;

        Ok(Page {
            items: records.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    pub async fn get_keyword(&self, keyword: &str) -> ApplicationResult<KeywordDto> {
        self.repo
            .find(keyword)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found(format!("keyword `{keyword}` does not exist")))
    }
}
