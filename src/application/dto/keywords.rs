use crate::domain::keyword::Keyword;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeywordDto {
    pub id: String,
    pub keyword: String,
    pub created_at: DateTime<Utc>,
    pub crates_cnt: u32,
}

impl From<Keyword> for KeywordDto {
    fn from(keyword: Keyword) -> Self {
        Self {
            id: keyword.keyword.clone(),
            keyword: keyword.keyword,
            created_at: keyword.created_at,
            crates_cnt: keyword.crates_cnt,
        }
    }
}
