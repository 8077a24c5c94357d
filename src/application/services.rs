// src/application/services.rs
use std::sync::Arc;

use crate::{
    application::{
        ports::ClockPort,
        queries::{CrateQueryService, KeywordQueryService, SessionQueryService},
    },
    domain::{keyword::KeywordRepository, krate::CrateReadRepository, session::SessionRepository},
};

/// Listing limits applied by the query services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

pub struct ApplicationServices {
    pub crate_queries: Arc<CrateQueryService>,
    pub keyword_queries: Arc<KeywordQueryService>,
    pub session_queries: Arc<SessionQueryService>,
    clock: Arc<ClockPort>,
}

impl ApplicationServices {
    pub fn new(
        crate_repo: Arc<dyn CrateReadRepository>,
        keyword_repo: Arc<dyn KeywordRepository>,
        session_repo: Arc<dyn SessionRepository>,
        clock: Arc<ClockPort>,
        limits: PaginationLimits,
    ) -> Self {
        let crate_queries = Arc::new(CrateQueryService::new(
            Arc::clone(&crate_repo),
            limits.default_per_page,
            limits.max_per_page,
        ));
        let keyword_queries = Arc::new(KeywordQueryService::new(
            Arc::clone(&keyword_repo),
            limits.default_per_page,
            limits.max_per_page,
        ));
        let session_queries = Arc::new(SessionQueryService::new(Arc::clone(&session_repo)));

        Self {
            crate_queries,
            keyword_queries,
            session_queries,
            clock,
        }
    }

    pub fn clock(&self) -> Arc<ClockPort> {
        Arc::clone(&self.clock)
    }
}
