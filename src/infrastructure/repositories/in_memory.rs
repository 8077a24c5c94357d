// src/infrastructure/repositories/in_memory.rs
use crate::application::ports::time::Clock;
use crate::domain::{
    errors::{DomainError, DomainResult},
    keyword::{Keyword, KeywordRepository, KeywordSort},
    krate::{Crate, CrateName, CrateReadRepository, CrateSearch, NewCrate, Version},
    session::{Session, SessionId, SessionRepository},
    user::{User, UserId, UserLogin, UserRepository},
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    crates: Vec<Crate>,
    keywords: Vec<Keyword>,
}

/// Registry data held in memory. Backs the development server and the mock
/// backend used by acceptance tests.
pub struct InMemoryRegistry {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_user(&self, login: UserLogin, name: Option<String>) -> DomainResult<User> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.login == login) {
            return Err(DomainError::Validation(format!(
                "user `{login}` already exists"
            )));
        }
        let id = i64::try_from(tables.users.len() + 1)
            .map_err(|_| DomainError::Persistence("user id overflow".into()))?;
        let user = User {
            id: UserId::new(id)?,
            login,
            name,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    pub fn insert_session(&self, user: User) -> Session {
        let session = Session {
            id: SessionId::generate(),
            user,
            created_at: self.clock.now(),
        };
        self.lock().sessions.push(session.clone());
        session
    }

    pub fn insert_crate(&self, mut new_crate: NewCrate) -> DomainResult<Crate> {
        let mut seen = BTreeSet::new();
        new_crate.keywords.retain(|k| seen.insert(k.clone()));

        let now = self.clock.now();
        let mut tables = self.lock();
        if tables.crates.iter().any(|c| c.name == new_crate.name) {
            return Err(DomainError::Validation(format!(
                "crate `{}` already exists",
                new_crate.name
            )));
        }
        let mut nums = BTreeSet::new();
        if let Some(dup) = new_crate.versions.iter().find(|v| !nums.insert(&v.num)) {
            return Err(DomainError::Validation(format!(
                "version `{}` of `{}` is listed twice",
                dup.num, new_crate.name
            )));
        }

        for keyword in &new_crate.keywords {
            match tables.keywords.iter_mut().find(|k| &k.keyword == keyword) {
                Some(existing) => existing.crates_cnt += 1,
                None => tables.keywords.push(Keyword {
                    keyword: keyword.clone(),
                    crates_cnt: 1,
                    created_at: now,
                }),
            }
        }

        let mut versions: Vec<Version> = new_crate
            .versions
            .into_iter()
            .map(|v| Version {
                num: v.num,
                downloads: v.downloads,
                yanked: v.yanked,
                created_at: v.created_at.unwrap_or(now),
                daily_downloads: v.daily_downloads,
            })
            .collect();
        versions.sort_by(|a, b| b.num.cmp(&a.num));

        let krate = Crate {
            name: new_crate.name,
            description: new_crate.description,
            downloads: new_crate.downloads,
            keywords: new_crate.keywords,
            versions,
            created_at: now,
            updated_at: new_crate.updated_at.unwrap_or(now),
        };
        tables.crates.push(krate.clone());
        Ok(krate)
    }

    /// Registers a keyword without any crates. Existing keywords are returned
    /// unchanged.
    pub fn insert_keyword(&self, keyword: &str) -> DomainResult<Keyword> {
        if keyword.trim().is_empty() {
            return Err(DomainError::Validation("keyword cannot be empty".into()));
        }
        let now = self.clock.now();
        let mut tables = self.lock();
        if let Some(existing) = tables.keywords.iter().find(|k| k.keyword == keyword) {
            return Ok(existing.clone());
        }
        let record = Keyword {
            keyword: keyword.to_string(),
            crates_cnt: 0,
            created_at: now,
        };
        tables.keywords.push(record.clone());
        Ok(record)
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.lock().sessions.clone()
    }

    pub fn crate_count(&self) -> usize {
        self.lock().crates.len()
    }
}

fn by_relevance(exact: &str) -> impl Fn(&Crate, &Crate) -> std::cmp::Ordering + '_ {
    move |a: &Crate, b: &Crate| {
        let a_exact = a.name.as_str().eq_ignore_ascii_case(exact);
        let b_exact = b.name.as_str().eq_ignore_ascii_case(exact);
        b_exact
            .cmp(&a_exact)
            .then_with(|| b.downloads.cmp(&a.downloads))
            .then_with(|| a.name.cmp(&b.name))
    }
}

fn page<T: Clone>(items: &[T], offset: u64, limit: u32) -> Vec<T> {
    let start = usize::try_from(offset).unwrap_or(usize::MAX);
    items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryRegistry {
    async fn count(&self) -> DomainResult<u64> {
        Ok(self.lock().users.len() as u64)
    }

    async fn find_by_login(&self, login: &UserLogin) -> DomainResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| &u.login == login).cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRegistry {
    async fn current(&self) -> DomainResult<Option<Session>> {
        Ok(self.lock().sessions.last().cloned())
    }

    async fn find_for_user(&self, login: &UserLogin) -> DomainResult<Vec<Session>> {
        Ok(self
            .lock()
            .sessions
            .iter()
            .filter(|s| &s.user.login == login)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CrateReadRepository for InMemoryRegistry {
    async fn search(&self, search: CrateSearch) -> DomainResult<(Vec<Crate>, u64)> {
        let tables = self.lock();
        let mut matches: Vec<Crate> = tables
            .crates
            .iter()
            .filter(|c| c.matches(&search.query))
            .cloned()
            .collect();
        matches.sort_by(by_relevance(&search.query));

        let total = matches.len() as u64;
        Ok((page(&matches, search.offset, search.limit), total))
    }

    async fn find_by_name(&self, name: &CrateName) -> DomainResult<Option<Crate>> {
        Ok(self.lock().crates.iter().find(|c| &c.name == name).cloned())
    }

    async fn list_by_keyword(&self, keyword: &str) -> DomainResult<Vec<Crate>> {
        let mut crates: Vec<Crate> = self
            .lock()
            .crates
            .iter()
            .filter(|c| c.has_keyword(keyword))
            .cloned()
            .collect();
        crates.sort_by(|a, b| b.downloads.cmp(&a.downloads).then_with(|| a.name.cmp(&b.name)));
        Ok(crates)
    }

    async fn most_downloaded(&self, limit: u32) -> DomainResult<Vec<Crate>> {
        let mut crates = self.lock().crates.clone();
        crates.sort_by(|a, b| b.downloads.cmp(&a.downloads).then_with(|| a.name.cmp(&b.name)));
        Ok(page(&crates, 0, limit))
    }

    async fn recently_updated(&self, limit: u32) -> DomainResult<Vec<Crate>> {
        let mut crates = self.lock().crates.clone();
        crates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        Ok(page(&crates, 0, limit))
    }

    async fn totals(&self) -> DomainResult<(u64, u64)> {
        let tables = self.lock();
        let downloads = tables.crates.iter().map(|c| c.downloads).sum();
        Ok((tables.crates.len() as u64, downloads))
    }
}

#[async_trait]
impl KeywordRepository for InMemoryRegistry {
    async fn list_page(
        &self,
        sort: KeywordSort,
        offset: u64,
        limit: u32,
    ) -> DomainResult<(Vec<Keyword>, u64)> {
        let mut keywords = self.lock().keywords.clone();
        match sort {
            KeywordSort::Alpha => keywords.sort_by(|a, b| a.keyword.cmp(&b.keyword)),
            KeywordSort::Crates => keywords.sort_by(|a, b| {
                b.crates_cnt
                    .cmp(&a.crates_cnt)
                    .then_with(|| a.keyword.cmp(&b.keyword))
            }),
        }
        let total = keywords.len() as u64;
        Ok((page(&keywords, offset, limit), total))
    }

    async fn find(&self, keyword: &str) -> DomainResult<Option<Keyword>> {
        Ok(self
            .lock()
            .keywords
            .iter()
            .find(|k| k.keyword == keyword)
            .cloned())
    }
}
