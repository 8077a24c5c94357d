// src/testing/server.rs
use crate::application::ports::time::Clock;
use crate::domain::{
    keyword::Keyword,
    krate::{Crate, CrateName, DailyDownloads, NewCrate, NewVersion, VersionNum},
    session::{Session, SessionRepository},
    user::{User, UserLogin, UserRepository},
};
use crate::infrastructure::repositories::InMemoryRegistry;
use crate::testing::error::HarnessResult;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Backend double the application reads from during a test.
///
/// Fixtures are recorded straight into the registry the router is built on;
/// their timestamps come from the clock the server was created with.
pub struct MockServer {
    registry: Arc<InMemoryRegistry>,
}

impl MockServer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(InMemoryRegistry::new(clock)),
        }
    }

    pub fn registry(&self) -> Arc<InMemoryRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn create_user(&self, login: &str, name: Option<&str>) -> HarnessResult<User> {
        let login = UserLogin::new(login)?;
        Ok(self
            .registry
            .insert_user(login, name.map(str::to_string))?)
    }

    /// Records a backend session for `user`; the newest session is the
    /// current one.
    pub fn create_session(&self, user: &User) -> Session {
        let session = self.registry.insert_session(user.clone());
        tracing::debug!(user = %user.login, session = %session.id, "session fixture created");
        session
    }

    pub fn create_crate(&self, fixture: CrateFixture) -> HarnessResult<Crate> {
        Ok(self.registry.insert_crate(fixture.build()?)?)
    }

    pub fn create_keyword(&self, keyword: &str) -> HarnessResult<Keyword> {
        Ok(self.registry.insert_keyword(keyword)?)
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.registry.sessions()
    }

    pub fn crate_count(&self) -> usize {
        self.registry.crate_count()
    }

    pub async fn find_user(&self, login: &str) -> HarnessResult<Option<User>> {
        let login = UserLogin::new(login)?;
        Ok(self.registry.find_by_login(&login).await?)
    }

    pub async fn sessions_for(&self, login: &str) -> HarnessResult<Vec<Session>> {
        let login = UserLogin::new(login)?;
        Ok(self.registry.find_for_user(&login).await?)
    }

    pub async fn user_count(&self) -> HarnessResult<u64> {
        Ok(self.registry.count().await?)
    }
}

/// Builder for crate fixtures.
#[derive(Debug, Clone)]
pub struct CrateFixture {
    name: String,
    description: Option<String>,
    downloads: u64,
    keywords: Vec<String>,
    versions: Vec<VersionFixture>,
    updated_at: Option<DateTime<Utc>>,
}

impl CrateFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            downloads: 0,
            keywords: Vec::new(),
            versions: Vec::new(),
            updated_at: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn version(mut self, version: VersionFixture) -> Self {
        self.versions.push(version);
        self
    }

    fn build(self) -> HarnessResult<NewCrate> {
        let versions = self
            .versions
            .into_iter()
            .map(VersionFixture::build)
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(NewCrate {
            name: CrateName::new(self.name)?,
            description: self.description,
            downloads: self.downloads,
            keywords: self.keywords,
            versions,
            updated_at: self.updated_at,
        })
    }
}

/// Builder for a published version of a [`CrateFixture`].
#[derive(Debug, Clone)]
pub struct VersionFixture {
    num: String,
    downloads: u64,
    yanked: bool,
    created_at: Option<DateTime<Utc>>,
    daily: Vec<DailyDownloads>,
}

impl VersionFixture {
    pub fn new(num: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            downloads: 0,
            yanked: false,
            created_at: None,
            daily: Vec::new(),
        }
    }

    pub fn downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn yanked(mut self) -> Self {
        self.yanked = true;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Records `downloads` on `date`; repeated dates accumulate.
    pub fn daily(mut self, date: NaiveDate, downloads: u64) -> Self {
        match self.daily.iter_mut().find(|d| d.date == date) {
            Some(existing) => existing.downloads += downloads,
            None => self.daily.push(DailyDownloads { date, downloads }),
        }
        self
    }

    fn build(self) -> HarnessResult<NewVersion> {
        Ok(NewVersion {
            num: VersionNum::parse(self.num)?,
            downloads: self.downloads,
            yanked: self.yanked,
            created_at: self.created_at,
            daily_downloads: self.daily,
        })
    }
}
