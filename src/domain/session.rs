// src/domain/session.rs
use crate::domain::errors::DomainResult;
use crate::domain::user::{User, UserLogin};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A logged-in session held by the backend on behalf of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// The session the backend answers "who am I" with, if any.
    async fn current(&self) -> DomainResult<Option<Session>>;

    async fn find_for_user(&self, login: &UserLogin) -> DomainResult<Vec<Session>>;
}
