use crate::domain::errors::DomainResult;
use crate::domain::user::{entity::User, value_objects::UserLogin};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> DomainResult<u64>;

    async fn find_by_login(&self, login: &UserLogin) -> DomainResult<Option<User>>;
}
