// src/testing/setup.rs
use crate::application::{ports::StoragePort, queries::LOGGED_IN_KEY};
use crate::domain::{session::Session, user::User};
use crate::infrastructure::storage::InMemoryStorage;
use crate::testing::{hooks::Hooks, server::MockServer};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 2017-11-20T11:00:00Z, the instant every application test runs at.
pub const FROZEN_AT_SECS: i64 = 1_511_175_600;

pub fn frozen_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(FROZEN_AT_SECS, 0).unwrap_or_default()
}

/// Logs users in against one mock backend and one window storage.
#[derive(Clone)]
pub struct Authenticator {
    server: Arc<MockServer>,
    storage: Arc<StoragePort>,
}

impl Authenticator {
    pub fn authenticate_as(&self, user: &User) -> Session {
        let session = self.server.create_session(user);
        self.storage.set_item(LOGGED_IN_KEY, "1");
        tracing::debug!(user = %user.login, "authenticated");
        session
    }
}

pub fn authenticate_as(server: Arc<MockServer>, storage: Arc<StoragePort>) -> Authenticator {
    Authenticator { server, storage }
}

/// Registers the application-test lifecycle on `hooks`.
///
/// Before each test: a fresh mock backend, fresh window storage, the clock
/// frozen at [`frozen_instant`] and `authenticate_as` on the context. After
/// each test: real time again.
pub fn setup_application_test(hooks: &mut Hooks) {
    hooks.before_each(|cx| {
        let server = Arc::new(MockServer::new(Arc::new(cx.clock().clone())));
        let storage = Arc::new(InMemoryStorage::new());
        cx.clock().freeze(frozen_instant())?;

        let window: Arc<StoragePort> = storage.clone();
        cx.set_authenticator(authenticate_as(Arc::clone(&server), window));
        cx.set_server(server);
        cx.set_storage(storage);
        tracing::debug!("application test set up");
        Ok(())
    });

    hooks.after_each(|cx| {
        cx.clock().reset();
        tracing::debug!("application test torn down");
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn frozen_instant_is_the_fixed_morning() {
        assert_eq!(
            frozen_instant(),
            Utc.with_ymd_and_hms(2017, 11, 20, 11, 0, 0).unwrap()
        );
    }
}
