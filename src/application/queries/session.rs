use crate::{
    application::{dto::UserDto, error::ApplicationResult, ports::StoragePort},
    domain::session::SessionRepository,
};
use std::sync::Arc;

/// Storage key the front-end keeps while a user is logged in.
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

pub struct SessionQueryService {
    sessions: Arc<dyn SessionRepository>,
}

impl SessionQueryService {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Resolves the user a page should render for.
    ///
    /// The window must carry the login flag before the backend is asked for
    /// its session; a backend session alone does not log the window in.
    pub async fn current_user(&self, storage: Option<&StoragePort>) -> ApplicationResult<Option<UserDto>> {
        let flagged = storage
            .and_then(|s| s.get_item(LOGGED_IN_KEY))
            .is_some_and(|v| v == "1");
        if !flagged {
            return Ok(None);
        }

        let user = self.backend_user().await?;
        if user.is_none() {
            tracing::debug!("login flag set but backend holds no session");
        }
        Ok(user)
    }

    /// The user of the backend's current session, regardless of window state.
    pub async fn backend_user(&self) -> ApplicationResult<Option<UserDto>> {
        let session = self.sessions.current().await?;
        Ok(session.map(|s| s.user.into()))
    }
}
