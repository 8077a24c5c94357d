// src/presentation/http/extractors.rs
use crate::{
    application::{dto::UserDto, error::ApplicationError},
    presentation::http::state::{HttpState, WindowStorage},
};
use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::PageError;

/// The user a page renders for, if the requesting window is logged in.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<UserDto>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts.extensions.get::<HttpState>().cloned().ok_or_else(|| {
            PageError::from_error(
                ApplicationError::infrastructure("application state missing"),
                None,
            )
        })?;
        let window = parts.extensions.get::<WindowStorage>().cloned();

        let user = app_state
            .services
            .session_queries
            .current_user(window.as_ref().map(|w| &*w.0))
            .await
            .map_err(|err| PageError::from_error(err, None))?;

        Ok(Self(user))
    }
}
