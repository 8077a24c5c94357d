// src/presentation/http/error.rs
use crate::application::{ApplicationResult, dto::UserDto, error::ApplicationError};
use crate::domain::errors::DomainError;
use crate::presentation::http::views;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

/// Detail returned to anonymous callers of endpoints that need a login.
pub const MUST_LOGIN: &str = "must be logged in to perform that action";

fn status_and_detail(err: ApplicationError) -> (StatusCode, String) {
    match err {
        ApplicationError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        ApplicationError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found".into()),
        ApplicationError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        ApplicationError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".into(),
            )
        }
        ApplicationError::Domain(DomainError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
        ApplicationError::Domain(DomainError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Not Found".into())
        }
        ApplicationError::Domain(DomainError::Persistence(msg)) => {
            tracing::error!(error = %msg, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".into(),
            )
        }
    }
}

/// Error rendered as the JSON body of the `/api` endpoints.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    detail: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        let (status, detail) = status_and_detail(err);
        Self::new(status, detail)
    }

    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            errors: vec![ErrorDetail {
                detail: self.detail,
            }],
        };
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<ErrorDetail>,
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

/// Error rendered as a full HTML page, inside the layout of the viewer that
/// hit it. Missing resources render the not-found page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
    viewer: Option<UserDto>,
}

impl PageError {
    pub fn from_error(err: ApplicationError, viewer: Option<UserDto>) -> Self {
        let (status, message) = status_and_detail(err);
        Self {
            status,
            message,
            viewer,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = if self.status == StatusCode::NOT_FOUND {
            views::not_found_page(self.viewer.as_ref())
        } else {
            views::error_page(self.status, &self.message, self.viewer.as_ref())
        };
        (self.status, Html(body)).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;

pub trait IntoPageResult<T> {
    fn into_page(self, viewer: &Option<UserDto>) -> PageResult<T>;
}

impl<T> IntoPageResult<T> for ApplicationResult<T> {
    fn into_page(self, viewer: &Option<UserDto>) -> PageResult<T> {
        self.map_err(|err| PageError::from_error(err, viewer.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_application_errors_to_statuses() {
        let cases = [
            (ApplicationError::validation("bad page"), StatusCode::BAD_REQUEST),
            (ApplicationError::not_found("crate"), StatusCode::NOT_FOUND),
            (ApplicationError::forbidden(MUST_LOGIN), StatusCode::FORBIDDEN),
            (
                ApplicationError::infrastructure("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::NotFound("x".into()).into(),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError::from_error(err).status(), status);
        }
    }

    #[test]
    fn page_error_keeps_forbidden_message() {
        let err = PageError::from_error(ApplicationError::forbidden(MUST_LOGIN), None);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.message, MUST_LOGIN);
    }
}
