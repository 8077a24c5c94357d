// src/testing/error.rs
use crate::domain::errors::DomainError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no page has been loaded yet")]
    NoPageLoaded,

    #[error("selector `{0}` matched no element")]
    SelectorNotFound(String),

    #[error("unsupported selector `{selector}`: {reason}")]
    UnsupportedSelector { selector: String, reason: String },

    #[error("element `{selector}` is a <{actual}>, expected {expected}")]
    TypeMismatch {
        selector: String,
        expected: &'static str,
        actual: String,
    },

    #[error("assertion failed for `{selector}`: expected {expected}, got {actual}")]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
    },

    #[error("unsupported event `{0}`")]
    UnsupportedEvent(String),

    #[error("form method `{0}` is not supported")]
    UnsupportedFormMethod(String),

    #[error("could not parse page: {0}")]
    HtmlParse(String),

    #[error("invalid request: {0}")]
    Request(String),

    #[error("could not read response body: {0}")]
    Body(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("clock is already frozen at {0}")]
    AlreadyFrozen(DateTime<Utc>),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0} is not set up; register setup_application_test first")]
    NotInitialized(&'static str),

    #[error("{0}")]
    Failed(String),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
