// src/testing/mod.rs
//! Deterministic environment for browser-driven acceptance tests.
//!
//! [`setup_application_test`] registers the per-test lifecycle on a [`Hooks`]
//! registry: a fresh [`MockServer`] and window storage, a frozen
//! [`MockClock`], and an [`Authenticator`] on the [`TestContext`]. A
//! [`Browser`] then drives the application router the way a user would.

pub mod browser;
pub mod clock;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod selector;
pub mod server;
pub mod setup;

pub use browser::Browser;
pub use clock::{MockClock, TravelGuard};
pub use error::{BrowserError, BrowserResult, ClockError, HarnessError, HarnessResult};
pub use hooks::{Hooks, TestContext};
pub use server::{CrateFixture, MockServer, VersionFixture};
pub use setup::{Authenticator, FROZEN_AT_SECS, authenticate_as, frozen_instant, setup_application_test};
