// src/lib.rs
//! Crate registry front-end served with axum, plus the harness its
//! acceptance tests run in: a mock backend, window storage, a frozen clock and
//! a simulated browser.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod testing;
