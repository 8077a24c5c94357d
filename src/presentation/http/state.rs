// src/presentation/http/state.rs
use crate::application::{ports::StoragePort, services::ApplicationServices};
use crate::config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub config: AppConfig,
}

/// Window storage of the browser that issued a request, attached as a request
/// extension by the browser driver. Plain HTTP clients carry none.
#[derive(Clone)]
pub struct WindowStorage(pub Arc<StoragePort>);
