pub mod dto;
pub mod error;
pub mod format;
pub mod ports;
pub mod queries;
pub mod services;

pub use error::ApplicationResult;
