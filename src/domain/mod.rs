// src/domain/mod.rs
pub mod errors;
pub mod keyword;
pub mod krate;
pub mod session;
pub mod user;
