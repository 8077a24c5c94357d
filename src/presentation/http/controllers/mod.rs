// src/presentation/http/controllers/mod.rs
pub mod api;
pub mod crates;
pub mod keywords;
pub mod not_found;
pub mod pages;
pub mod search;
