// src/infrastructure/repositories/mod.rs
mod in_memory;

pub use in_memory::InMemoryRegistry;
