// src/domain/krate/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;
pub mod version;

pub use entity::{Crate, NewCrate};
pub use repository::{CrateReadRepository, CrateSearch};
pub use value_objects::CrateName;
pub use version::{DailyDownloads, NewVersion, Version, VersionNum};
