pub mod crates;
pub mod keywords;
pub mod pagination;
pub mod users;
pub mod versions;

pub use crates::{CrateDto, SummaryDto};
pub use keywords::KeywordDto;
pub use pagination::{Page, PageRequest};
pub use users::UserDto;
pub use versions::{DownloadsDto, ExtraDownloadDto, VersionDownloadDto, VersionDto};
