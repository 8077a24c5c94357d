pub mod crates;
pub mod keywords;
pub mod session;

pub use crates::{CrateQueryService, SearchCratesQuery};
pub use keywords::{KeywordQueryService, ListKeywordsQuery};
pub use session::{LOGGED_IN_KEY, SessionQueryService};
