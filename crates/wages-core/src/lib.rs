pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod query;

pub use cache::TableCache;
pub use config::WagesConfig;
pub use error::{LoadError, LoadErrorKind};
pub use loader::{load_wage_table, LoadedTable};
pub use query::{FilterOptions, Selection, WageFilter, WageReport, WageSummary};
