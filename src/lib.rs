pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod collection;
pub mod export;

pub use config::{ApiConfig, CollectorConfig, Config, SearchCriteria};
pub use error::{Error, FailureKind, Result};
pub use github::{GitHubApi, GitHubClient};
pub use collection::{Collection, CollectionReport, Collector};
pub use export::{ExportSummary, Exporter};
