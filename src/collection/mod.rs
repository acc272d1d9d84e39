pub mod collector;
pub mod report;

pub use collector::{Collection, Collector};
pub use report::{CollectionReport, SkippedUser, TruncatedListing};
