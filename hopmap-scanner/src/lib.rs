pub mod crawler;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod parse;
pub mod report;
pub mod robots;

pub use crawler::{Crawler, ProgressCallback};
pub use error::CrawlError;
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use report::CrawlReport;
