pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod product;
pub mod spider;

pub use error::{Result, ScrapeError};
pub use product::ProductRecord;
pub use spider::{PageSource, RunSummary, Spider};
