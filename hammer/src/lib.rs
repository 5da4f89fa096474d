//! Fixed-count HTTP GET benchmark.
//!
//! A run issues `requests` GETs against one url, keeping at most
//! `concurrency` of them in flight, and stops early once the time limit is
//! exceeded. The outcome is a [`RunSummary`] which turns into a
//! serializable [`BenchReport`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod report;
pub mod summary;

pub use config::{parse_target, parse_time_limit, BenchConfig};
pub use error::ConfigError;
pub use fetch::{ResultRecord, SUCCESS_STATUS, TIMEOUT_STATUS};
pub use report::{BenchReport, Throughput};
pub use summary::{RunSummary, Termination};

pub use reqwest::Url;

/// Validates `config`, builds the shared client and runs the benchmark.
pub async fn run(config: &BenchConfig) -> Result<RunSummary, ConfigError> {
    config.validate()?;
    let client = config.build_client()?;
    Ok(dispatch::run(config, &client).await)
}
